//! Candidate selection and synthesis of implicit conversion operators.
//!
//! Given a type and its constructors, decide which constructors can back an implicit conversion,
//! what operand signature each conversion takes, which candidates collide, and render the
//! survivors as a declaration fragment that merges into the type.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, no caching. [`transform`] is a pure
//!   function of its input, so independent types can be processed concurrently and re-running on an
//!   unchanged type reproduces byte-identical output.
//! - Ineligibility is never an error: every decision is a total predicate. Malformed declarations are
//!   the ingestion layer's problem and must be rejected before they reach this crate.
//!
//! ## Pipeline
//!
//! ```text
//! TypeView ─ classify (type) ─ classify (constructor) ─ destructure ─ duplicates ─ emit ─ GeneratedUnit
//! ```
//!
//! ## Examples
//! ```rust
//! use implicitgen_core::types::{ConstructorView, Parameter, ParamType, TypeView};
//!
//! let int = ParamType::concrete("System.Int32", "int");
//! let ty = TypeView::class("Meters")
//!     .with_namespace("Units")
//!     .with_constructor(ConstructorView::public([Parameter::new("value", int)]));
//!
//! let unit = implicitgen_core::transform(&ty, true).unwrap();
//! assert_eq!(unit.identifier, "Units.Meters.g.cs");
//! assert!(unit.text.contains("implicit operator global::Units.Meters(int value)"));
//! ```

pub mod accessibility;
pub mod classify;
pub mod destructure;
pub mod duplicates;
pub mod emit;
pub mod lang;
pub mod report;
pub mod signature;
pub mod types;

pub use accessibility::{Accessibility, is_relatively_accessible};
pub use classify::{Ineligibility, TypeRejection, ineligibility, is_candidate, is_eligible};
pub use destructure::{collect_candidates, destructure};
pub use duplicates::{Verdict, resolve_duplicates};
pub use emit::{EmitOptions, hint_name, render_unit};
pub use report::{Outcome, TypeReport, explain};
pub use signature::{SignatureComparer, signature_equal};
pub use types::{
    ConstructorView, ContainingType, ConversionCandidate, ConversionKind, ExistingConversion, GeneratedUnit,
    Parameter, ParamType, SignatureElement, TupleElement, TupleType, TypeKind, TypeName, TypeView,
};

/// Run the full pipeline for one type with default rendering options.
///
/// Returns `None` when the type is not a candidate or no constructor survives.
pub fn transform(ty: &TypeView, has_tuple_feature: bool) -> Option<GeneratedUnit> {
    transform_with(ty, has_tuple_feature, &EmitOptions::default())
}

/// Run the full pipeline for one type.
#[tracing::instrument(skip_all, fields(type_name = %ty.name, ctor_count = ty.constructors.len()))]
pub fn transform_with(ty: &TypeView, has_tuple_feature: bool, options: &EmitOptions) -> Option<GeneratedUnit> {
    if let Some(rejection) = classify::type_rejection(ty) {
        tracing::debug!(%rejection, "type is not a candidate");
        return None;
    }

    let candidates = collect_candidates(ty, has_tuple_feature);
    let survivors = resolve_duplicates(candidates, &ty.conversions, SignatureComparer::new(has_tuple_feature));
    if survivors.is_empty() {
        tracing::debug!("no surviving candidates");
        return None;
    }

    Some(GeneratedUnit {
        identifier: hint_name(ty, options),
        text: render_unit(ty, &survivors, options),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> ParamType {
        ParamType::concrete("System.Int32", "int")
    }

    fn string() -> ParamType {
        ParamType::concrete("System.String", "string")
    }

    fn string_pair() -> ParamType {
        ParamType::tuple([TupleElement::unnamed(string()), TupleElement::unnamed(string())])
    }

    /// The `Cylinder` scenario: only the default `(int i, int r)` constructor is synthesized.
    fn cylinder() -> TypeView {
        TypeView::class("Cylinder")
            .with_accessibility(Accessibility::Internal)
            .with_constructor(ConstructorView::public([Parameter::new("i", int()), Parameter::new("r", int())]))
            .with_constructor(ConstructorView::public([Parameter::new("i", int())]).with_opt_out(true))
            .with_constructor(ConstructorView::public([Parameter::new("i", string_pair())]).with_opt_out(true))
            .with_constructor(
                ConstructorView::new(Accessibility::Internal, [Parameter::new("i", string())]).with_opt_out(true),
            )
            .with_conversion(ExistingConversion::implicit([string_pair()]))
    }

    #[test]
    fn cylinder_synthesizes_only_the_default_constructor() {
        let ty = cylinder();
        let unit = transform(&ty, true).unwrap();
        assert_eq!(unit.identifier, "Cylinder.g.cs");
        assert_eq!(unit.text.matches("implicit operator").count(), 1);
        assert!(unit.text.contains(
            "public static implicit operator global::Cylinder((int i, int r) tuple) => \
             new global::Cylinder(tuple.i, tuple.r);"
        ));
    }

    #[test]
    fn all_opted_out_yields_nothing() {
        let ty = TypeView::class("A")
            .with_constructor(ConstructorView::public([Parameter::new("i", int())]).with_opt_out(true))
            .with_constructor(ConstructorView::public([Parameter::new("s", string())]).with_opt_out(true));
        assert_eq!(transform(&ty, true), None);
    }

    #[test]
    fn non_extensible_type_yields_nothing() {
        let ty = TypeView::class("A")
            .with_extensible(false)
            .with_constructor(ConstructorView::public([Parameter::new("i", int())]));
        assert!(!is_candidate(&ty));
        assert_eq!(transform(&ty, true), None);
    }

    #[test]
    fn transform_is_idempotent() {
        let ty = cylinder();
        assert_eq!(transform(&ty, true), transform(&ty, true));
    }

    #[test]
    fn without_tuples_only_single_parameters_survive() {
        let ty = TypeView::class("A")
            .with_constructor(ConstructorView::public([Parameter::new("x", int()), Parameter::new("y", int())]))
            .with_constructor(ConstructorView::public([Parameter::new("s", string())]));
        let unit = transform(&ty, false).unwrap();
        assert_eq!(unit.text.matches("implicit operator").count(), 1);
        assert!(unit.text.contains("(string s) => new global::A(s);"));
    }

    #[test]
    fn configured_options_flow_through() {
        let ty = TypeView::class("A").with_constructor(ConstructorView::public([Parameter::new("i", int())]));
        let options = EmitOptions::default().with_indent_width(2).with_hint_suffix(".cs");
        let unit = transform_with(&ty, true, &options).unwrap();
        assert_eq!(unit.identifier, "A.cs");
        assert!(unit.text.contains("\n  public static implicit operator"));
    }
}
