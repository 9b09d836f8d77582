//! Constructor parameter list → conversion signature.
//!
//! A constructor that takes one tuple and a constructor that takes the tuple's elements as
//! discrete values resolve to the same signature; either way the conversion can be satisfied by a
//! composite literal or a parenthesized list of values.

use crate::classify::ineligibility;
use crate::types::{ConstructorView, ConversionCandidate, SignatureElement, TupleType, TypeView};

/// Whether the constructor's sole parameter is a tuple that should be expanded.
pub fn is_destructured(ctor: &ConstructorView, has_tuple_feature: bool) -> bool {
    has_tuple_feature && sole_tuple(ctor).is_some()
}

fn sole_tuple(ctor: &ConstructorView) -> Option<&TupleType> {
    match ctor.parameters.as_slice() {
        [only] => only.ty.as_tuple(),
        _ => None,
    }
}

/// Resolve the conversion signature of `ctor`.
///
/// A sole tuple parameter yields the tuple's elements (named after the tuple members, falling back
/// to positional names); anything else yields the parameter list unchanged. Without the tuple
/// feature a tuple-shaped parameter is an opaque type and is never expanded.
pub fn destructure(ctor: &ConstructorView, has_tuple_feature: bool) -> Vec<SignatureElement> {
    if let Some(tuple) = sole_tuple(ctor).filter(|_| has_tuple_feature) {
        return tuple
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| SignatureElement::new(tuple.element_name(i), e.ty.clone()))
            .collect();
    }
    ctor.parameters
        .iter()
        .map(|p| SignatureElement::new(p.name.clone(), p.ty.clone()))
        .collect()
}

/// Build a candidate for every eligible constructor, in declaration order.
pub fn collect_candidates(ty: &TypeView, has_tuple_feature: bool) -> Vec<ConversionCandidate<'_>> {
    ty.constructors
        .iter()
        .enumerate()
        .filter_map(|(index, ctor)| {
            if let Some(reason) = ineligibility(ty, ctor, has_tuple_feature) {
                tracing::debug!(type_name = %ty.name, constructor = index, %reason, "constructor skipped");
                return None;
            }
            Some(ConversionCandidate {
                owner: ty,
                constructor: ctor,
                index,
                signature: destructure(ctor, has_tuple_feature),
                destructured: is_destructured(ctor, has_tuple_feature),
            })
        })
        .collect()
}
