//! Name resolution and canonicalization of parsed type expressions.
//!
//! Turns a [`TypeExpr`] into the engine's [`ParamType`]:
//!
//! - keyword aliases and their `System.*` spellings fold to one canonical identity
//!   (`int` and `global::System.Int32` are the same type; `dynamic` is `object`),
//! - names declared in the manifest resolve to their fully qualified identity, so a constructor
//!   taking its own type is recognised as a copy constructor,
//! - the generalizability predicate is decided here, once, so the engine only reads a flag.
//!
//! A named type is generalizable when it is a type parameter in scope, a universal base, marked
//! `open` in the symbol table, or a constructed generic with a generalizable argument. Tuples,
//! arrays and nullables follow their elements.

use std::collections::{BTreeMap, HashMap};

use implicitgen_core::lang::keywords::{is_keyword, unescape_identifier};
use implicitgen_core::lang::special_types;
use implicitgen_core::types::{ParamType, TupleElement, TypeKind, generic_identity};

use super::manifest::SymbolKind;
use super::type_expr::{NameSegment, Span, TypeExpr, TypeExprKind};

/// Resolution failure, located inside the type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub message: String,
    pub span: Span,
}

impl ResolveError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A type declared in the manifest, as a resolution target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Namespace and enclosing types with their type parameters, e.g. `Demo.Outer<U>`.
    pub prefix_identity: String,
    /// Same as `prefix_identity`, spelled for emission, e.g. `Demo.Outer<U>`.
    pub prefix_display: String,
    /// Dotted path without type parameters, e.g. `Demo.Outer.Box`.
    pub path: String,
    pub name: String,
    pub arity: usize,
    pub kind: TypeKind,
}

impl DeclaredType {
    fn is_reference(&self) -> bool {
        matches!(self.kind, TypeKind::Class | TypeKind::Record)
    }
}

/// Everything a type expression may refer to.
#[derive(Debug, Default)]
pub struct Resolver<'a> {
    symbols: Option<&'a BTreeMap<String, SymbolKind>>,
    by_path: HashMap<(String, usize), DeclaredType>,
    by_name: HashMap<(String, usize), Vec<DeclaredType>>,
}

/// Intermediate result: the engine type plus whether a `?` suffix leaves its identity unchanged.
struct Resolved {
    ty: ParamType,
    reference: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(symbols: &'a BTreeMap<String, SymbolKind>) -> Self {
        Self {
            symbols: Some(symbols),
            by_path: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a manifest type as a resolution target.
    pub fn declare(&mut self, declared: DeclaredType) {
        let arity = declared.arity;
        self.by_name
            .entry((declared.name.clone(), arity))
            .or_default()
            .push(declared.clone());
        self.by_path.insert((declared.path.clone(), arity), declared);
    }

    /// Resolve `expr` with the given type parameters in scope.
    pub fn resolve(&self, expr: &TypeExpr, type_parameters: &[String]) -> Result<ParamType, ResolveError> {
        self.resolve_inner(expr, type_parameters).map(|r| r.ty)
    }

    fn resolve_inner(&self, expr: &TypeExpr, type_parameters: &[String]) -> Result<Resolved, ResolveError> {
        match &expr.kind {
            TypeExprKind::Named { global, segments } => self.resolve_named(*global, segments, type_parameters),
            TypeExprKind::Tuple(elements) => {
                let mut seen: Vec<&str> = Vec::new();
                let mut resolved = Vec::with_capacity(elements.len());
                for element in elements {
                    let ty = self.resolve_inner(&element.ty, type_parameters)?.ty;
                    let name = match &element.name {
                        Some((written, span)) => {
                            let name = unescape_identifier(written);
                            if seen.contains(&name) {
                                return Err(ResolveError::new(
                                    format!("duplicate tuple element name '{name}'"),
                                    *span,
                                ));
                            }
                            seen.push(name);
                            Some(name.to_string())
                        }
                        None => None,
                    };
                    resolved.push(TupleElement { name, ty });
                }
                Ok(Resolved {
                    ty: ParamType::tuple(resolved),
                    reference: false,
                })
            }
            TypeExprKind::Nullable(inner) => {
                if matches!(inner.kind, TypeExprKind::Nullable(_)) {
                    return Err(ResolveError::new("nullable of a nullable type", expr.span));
                }
                let inner = self.resolve_inner(inner, type_parameters)?;
                Ok(nullable(inner))
            }
            TypeExprKind::Array { element, rank } => {
                let element = self.resolve_inner(element, type_parameters)?.ty;
                let brackets = format!("[{}]", ",".repeat(rank - 1));
                Ok(Resolved {
                    ty: ParamType::Atomic {
                        name: implicitgen_core::TypeName::new(
                            format!("{}{brackets}", structural_identity(&element)),
                            format!("{}{brackets}", element.display()),
                        ),
                        generalizable: element.is_generalizable(),
                    },
                    reference: true,
                })
            }
        }
    }

    fn resolve_named(
        &self,
        global: bool,
        segments: &[NameSegment],
        type_parameters: &[String],
    ) -> Result<Resolved, ResolveError> {
        let mut args: Vec<Vec<ParamType>> = Vec::with_capacity(segments.len());
        for segment in segments {
            if is_keyword(&segment.name) {
                // Keywords are only valid as whole special type names.
                let is_special = segments.len() == 1 && special_types::from_keyword(&segment.name).is_some();
                if !is_special || global {
                    return Err(ResolveError::new(
                        format!("keyword '{}' is not a type name here", segment.name),
                        segment.span,
                    ));
                }
            }
            let mut resolved = Vec::with_capacity(segment.args.len());
            for arg in &segment.args {
                resolved.push(self.resolve_inner(arg, type_parameters)?.ty);
            }
            args.push(resolved);
        }
        let names: Vec<&str> = segments.iter().map(|s| unescape_identifier(&s.name)).collect();
        let any_arg_generalizable = args.iter().flatten().any(ParamType::is_generalizable);

        if let ([only], [no_args], false) = (segments, args.as_slice(), global) {
            if no_args.is_empty() {
                let written = only.name.as_str();
                if type_parameters.iter().any(|p| p == written) {
                    return Ok(Resolved {
                        ty: ParamType::open(written, written),
                        reference: false,
                    });
                }
                if let Some(id) = special_types::from_keyword(written) {
                    return Ok(special(id, written.to_string()));
                }
            }
        }

        let path = names.join(".");
        let arity = args.last().map_or(0, Vec::len);
        let prefix_args_empty = args[..args.len() - 1].iter().all(Vec::is_empty);
        let last_args = args.last().cloned().unwrap_or_default();

        if arity == 0 && prefix_args_empty {
            if let Some(id) = special_types::from_canonical(&path) {
                return Ok(special(id, written_display(global, segments, &args)));
            }
        }

        let declared = if prefix_args_empty {
            self.lookup(&path, names.len(), arity)
        } else {
            None
        };

        let (identity, display, mut reference) = match declared {
            Some(declared) => {
                let own = generic_identity(&declared.name, &identities(&last_args));
                let own_display = display_generic(&declared.name, &last_args);
                let identity = join_path(&declared.prefix_identity, &own);
                let display = format!("global::{}", join_path(&declared.prefix_display, &own_display));
                (identity, display, declared.is_reference())
            }
            None => {
                let identity = args
                    .iter()
                    .zip(&names)
                    .map(|(segment_args, name)| generic_identity(name, &identities(segment_args)))
                    .collect::<Vec<_>>()
                    .join(".");
                (identity, written_display(global, segments, &args), false)
            }
        };

        let mut generalizable = special_types::is_universal_base(&identity) || any_arg_generalizable;
        let mut interface = false;
        let simple = names.last().copied().unwrap_or_default();
        let symbol = self
            .symbols
            .and_then(|symbols| symbols.get(&identity).or_else(|| symbols.get(&path)).or_else(|| symbols.get(simple)));
        match symbol {
            Some(SymbolKind::Interface) => {
                interface = true;
                reference = true;
            }
            Some(SymbolKind::Open) => generalizable = true,
            Some(SymbolKind::Sealed) | None => {}
        }

        let ty = if interface {
            ParamType::interface(identity, display)
        } else {
            ParamType::Atomic {
                name: implicitgen_core::TypeName::new(identity, display),
                generalizable,
            }
        };
        Ok(Resolved { ty, reference })
    }

    /// Find a declared type by exact dotted path, or by simple name when unambiguous.
    fn lookup(&self, path: &str, segment_count: usize, arity: usize) -> Option<&DeclaredType> {
        if let Some(declared) = self.by_path.get(&(path.to_string(), arity)) {
            return Some(declared);
        }
        if segment_count != 1 {
            return None;
        }
        match self.by_name.get(&(path.to_string(), arity)).map(Vec::as_slice) {
            Some([only]) => Some(only),
            _ => None,
        }
    }
}

fn special(id: special_types::SpecialTypeId, display: String) -> Resolved {
    let info = special_types::info_for(id);
    Resolved {
        ty: ParamType::Atomic {
            name: implicitgen_core::TypeName::new(info.canonical, display),
            generalizable: special_types::is_universal_base(info.canonical),
        },
        reference: !info.is_value_type,
    }
}

/// `T?` on a reference type is an annotation only; on anything else it is a distinct type.
fn nullable(inner: Resolved) -> Resolved {
    let display = format!("{}?", inner.ty.display());
    let ty = match inner.ty {
        ParamType::Interface { name } => ParamType::interface(name.identity(), display),
        ParamType::Atomic { name, generalizable } if inner.reference => ParamType::Atomic {
            name: implicitgen_core::TypeName::new(name.identity(), display),
            generalizable,
        },
        other => ParamType::Atomic {
            name: implicitgen_core::TypeName::new(format!("{}?", structural_identity(&other)), display),
            generalizable: other.is_generalizable(),
        },
    };
    Resolved {
        ty,
        reference: inner.reference,
    }
}

/// Identity text of any type, tuples included: `(System.Int32,System.String)`.
pub fn structural_identity(ty: &ParamType) -> String {
    match ty {
        ParamType::Tuple(tuple) => {
            let parts: Vec<String> = tuple.elements.iter().map(|e| structural_identity(&e.ty)).collect();
            format!("({})", parts.join(","))
        }
        other => other.identity().unwrap_or_default().to_string(),
    }
}

fn identities(args: &[ParamType]) -> Vec<String> {
    args.iter().map(structural_identity).collect()
}

fn display_generic(name: &str, args: &[ParamType]) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        let parts: Vec<String> = args.iter().map(ParamType::display).collect();
        format!("{name}<{}>", parts.join(", "))
    }
}

fn written_display(global: bool, segments: &[NameSegment], args: &[Vec<ParamType>]) -> String {
    let path = segments
        .iter()
        .zip(args)
        .map(|(segment, segment_args)| display_generic(&segment.name, segment_args))
        .collect::<Vec<_>>()
        .join(".");
    if global { format!("global::{path}") } else { path }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
