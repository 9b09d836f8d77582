//! Type-level and constructor-level eligibility.
//!
//! Both predicates are total: ineligibility is an ordinary answer, never an error. The `*_rejection`
//! / [`ineligibility`] variants carry the reason for reporting layers; the boolean forms are what
//! the pipeline uses.

use std::fmt;

use crate::accessibility::{Accessibility, first_rejecting_context};
use crate::types::{ConstructorView, TypeView};

/// Why a type is not a candidate at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRejection {
    Abstract,
    Static,
    /// The type or one of its enclosing types cannot be extended with another declaration fragment.
    NotExtensible,
}

impl fmt::Display for TypeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRejection::Abstract => write!(f, "type is abstract"),
            TypeRejection::Static => write!(f, "type is static"),
            TypeRejection::NotExtensible => write!(f, "type or an enclosing type is not partial"),
        }
    }
}

/// Why a constructor cannot back a synthesized conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// The constructor, or its type, carries the opt-out marker.
    OptedOut,
    Obsolete,
    /// `level` is not relatively accessible to the enclosing `context`.
    Inaccessible { level: Accessibility, context: Accessibility },
    NoParameters,
    /// The sole parameter is the owning type itself.
    CopyConstructor,
    /// `parameter` could be generalized away, widening overload resolution.
    Generalizable { parameter: String },
    /// Several parameters but the host has no tuple type to carry them in one operand.
    RequiresTuples,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::OptedOut => write!(f, "opted out"),
            Ineligibility::Obsolete => write!(f, "obsolete"),
            Ineligibility::Inaccessible { level, context } => {
                write!(f, "{level} constructor is not accessible from a {context} context")
            }
            Ineligibility::NoParameters => write!(f, "takes no parameters"),
            Ineligibility::CopyConstructor => write!(f, "copy constructor"),
            Ineligibility::Generalizable { parameter } => {
                write!(f, "parameter '{parameter}' has a type that can be generalized")
            }
            Ineligibility::RequiresTuples => write!(f, "multiple parameters require tuple support"),
        }
    }
}

/// Type-level gate: why `ty` is not a candidate, if it is not.
pub fn type_rejection(ty: &TypeView) -> Option<TypeRejection> {
    if ty.is_abstract {
        Some(TypeRejection::Abstract)
    } else if ty.is_static {
        Some(TypeRejection::Static)
    } else if !ty.is_extensible {
        Some(TypeRejection::NotExtensible)
    } else {
        None
    }
}

/// A type is a candidate iff it is neither abstract nor static and is extensible.
pub fn is_candidate(ty: &TypeView) -> bool {
    type_rejection(ty).is_none()
}

/// Constructor-level gate with the host's tuple capability taken into account.
pub fn ineligibility(ty: &TypeView, ctor: &ConstructorView, has_tuple_feature: bool) -> Option<Ineligibility> {
    if ctor.is_opted_out || ty.is_opted_out {
        return Some(Ineligibility::OptedOut);
    }
    if ctor.is_obsolete {
        return Some(Ineligibility::Obsolete);
    }
    if let Some(context) = first_rejecting_context(ty.accessibility_chain(), ctor.accessibility) {
        return Some(Ineligibility::Inaccessible {
            level: ctor.accessibility,
            context,
        });
    }

    match ctor.parameters.as_slice() {
        [] => return Some(Ineligibility::NoParameters),
        [only] if only.ty.identity() == Some(ty.identity().as_str()) => {
            return Some(Ineligibility::CopyConstructor);
        }
        // A lone interface is unambiguous at the call site even though many types satisfy it.
        [only] if only.ty.is_interface() => {}
        params => {
            if let Some(param) = params.iter().find(|p| p.ty.is_generalizable()) {
                return Some(Ineligibility::Generalizable {
                    parameter: param.name.clone(),
                });
            }
        }
    }

    if !has_tuple_feature && ctor.parameters.len() > 1 {
        return Some(Ineligibility::RequiresTuples);
    }
    None
}

/// Whether `ctor` may back a synthesized conversion on `ty`.
pub fn is_eligible(ty: &TypeView, ctor: &ConstructorView) -> bool {
    ineligibility(ty, ctor, true).is_none()
}
