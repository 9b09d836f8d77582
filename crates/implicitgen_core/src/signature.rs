//! Structural equality over ordered parameter-type sequences.
//!
//! Two signatures are equal when they would declare the same conversion operator: named types
//! compare by fully-resolved identity, tuples compare element-wise (element names never matter),
//! and a sequence consisting of a single tuple is first expanded to the tuple's elements, so
//! `((int, int))` and `(int, int)` are the same signature.

use crate::types::ParamType;

/// Compares parameter-type sequences.
///
/// With `expand_tuples` off (the host has no native tuple type) tuple-shaped parameters are opaque:
/// they are still compared structurally against other tuples, but never expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureComparer {
    expand_tuples: bool,
}

impl Default for SignatureComparer {
    fn default() -> Self {
        Self::TUPLE_AWARE
    }
}

impl SignatureComparer {
    pub const TUPLE_AWARE: SignatureComparer = SignatureComparer { expand_tuples: true };
    pub const OPAQUE_TUPLES: SignatureComparer = SignatureComparer { expand_tuples: false };

    pub fn new(expand_tuples: bool) -> Self {
        Self { expand_tuples }
    }

    /// Positional equality of two sequences after tuple expansion.
    pub fn equal<'a, 'b, A, B>(&self, left: A, right: B) -> bool
    where
        A: IntoIterator<Item = &'a ParamType>,
        B: IntoIterator<Item = &'b ParamType>,
    {
        let left = self.expand(left.into_iter().collect());
        let right = self.expand(right.into_iter().collect());
        left.len() == right.len() && left.iter().zip(&right).all(|(l, r)| type_equal(l, r))
    }

    fn expand<'a>(&self, sequence: Vec<&'a ParamType>) -> Vec<&'a ParamType> {
        if self.expand_tuples && sequence.len() == 1 {
            let only: &'a ParamType = sequence[0];
            if let ParamType::Tuple(tuple) = only {
                return tuple.elements.iter().map(|e| &e.ty).collect();
            }
        }
        sequence
    }
}

/// Structural equality of two parameter types.
pub fn type_equal(left: &ParamType, right: &ParamType) -> bool {
    match (left, right) {
        (ParamType::Tuple(l), ParamType::Tuple(r)) => {
            l.elements.len() == r.elements.len()
                && l.elements.iter().zip(&r.elements).all(|(a, b)| type_equal(&a.ty, &b.ty))
        }
        (ParamType::Tuple(_), _) | (_, ParamType::Tuple(_)) => false,
        _ => left.identity() == right.identity(),
    }
}

/// Tuple-aware sequence equality.
pub fn signature_equal(left: &[ParamType], right: &[ParamType]) -> bool {
    SignatureComparer::TUPLE_AWARE.equal(left, right)
}
