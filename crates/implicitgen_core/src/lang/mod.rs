//! Host-language vocabulary: builtin type aliases and reserved words.
//!
//! These registries are pure const tables; they carry no compiler state.

pub mod keywords;
pub mod special_types;
