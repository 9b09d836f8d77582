//! Builtin ("special") type vocabulary of the host language.
//!
//! Every keyword alias (`int`, `string`, ...) maps to exactly one canonical metadata name
//! (`System.Int32`, `System.String`, ...). Signature identity is always keyed on the canonical
//! name, so `int`, `System.Int32` and `global::System.Int32` are the same type.
//!
//! ## Examples
//! ```rust
//! use implicitgen_core::lang::special_types::{self, SpecialTypeId};
//!
//! assert_eq!(special_types::from_keyword("int"), Some(SpecialTypeId::Int32));
//! assert_eq!(special_types::from_canonical("System.String"), Some(SpecialTypeId::String));
//! assert_eq!(special_types::keyword(SpecialTypeId::Int32), "int");
//! ```

/// Stable identifier for every builtin type with a keyword alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialTypeId {
    Boolean,
    Byte,
    SByte,
    Char,
    Decimal,
    Double,
    Single,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    IntPtr,
    UIntPtr,
    Object,
    String,
}

/// Metadata for a builtin type.
#[derive(Debug, Clone, Copy)]
pub struct SpecialTypeInfo {
    pub id: SpecialTypeId,
    /// Keyword spelling used when emitting the type.
    pub keyword: &'static str,
    /// Canonical metadata name (without `global::`).
    pub canonical: &'static str,
    /// Additional keyword spellings that denote the same type.
    pub aliases: &'static [&'static str],
    /// Whether values of the type are value types (affects nullable identity).
    pub is_value_type: bool,
}

const fn info(
    id: SpecialTypeId,
    keyword: &'static str,
    canonical: &'static str,
    aliases: &'static [&'static str],
    is_value_type: bool,
) -> SpecialTypeInfo {
    SpecialTypeInfo {
        id,
        keyword,
        canonical,
        aliases,
        is_value_type,
    }
}

/// Registry of builtin types.
pub const SPECIAL_TYPES: &[SpecialTypeInfo] = &[
    info(SpecialTypeId::Boolean, "bool", "System.Boolean", &[], true),
    info(SpecialTypeId::Byte, "byte", "System.Byte", &[], true),
    info(SpecialTypeId::SByte, "sbyte", "System.SByte", &[], true),
    info(SpecialTypeId::Char, "char", "System.Char", &[], true),
    info(SpecialTypeId::Decimal, "decimal", "System.Decimal", &[], true),
    info(SpecialTypeId::Double, "double", "System.Double", &[], true),
    info(SpecialTypeId::Single, "float", "System.Single", &[], true),
    info(SpecialTypeId::Int16, "short", "System.Int16", &[], true),
    info(SpecialTypeId::UInt16, "ushort", "System.UInt16", &[], true),
    info(SpecialTypeId::Int32, "int", "System.Int32", &[], true),
    info(SpecialTypeId::UInt32, "uint", "System.UInt32", &[], true),
    info(SpecialTypeId::Int64, "long", "System.Int64", &[], true),
    info(SpecialTypeId::UInt64, "ulong", "System.UInt64", &[], true),
    info(SpecialTypeId::IntPtr, "nint", "System.IntPtr", &[], true),
    info(SpecialTypeId::UIntPtr, "nuint", "System.UIntPtr", &[], true),
    // `dynamic` shares identity with `object` in every signature comparison.
    info(SpecialTypeId::Object, "object", "System.Object", &["dynamic"], false),
    info(SpecialTypeId::String, "string", "System.String", &[], false),
];

/// Types every other type (or every type of a category) converts to implicitly.
///
/// A parameter of one of these types accepts so many arguments that synthesizing a conversion from
/// it would silently widen overload resolution.
pub const UNIVERSAL_BASES: &[&str] = &[
    "System.Object",
    "System.ValueType",
    "System.Enum",
    "System.Delegate",
    "System.MulticastDelegate",
    "System.Array",
];

/// Look up a builtin type by its keyword spelling (including aliases).
pub fn from_keyword(word: &str) -> Option<SpecialTypeId> {
    SPECIAL_TYPES
        .iter()
        .find(|t| t.keyword == word || t.aliases.contains(&word))
        .map(|t| t.id)
}

/// Look up a builtin type by its canonical metadata name.
pub fn from_canonical(name: &str) -> Option<SpecialTypeId> {
    SPECIAL_TYPES.iter().find(|t| t.canonical == name).map(|t| t.id)
}

/// Return the registry entry for a builtin type.
pub fn info_for(id: SpecialTypeId) -> &'static SpecialTypeInfo {
    SPECIAL_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("INVARIANT: every SpecialTypeId has a registry entry")
}

/// Keyword spelling for a builtin type.
pub fn keyword(id: SpecialTypeId) -> &'static str {
    info_for(id).keyword
}

/// Canonical metadata name for a builtin type.
pub fn canonical(id: SpecialTypeId) -> &'static str {
    info_for(id).canonical
}

/// Check whether a canonical name is one of the [`UNIVERSAL_BASES`].
pub fn is_universal_base(canonical_name: &str) -> bool {
    UNIVERSAL_BASES.contains(&canonical_name)
}
