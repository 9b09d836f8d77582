//! Raw manifest schema.
//!
//! These structs mirror the JSON document handed over by the symbol-discovery collaborator. They
//! are deliberately stringly typed: spelling validation happens in [`super::lower`], where the
//! error can name the declaration it belongs to.

use std::collections::BTreeMap;

use serde::Deserialize;

fn yes() -> bool {
    true
}

fn class() -> String {
    "class".to_string()
}

fn public() -> String {
    "public".to_string()
}

fn implicit() -> String {
    "implicit".to_string()
}

/// Capability of a type named in the manifest's symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// An interface: a sole parameter of this type is allowed.
    Interface,
    /// A non-sealed base with many implicit conversions into it: treated as generalizable.
    Open,
    /// A concrete type. Listing it is only needed to document intent.
    Sealed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawManifest {
    #[serde(default = "yes")]
    pub has_tuple_feature: bool,
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolKind>,
    #[serde(default)]
    pub types: Vec<RawType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawType {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "class")]
    pub kind: String,
    #[serde(default = "public")]
    pub accessibility: String,
    #[serde(default = "yes")]
    pub partial: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub opt_out: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Outermost first.
    #[serde(default)]
    pub containing_types: Vec<RawContainingType>,
    #[serde(default)]
    pub usings: Vec<String>,
    #[serde(default)]
    pub constructors: Vec<RawConstructor>,
    #[serde(default)]
    pub conversions: Vec<RawConversion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawContainingType {
    pub name: String,
    #[serde(default = "class")]
    pub kind: String,
    #[serde(default = "public")]
    pub accessibility: String,
    #[serde(default = "yes")]
    pub partial: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConstructor {
    #[serde(default = "public")]
    pub accessibility: String,
    #[serde(default)]
    pub opt_out: bool,
    #[serde(default)]
    pub obsolete: bool,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConversion {
    #[serde(default = "implicit")]
    pub kind: String,
    pub parameters: Vec<String>,
}
