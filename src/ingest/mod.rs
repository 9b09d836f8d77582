//! Ingestion adapter: manifest JSON → engine declarations.
//!
//! The symbol-discovery collaborator describes the declarations of a compilation as a JSON
//! manifest. This module reads it, validates every declaration, resolves parameter types, and hands
//! the engine immutable [`TypeView`]s.
//!
//! ## Modules
//!
//! - `manifest` - Raw serde schema
//! - `type_expr` - Type-expression lexer and parser
//! - `resolve` - Name resolution, canonicalization and the generalizability predicate
//! - `lower` - Validation and lowering into [`TypeView`]s
//! - `error` - [`IngestError`] diagnostics

pub mod error;
pub mod lower;
pub mod manifest;
pub mod resolve;
pub mod type_expr;

use std::fs;
use std::path::Path;

use implicitgen_core::TypeView;

pub use error::IngestError;
pub use manifest::{RawManifest, SymbolKind};

/// Maximum manifest size (100 MB)
const MAX_MANIFEST_SIZE: u64 = 100 * 1024 * 1024;

/// Validated declarations of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarations {
    /// Whether the host language has native tuple types.
    pub has_tuple_feature: bool,
    /// Types in manifest order.
    pub types: Vec<TypeView>,
}

/// Read and validate the manifest at `path`.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read or exceeds `MAX_MANIFEST_SIZE`
/// - The JSON is malformed or does not match the manifest schema
/// - Any declaration violates the input contract
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_manifest(path: &Path) -> Result<Declarations, IngestError> {
    let display = path.display().to_string();
    let metadata = fs::metadata(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    if metadata.len() > MAX_MANIFEST_SIZE {
        return Err(IngestError::TooLarge {
            path: display,
            size: metadata.len(),
            max: MAX_MANIFEST_SIZE,
        });
    }
    let source = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    parse_manifest(&display, &source)
}

/// Validate manifest text. `name` labels diagnostics.
pub fn parse_manifest(name: &str, source: &str) -> Result<Declarations, IngestError> {
    let raw: RawManifest = serde_json::from_str(source).map_err(|e| IngestError::json(name, source, &e))?;
    let types = lower::lower_manifest(&raw)?;
    tracing::info!(manifest = name, types = types.len(), "manifest loaded");
    Ok(Declarations {
        has_tuple_feature: raw.has_tuple_feature,
        types,
    })
}
