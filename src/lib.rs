#![forbid(unsafe_code)]
//! Implicit conversion generator
//!
//! Reads a manifest of type declarations, decides which constructors can back an implicit
//! conversion operator, and writes one generated unit per type. The decision engine lives in
//! [`implicitgen_core`]; this crate wires it to manifests, output sinks, and the CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Emitted operators are plain strings and carry no Rust semantics.
//!
//! - **True invariants**: If a panic represents a generator bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation.

pub mod cli;
pub mod config;
pub mod driver;
pub mod ingest;
pub mod sink;

pub use config::GeneratorConfig;
pub use driver::{CancellationToken, DriverError, explain_all, generate_all, generate_into};
pub use implicitgen_core::{GeneratedUnit, TypeReport, TypeView, explain, transform, transform_with};
pub use ingest::{Declarations, IngestError, load_manifest, parse_manifest};
pub use sink::{DirectorySink, MemorySink, OutputSink, SinkError, StdoutSink};
