//! CLI module for the implicit conversion generator
//!
//! ## Commands
//!
//! - `generate <manifest>` - Generate conversion units into a directory or stdout
//! - `explain <manifest>` - Show why each constructor was or was not synthesized
//! - `check <manifest>` - Validate the manifest only
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Implicit conversion generator
#[derive(Parser, Debug)]
#[command(name = "implicitgen")]
#[command(version = VERSION)]
#[command(about = "Generate implicit conversion operators from constructor declarations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate conversion units
    Generate {
        /// Declaration manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Output directory (default: implicitgen_output)
        #[arg(short = 'o', long = "out-dir", value_name = "DIR", conflicts_with = "stdout")]
        out_dir: Option<PathBuf>,
        /// Print units instead of writing files
        #[arg(long)]
        stdout: bool,
        /// Treat the host as having no tuple types
        #[arg(long = "no-tuples")]
        no_tuples: bool,
        /// Worker threads (default: one per core)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
        threads: Option<u16>,
    },

    /// Explain the decision made for every constructor
    Explain {
        /// Declaration manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Only explain this type (simple or qualified name)
        #[arg(long = "type", value_name = "NAME")]
        type_name: Option<String>,
        /// Treat the host as having no tuple types
        #[arg(long = "no-tuples")]
        no_tuples: bool,
    },

    /// Validate a manifest without generating
    Check {
        /// Declaration manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            manifest,
            out_dir,
            stdout,
            no_tuples,
            threads,
        } => {
            let target = if stdout {
                commands::Target::Stdout
            } else {
                let dir = out_dir.unwrap_or_else(|| PathBuf::from(commands::DEFAULT_OUT_DIR));
                commands::Target::Directory(dir)
            };
            commands::generate(&manifest, target, no_tuples, threads.map(usize::from))
        }
        Command::Explain {
            manifest,
            type_name,
            no_tuples,
        } => commands::explain(&manifest, type_name.as_deref(), no_tuples),
        Command::Check { manifest } => commands::check(&manifest),
    }
}

// ============================================================================
// Tests
// ============================================================================
