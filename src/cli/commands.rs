//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::config::GeneratorConfig;
use crate::driver::{self, CancellationToken};
use crate::ingest::{self, Declarations};
use crate::sink::{DirectorySink, OutputSink, StdoutSink};

use super::{CliError, CliResult, ExitCode};

/// Output directory used when neither `--out-dir` nor `--stdout` is given
pub const DEFAULT_OUT_DIR: &str = "implicitgen_output";

/// Where `generate` sends its units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Directory(PathBuf),
    Stdout,
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Render a diagnostic with miette's graphical handler.
///
/// Colors are used only when stderr is a terminal.
pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let theme = if std::io::stderr().is_terminal() {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut out = String::new();
    match GraphicalReportHandler::new_themed(theme).render_report(&mut out, diagnostic) {
        Ok(()) => out.trim_end().to_string(),
        Err(_) => diagnostic.to_string(),
    }
}

fn load(manifest: &Path) -> CliResult<Declarations> {
    ingest::load_manifest(manifest).map_err(|e| CliError::failure(render_diagnostic(&e)))
}

// ============================================================================
// Commands
// ============================================================================

/// Generate conversion units for every type in `manifest`.
pub fn generate(
    manifest: &Path,
    target: Target,
    no_tuples: bool,
    threads: Option<usize>,
) -> CliResult<ExitCode> {
    let declarations = load(manifest)?;
    let config = GeneratorConfig::default()
        .with_tuple_feature(declarations.has_tuple_feature && !no_tuples)
        .with_threads(threads);

    let token = CancellationToken::new();
    let mut sink: Box<dyn OutputSink> = match &target {
        Target::Directory(dir) => {
            Box::new(DirectorySink::new(dir).map_err(|e| CliError::failure(format!("Error: {e}")))?)
        }
        Target::Stdout => Box::new(StdoutSink::new()),
    };

    let count = driver::generate_into(&declarations.types, &config, &token, sink.as_mut())
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

    if let Target::Directory(dir) = &target {
        println!("✓ Generated {} unit(s) in: {}", count, dir.display());
    }
    Ok(ExitCode::SUCCESS)
}

/// Print a report for every type in `manifest`, or only the one named `type_name`.
pub fn explain(manifest: &Path, type_name: Option<&str>, no_tuples: bool) -> CliResult<ExitCode> {
    let declarations = load(manifest)?;
    let has_tuple_feature = declarations.has_tuple_feature && !no_tuples;
    let reports = driver::explain_all(&declarations.types, has_tuple_feature, type_name);

    if reports.is_empty() {
        if let Some(name) = type_name {
            return Err(CliError::failure(format!("No type named '{}' in manifest", name)));
        }
    }
    for report in &reports {
        println!("{}", report);
    }
    Ok(ExitCode::SUCCESS)
}

/// Validate `manifest` without generating anything.
pub fn check(manifest: &Path) -> CliResult<ExitCode> {
    let declarations = load(manifest)?;
    println!("✓ {} type(s) validated", declarations.types.len());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("implicitgen-cli-{}-{tag}-{n}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const MANIFEST: &str = r#"{
        "types": [
            {
                "name": "Meters",
                "namespace": "Units",
                "kind": "struct",
                "constructors": [ { "parameters": [ { "name": "value", "type": "double" } ] } ]
            },
            { "name": "Sealed", "namespace": "Units", "partial": false,
              "constructors": [ { "parameters": [ { "name": "x", "type": "int" } ] } ] }
        ]
    }"#;

    #[test]
    fn test_generate_rejects_traversal() {
        let root = scratch("traversal");
        let manifest = root.join("types.json");
        fs::write(&manifest, MANIFEST).unwrap();

        let target = Target::Directory(PathBuf::from("out/../../etc"));
        let err = generate(&manifest, target, false, None).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert_eq!(err.message, "Error: output directory 'out/../../etc' contains path traversal (..)");
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_generate_writes_directory() {
        let root = scratch("generate");
        let manifest = root.join("types.json");
        fs::write(&manifest, MANIFEST).unwrap();
        let out = root.join("out");

        let code = generate(&manifest, Target::Directory(out.clone()), false, Some(2)).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let names: Vec<String> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Units.Meters.g.cs"]);
        let text = fs::read_to_string(out.join("Units.Meters.g.cs")).unwrap();
        assert!(text.contains("public static implicit operator global::Units.Meters(double value)"));
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_explain_unknown_type_fails() {
        let root = scratch("explain");
        let manifest = root.join("types.json");
        fs::write(&manifest, MANIFEST).unwrap();
        let err = explain(&manifest, Some("Nope"), false).unwrap_err();
        assert_eq!(err.message, "No type named 'Nope' in manifest");
        assert!(explain(&manifest, Some("Meters"), false).is_ok());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_check_reports_diagnostic() {
        let root = scratch("check");
        let manifest = root.join("bad.json");
        fs::write(&manifest, r#"{"types": [{"name": "A", "accessibility": "everyone"}]}"#).unwrap();
        let err = check(&manifest).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("types[0] 'A'"), "{}", err.message);
        fs::remove_dir_all(&root).unwrap();
    }
}
