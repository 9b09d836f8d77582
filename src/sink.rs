//! Output sinks for generated units.
//!
//! A sink receives each unit as an `(identifier, text)` pair. The identifier is the unit's
//! hint name and doubles as its file name in [`DirectorySink`].

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output directory '{0}' contains path traversal (..)")]
    InvalidDirectory(String),

    #[error("'{0}' is not a valid unit identifier")]
    InvalidIdentifier(String),

    #[error("duplicate unit identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("cannot write '{path}'")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Receives generated units.
pub trait OutputSink {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<(), SinkError>;
}

fn validate_identifier(identifier: &str) -> Result<(), SinkError> {
    let bad = identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier.contains(['/', '\\', '\0']);
    if bad {
        return Err(SinkError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

/// Writes each unit to `<dir>/<identifier>`.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create the sink, creating `dir` if needed.
    ///
    /// ## Errors
    ///
    /// Returns an error if `dir` contains `..` or cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        let dir = dir.as_ref();
        if dir.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(SinkError::InvalidDirectory(dir.display().to_string()));
        }
        if dir.is_absolute() {
            tracing::warn!(dir = %dir.display(), "writing to absolute output path");
        }
        fs::create_dir_all(dir).map_err(|source| SinkError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for DirectorySink {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<(), SinkError> {
        validate_identifier(identifier)?;
        let path = self.dir.join(identifier);
        if self.written.contains(&path) {
            return Err(SinkError::DuplicateIdentifier(identifier.to_string()));
        }
        fs::write(&path, text).map_err(|source| SinkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "unit written");
        self.written.push(path);
        Ok(())
    }
}

/// Collects units in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    units: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[(String, String)] {
        &self.units
    }

    pub fn into_units(self) -> Vec<(String, String)> {
        self.units
    }
}

impl OutputSink for MemorySink {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<(), SinkError> {
        validate_identifier(identifier)?;
        if self.units.iter().any(|(id, _)| id == identifier) {
            return Err(SinkError::DuplicateIdentifier(identifier.to_string()));
        }
        self.units.push((identifier.to_string(), text.to_string()));
        Ok(())
    }
}

/// Prints every unit to a writer behind a `// ---- <identifier>` banner.
pub struct StdoutSink<W: Write = io::Stdout> {
    out: W,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for StdoutSink<W> {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<(), SinkError> {
        validate_identifier(identifier)?;
        let io_err = |source: io::Error| SinkError::Io {
            path: identifier.to_string(),
            source,
        };
        writeln!(self.out, "// ---- {identifier}").map_err(io_err)?;
        self.out.write_all(text.as_bytes()).map_err(io_err)?;
        if !text.ends_with('\n') {
            writeln!(self.out).map_err(io_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_dir(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("implicitgen-sink-{}-{tag}-{n}", std::process::id()))
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let dir = scratch_dir("write");
        let mut sink = DirectorySink::new(&dir).unwrap();
        sink.add_source("Demo.Outer+Box{T}.g.cs", "text\n").unwrap();
        let path = dir.join("Demo.Outer+Box{T}.g.cs");
        assert_eq!(fs::read_to_string(&path).unwrap(), "text\n");
        assert_eq!(sink.written(), &[path]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_directory_sink_rejects_traversal() {
        let err = DirectorySink::new("out/../elsewhere").unwrap_err();
        assert!(matches!(err, SinkError::InvalidDirectory(_)));
    }

    #[test]
    fn test_directory_sink_rejects_duplicates() {
        let dir = scratch_dir("dup");
        let mut sink = DirectorySink::new(&dir).unwrap();
        sink.add_source("A.g.cs", "a").unwrap();
        let err = sink.add_source("A.g.cs", "b").unwrap_err();
        assert!(matches!(err, SinkError::DuplicateIdentifier(_)));
        assert_eq!(fs::read_to_string(dir.join("A.g.cs")).unwrap(), "a");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_identifier_validation() {
        let mut sink = MemorySink::new();
        for bad in ["", ".", "..", "a/b.g.cs", "a\\b.g.cs"] {
            assert!(
                matches!(sink.add_source(bad, ""), Err(SinkError::InvalidIdentifier(_))),
                "{bad:?} accepted"
            );
        }
        assert!(sink.units().is_empty());
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.add_source("B.g.cs", "b").unwrap();
        sink.add_source("A.g.cs", "a").unwrap();
        let ids: Vec<&str> = sink.units().iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["B.g.cs", "A.g.cs"]);
    }

    #[test]
    fn test_stdout_sink_banner() {
        let mut sink = StdoutSink::with_writer(Vec::new());
        sink.add_source("A.g.cs", "line").unwrap();
        sink.add_source("B.g.cs", "other\n").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "// ---- A.g.cs\nline\n// ---- B.g.cs\nother\n");
    }
}
