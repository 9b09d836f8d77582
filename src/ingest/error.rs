//! Ingestion diagnostics.
//!
//! Every contract violation in a manifest is reported before the engine sees any declaration.
//! Errors that point into text (JSON syntax, type expressions) carry a [`NamedSource`] and a span
//! so that `miette` can render the offending snippet.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::type_expr::Span;

/// Errors produced while loading and validating a manifest
#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("cannot read manifest '{path}'")]
    #[diagnostic(code(implicitgen::ingest::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest '{path}' is too large ({size} bytes, max {max} bytes)")]
    #[diagnostic(code(implicitgen::ingest::too_large))]
    TooLarge { path: String, size: u64, max: u64 },

    #[error("malformed manifest: {message}")]
    #[diagnostic(code(implicitgen::ingest::json))]
    Json {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{location}: cannot parse type expression: {message}")]
    #[diagnostic(code(implicitgen::ingest::type_syntax))]
    TypeSyntax {
        location: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid syntax")]
        span: SourceSpan,
    },

    #[error("{location}: {message}")]
    #[diagnostic(code(implicitgen::ingest::invalid_type))]
    InvalidType {
        location: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{location}: {message}")]
    #[diagnostic(code(implicitgen::ingest::invalid_declaration))]
    InvalidDeclaration {
        location: String,
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl IngestError {
    /// Build a JSON syntax or shape error, locating serde's 1-based line/column in `source`.
    pub(crate) fn json(name: &str, source: &str, err: &serde_json::Error) -> Self {
        let offset = byte_offset(source, err.line(), err.column());
        let len = usize::from(offset < source.len());
        IngestError::Json {
            message: err.to_string(),
            src: NamedSource::new(name, source.to_string()),
            span: (offset, len).into(),
        }
    }

    pub(crate) fn type_syntax(location: String, expr: &str, message: String, span: Span) -> Self {
        IngestError::TypeSyntax {
            src: NamedSource::new(location.clone(), expr.to_string()),
            location,
            message,
            span: to_source_span(span),
        }
    }

    pub(crate) fn invalid_type(location: String, expr: &str, message: String, span: Span) -> Self {
        IngestError::InvalidType {
            src: NamedSource::new(location.clone(), expr.to_string()),
            location,
            message,
            span: to_source_span(span),
        }
    }

    pub(crate) fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        IngestError::InvalidDeclaration {
            location: location.into(),
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn invalid_with_help(
        location: impl Into<String>,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        IngestError::InvalidDeclaration {
            location: location.into(),
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    (span.start, span.len().max(1)).into()
}

/// Convert a 1-based line/column pair into a byte offset, clamped to the source length.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return source.len();
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset_first_line() {
        assert_eq!(byte_offset("{\"a\": 1}", 1, 3), 2);
    }

    #[test]
    fn test_byte_offset_later_line() {
        let source = "{\n  \"a\": x\n}";
        assert_eq!(byte_offset(source, 2, 8), 9);
        assert_eq!(&source[9..10], "x");
    }

    #[test]
    fn test_byte_offset_clamps() {
        assert_eq!(byte_offset("{}", 7, 40), 2);
        assert_eq!(byte_offset("{}", 0, 0), 2);
    }

    #[test]
    fn test_json_error_points_into_source() {
        let source = "{\n  \"types\": [,]\n}";
        let err = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
        let IngestError::Json { span, .. } = IngestError::json("m.json", source, &err) else {
            panic!("expected a JSON error");
        };
        // Second line, inside the array.
        assert!(span.offset() > source.find('[').unwrap());
        assert!(span.offset() <= source.find(']').unwrap());
    }
}
