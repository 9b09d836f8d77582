//! Generator configuration

use implicitgen_core::EmitOptions;

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Whether the host language has native tuple types
    pub has_tuple_feature: bool,
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// First line of every generated unit; empty to omit
    pub header: String,
    /// Emit `#nullable enable` at the top of every unit
    pub nullable_context: bool,
    /// Appended to every unit identifier
    pub hint_suffix: String,
    /// Worker threads for batch generation (`None` uses one per core)
    pub threads: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let emit = EmitOptions::default();
        Self {
            has_tuple_feature: true,
            indent_width: emit.indent_width,
            header: emit.header,
            nullable_context: emit.nullable_context,
            hint_suffix: emit.hint_suffix,
            threads: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether tuples are available
    pub fn with_tuple_feature(mut self, enabled: bool) -> Self {
        self.has_tuple_feature = enabled;
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the unit header line
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_nullable_context(mut self, enabled: bool) -> Self {
        self.nullable_context = enabled;
        self
    }

    /// Set the identifier suffix
    pub fn with_hint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.hint_suffix = suffix.into();
        self
    }

    /// Set the worker thread count
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// The rendering subset handed to the engine.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions::new()
            .with_indent_width(self.indent_width)
            .with_header(self.header.clone())
            .with_nullable_context(self.nullable_context)
            .with_hint_suffix(self.hint_suffix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert!(config.has_tuple_feature);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.header, "// <auto-generated/>");
        assert!(config.nullable_context);
        assert_eq!(config.hint_suffix, ".g.cs");
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_default_matches_engine_defaults() {
        assert_eq!(GeneratorConfig::default().emit_options(), EmitOptions::default());
    }

    #[test]
    fn test_builder_chain() {
        let config = GeneratorConfig::new()
            .with_tuple_feature(false)
            .with_indent_width(2)
            .with_header("")
            .with_hint_suffix(".cs")
            .with_threads(Some(3));
        assert!(!config.has_tuple_feature);
        assert_eq!(config.threads, Some(3));
        let emit = config.emit_options();
        assert_eq!(emit.indent_width, 2);
        assert_eq!(emit.header, "");
        assert_eq!(emit.hint_suffix, ".cs");
    }
}
