//! Output writer with indentation tracking
//!
//! Builds emitted declarations line by line.

/// Writer that tracks indentation and builds the emitted text
pub struct CodeWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indentation level
    indent_width: usize,
}

impl CodeWriter {
    /// Create a new writer with the given indentation width
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
        }
    }

    /// Get the emitted output
    pub fn finish(self) -> String {
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write one indented line. Empty lines carry no trailing whitespace.
    pub fn writeln(&mut self, line: &str) {
        if !line.is_empty() {
            self.output.push_str(&" ".repeat(self.indent_level * self.indent_width));
            self.output.push_str(line);
        }
        self.output.push('\n');
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Open a brace block: `{` on its own line, then indent.
    pub fn open_block(&mut self) {
        self.writeln("{");
        self.indent();
    }

    /// Close a brace block opened with [`open_block`](Self::open_block).
    pub fn close_block(&mut self) {
        self.dedent();
        self.writeln("}");
    }
}
