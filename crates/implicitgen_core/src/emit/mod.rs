//! Rendering surviving candidates into a declaration fragment.
//!
//! Output is a pure function of the type and its candidates: no counters, no timestamps, no hash
//! iteration. Identical input yields byte-identical text.

mod writer;

pub use writer::CodeWriter;

use crate::lang::keywords::escape_identifier;
use crate::types::{ConversionCandidate, TypeView};

/// Name of the operand when several constructor arguments travel in one tuple.
const TUPLE_OPERAND: &str = "tuple";

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// First line of every unit; empty to omit
    pub header: String,
    /// Emit `#nullable enable`
    pub nullable_context: bool,
    /// Appended to every unit identifier
    pub hint_suffix: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            header: "// <auto-generated/>".to_string(),
            nullable_context: true,
            hint_suffix: ".g.cs".to_string(),
        }
    }
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_nullable_context(mut self, enabled: bool) -> Self {
        self.nullable_context = enabled;
        self
    }

    pub fn with_hint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.hint_suffix = suffix.into();
        self
    }
}

/// Stable identifier of the unit generated for `ty`.
///
/// Namespace segments are joined with `.`, the enclosing-type chain with `+`, so a nested type
/// never collides with a same-named type in a namespace of the same spelling.
pub fn hint_name(ty: &TypeView, options: &EmitOptions) -> String {
    let nested: Vec<String> = ty
        .containing
        .iter()
        .map(|c| hint_segment(&c.name, &c.type_parameters))
        .chain(std::iter::once(hint_segment(&ty.name, &ty.type_parameters)))
        .collect();
    let mut identifier = String::new();
    if let Some(namespace) = &ty.namespace {
        identifier.push_str(namespace);
        identifier.push('.');
    }
    identifier.push_str(&nested.join("+"));
    identifier.push_str(&options.hint_suffix);
    identifier
}

fn hint_segment(name: &str, type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{}}}", type_parameters.join(","))
    }
}

fn declaration_head(kind: &str, name: &str, type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        format!("partial {kind} {name}")
    } else {
        format!("partial {kind} {name}<{}>", type_parameters.join(", "))
    }
}

/// Tuple members every element inherits; none may be reused as an element name.
const RESERVED_TUPLE_MEMBERS: &[&str] = &["Rest", "ToString", "GetHashCode", "Equals", "GetType"];

/// Whether `name` may label the tuple element at 1-based `position`.
///
/// `ItemN` is only allowed at position N.
fn is_valid_element_name(name: &str, position: usize) -> bool {
    if RESERVED_TUPLE_MEMBERS.contains(&name) {
        return false;
    }
    let item = name
        .strip_prefix("Item")
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|&n| n > 0 && name == format!("Item{n}"));
    item.is_none_or(|n| n == position)
}

/// Render the operand declaration and the constructor arguments for one candidate.
///
/// A single constructor parameter (tuple or not) is forwarded unchanged; several parameters arrive
/// as one tuple named after the parameters and are forwarded member by member. A parameter name
/// that cannot label its tuple element is left off and read back as `ItemK`.
fn operand(candidate: &ConversionCandidate<'_>) -> (String, String) {
    match candidate.constructor.parameters.as_slice() {
        [only] => {
            let name = escape_identifier(&only.name);
            (format!("{} {name}", only.ty.display()), name)
        }
        _ => {
            let mut members = Vec::with_capacity(candidate.signature.len());
            let mut arguments = Vec::with_capacity(candidate.signature.len());
            for (index, element) in candidate.signature.iter().enumerate() {
                let position = index + 1;
                if is_valid_element_name(&element.name, position) {
                    let name = escape_identifier(&element.name);
                    members.push(format!("{} {name}", element.ty.display()));
                    arguments.push(format!("{TUPLE_OPERAND}.{name}"));
                } else {
                    members.push(element.ty.display());
                    arguments.push(format!("{TUPLE_OPERAND}.Item{position}"));
                }
            }
            (
                format!("({}) {TUPLE_OPERAND}", members.join(", ")),
                arguments.join(", "),
            )
        }
    }
}

/// Render the conversion operator declaration for one candidate (a single line).
pub fn render_operator(candidate: &ConversionCandidate<'_>) -> String {
    let owner = candidate.owner.qualified_display();
    let (operand, arguments) = operand(candidate);
    format!("public static implicit operator {owner}({operand}) => new {owner}({arguments});")
}

/// Render the whole fragment for `ty`: preamble, namespace, enclosing partial declarations and one
/// operator per candidate, in candidate order.
pub fn render_unit(ty: &TypeView, candidates: &[ConversionCandidate<'_>], options: &EmitOptions) -> String {
    let mut w = CodeWriter::new(options.indent_width);

    let mut preamble = false;
    if !options.header.is_empty() {
        w.writeln(&options.header);
        preamble = true;
    }
    if options.nullable_context {
        w.writeln("#nullable enable");
        preamble = true;
    }
    for using in &ty.usings {
        w.writeln(&format!("using {using};"));
        preamble = true;
    }
    if preamble {
        w.newline();
    }

    let mut depth = 0;
    if let Some(namespace) = &ty.namespace {
        w.writeln(&format!("namespace {namespace}"));
        w.open_block();
        depth += 1;
    }
    for containing in &ty.containing {
        w.writeln(&declaration_head(
            containing.kind.as_keyword(),
            &containing.name,
            &containing.type_parameters,
        ));
        w.open_block();
        depth += 1;
    }
    w.writeln(&declaration_head(ty.kind.as_keyword(), &ty.name, &ty.type_parameters));
    w.open_block();
    depth += 1;

    let summary = format!(
        "/// <summary>Implicitly converts the value to a new <see cref=\"{}\"/> instance.</summary>",
        ty.cref()
    );
    for (i, candidate) in candidates.iter().enumerate() {
        if i > 0 {
            w.newline();
        }
        w.writeln(&summary);
        w.writeln(&render_operator(candidate));
    }

    for _ in 0..depth {
        w.close_block();
    }
    w.finish()
}
