//! Host-language keyword vocabulary (for emitted identifier escaping).

/// Reserved keywords of the host language. Contextual keywords are not listed: they are
/// valid identifiers wherever a parameter name may appear.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class", "const",
    "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event", "explicit", "extern",
    "false", "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit", "in", "int", "interface",
    "internal", "is", "lock", "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof",
    "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

/// Check whether an identifier is a reserved keyword.
pub fn is_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}

/// Escape an identifier for use in emitted source.
///
/// Keywords get the verbatim `@` prefix; anything else (including names already written with `@`)
/// is returned unchanged.
pub fn escape_identifier(name: &str) -> String {
    if is_keyword(name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Check whether `name` is a syntactically valid identifier, optionally written verbatim (`@class`).
pub fn is_valid_identifier(name: &str) -> bool {
    let bare = name.strip_prefix('@').unwrap_or(name);
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => chars.all(|c| c == '_' || c.is_alphanumeric()),
        _ => false,
    }
}

/// Strip the verbatim prefix from an identifier, yielding the name the host compiler sees.
pub fn unescape_identifier(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}
