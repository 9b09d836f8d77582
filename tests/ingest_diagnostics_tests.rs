//! Contract violations in a manifest surface as located diagnostics, never as engine input.

use implicitgen::{IngestError, parse_manifest};
use miette::Diagnostic;

fn manifest_with_parameter(ty: &str) -> String {
    format!(
        r#"{{ "types": [ {{ "name": "A", "constructors": [ {{ "parameters": [ {{ "name": "p", "type": {} }} ] }} ] }} ] }}"#,
        serde_json::to_string(ty).expect("string literal")
    )
}

fn rejected(manifest: &str) -> IngestError {
    match parse_manifest("test.json", manifest) {
        Ok(declarations) => panic!("expected rejection, got {:?}", declarations.types),
        Err(err) => err,
    }
}

fn code(err: &IngestError) -> String {
    err.code().map(|c| c.to_string()).unwrap_or_default()
}

#[test]
fn empty_tuple_is_a_syntax_error() {
    let err = rejected(&manifest_with_parameter("()"));
    assert_eq!(
        err.to_string(),
        "types[0] 'A' constructor #0 parameter #0: cannot parse type expression: empty tuple type"
    );
    assert_eq!(code(&err), "implicitgen::ingest::type_syntax");
}

#[test]
fn single_element_tuple_is_a_syntax_error() {
    let err = rejected(&manifest_with_parameter("(int a)"));
    assert!(err.to_string().ends_with("tuple type needs at least two elements"));
}

#[test]
fn syntax_error_labels_the_expression() {
    let err = rejected(&manifest_with_parameter("List<int"));
    assert!(matches!(err, IngestError::TypeSyntax { .. }));
    let labels: Vec<_> = err.labels().expect("labelled").collect();
    assert_eq!(labels.len(), 1);
    assert!(labels[0].offset() <= "List<int".len());
}

#[test]
fn duplicate_tuple_element_names_are_rejected() {
    let err = rejected(&manifest_with_parameter("(int a, string a)"));
    assert!(matches!(err, IngestError::InvalidType { .. }));
    assert_eq!(
        err.to_string(),
        "types[0] 'A' constructor #0 parameter #0: duplicate tuple element name 'a'"
    );
    let labels: Vec<_> = err.labels().expect("labelled").collect();
    assert_eq!(labels[0].offset(), "(int a, string ".len());
}

#[test]
fn deeply_nested_types_are_a_syntax_error() {
    for ty in [
        format!("{}int{}", "List<".repeat(200_000), ">".repeat(200_000)),
        format!("{}int, int{}", "(".repeat(200_000), ", int)".repeat(200_000)),
        format!("int{}", "?".repeat(200_000)),
    ] {
        let err = rejected(&manifest_with_parameter(&ty));
        assert_eq!(code(&err), "implicitgen::ingest::type_syntax");
        assert!(err.to_string().ends_with("type expression nested too deeply"), "{err}");
    }
}

#[test]
fn moderately_nested_types_are_accepted() {
    let ty = format!("{}int{}", "List<".repeat(100), ">".repeat(100));
    let declarations = parse_manifest("test.json", &manifest_with_parameter(&ty)).expect("valid manifest");
    assert_eq!(declarations.types.len(), 1);
}

#[test]
fn keyword_inside_a_qualified_name_is_rejected() {
    let err = rejected(&manifest_with_parameter("System.int"));
    assert!(err.to_string().contains("keyword 'int' is not a type name here"));
}

#[test]
fn empty_parameter_type_is_rejected() {
    let err = rejected(&manifest_with_parameter(""));
    assert_eq!(
        err.to_string(),
        "types[0] 'A' constructor #0 parameter #0: parameter type must not be empty"
    );
}

#[test]
fn duplicate_parameter_names_are_rejected() {
    let err = rejected(
        r#"{ "types": [ { "name": "A", "constructors": [ { "parameters": [
            { "name": "x", "type": "int" }, { "name": "x", "type": "long" }
        ] } ] } ] }"#,
    );
    assert_eq!(err.to_string(), "types[0] 'A' constructor #0 parameter #1: duplicate parameter name 'x'");
}

#[test]
fn keyword_parameter_names_need_escaping() {
    let err = rejected(
        r#"{ "types": [ { "name": "A", "constructors": [ { "parameters": [ { "name": "class", "type": "int" } ] } ] } ] }"#,
    );
    assert!(matches!(err, IngestError::InvalidDeclaration { .. }));
    assert!(err.to_string().contains("'class'"));

    let ok = parse_manifest(
        "test.json",
        r#"{ "types": [ { "name": "A", "constructors": [ { "parameters": [ { "name": "@class", "type": "int" } ] } ] } ] }"#,
    )
    .expect("escaped keyword is a valid name");
    assert_eq!(ok.types[0].constructors[0].parameters[0].name, "class");
}

#[test]
fn unknown_spellings_carry_help() {
    for manifest in [
        r#"{ "types": [ { "name": "A", "kind": "interface" } ] }"#,
        r#"{ "types": [ { "name": "A", "accessibility": "friend" } ] }"#,
        r#"{ "types": [ { "name": "A", "conversions": [ { "kind": "implied", "parameters": ["int"] } ] } ] }"#,
    ] {
        let err = rejected(manifest);
        assert_eq!(code(&err), "implicitgen::ingest::invalid_declaration");
        assert!(err.help().is_some(), "{err} has no help");
    }
}

#[test]
fn type_named_like_its_container_is_rejected() {
    let err = rejected(r#"{ "types": [ { "name": "A", "containing_types": [ { "name": "A" } ] } ] }"#);
    assert!(err.to_string().contains("nested in a type of the same name"));
}

#[test]
fn unknown_fields_are_json_errors() {
    let err = rejected(r#"{ "types": [ { "name": "A", "sealed": true } ] }"#);
    assert!(matches!(err, IngestError::Json { .. }));
    assert_eq!(code(&err), "implicitgen::ingest::json");
}

#[test]
fn later_types_are_not_lowered_after_a_failure() {
    let err = rejected(
        r#"{ "types": [
            { "name": "Good" },
            { "name": "Bad", "constructors": [ { "parameters": [ { "name": "p", "type": "(,)" } ] } ] }
        ] }"#,
    );
    assert!(err.to_string().starts_with("types[1] 'Bad'"));
}
