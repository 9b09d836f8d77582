//! End-to-end tests: manifest text in, generated units out.
//!
//! Review changes: `cargo insta review`

use implicitgen::{CancellationToken, GeneratedUnit, GeneratorConfig, generate_all, parse_manifest};

fn generate(manifest: &str) -> Vec<GeneratedUnit> {
    generate_with(manifest, GeneratorConfig::default())
}

fn generate_with(manifest: &str, config: GeneratorConfig) -> Vec<GeneratedUnit> {
    let declarations = parse_manifest("test.json", manifest).expect("manifest should be valid");
    let has_tuple_feature = config.has_tuple_feature && declarations.has_tuple_feature;
    let config = config.with_tuple_feature(has_tuple_feature);
    generate_all(&declarations.types, &config, &CancellationToken::new()).expect("generation should succeed")
}

fn only(units: Vec<GeneratedUnit>) -> GeneratedUnit {
    assert_eq!(units.len(), 1, "expected exactly one unit, got {:?}", units);
    units.into_iter().next().expect("one unit")
}

// ============================================================================
// Scenarios
// ============================================================================

const CYLINDER: &str = r#"{
    "types": [ {
        "name": "Cylinder",
        "namespace": "Demo",
        "constructors": [
            { "parameters": [ { "name": "i", "type": "int" }, { "name": "r", "type": "int" } ] },
            { "opt_out": true, "parameters": [ { "name": "i", "type": "int" } ] },
            { "opt_out": true, "parameters": [ { "name": "i", "type": "(string, string)" } ] },
            { "opt_out": true, "accessibility": "internal", "parameters": [ { "name": "i", "type": "string" } ] }
        ]
    } ]
}"#;

#[test]
fn test_cylinder_keeps_only_the_default_constructor() {
    let unit = only(generate(CYLINDER));
    assert_eq!(unit.identifier, "Demo.Cylinder.g.cs");
    insta::assert_snapshot!(unit.text, @r#"
    // <auto-generated/>
    #nullable enable

    namespace Demo
    {
        partial class Cylinder
        {
            /// <summary>Implicitly converts the value to a new <see cref="global::Demo.Cylinder"/> instance.</summary>
            public static implicit operator global::Demo.Cylinder((int i, int r) tuple) => new global::Demo.Cylinder(tuple.i, tuple.r);
        }
    }
    "#);
}

#[test]
fn test_generic_nested_type_with_usings() {
    let unit = only(generate(
        r#"{
            "symbols": { "IShape": "interface" },
            "types": [ {
                "name": "Box",
                "namespace": "Demo.Containers",
                "type_parameters": ["T"],
                "containing_types": [ { "name": "Outer", "type_parameters": ["U"] } ],
                "usings": ["System.Collections.Generic"],
                "constructors": [
                    { "parameters": [ { "name": "value", "type": "T" } ] },
                    { "parameters": [ { "name": "items", "type": "List<int>" } ] },
                    { "parameters": [ { "name": "shape", "type": "IShape" } ] }
                ]
            } ]
        }"#,
    ));
    assert_eq!(unit.identifier, "Demo.Containers.Outer{U}+Box{T}.g.cs");
    insta::assert_snapshot!(unit.text, @r#"
    // <auto-generated/>
    #nullable enable
    using System.Collections.Generic;

    namespace Demo.Containers
    {
        partial class Outer<U>
        {
            partial class Box<T>
            {
                /// <summary>Implicitly converts the value to a new <see cref="global::Demo.Containers.Outer{U}.Box{T}"/> instance.</summary>
                public static implicit operator global::Demo.Containers.Outer<U>.Box<T>(List<int> items) => new global::Demo.Containers.Outer<U>.Box<T>(items);

                /// <summary>Implicitly converts the value to a new <see cref="global::Demo.Containers.Outer{U}.Box{T}"/> instance.</summary>
                public static implicit operator global::Demo.Containers.Outer<U>.Box<T>(IShape shape) => new global::Demo.Containers.Outer<U>.Box<T>(shape);
            }
        }
    }
    "#);
}

const POINT: &str = r#"{
    "types": [ {
        "name": "Point",
        "namespace": "Geo",
        "kind": "record struct",
        "constructors": [
            { "parameters": [ { "name": "pair", "type": "(int x, int y)" } ] },
            { "parameters": [ { "name": "x", "type": "int" }, { "name": "y", "type": "int" } ] },
            { "parameters": [ { "name": "other", "type": "Point" } ] },
            { "parameters": [] }
        ]
    } ]
}"#;

#[test]
fn test_tuple_constructor_wins_over_equivalent_positional_one() {
    let unit = only(generate(POINT));
    insta::assert_snapshot!(unit.text, @r#"
    // <auto-generated/>
    #nullable enable

    namespace Geo
    {
        partial record struct Point
        {
            /// <summary>Implicitly converts the value to a new <see cref="global::Geo.Point"/> instance.</summary>
            public static implicit operator global::Geo.Point((int x, int y) pair) => new global::Geo.Point(pair);
        }
    }
    "#);
}

#[test]
fn test_top_level_type_with_custom_options() {
    let config = GeneratorConfig::default()
        .with_header("")
        .with_nullable_context(false)
        .with_indent_width(2)
        .with_hint_suffix(".cs");
    let unit = only(generate_with(
        r#"{ "types": [ { "name": "Token", "constructors": [ { "parameters": [ { "name": "@string", "type": "string" } ] } ] } ] }"#,
        config,
    ));
    assert_eq!(unit.identifier, "Token.cs");
    insta::assert_snapshot!(unit.text, @r#"
    partial class Token
    {
      /// <summary>Implicitly converts the value to a new <see cref="global::Token"/> instance.</summary>
      public static implicit operator global::Token(string @string) => new global::Token(@string);
    }
    "#);
}

#[test]
fn test_reserved_tuple_element_names_are_read_by_position() {
    let unit = only(generate(
        r#"{ "types": [ {
            "name": "P",
            "constructors": [
                { "parameters": [ { "name": "Item2", "type": "int" }, { "name": "Item1", "type": "string" } ] },
                { "parameters": [ { "name": "Rest", "type": "long" }, { "name": "x", "type": "int" } ] }
            ]
        } ] }"#,
    ));
    insta::assert_snapshot!(unit.text, @r#"
    // <auto-generated/>
    #nullable enable

    partial class P
    {
        /// <summary>Implicitly converts the value to a new <see cref="global::P"/> instance.</summary>
        public static implicit operator global::P((int, string) tuple) => new global::P(tuple.Item1, tuple.Item2);

        /// <summary>Implicitly converts the value to a new <see cref="global::P"/> instance.</summary>
        public static implicit operator global::P((long, int x) tuple) => new global::P(tuple.Item1, tuple.x);
    }
    "#);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_user_written_conversion_suppresses_candidate() {
    let units = generate(
        r#"{ "types": [ {
            "name": "Name",
            "constructors": [ { "parameters": [ { "name": "value", "type": "string" } ] } ],
            "conversions": [ { "kind": "explicit", "parameters": ["System.String"] } ]
        } ] }"#,
    );
    assert!(units.is_empty());
}

#[test]
fn test_existing_tuple_conversion_matches_positional_constructor() {
    let units = generate(
        r#"{ "types": [ {
            "name": "Span",
            "constructors": [ { "parameters": [ { "name": "a", "type": "int" }, { "name": "b", "type": "long" } ] } ],
            "conversions": [ { "parameters": ["(int start, long length)"] } ]
        } ] }"#,
    );
    assert!(units.is_empty());
}

#[test]
fn test_manifest_without_tuples_only_emits_single_parameters() {
    let units = generate(
        r#"{
            "has_tuple_feature": false,
            "types": [ {
                "name": "Pair",
                "constructors": [
                    { "parameters": [ { "name": "a", "type": "int" }, { "name": "b", "type": "int" } ] },
                    { "parameters": [ { "name": "both", "type": "(int, int)" } ] }
                ]
            } ]
        }"#,
    );
    let unit = only(units);
    assert!(unit.text.contains("operator global::Pair((int, int) both) => new global::Pair(both);"));
    assert!(!unit.text.contains("tuple.a"));
}

#[test]
fn test_open_and_universal_types_are_skipped() {
    let units = generate(
        r#"{
            "symbols": { "Animal": "open" },
            "types": [ {
                "name": "Zoo",
                "constructors": [
                    { "parameters": [ { "name": "a", "type": "Animal" } ] },
                    { "parameters": [ { "name": "o", "type": "object" } ] },
                    { "parameters": [ { "name": "d", "type": "dynamic" } ] },
                    { "parameters": [ { "name": "items", "type": "object[]" } ] }
                ]
            } ]
        }"#,
    );
    assert!(units.is_empty());
}

#[test]
fn test_type_level_gates() {
    let units = generate(
        r#"{ "types": [
            { "name": "A", "abstract": true, "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] },
            { "name": "B", "partial": false, "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] },
            { "name": "C", "containing_types": [ { "name": "Host", "partial": false } ],
              "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] },
            { "name": "D", "opt_out": true, "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] },
            { "name": "E", "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] }
        ] }"#,
    );
    let ids: Vec<&str> = units.iter().map(|u| u.identifier.as_str()).collect();
    assert_eq!(ids, ["E.g.cs"]);
}

#[test]
fn test_nested_private_constructor_is_skipped() {
    let units = generate(
        r#"{ "types": [ {
            "name": "Inner",
            "containing_types": [ { "name": "Host", "accessibility": "public" } ],
            "constructors": [
                { "accessibility": "private", "parameters": [ { "name": "i", "type": "int" } ] },
                { "accessibility": "internal", "parameters": [ { "name": "s", "type": "string" } ] },
                { "parameters": [ { "name": "b", "type": "bool" } ] }
            ]
        } ] }"#,
    );
    let unit = only(units);
    assert_eq!(unit.identifier, "Host+Inner.g.cs");
    assert_eq!(unit.text.matches("implicit operator").count(), 1);
    assert!(unit.text.contains("(bool b)"));
}

#[test]
fn test_same_named_nested_types_get_distinct_identifiers() {
    let units = generate(
        r#"{ "types": [
            { "name": "Node", "namespace": "A", "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] },
            { "name": "Node", "namespace": "A", "containing_types": [ { "name": "Tree" } ],
              "constructors": [ { "parameters": [ { "name": "i", "type": "int" } ] } ] }
        ] }"#,
    );
    let ids: Vec<&str> = units.iter().map(|u| u.identifier.as_str()).collect();
    assert_eq!(ids, ["A.Node.g.cs", "A.Tree+Node.g.cs"]);
}

#[test]
fn test_generation_is_repeatable() {
    let first = generate(CYLINDER);
    let second = generate(CYLINDER);
    assert_eq!(first, second);
}

// ============================================================================
// Explain
// ============================================================================

#[test]
fn test_explain_report() {
    let declarations = parse_manifest("test.json", POINT).expect("valid");
    let reports = implicitgen::explain_all(&declarations.types, true, None);
    insta::assert_snapshot!(reports[0].to_string(), @r"
    Geo.Point
      constructor #0: synthesized (int x, int y)
      constructor #1: skipped: duplicates constructor #0
      constructor #2: skipped: copy constructor
      constructor #3: skipped: takes no parameters
    ");
}

#[test]
fn test_explain_cylinder() {
    let declarations = parse_manifest("test.json", CYLINDER).expect("valid");
    let reports = implicitgen::explain_all(&declarations.types, true, Some("Cylinder"));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].synthesized_count(), 1);
    insta::assert_snapshot!(reports[0].to_string(), @r"
    Demo.Cylinder
      constructor #0: synthesized (int i, int r)
      constructor #1: skipped: opted out
      constructor #2: skipped: opted out
      constructor #3: skipped: opted out
    ");
}
