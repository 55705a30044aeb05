//! ESTree output tests.
//!
//! These check the serialized JSON, which is what downstream tools consume.

use quarry_parser::{parse, ParserOptions};
use serde_json::{json, Value};

fn estree_json(source: &str, options: &ParserOptions) -> Value {
    let output = parse(source, options).expect("parse failed");
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    serde_json::to_value(&output.file).expect("serialize")
}

fn estree_module(source: &str) -> Value {
    estree_json(source, &ParserOptions::module().with_plugin("estree"))
}

/// Helper: the expression of the `index`th top-level expression statement.
fn statement_expression(file: &Value, index: usize) -> &Value {
    &file["program"]["body"][index]["expression"]
}

#[test]
fn test_node_positions() {
    let file = estree_module("x = 'a';\ny;");
    assert_eq!(file["type"], "File");
    let second = &file["program"]["body"][1];
    assert_eq!(second["type"], "ExpressionStatement");
    assert_eq!(second["start"], 9);
    assert_eq!(second["end"], 11);
    assert_eq!(second["loc"]["start"], json!({ "line": 2, "column": 0, "index": 9 }));
    assert_eq!(second["loc"]["end"]["column"], 2);
}

#[test]
fn test_literals() {
    let file = estree_module("'a'; 0x10; true; null; /ab+/gi; 5n;");
    let string = statement_expression(&file, 0);
    assert_eq!(string["type"], "Literal");
    assert_eq!(string["value"], "a");
    assert_eq!(string["raw"], "'a'");

    let number = statement_expression(&file, 1);
    assert_eq!(number["value"], 16.0);
    assert_eq!(number["raw"], "0x10");

    assert_eq!(statement_expression(&file, 2)["value"], true);
    assert_eq!(statement_expression(&file, 3)["value"], Value::Null);

    let regex = statement_expression(&file, 4);
    assert_eq!(regex["regex"], json!({ "pattern": "ab+", "flags": "gi" }));
    assert_eq!(statement_expression(&file, 5)["bigint"], "5");
}

#[test]
fn test_directive_statement() {
    let file = estree_json("'use strict';", &ParserOptions::default().with_plugin("estree"));
    let stmt = &file["program"]["body"][0];
    assert_eq!(stmt["type"], "ExpressionStatement");
    assert_eq!(stmt["directive"], "use strict");
    assert_eq!(stmt["expression"]["type"], "Literal");
}

#[test]
fn test_object_properties() {
    let file = estree_module("({ a, b: 1, c() {}, set d(v) {} });");
    let properties = statement_expression(&file, 0)["properties"]
        .as_array()
        .expect("properties");
    let shapes: Vec<(String, String, bool, bool)> = properties
        .iter()
        .map(|p| {
            (
                p["type"].as_str().unwrap_or_default().to_string(),
                p["kind"].as_str().unwrap_or_default().to_string(),
                p["method"].as_bool().unwrap_or_default(),
                p["shorthand"].as_bool().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        shapes,
        vec![
            ("Property".to_string(), "init".to_string(), false, true),
            ("Property".to_string(), "init".to_string(), false, false),
            ("Property".to_string(), "init".to_string(), true, false),
            ("Property".to_string(), "set".to_string(), false, false),
        ]
    );
    assert_eq!(properties[2]["value"]["type"], "FunctionExpression");
}

#[test]
fn test_class_methods() {
    let file = estree_module("class A { constructor() {} static m() {} get x() { return 1; } }");
    let members = &file["program"]["body"][0]["body"]["body"];
    assert_eq!(members[0]["type"], "MethodDefinition");
    assert_eq!(members[0]["kind"], "constructor");
    assert_eq!(members[1]["static"], true);
    assert_eq!(members[2]["kind"], "get");
    assert_eq!(members[2]["value"]["type"], "FunctionExpression");
}

#[test]
fn test_optional_chain() {
    let file = estree_module("a?.b();");
    let chain = statement_expression(&file, 0);
    assert_eq!(chain["type"], "ChainExpression");
    assert_eq!(chain["expression"]["type"], "CallExpression");
    assert_eq!(chain["expression"]["callee"]["optional"], true);
}

#[test]
fn test_default_shape_without_plugin() {
    let file = estree_json("'a'; 1;", &ParserOptions::module());
    assert_eq!(file["program"]["directives"][0]["type"], "Directive");
    assert_eq!(statement_expression(&file, 0)["type"], "NumericLiteral");
    assert_eq!(statement_expression(&file, 0)["extra"]["raw"], "1");
}

#[test]
fn test_typescript_nodes_serialize() {
    let options = ParserOptions::module().with_plugin("typescript").with_plugin("estree");
    let file = estree_json("let x: string = 'a';", &options);
    let id = &file["program"]["body"][0]["declarations"][0]["id"];
    assert_eq!(id["typeAnnotation"]["type"], "TSTypeAnnotation");
    assert_eq!(id["typeAnnotation"]["typeAnnotation"]["type"], "TSStringKeyword");
}

#[test]
fn test_blocks_have_no_directives_key() {
    let file = estree_module("'use strict'; function f() { 'inner'; { g(); } }");
    let program = &file["program"];
    assert!(program.get("directives").is_none());
    let function_body = &program["body"][1]["body"];
    assert!(function_body.get("directives").is_none());
    assert_eq!(function_body["body"][0]["directive"], "inner");
    assert!(function_body["body"][1].get("directives").is_none());

    let plain = estree_json("{ g(); }", &ParserOptions::module());
    assert_eq!(plain["program"]["directives"], json!([]));
    assert_eq!(plain["program"]["body"][0]["directives"], json!([]));
}

#[test]
fn test_function_prologue_still_makes_body_strict() {
    let options = ParserOptions::default().with_plugin("estree");
    for source in ["function eval() { 'use strict'; }", "function f(a, a) { 'use strict'; }"] {
        assert!(parse(source, &options).is_err(), "{source}");
        assert!(parse(source, &ParserOptions::default()).is_err(), "{source}");
    }
}
