//! Parser integration tests.
//!
//! Drives the public `parse` / `parse_expression` entry points over plain
//! ECMAScript input, without any extension layer.

use quarry_diagnostics::messages::*;
use quarry_diagnostics::ErrorKind;
use quarry_parser::ast::node::*;
use quarry_parser::ast::ops::BinaryOperator;
use quarry_parser::{parse, parse_expression, ParserOptions, SourceTypeOption};

/// Helper: parse a script and return its top-level statements.
fn script(source: &str) -> Vec<Statement> {
    let output = parse(source, &ParserOptions::default()).expect("parse failed");
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output.file.program.body
}

/// Helper: parse a module and return its top-level statements.
fn module(source: &str) -> Vec<Statement> {
    let output = parse(source, &ParserOptions::module()).expect("parse failed");
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output.file.program.body
}

fn expression(source: &str) -> Expression {
    parse_expression(source, &ParserOptions::default())
        .expect("parse failed")
        .expression
}

fn assert_statement_count(source: &str, expected: usize) {
    assert_eq!(script(source).len(), expected, "source: {}", source);
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_parse_variable_declarations() {
    assert_statement_count("var a = 1; let b = 2; const c = 3;", 3);
    let body = script("let [x, , ...rest] = list, { y: z = 1 } = obj;");
    let Statement::VariableDeclaration(decl) = &body[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.kind, VariableKind::Let);
    assert_eq!(decl.declarations.len(), 2);
    assert!(matches!(*decl.declarations[0].id, Expression::ArrayPattern(_)));
    assert!(matches!(*decl.declarations[1].id, Expression::ObjectPattern(_)));
}

#[test]
fn test_parse_function_forms() {
    assert_statement_count(
        "function f(a, b = 1, ...c) {} async function g() { await x; } function* h() { yield 1; }",
        3,
    );
    let Statement::FunctionDeclaration(function) = &script("async function* f() {}")[0] else {
        panic!("expected a function");
    };
    assert!(function.function.is_async);
    assert!(function.function.generator);
}

#[test]
fn test_parse_class_with_private_members() {
    let body = script("class A extends B { #x = 1; static #y; get x() { return this.#x; } static { init(); } }");
    let Statement::ClassDeclaration(class) = &body[0] else {
        panic!("expected a class");
    };
    assert!(class.super_class.is_some());
    assert_eq!(class.body.body.len(), 4);
    assert!(matches!(class.body.body[3], ClassMember::StaticBlock(_)));
}

#[test]
fn test_undeclared_private_name() {
    let err = parse("class A { m() { this.#missing; } }", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&INVALID_PRIVATE_FIELD_RESOLUTION));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_operator_precedence() {
    let Expression::BinaryExpression(add) = expression("1 + 2 * 3") else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.operator, BinaryOperator::Addition);
    assert!(matches!(*add.right, Expression::BinaryExpression(_)));

    let Expression::BinaryExpression(pow) = expression("2 ** 3 ** 2") else {
        panic!("expected a binary expression");
    };
    assert!(matches!(*pow.right, Expression::BinaryExpression(_)));
}

#[test]
fn test_mixing_coalesce_with_logical() {
    let err = parse_expression("a ?? b || c", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&MIXING_COALESCE_WITH_LOGICAL));
    assert!(parse_expression("(a ?? b) || c", &ParserOptions::default()).is_ok());
}

#[test]
fn test_arrow_functions() {
    let Expression::ArrowFunctionExpression(arrow) = expression("async (a, { b }) => a + b") else {
        panic!("expected an arrow");
    };
    assert!(arrow.is_async);
    assert_eq!(arrow.params.len(), 2);
    assert!(matches!(expression("x => y => x"), Expression::ArrowFunctionExpression(_)));
}

#[test]
fn test_regexp_and_division() {
    let body = script("a = b / c / d; r = /[/]+/g;");
    assert_eq!(body.len(), 2);
    let Statement::ExpressionStatement(stmt) = &body[1] else {
        panic!("expected an expression statement");
    };
    let Expression::AssignmentExpression(assign) = &*stmt.expression else {
        panic!("expected an assignment");
    };
    assert!(matches!(*assign.right, Expression::RegExpLiteral(_)));
}

#[test]
fn test_template_literals() {
    let Expression::TemplateLiteral(template) = expression("`a${b}c${`d${e}`}`") else {
        panic!("expected a template");
    };
    assert_eq!(template.quasis.len(), 3);
    assert_eq!(template.expressions.len(), 2);
    assert!(matches!(template.expressions[1], Expression::TemplateLiteral(_)));
}

#[test]
fn test_optional_chaining() {
    assert!(matches!(expression("a?.b?.[c]?.(d)"), Expression::OptionalCallExpression(_)));
    let err = parse_expression("new a?.b()", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&OPTIONAL_CHAINING_NO_NEW));
}

// ============================================================================
// Assignment targets
// ============================================================================

#[test]
fn test_destructuring_assignment() {
    assert!(matches!(expression("[a, b] = [b, a]"), Expression::AssignmentExpression(_)));
    assert!(matches!(expression("({ a, b: [c] } = d)"), Expression::AssignmentExpression(_)));
}

#[test]
fn test_invalid_assignment_targets() {
    let err = parse_expression("a + b = c", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&INVALID_LHS));
    let err = parse_expression("({ a = 1 })", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&INVALID_COVER_INITIALIZED_NAME));
}

// ============================================================================
// Semicolons and statements
// ============================================================================

#[test]
fn test_automatic_semicolon_insertion() {
    assert_statement_count("a\nb\n++c", 3);
    assert_statement_count("return_ = 1\n(function () {})", 1);
    let err = parse("a b", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&MISSING_SEMICOLON));
}

#[test]
fn test_strict_mode_in_modules() {
    let output = parse("with (a) {}", &ParserOptions::module().with_error_recovery()).unwrap();
    assert!(output.errors.iter().any(|e| e.is(&STRICT_WITH)));
    assert_statement_count("with (a) {}", 1);
}

#[test]
fn test_lexical_redeclaration() {
    let err = parse("let a; let a;", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&VAR_REDECLARATION));
    assert_eq!(err.kind, ErrorKind::Binding);
    assert!(parse("var a; var a; function f() {} var f;", &ParserOptions::default()).is_ok());
}

// ============================================================================
// Modules and source types
// ============================================================================

#[test]
fn test_module_items() {
    let body = module("import a, * as ns from 'a'; export const x = 1; export default function () {} export { x as y };");
    assert_eq!(body.len(), 4);
    assert!(matches!(body[2], Statement::ExportDefaultDeclaration(_)));
}

#[test]
fn test_undeclared_export() {
    let err = parse("export { missing };", &ParserOptions::module()).unwrap_err();
    assert!(err.is(&MODULE_EXPORT_UNDEFINED));
}

#[test]
fn test_unambiguous_source_type() {
    let options = ParserOptions {
        source_type: SourceTypeOption::Unambiguous,
        ..ParserOptions::default()
    };
    let output = parse("export const a = 1;", &options).unwrap();
    assert_eq!(output.file.program.source_type, SourceType::Module);
    let output = parse("var a = 1;", &options).unwrap();
    assert_eq!(output.file.program.source_type, SourceType::Script);
}

#[test]
fn test_options_from_json() {
    let options = ParserOptions::from_json(
        r#"{ "sourceType": "module", "plugins": ["jsx", ["typescript", { "dts": true }]], "errorRecovery": true }"#,
    )
    .unwrap();
    assert_eq!(options.source_type, SourceTypeOption::Module);
    assert!(options.error_recovery);
    assert_eq!(options.plugins.len(), 2);
}

#[test]
fn test_unknown_plugin_is_rejected() {
    let err = parse("a", &ParserOptions::default().with_plugin("flow")).unwrap_err();
    assert!(err.is(&UNKNOWN_PLUGIN));
    assert_eq!(err.kind, ErrorKind::PluginConfiguration);
}

#[test]
fn test_start_line_shifts_locations() {
    let options = ParserOptions {
        start_line: 10,
        ..ParserOptions::default()
    };
    let output = parse("\na;", &options).unwrap();
    assert_eq!(output.file.program.body[0].span().start.line, 11);
}
