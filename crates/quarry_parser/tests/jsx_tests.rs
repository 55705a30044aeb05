//! JSX integration tests.
//!
//! Elements embedded in surrounding statements, where the token context
//! stack has to hand control back to the ordinary grammar correctly.

use quarry_diagnostics::messages::*;
use quarry_parser::ast::jsx::*;
use quarry_parser::ast::node::*;
use quarry_parser::{parse, ParserOptions};

fn jsx() -> ParserOptions {
    ParserOptions::module().with_plugin("jsx")
}

fn statements(source: &str) -> Vec<Statement> {
    let output = parse(source, &jsx()).expect("parse failed");
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output.file.program.body
}

/// Helper: the initializer of the first `const` in `source`.
fn initializer(source: &str) -> Expression {
    match statements(source).into_iter().next() {
        Some(Statement::VariableDeclaration(decl)) => {
            let init = decl.declarations.into_iter().next().and_then(|d| d.init);
            *init.expect("initializer")
        }
        other => panic!("expected a declaration, got {other:?}"),
    }
}

#[test]
fn test_element_in_declaration() {
    let Expression::JSXElement(element) = initializer("const el = <div className=\"box\">{label}</div>;") else {
        panic!("expected an element");
    };
    assert_eq!(element.opening_element.name.qualified_name(), "div");
    assert_eq!(element.opening_element.attributes.len(), 1);
    assert_eq!(element.children.len(), 1);
}

#[test]
fn test_statements_after_element_resume_normal_tokens() {
    let body = statements("const a = <p>{x}</p>;\nconst re = /<\\/p>/g;\nconst t = `${a}`;");
    assert_eq!(body.len(), 3);
    let Statement::VariableDeclaration(decl) = &body[1] else {
        panic!("expected a declaration");
    };
    let init = decl.declarations[0].init.as_deref();
    assert!(matches!(init, Some(Expression::RegExpLiteral(_))));
}

#[test]
fn test_element_in_arrow_body_and_call() {
    let body = statements("const List = ({ items }) => <ul>{items.map(i => <li key={i}>{i}</li>)}</ul>;");
    assert_eq!(body.len(), 1);
}

#[test]
fn test_comparison_stays_binary_after_expression() {
    let Expression::BinaryExpression(_) = initializer("const lt = a < b;") else {
        panic!("expected a comparison");
    };
}

#[test]
fn test_text_entities_are_decoded() {
    let Expression::JSXElement(element) = initializer("const e = <b>a &lt; b &amp;&amp; c</b>;") else {
        panic!("expected an element");
    };
    let JSXChild::JSXText(text) = &element.children[0] else {
        panic!("expected text");
    };
    assert_eq!(text.value, "a < b && c");
    assert_eq!(text.extra.raw, "a &lt; b &amp;&amp; c");
}

#[test]
fn test_spread_child_and_fragment() {
    let Expression::JSXFragment(fragment) = initializer("const f = <>{...children}<br /></>;") else {
        panic!("expected a fragment");
    };
    assert!(matches!(fragment.children[0], JSXChild::JSXSpreadChild(_)));
    assert!(matches!(fragment.children[1], JSXChild::JSXElement(_)));
}

#[test]
fn test_unterminated_element() {
    let err = parse("const a = <div>text", &jsx()).unwrap_err();
    assert!(err.is(&UNTERMINATED_JSX_CONTENT));
}

#[test]
fn test_closing_tag_mismatch_reports_opening_name() {
    let err = parse("const a = <x.y></x.z>;", &jsx()).unwrap_err();
    assert!(err.is(&JSX_MISSING_CLOSING_TAG_ELEMENT));
    assert!(err.message.contains("<x.y>"));
}

#[test]
fn test_greater_than_in_text() {
    let output = parse("const a = <p>1 > 0</p>;", &jsx().with_error_recovery()).unwrap();
    assert!(output.errors.iter().any(|e| e.is(&JSX_UNEXPECTED_TOKEN)));
}

#[test]
fn test_missing_plugin_names_jsx() {
    let err = parse("const a = <div />;", &ParserOptions::module()).unwrap_err();
    assert!(err.missing_plugins.contains(&"jsx"), "{err:?}");
}
