use quarry_ast::visitor::{AstVisitor, NodeCounter};
use quarry_ast::*;
use quarry_core::{Position, Span};
use serde_json::json;

fn span(start: u32, end: u32) -> Span {
    Span::new(
        Position::new(1, start, start),
        Position::new(1, end, end),
    )
}

#[test]
fn test_expression_serializes_type_tag() {
    let expr = Expression::ident(span(0, 3), "foo");
    let value = serde_json::to_value(&expr).unwrap();
    assert_eq!(value["type"], "Identifier");
    assert_eq!(value["name"], "foo");
    assert_eq!(value["start"], 0);
    assert_eq!(value["end"], 3);
    assert!(value.get("optional").is_none());
}

#[test]
fn test_binary_expression_operator_symbol() {
    let expr = Expression::BinaryExpression(BinaryExpression {
        span: span(0, 5),
        operator: BinaryOperator::Addition,
        left: Box::new(Expression::ident(span(0, 1), "a")),
        right: Box::new(Expression::ident(span(4, 5), "b")),
    });
    let value = serde_json::to_value(&expr).unwrap();
    assert_eq!(value["operator"], "+");
    assert_eq!(value["left"]["type"], "Identifier");
    assert_eq!(value["right"]["name"], "b");
}

#[test]
fn test_arrow_body_is_untagged_expression() {
    let arrow = Expression::ArrowFunctionExpression(ArrowFunctionExpression {
        span: span(0, 7),
        params: vec![],
        body: ArrowBody::Expression(Box::new(Expression::ident(span(6, 7), "x"))),
        is_async: false,
        expression: true,
        type_parameters: None,
        return_type: None,
    });
    let value = serde_json::to_value(&arrow).unwrap();
    assert_eq!(value["body"]["type"], "Identifier");
    assert_eq!(value["async"], false);
    assert_eq!(value["expression"], true);
}

#[test]
fn test_ts_keyword_lookup() {
    assert!(matches!(
        TSType::keyword("string", span(0, 6)),
        Some(TSType::TSStringKeyword(_))
    ));
    assert!(TSType::keyword("void", span(0, 4)).is_none());
    assert!(TSType::keyword("Foo", span(0, 3)).is_none());
}

#[test]
fn test_literal_type_template_is_tagged() {
    let lit = TSType::TSLiteralType(TSLiteralType {
        span: span(0, 4),
        literal: TSLiteral::Expression(Box::new(Expression::NumericLiteral(NumericLiteral {
            span: span(0, 1),
            value: 1.0,
            extra: LiteralExtra { raw: "1".into() },
        }))),
    });
    let value = serde_json::to_value(&lit).unwrap();
    assert_eq!(value["type"], "TSLiteralType");
    assert_eq!(value["literal"]["type"], "NumericLiteral");
    assert_eq!(value["literal"]["value"], json!(1.0));
}

#[test]
fn test_jsx_qualified_name() {
    let name = JSXElementName::JSXMemberExpression(JSXMemberExpression {
        span: span(1, 6),
        object: Box::new(JSXElementName::JSXIdentifier(JSXIdentifier {
            span: span(1, 2),
            name: "a".into(),
        })),
        property: JSXIdentifier {
            span: span(3, 6),
            name: "Foo".into(),
        },
    });
    assert_eq!(name.qualified_name(), "a.Foo");
}

#[test]
fn test_node_counter_walks_nested_nodes() {
    let stmt = Statement::ExpressionStatement(ExpressionStatement {
        span: span(0, 6),
        expression: Box::new(Expression::LogicalExpression(LogicalExpression {
            span: span(0, 6),
            operator: LogicalOperator::Or,
            left: Box::new(Expression::ident(span(0, 1), "a")),
            right: Box::new(Expression::ident(span(5, 6), "b")),
        })),
        directive: None,
    });
    let mut counter = NodeCounter::default();
    counter.visit_statement(&stmt);
    assert_eq!(counter.statements, 1);
    assert_eq!(counter.expressions, 3);
    assert_eq!(counter.types, 0);
}

#[test]
fn test_span_mut_moves_start() {
    let mut expr = Expression::ident(span(4, 7), "foo");
    expr.span_mut().start = Position::new(1, 2, 2);
    assert_eq!(expr.span().start.index, 2);
    assert_eq!(expr.type_name(), "Identifier");
}
