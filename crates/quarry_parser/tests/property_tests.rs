//! Whole-parser properties.
//!
//! Behaviour that must hold for any input: speculative parses leave no
//! trace, token streams are reproducible, spans nest, and bindings follow
//! one redeclaration table.

use quarry_core::text::Span;
use quarry_diagnostics::messages::*;
use quarry_diagnostics::ErrorKind;
use quarry_parser::ast::node::*;
use quarry_parser::ast::token_kind::{Token, TokenKind};
use quarry_parser::ast::visitor::{walk_expression, walk_statement, AstVisitor};
use quarry_parser::{grammar_chain, parse, parse_expression, LayerSet, ParserOptions, State};
use quarry_scanner::TokContext;
use quarry_scope::ScopeFlags;

fn with_tokens(options: ParserOptions) -> ParserOptions {
    ParserOptions { tokens: true, ..options }
}

fn ts() -> ParserOptions {
    ParserOptions::module().with_plugin("typescript")
}

fn ts_jsx() -> ParserOptions {
    ts().with_plugin("jsx")
}

fn parsed_tokens(source: &str, options: &ParserOptions) -> Vec<Token> {
    let output = parse(source, options).expect("parse failed");
    output
        .file
        .tokens
        .expect("tokens requested")
        .into_iter()
        .filter(|t| t.kind != TokenKind::EndOfFileToken)
        .collect()
}

// ============================================================================
// Speculative parsing
// ============================================================================

#[test]
fn test_generic_arrow_without_jsx() {
    let output = parse_expression("<T,>() => x", &ts()).unwrap();
    let Expression::ArrowFunctionExpression(arrow) = output.expression else {
        panic!("expected an arrow");
    };
    let params = arrow.type_parameters.expect("type parameters");
    assert_eq!(params.params[0].name, "T");
}

#[test]
fn test_failed_element_attempt_commits_arrow() {
    let output = parse_expression("<T,>() => x", &ts_jsx().with_error_recovery()).unwrap();
    assert!(matches!(output.expression, Expression::ArrowFunctionExpression(_)));
    assert!(output.errors.is_empty(), "{:?}", output.errors);
}

#[test]
fn test_backtracking_leaves_no_tokens_behind() {
    let tokens = parsed_tokens("const f = <T,>(x: T) => x;", &with_tokens(ts_jsx()));
    assert!(tokens.windows(2).all(|w| w[0].span.start.index < w[1].span.start.index));
    assert!(tokens.iter().all(|t| t.kind != TokenKind::JsxName));
    // The `<` was read in expression position before the element attempt.
    let tag_starts: Vec<u32> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::JsxTagStart)
        .map(|t| t.span.start.index)
        .collect();
    assert_eq!(tag_starts, vec![10]);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::SemicolonToken));
}

#[test]
fn test_backtracking_leaves_no_errors_behind() {
    let options = ts_jsx().with_error_recovery();
    for source in ["<T,>() => x;", "f<T>(x);", "<T extends unknown>(x: T) => x;"] {
        let output = parse(source, &options).unwrap();
        assert!(output.errors.is_empty(), "{source}: {:?}", output.errors);
    }
}

#[test]
fn test_backtracking_leaves_no_bindings_behind() {
    // The generic-arrow reading binds `x` and `y` before it is rejected in
    // favour of a type assertion; the later declarations must not clash.
    let source = "let a = <T>((x) => { let y; return x; });\nlet x; let y;";
    for options in [ts(), ts().with_error_recovery()] {
        let output = parse(source, &options).unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        let Statement::VariableDeclaration(decl) = &output.file.program.body[0] else {
            panic!("expected a declaration");
        };
        let init = decl.declarations[0].init.as_deref();
        assert!(matches!(init, Some(Expression::TSTypeAssertion(_))), "{init:?}");
        assert_eq!(output.file.program.body.len(), 3);
    }
}

// ============================================================================
// Tokens and contexts
// ============================================================================

const PLAIN: &str = "let total = price * 2 / rate;\nconst re = /ab+c/i;\nif (total > 3) { call(re, 'x', 0x1F); }";

#[test]
fn test_token_stream_is_reproducible() {
    let options = with_tokens(ParserOptions::module());
    assert_eq!(parsed_tokens(PLAIN, &options), parsed_tokens(PLAIN, &options));
}

#[test]
fn test_parser_tokens_match_standalone_tokenizer() {
    let parsed: Vec<(TokenKind, Span)> = parsed_tokens(PLAIN, &with_tokens(ParserOptions::module()))
        .into_iter()
        .map(|t| (t.kind, t.span))
        .collect();
    let scanned: Vec<(TokenKind, Span)> = quarry_scanner::tokenize(PLAIN)
        .expect("tokenize failed")
        .into_iter()
        .filter(|t| t.kind != TokenKind::EndOfFileToken)
        .map(|t| (t.kind, t.span))
        .collect();
    assert_eq!(parsed, scanned);
}

#[test]
fn test_contexts_rebalance_after_elements() {
    let source = "const a = <div title={`t${x}`}>{b ? <i /> : null}</div>;\nconst re = /}/g;\nconst t = `${a}}`;";
    let tokens = parsed_tokens(source, &with_tokens(ParserOptions::module().with_plugin("jsx")));
    let regex = tokens
        .iter()
        .find(|t| t.kind == TokenKind::RegularExpressionLiteral)
        .expect("regex token");
    assert_eq!(regex.span.start.line, 2);
    assert_eq!(tokens.last().map(|t| t.span.start.line), Some(3));
}

#[test]
fn test_state_clone_is_isolated() {
    let mut original = State::new(1, 0, true, true);
    original.scope.enter(ScopeFlags::PROGRAM);
    let depth = original.tok.context.len();

    let mut copy = original.clone();
    copy.tok.context.push(TokContext::JsxChild);
    copy.scope.enter(ScopeFlags::FUNCTION);
    copy.errors.push(MISSING_SEMICOLON.at(copy.tok.cur_position(), &[]));
    copy.strict = false;

    assert_eq!(original.tok.context.len(), depth);
    assert_eq!(original.scope.depth(), 1);
    assert!(original.errors.is_empty());
    assert!(original.strict);
}

#[test]
fn test_layer_chain_is_shared() {
    assert_eq!(grammar_chain(LayerSet::TYPESCRIPT | LayerSet::JSX), vec!["typescript", "jsx", "core"]);
}

// ============================================================================
// Redeclarations
// ============================================================================

fn redeclaration_error(source: &str, options: &ParserOptions) -> bool {
    match parse(source, options) {
        Ok(_) => false,
        Err(err) if err.is(&VAR_REDECLARATION) => {
            assert_eq!(err.kind, ErrorKind::Binding);
            true
        }
        Err(err) => panic!("{source}: unexpected error {err}"),
    }
}

#[test]
fn test_redeclaration_table() {
    let script = ParserOptions::default();
    let table = [
        ("var a; var a;", false),
        ("let a; var a;", true),
        ("var a; let a;", true),
        ("const a = 1; let a;", true),
        ("let a; { let a; }", false),
        ("function f() {} var f;", false),
        ("class A {} class A {}", true),
        ("function f(a) { let a; }", true),
        ("try {} catch (e) { var e; }", false),
        ("try {} catch ([e]) { var e; }", true),
    ];
    for (source, rejected) in table {
        assert_eq!(redeclaration_error(source, &script), rejected, "{source}");
    }
}

#[test]
fn test_typescript_redeclaration_table() {
    let table = [
        ("enum A {} enum A {}", false),
        ("const enum A {} const enum A {}", false),
        ("const enum A {} enum A {}", true),
        ("enum A {} let A;", true),
        ("interface I {} interface I {}", false),
        ("class C {} interface C {}", false),
        ("type T = 1; type T = 2;", true),
        ("function f(): void; function f() {}", false),
    ];
    for (source, rejected) in table {
        assert_eq!(redeclaration_error(source, &ts()), rejected, "{source}");
    }
}

// ============================================================================
// Assignment targets and lexing
// ============================================================================

#[test]
fn test_parenthesized_rest_pattern() {
    let err = parse("({a, ...b}) = c;", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&INVALID_PARENTHESIZED_ASSIGNMENT));
    assert!(parse("function f({a, ...b}) {}", &ParserOptions::default()).is_ok());
}

#[test]
fn test_unterminated_string_points_at_quote() {
    let err = parse("x = \"unterminated", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&UNTERMINATED_STRING));
    assert_eq!(err.kind, ErrorKind::Lex);
    assert_eq!((err.loc.line, err.loc.column, err.loc.index), (1, 4, 4));
}

// ============================================================================
// Spans
// ============================================================================

/// Checks that every statement and expression lies inside its parent.
#[derive(Default)]
struct SpanNesting {
    parents: Vec<Span>,
    visited: usize,
}

impl SpanNesting {
    fn check(&mut self, span: Span, what: &str) {
        if let Some(parent) = self.parents.last() {
            assert!(parent.contains_span(&span), "{what} {span:?} escapes {parent:?}");
        }
        self.visited += 1;
    }
}

impl AstVisitor for SpanNesting {
    fn visit_statement(&mut self, stmt: &Statement) {
        self.check(*stmt.span(), "statement");
        self.parents.push(*stmt.span());
        walk_statement(self, stmt);
        self.parents.pop();
    }

    fn visit_expression(&mut self, expr: &Expression) {
        self.check(*expr.span(), expr.type_name());
        self.parents.push(*expr.span());
        walk_expression(self, expr);
        self.parents.pop();
    }
}

#[test]
fn test_spans_nest() {
    let sources = [
        (
            "const f = async ({ a, b = [1, 2] }, ...rest) => { for (const x of rest) await g(x?.y ?? a); };\nclass K extends Base { static #n = 1; m() { return `v=${this.v}`; } }",
            ParserOptions::module(),
        ),
        ("const el = <ul>{items.map(i => <li key={i}>{i}</li>)}</ul>;", ParserOptions::module().with_plugin("jsx")),
        ("function id<T>(x: T): T { return x as T; }\nconst n = <number>y!;\nlet m = id<string>(`${n}`) || [n, -n];", ts()),
    ];
    for (source, options) in sources {
        let output = parse(source, &options).expect("parse failed");
        let program_span = output.file.program.span;
        let mut nesting = SpanNesting {
            parents: vec![program_span],
            ..SpanNesting::default()
        };
        nesting.visit_program(&output.file.program);
        assert!(nesting.visited > 10, "{source}");
        assert_eq!(program_span.end.index as usize, source.chars().count());
    }
}
