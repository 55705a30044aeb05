//! Scanner integration tests.
//!
//! Drives `tokenize` and the raw `Lexer` entry points over small inputs.

use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_diagnostics::{messages, ErrorList};
use quarry_scanner::{tokenize, Lexer, TokContext, TokenizerState};

/// Helper: tokenize and return (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(TokenKind, TokenValue)> {
    tokenize(source)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| (t.kind, t.value))
        .collect()
}

/// Helper: tokenize and return kinds only.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

fn ident(name: &str) -> (TokenKind, TokenValue) {
    (TokenKind::Identifier, TokenValue::Str(name.into()))
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_and_comments_only() {
    assert!(scan_all("  \n\t // line\n /* block */ ").is_empty());
}

#[test]
fn test_operators() {
    assert_eq!(
        scan_kinds("a >>>= b ?? c ||= d ** e"),
        vec![
            TokenKind::Identifier,
            TokenKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            TokenKind::Identifier,
            TokenKind::QuestionQuestionToken,
            TokenKind::Identifier,
            TokenKind::BarBarEqualsToken,
            TokenKind::Identifier,
            TokenKind::AsteriskAsteriskToken,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_arrow_and_spread() {
    assert_eq!(
        scan_kinds("(...a) => a"),
        vec![
            TokenKind::OpenParenToken,
            TokenKind::DotDotDotToken,
            TokenKind::Identifier,
            TokenKind::CloseParenToken,
            TokenKind::EqualsGreaterThanToken,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_keywords_and_contextual_words() {
    let tokens = scan_all("let x = typeof async");
    assert_eq!(tokens[0], ident("let"));
    assert_eq!(tokens[2].0, TokenKind::EqualsToken);
    assert_eq!(tokens[3].0, TokenKind::TypeOfKeyword);
    assert_eq!(tokens[4], ident("async"));
}

#[test]
fn test_unicode_identifier() {
    assert_eq!(scan_all("café"), vec![ident("café")]);
    assert_eq!(scan_all("\\u{61}b"), vec![ident("ab")]);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numeric_literals() {
    let values: Vec<TokenValue> = scan_all("1 0.5 1e3 0o17 0xff 1_000_000")
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    assert_eq!(
        values,
        vec![
            TokenValue::Num(1.0),
            TokenValue::Num(0.5),
            TokenValue::Num(1000.0),
            TokenValue::Num(15.0),
            TokenValue::Num(255.0),
            TokenValue::Num(1_000_000.0),
        ]
    );
}

#[test]
fn test_bigint_keeps_prefix() {
    assert_eq!(
        scan_all("0x1Fn"),
        vec![(TokenKind::BigIntLiteral, TokenValue::BigInt("0x1F".into()))]
    );
}

#[test]
fn test_string_literals() {
    assert_eq!(
        scan_all(r#"'single' "dou\"ble""#),
        vec![
            (TokenKind::StringLiteral, TokenValue::Str("single".into())),
            (TokenKind::StringLiteral, TokenValue::Str("dou\"ble".into())),
        ]
    );
}

#[test]
fn test_unterminated_string_error_at_quote() {
    let err = tokenize("\"unterminated").unwrap_err();
    assert!(err.is(&messages::UNTERMINATED_STRING));
    assert_eq!(err.pos(), 0);
    assert_eq!(err.kind, quarry_diagnostics::ErrorKind::Lex);
}

#[test]
fn test_newline_in_string_is_unterminated() {
    let err = tokenize("x = 'a\nb'").unwrap_err();
    assert!(err.is(&messages::UNTERMINATED_STRING));
    assert_eq!(err.pos(), 4);
}

#[test]
fn test_regexp_after_operator() {
    let tokens = scan_all("x = /a[/]b/gi");
    assert_eq!(
        tokens[2],
        (
            TokenKind::RegularExpressionLiteral,
            TokenValue::RegExp {
                pattern: "a[/]b".into(),
                flags: "gi".into()
            }
        )
    );
}

#[test]
fn test_division_after_identifier() {
    assert_eq!(
        scan_kinds("a / b / c"),
        vec![
            TokenKind::Identifier,
            TokenKind::SlashToken,
            TokenKind::Identifier,
            TokenKind::SlashToken,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_duplicate_regexp_flag() {
    let err = tokenize("/a/gg").unwrap_err();
    assert!(err.is(&messages::DUPLICATE_REGEXP_FLAGS));
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_template_with_substitutions() {
    assert_eq!(
        scan_kinds("`a${b}c${ {d} }e`"),
        vec![
            TokenKind::TemplateNonTail,
            TokenKind::Identifier,
            TokenKind::TemplateNonTail,
            TokenKind::OpenBraceToken,
            TokenKind::Identifier,
            TokenKind::CloseBraceToken,
            TokenKind::TemplateTail,
        ]
    );
}

#[test]
fn test_template_raw_normalizes_crlf() {
    let tokens = scan_all("`a\r\nb`");
    assert_eq!(
        tokens[0].1,
        TokenValue::Template {
            raw: "a\nb".into(),
            cooked: Some("a\nb".into())
        }
    );
}

#[test]
fn test_unterminated_template() {
    let err = tokenize("`abc").unwrap_err();
    assert!(err.is(&messages::UNTERMINATED_TEMPLATE));
    assert_eq!(err.pos(), 1);
}

// ============================================================================
// Positions and comments
// ============================================================================

#[test]
fn test_token_positions_track_lines() {
    let tokens = tokenize("a\n  bb\r\nc").unwrap();
    let starts: Vec<(u32, u32, u32)> = tokens
        .iter()
        .map(|t| (t.span.start.line, t.span.start.column, t.span.start.index))
        .collect();
    assert_eq!(starts, vec![(1, 0, 0), (2, 2, 4), (3, 0, 8)]);
}

#[test]
fn test_comments_are_collected() {
    let chars: Vec<char> = "// one\n/* two\n */ x".chars().collect();
    let mut state = TokenizerState::new(1, 0);
    let mut errors = ErrorList::new();
    let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
    lexer.skip_space().unwrap();
    assert_eq!(state.comments.len(), 2);
    assert_eq!(state.comments[0].value, " one");
    assert_eq!(state.comments[1].value, " two\n ");
    assert_eq!(state.cur_line, 3);
}

// ============================================================================
// Lookahead and JSX
// ============================================================================

#[test]
fn test_snapshot_restore_is_idempotent() {
    let chars: Vec<char> = "a + b".chars().collect();
    let mut state = TokenizerState::new(1, 0);
    let mut errors = ErrorList::new();
    {
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.begin_token();
        lexer.read_token().unwrap();
    }
    let before = state.clone();
    let snapshot = state.snapshot();
    {
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.skip_space().unwrap();
        lexer.begin_token();
        lexer.read_token().unwrap();
    }
    let ahead = state.restore(snapshot);
    assert_eq!(ahead.kind, TokenKind::PlusToken);
    assert_eq!(state, before);
}

#[test]
fn test_jsx_string_keeps_backslashes() {
    let chars: Vec<char> = r#""a\n&quot;""#.chars().collect();
    let mut state = TokenizerState::new(1, 0);
    state.context.push(TokContext::JsxOpenTag);
    let mut errors = ErrorList::new();
    let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
    lexer.begin_token();
    lexer.jsx_read_string('"').unwrap();
    assert_eq!(state.value, TokenValue::Str("a\\n\"".into()));
}

#[test]
fn test_unterminated_jsx_text() {
    let chars: Vec<char> = "text without end".chars().collect();
    let mut state = TokenizerState::new(1, 0);
    let mut errors = ErrorList::new();
    let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
    lexer.begin_token();
    let err = lexer.jsx_read_token().unwrap_err();
    assert!(err.is(&messages::UNTERMINATED_JSX_CONTENT));
}
