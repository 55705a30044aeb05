//! Error recovery tests.
//!
//! With `errorRecovery` on, recoverable problems are collected and the
//! parse carries on; fatal ones still abort.

use quarry_diagnostics::messages::*;
use quarry_diagnostics::ErrorKind;
use quarry_parser::{parse, ParserOptions};

fn recovering() -> ParserOptions {
    ParserOptions::default().with_error_recovery()
}

#[test]
fn test_collects_every_recoverable_error() {
    let output = parse("'use strict'; with (a) {} delete x; let y; let y;", &recovering()).unwrap();
    assert_eq!(output.file.program.body.len(), 4);
    let codes: Vec<u32> = output.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![STRICT_WITH.code, STRICT_DELETE.code, VAR_REDECLARATION.code]);
}

#[test]
fn test_errors_are_in_source_order() {
    let output = parse("let a; let a;\nlet b; let b;", &recovering()).unwrap();
    assert_eq!(output.errors.len(), 2);
    assert!(output.errors[0].loc.index < output.errors[1].loc.index);
    assert_eq!(output.errors[1].loc.line, 2);
}

#[test]
fn test_missing_semicolon_is_recovered() {
    let output = parse("a b", &recovering()).unwrap();
    assert_eq!(output.file.program.body.len(), 2);
    assert!(output.errors[0].is(&MISSING_SEMICOLON));
}

#[test]
fn test_without_recovery_first_error_aborts() {
    let err = parse("'use strict'; with (a) {} delete x;", &ParserOptions::default()).unwrap_err();
    assert!(err.is(&STRICT_WITH));
}

#[test]
fn test_lex_errors_stay_fatal() {
    let err = parse("let a; let a; x = \"open", &recovering()).unwrap_err();
    assert!(err.is(&UNTERMINATED_STRING));
    assert_eq!(err.kind, ErrorKind::Lex);
    assert!(!err.recoverable);
}

#[test]
fn test_unexpected_token_stays_fatal() {
    let err = parse("let a; let a; if (", &recovering()).unwrap_err();
    assert!(!err.recoverable);
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn test_clean_input_has_no_errors() {
    let output = parse("function f(a) { return a * 2; }", &recovering()).unwrap();
    assert!(output.errors.is_empty());
}

#[test]
fn test_truncated_arrow_body_is_a_syntax_error() {
    for options in [ParserOptions::module(), ParserOptions::module().with_error_recovery()] {
        let err = parse("f = (x) => { for (", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }
}

#[test]
fn test_every_prefix_returns_a_result() {
    let sources = [
        "f = (x) => { for (let i = 0; i < x; i++) { try { g(i); } catch (e) {} } };",
        "const h = async ({ a }) => { class K { m() { return () => { switch (a) { case 1: } }; } } };",
    ];
    for source in sources {
        let chars: Vec<char> = source.chars().collect();
        for end in 0..=chars.len() {
            let prefix: String = chars[..end].iter().collect();
            let _ = parse(&prefix, &ParserOptions::module());
            let _ = parse(&prefix, &recovering());
        }
    }
}
