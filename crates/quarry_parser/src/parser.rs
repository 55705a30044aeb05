//! The parser: token cursor, error raising and the helpers every
//! production shares.
//!
//! Productions live in sibling modules as further `impl Parser` blocks.
//! Overridable productions are reached through the hook methods generated
//! in `grammar.rs`; everything here is plain and never dispatched.

use quarry_ast::token_kind::{Token, TokenKind, TokenValue};
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::*;
use quarry_diagnostics::{DiagnosticMessage, ParseError};
use quarry_scanner::char_codes::{is_identifier_char, is_new_line, skip_trivia, skip_trivia_in_line};
use quarry_scanner::{Lexer, LookaheadToken, TokContext};

use crate::grammar::{grammar_for, Grammar, LayerSet};
use crate::options::{ParserOptions, PluginSet};
use crate::state::State;
use crate::PResult;

/// Maximum nesting of statements and expressions before the parse gives up
/// instead of overflowing the stack.
const MAX_RECURSION_DEPTH: u32 = 200;

/// One parse of one source text under one composed grammar.
pub struct Parser<'a> {
    pub(crate) input: &'a [char],
    pub(crate) options: &'a ParserOptions,
    pub(crate) plugins: PluginSet,
    pub(crate) grammar: &'static dyn Grammar,
    pub(crate) state: State,
    pub(crate) in_module: bool,
    /// Set while a one-token lookahead is being read; context updates and
    /// error recording are suppressed.
    pub(crate) is_lookahead: bool,
    pub(crate) recursion_depth: u32,
    pub(crate) saw_unambiguous_esm: bool,
    pub(crate) ambiguous_script_different_ast: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [char], options: &'a ParserOptions, plugins: PluginSet, in_module: bool) -> Self {
        let strict = options.initial_strict(in_module);
        let mut state = State::new(options.start_line, options.start_column, in_module, strict);
        state.is_ambient_context = plugins.dts;
        Self {
            input,
            options,
            plugins,
            grammar: grammar_for(plugins.layers),
            state,
            in_module,
            is_lookahead: false,
            recursion_depth: 0,
            saw_unambiguous_esm: false,
            ambiguous_script_different_ast: false,
        }
    }

    /// The live parse state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Whether an import, export or `import.meta` has been seen.
    pub fn saw_unambiguous_esm(&self) -> bool {
        self.saw_unambiguous_esm
    }

    #[inline]
    pub(crate) fn has_layer(&self, layer: LayerSet) -> bool {
        self.plugins.has(layer)
    }

    #[inline]
    pub(crate) fn is_typescript(&self) -> bool {
        self.has_layer(LayerSet::TYPESCRIPT)
    }

    /// A lexer over the current tokenizer state.
    pub(crate) fn lexer(&mut self) -> Lexer<'_> {
        let recover = self.options.error_recovery && !self.is_lookahead;
        Lexer::new(
            self.input,
            &mut self.state.tok,
            &mut self.state.errors,
            recover,
            self.state.strict,
        )
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn cur(&self) -> TokenKind {
        self.state.tok.kind
    }

    #[inline]
    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.state.tok.kind == kind
    }

    #[inline]
    pub(crate) fn value(&self) -> &TokenValue {
        &self.state.tok.value
    }

    /// Text of the current identifier, keyword, string or JSX token.
    #[inline]
    pub(crate) fn cur_str(&self) -> &str {
        self.state.tok.value.as_str().unwrap_or("")
    }

    #[inline]
    pub(crate) fn start_pos(&self) -> Position {
        self.state.tok.start_loc
    }

    #[inline]
    pub(crate) fn last_end(&self) -> Position {
        self.state.tok.last_tok_end_loc
    }

    #[inline]
    pub(crate) fn token_span(&self) -> Span {
        self.state.tok.token_span()
    }

    /// Span from `start` to the end of the last consumed token. Never ends
    /// before it starts, so nodes that consumed nothing are empty.
    #[inline]
    pub(crate) fn span_from(&self, start: Position) -> Span {
        let end = self.last_end();
        if end.index < start.index {
            Span::empty(start)
        } else {
            Span::new(start, end)
        }
    }

    /// Source text between two character offsets.
    pub(crate) fn source_slice(&self, start: u32, end: u32) -> String {
        let end = (end as usize).min(self.input.len());
        let start = (start as usize).min(end);
        self.input[start..end].iter().collect()
    }

    /// Moves to the next token.
    pub(crate) fn next(&mut self) -> PResult<()> {
        self.check_keyword_escapes()?;
        if self.options.tokens && !self.is_lookahead {
            let tok = &self.state.tok;
            let token = Token::new(tok.kind, tok.value.clone(), tok.start_loc, tok.end_loc);
            self.state.tokens.push(token);
        }
        let tok = &mut self.state.tok;
        tok.last_tok_start = tok.start;
        tok.last_tok_start_loc = tok.start_loc;
        tok.last_tok_end_loc = tok.end_loc;
        self.next_token()
    }

    /// Reads the token at the cursor with every layer's tokenizer rules,
    /// then lets the layers update the context stack.
    pub(crate) fn next_token(&mut self) -> PResult<()> {
        let prev = self.state.tok.kind;
        let preserve_space = self.state.tok.context.current().preserves_space();
        let first = {
            let mut lexer = self.lexer();
            if !preserve_space {
                lexer.skip_space()?;
            }
            lexer.state.contains_esc = false;
            if lexer.begin_token() {
                lexer.token_start_char()
            } else {
                None
            }
        };
        if let Some(ch) = first {
            self.get_token_from_code(ch)?;
        }
        if !self.is_lookahead {
            self.update_context(prev);
        }
        Ok(())
    }

    fn check_keyword_escapes(&mut self) -> PResult<()> {
        let kind = self.cur();
        if kind.is_keyword() && self.state.tok.contains_esc {
            let at = self.start_pos();
            self.raise(&INVALID_ESCAPED_RESERVED_WORD, at, &[kind.label()])?;
        }
        Ok(())
    }

    /// Consumes the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.is(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.unexpected(Some(kind)))
        }
    }

    /// An unescaped identifier token spelling `name`.
    #[inline]
    pub(crate) fn is_contextual(&self, name: &str) -> bool {
        self.is(TokenKind::Identifier) && !self.state.tok.contains_esc && self.cur_str() == name
    }

    pub(crate) fn eat_contextual(&mut self, name: &str) -> PResult<bool> {
        if self.is_contextual(name) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> PResult<()> {
        if self.eat_contextual(name)? {
            Ok(())
        } else {
            Err(self.unexpected(None))
        }
    }

    /// The current token is an identifier or a reserved word.
    #[inline]
    pub(crate) fn is_name(&self) -> bool {
        self.cur().is_keyword_or_identifier()
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    /// Reads the token after the current one without consuming anything.
    pub(crate) fn lookahead(&mut self) -> PResult<LookaheadToken> {
        let snapshot = self.state.tok.snapshot();
        let was_lookahead = std::mem::replace(&mut self.is_lookahead, true);
        let result = self.next_token();
        self.is_lookahead = was_lookahead;
        let token = self.state.tok.restore(snapshot);
        result.map(|_| token)
    }

    /// Offset of the first non-trivia character after the current token.
    #[inline]
    pub(crate) fn next_token_start(&self) -> usize {
        skip_trivia(self.input, self.state.tok.pos)
    }

    /// Like [`Self::next_token_start`], stopping at a line break.
    #[inline]
    pub(crate) fn next_token_in_line_start(&self) -> usize {
        skip_trivia_in_line(self.input, self.state.tok.pos)
    }

    #[inline]
    pub(crate) fn lookahead_char(&self) -> Option<char> {
        self.input.get(self.next_token_start()).copied()
    }

    #[inline]
    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos).copied()
    }

    /// Whether the unread source at `pos` spells the word `name`.
    pub(crate) fn is_unparsed_contextual(&self, pos: usize, name: &str) -> bool {
        let mut end = pos;
        for expected in name.chars() {
            if self.char_at(end) != Some(expected) {
                return false;
            }
            end += 1;
        }
        !self.char_at(end).is_some_and(|c| is_identifier_char(c) || c == '\\')
    }

    pub(crate) fn is_lookahead_contextual(&self, name: &str) -> bool {
        self.is_unparsed_contextual(self.next_token_start(), name)
    }

    // ========================================================================
    // Line terminators and semicolons
    // ========================================================================

    /// A line break between the previous token and the current one.
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        let from = self.state.tok.last_tok_end_loc.index as usize;
        let to = self.state.tok.start.min(self.input.len());
        from < to && self.input[from..to].iter().any(|&c| is_new_line(c))
    }

    /// A line break directly after the current token.
    pub(crate) fn has_following_line_break(&self) -> bool {
        let end = self.state.tok.end.min(self.input.len());
        let next = skip_trivia_in_line(self.input, end);
        if self.char_at(next).is_some_and(is_new_line) {
            return true;
        }
        // A block comment spanning lines counts as a break.
        next + 1 < self.input.len() && self.input[next] == '/' && self.input[next + 1] == '*'
    }

    #[inline]
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.is(TokenKind::EndOfFileToken) || self.is(TokenKind::CloseBraceToken) || self.has_preceding_line_break()
    }

    pub(crate) fn is_line_terminator(&mut self) -> PResult<bool> {
        Ok(self.eat(TokenKind::SemicolonToken)? || self.can_insert_semicolon())
    }

    /// Consumes a statement-ending semicolon. With `allow_asi`, a line
    /// break, `}` or the end of input stand in for it.
    pub(crate) fn semicolon(&mut self, allow_asi: bool) -> PResult<()> {
        let ok = if allow_asi {
            self.is_line_terminator()?
        } else {
            self.eat(TokenKind::SemicolonToken)?
        };
        if !ok {
            let at = self.last_end();
            self.raise(&MISSING_SEMICOLON, at, &[])?;
        }
        Ok(())
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Realizes `message` at `at`. Recoverable errors are recorded when
    /// recovery is on; everything else comes back as `Err`.
    pub(crate) fn raise(&mut self, message: &DiagnosticMessage, at: Position, args: &[&str]) -> PResult<()> {
        let error = message.at(at, args);
        if !error.recoverable || !self.options.error_recovery {
            return Err(error);
        }
        if !self.is_lookahead {
            self.state.errors.push(error);
        }
        Ok(())
    }

    /// Records errors produced by the scope handlers.
    pub(crate) fn raise_all(&mut self, errors: Vec<ParseError>) -> PResult<()> {
        for error in errors {
            if !error.recoverable || !self.options.error_recovery {
                return Err(error);
            }
            if !self.is_lookahead {
                self.state.errors.push(error);
            }
        }
        Ok(())
    }

    /// The error for an unexpected current token. Constructs that need a
    /// layer which is not enabled report the missing plugin instead.
    pub(crate) fn unexpected(&self, expected: Option<TokenKind>) -> ParseError {
        self.unexpected_at(self.start_pos(), expected)
    }

    pub(crate) fn unexpected_at(&self, at: Position, expected: Option<TokenKind>) -> ParseError {
        if self.is(TokenKind::AtToken) && at == self.start_pos() {
            return MISSING_PLUGIN
                .at(at, &["decorators"])
                .with_missing_plugins(&["decorators"]);
        }
        match expected {
            Some(kind) => UNEXPECTED_TOKEN_EXPECTED.at(at, &[kind.label()]),
            None => UNEXPECTED_TOKEN.at(at, &[]),
        }
    }

    /// A construct that needs `plugin`, which is not enabled.
    pub(crate) fn missing_plugin(&self, at: Position, plugins: &[&'static str]) -> ParseError {
        let names = plugins.join(", ");
        let message = if plugins.len() == 1 { &MISSING_PLUGIN } else { &MISSING_ONE_OF_PLUGINS };
        message.at(at, &[&names]).with_missing_plugins(plugins)
    }

    /// Runs `f` one nesting level deeper, failing once the limit is hit.
    pub(crate) fn with_recursion_guard<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return Err(TOO_DEEPLY_NESTED.at(self.start_pos(), &[]));
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    // ========================================================================
    // Strict mode
    // ========================================================================

    /// Switches strict mode. Entering it realizes the deferred errors of
    /// the code already read.
    pub(crate) fn set_strict(&mut self, strict: bool) -> PResult<()> {
        self.state.strict = strict;
        if strict {
            let deferred = std::mem::take(&mut self.state.tok.strict_errors);
            self.raise_all(deferred)?;
        }
        Ok(())
    }

    // ========================================================================
    // Contexts
    // ========================================================================

    #[inline]
    pub(crate) fn cur_context(&self) -> TokContext {
        self.state.tok.context.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_parser<T>(source: &str, options: &ParserOptions, f: impl FnOnce(&mut Parser<'_>) -> T) -> T {
        let chars: Vec<char> = source.chars().collect();
        let plugins = options.plugin_set().unwrap();
        let mut parser = Parser::new(&chars, options, plugins, false);
        parser.next_token().unwrap();
        f(&mut parser)
    }

    #[test]
    fn test_lookahead_does_not_move() {
        let options = ParserOptions::default();
        with_parser("a /* c */ b", &options, |p| {
            let next = p.lookahead().unwrap();
            assert_eq!(next.ident(), Some("b"));
            assert_eq!(p.cur_str(), "a");
            assert_eq!(p.state.tok.pos, 1);
        });
    }

    #[test]
    fn test_preceding_line_break() {
        let options = ParserOptions::default();
        with_parser("a\nb c", &options, |p| {
            p.next().unwrap();
            assert!(p.has_preceding_line_break());
            assert!(p.can_insert_semicolon());
            p.next().unwrap();
            assert!(!p.has_preceding_line_break());
        });
    }

    #[test]
    fn test_missing_semicolon_recovers() {
        let options = ParserOptions::default().with_error_recovery();
        with_parser("a b", &options, |p| {
            p.next().unwrap();
            p.semicolon(false).unwrap();
            assert_eq!(p.state.errors.len(), 1);
            assert!(p.state.errors.errors()[0].is(&MISSING_SEMICOLON));
        });
    }

    #[test]
    fn test_unexpected_at_sign_names_plugin() {
        let options = ParserOptions::default();
        with_parser("@dec class A {}", &options, |p| {
            let err = p.unexpected(None);
            assert!(err.is(&MISSING_PLUGIN));
            assert_eq!(err.missing_plugins, vec!["decorators"]);
        });
    }

    #[test]
    fn test_unparsed_contextual() {
        let options = ParserOptions::default();
        with_parser("async function f() {}", &options, |p| {
            assert!(p.is_contextual("async"));
            assert!(p.is_lookahead_contextual("function"));
            assert!(!p.is_lookahead_contextual("func"));
        });
    }

    #[test]
    fn test_tokens_are_retained_when_asked() {
        let options = ParserOptions {
            tokens: true,
            ..ParserOptions::default()
        };
        with_parser("a + b", &options, |p| {
            p.next().unwrap();
            p.next().unwrap();
            assert_eq!(p.state.tokens.len(), 2);
            assert_eq!(p.state.tokens[1].kind, TokenKind::PlusToken);
        });
    }
}
