//! Tokenizer state.
//!
//! `TokenizerState` is embedded in the parser's state and cloned with it
//! for speculative parsing. `TokenSnapshot` is the much smaller subset that
//! one-token lookahead has to put back.

use crate::context::ContextStack;
use quarry_ast::node::Comment;
use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_core::text::{Position, Span};
use quarry_diagnostics::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerState {
    /// Cursor, in characters.
    pub pos: usize,
    pub cur_line: u32,
    /// Offset of the first character of the current line. Negative when a
    /// `startColumn` offset is configured.
    pub line_start: isize,

    // Current token
    pub kind: TokenKind,
    pub value: TokenValue,
    pub start: usize,
    pub end: usize,
    pub start_loc: Position,
    pub end_loc: Position,

    // Previous token
    pub last_tok_start: usize,
    pub last_tok_start_loc: Position,
    pub last_tok_end_loc: Position,

    pub context: ContextStack,
    pub can_start_jsx_element: bool,
    /// The current word token contained a `\u` escape.
    pub contains_esc: bool,
    /// First invalid escape inside the current template chunk. Only an
    /// error when the template is not tagged.
    pub first_invalid_template_escape: Option<Position>,
    /// Errors that become fatal if a later "use strict" directive applies to
    /// the code already read (legacy octal literals and escapes).
    pub strict_errors: Vec<ParseError>,
    pub comments: Vec<Comment>,
}

impl TokenizerState {
    pub fn new(start_line: u32, start_column: u32) -> Self {
        let origin = Position::new(start_line, start_column, 0);
        Self {
            pos: 0,
            cur_line: start_line,
            line_start: -(start_column as isize),
            kind: TokenKind::EndOfFileToken,
            value: TokenValue::None,
            start: 0,
            end: 0,
            start_loc: origin,
            end_loc: origin,
            last_tok_start: 0,
            last_tok_start_loc: origin,
            last_tok_end_loc: origin,
            context: ContextStack::new(),
            can_start_jsx_element: true,
            contains_esc: false,
            first_invalid_template_escape: None,
            strict_errors: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Position of the cursor.
    #[inline]
    pub fn cur_position(&self) -> Position {
        self.position_at(self.pos)
    }

    /// Position of an offset on the current line.
    #[inline]
    pub fn position_at(&self, pos: usize) -> Position {
        let column = (pos as isize - self.line_start).max(0) as u32;
        Position::new(self.cur_line, column, pos as u32)
    }

    /// Span of the current token.
    #[inline]
    pub fn token_span(&self) -> Span {
        Span::new(self.start_loc, self.end_loc)
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot {
            pos: self.pos,
            cur_line: self.cur_line,
            line_start: self.line_start,
            kind: self.kind,
            value: self.value.clone(),
            start: self.start,
            end: self.end,
            start_loc: self.start_loc,
            end_loc: self.end_loc,
            last_tok_start: self.last_tok_start,
            last_tok_start_loc: self.last_tok_start_loc,
            last_tok_end_loc: self.last_tok_end_loc,
            context: self.context.clone(),
            can_start_jsx_element: self.can_start_jsx_element,
            contains_esc: self.contains_esc,
            first_invalid_template_escape: self.first_invalid_template_escape,
            comments_len: self.comments.len(),
            strict_errors_len: self.strict_errors.len(),
        }
    }

    /// Puts back a snapshot and returns the token that was read since.
    pub fn restore(&mut self, snapshot: TokenSnapshot) -> LookaheadToken {
        let token = LookaheadToken {
            kind: self.kind,
            value: std::mem::replace(&mut self.value, snapshot.value),
            start: self.start,
            end: self.end,
            start_loc: self.start_loc,
            contains_esc: self.contains_esc,
        };
        self.pos = snapshot.pos;
        self.cur_line = snapshot.cur_line;
        self.line_start = snapshot.line_start;
        self.kind = snapshot.kind;
        self.start = snapshot.start;
        self.end = snapshot.end;
        self.start_loc = snapshot.start_loc;
        self.end_loc = snapshot.end_loc;
        self.last_tok_start = snapshot.last_tok_start;
        self.last_tok_start_loc = snapshot.last_tok_start_loc;
        self.last_tok_end_loc = snapshot.last_tok_end_loc;
        self.context = snapshot.context;
        self.can_start_jsx_element = snapshot.can_start_jsx_element;
        self.contains_esc = snapshot.contains_esc;
        self.first_invalid_template_escape = snapshot.first_invalid_template_escape;
        self.comments.truncate(snapshot.comments_len);
        self.strict_errors.truncate(snapshot.strict_errors_len);
        token
    }
}

/// Tokenizer fields saved around a lookahead.
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    pos: usize,
    cur_line: u32,
    line_start: isize,
    kind: TokenKind,
    value: TokenValue,
    start: usize,
    end: usize,
    start_loc: Position,
    end_loc: Position,
    last_tok_start: usize,
    last_tok_start_loc: Position,
    last_tok_end_loc: Position,
    context: ContextStack,
    can_start_jsx_element: bool,
    contains_esc: bool,
    first_invalid_template_escape: Option<Position>,
    comments_len: usize,
    strict_errors_len: usize,
}

/// The token produced by a lookahead.
#[derive(Debug, Clone, PartialEq)]
pub struct LookaheadToken {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub start: usize,
    pub end: usize,
    pub start_loc: Position,
    pub contains_esc: bool,
}

impl LookaheadToken {
    /// Identifier text, if this is an identifier token.
    pub fn ident(&self) -> Option<&str> {
        if self.kind == TokenKind::Identifier {
            self.value.as_str()
        } else {
            None
        }
    }

    pub fn is_contextual(&self, name: &str) -> bool {
        self.ident() == Some(name) && !self.contains_esc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TokContext;

    #[test]
    fn test_start_column_offsets_positions() {
        let state = TokenizerState::new(3, 4);
        let pos = state.cur_position();
        assert_eq!((pos.line, pos.column, pos.index), (3, 4, 0));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = TokenizerState::new(1, 0);
        let mut copy = original.clone();
        copy.context.push(TokContext::JsxOpenTag);
        copy.pos = 10;
        assert_eq!(original.context.len(), 1);
        assert_eq!(original.pos, 0);
        original.context.push(TokContext::JsxChild);
        assert_eq!(copy.context.current(), TokContext::JsxOpenTag);
    }

    #[test]
    fn test_restore_returns_lookahead_token() {
        let mut state = TokenizerState::new(1, 0);
        let snapshot = state.snapshot();
        state.kind = TokenKind::Identifier;
        state.value = TokenValue::Str("abc".into());
        state.start = 4;
        state.pos = 7;
        state.context.push(TokContext::Brace);
        let token = state.restore(snapshot);
        assert_eq!(token.ident(), Some("abc"));
        assert_eq!(token.start, 4);
        assert_eq!(state.pos, 0);
        assert_eq!(state.kind, TokenKind::EndOfFileToken);
        assert!(state.context.is_balanced());
    }
}
