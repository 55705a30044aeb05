//! The raw lexer.
//!
//! A `Lexer` is a short-lived view over the source text and the tokenizer
//! state. It reads exactly one token per call and never decides on its own
//! which lexical mode applies: the grammar picks the entry point (`read_token`,
//! `read_regexp`, `read_template_continuation`, the JSX reads) from the
//! context stack and the previous token.

use crate::char_codes::{
    digit_value, is_identifier_char, is_identifier_start, is_new_line, is_whitespace, BACKSLASH,
    CARRIAGE_RETURN, LINE_FEED,
};
use crate::state::TokenizerState;
use quarry_ast::node::{Comment, CommentKind};
use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::*;
use quarry_diagnostics::{DiagnosticMessage, ErrorList, ParseError};

pub type LexResult<T> = Result<T, ParseError>;

const REGEXP_FLAGS: &[char] = &['d', 'g', 'i', 'm', 's', 'u', 'v', 'y'];

pub struct Lexer<'a> {
    input: &'a [char],
    pub state: &'a mut TokenizerState,
    errors: &'a mut ErrorList,
    recover: bool,
    strict: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(
        input: &'a [char],
        state: &'a mut TokenizerState,
        errors: &'a mut ErrorList,
        recover: bool,
        strict: bool,
    ) -> Self {
        Self {
            input,
            state,
            errors,
            recover,
            strict,
        }
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    #[inline]
    pub fn input(&self) -> &'a [char] {
        self.input
    }

    #[inline]
    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos).copied()
    }

    #[inline]
    pub(crate) fn current_char(&self) -> Option<char> {
        self.char_at(self.state.pos)
    }

    #[inline]
    pub(crate) fn peek_char(&self) -> Option<char> {
        self.char_at(self.state.pos + 1)
    }

    #[inline]
    pub fn cur_position(&self) -> Position {
        self.state.cur_position()
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end.min(self.input.len())].iter().collect()
    }

    /// Records a line break that ended just before `self.state.pos`.
    #[inline]
    pub(crate) fn new_line(&mut self) {
        self.state.cur_line += 1;
        self.state.line_start = self.state.pos as isize;
    }

    /// Realizes `message`; recoverable errors are recorded when recovery is
    /// on, everything else comes back as `Err`.
    pub fn raise(&mut self, message: &DiagnosticMessage, at: Position, args: &[&str]) -> LexResult<()> {
        let error = message.at(at, args);
        if error.recoverable && self.recover {
            self.errors.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Errors that only apply once the enclosing code turns out to be strict.
    fn record_strict_error(&mut self, message: &DiagnosticMessage, at: Position) -> LexResult<()> {
        if self.strict {
            return self.raise(message, at, &[]);
        }
        if !self.state.strict_errors.iter().any(|e| e.loc.index == at.index) {
            self.state.strict_errors.push(message.at(at, &[]));
        }
        Ok(())
    }

    // ========================================================================
    // Token boundaries
    // ========================================================================

    /// Marks the start of a new token at the cursor. Returns `false` and
    /// finishes an end-of-file token when the input is exhausted.
    pub fn begin_token(&mut self) -> bool {
        self.state.start = self.state.pos;
        self.state.start_loc = self.cur_position();
        if self.state.pos >= self.input.len() {
            self.finish_token(TokenKind::EndOfFileToken, TokenValue::None);
            return false;
        }
        true
    }

    /// The character the current token starts with.
    #[inline]
    pub fn token_start_char(&self) -> Option<char> {
        self.char_at(self.state.start)
    }

    pub fn finish_token(&mut self, kind: TokenKind, value: TokenValue) {
        self.state.end = self.state.pos;
        self.state.end_loc = self.cur_position();
        self.state.kind = kind;
        self.state.value = value;
    }

    pub(crate) fn finish_op(&mut self, kind: TokenKind, size: usize) {
        self.state.pos += size;
        self.finish_token(kind, TokenValue::None);
    }

    #[inline]
    fn op(&mut self, kind: TokenKind, size: usize) -> LexResult<()> {
        self.finish_op(kind, size);
        Ok(())
    }

    // ========================================================================
    // Whitespace and comments
    // ========================================================================

    pub fn skip_space(&mut self) -> LexResult<()> {
        while let Some(ch) = self.current_char() {
            match ch {
                CARRIAGE_RETURN => {
                    self.state.pos += 1;
                    if self.current_char() == Some(LINE_FEED) {
                        self.state.pos += 1;
                    }
                    self.new_line();
                }
                _ if is_new_line(ch) => {
                    self.state.pos += 1;
                    self.new_line();
                }
                _ if is_whitespace(ch) => self.state.pos += 1,
                '/' => match self.peek_char() {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => self.skip_block_comment()?,
                    _ => break,
                },
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        let start = self.state.pos;
        let start_loc = self.cur_position();
        self.state.pos += 2;
        while let Some(ch) = self.current_char() {
            if is_new_line(ch) {
                break;
            }
            self.state.pos += 1;
        }
        let value = self.slice(start + 2, self.state.pos);
        self.push_comment(CommentKind::CommentLine, value, start_loc);
    }

    fn skip_block_comment(&mut self) -> LexResult<()> {
        let start = self.state.pos;
        let start_loc = self.cur_position();
        let end = crate::char_codes::find_comment_end(self.input, start + 2)
            .ok_or_else(|| UNTERMINATED_COMMENT.at(start_loc, &[]))?;
        let mut i = start + 2;
        while i < end {
            let ch = self.input[i];
            i += 1;
            if ch == CARRIAGE_RETURN && self.char_at(i) == Some(LINE_FEED) {
                i += 1;
            }
            if is_new_line(ch) {
                self.state.cur_line += 1;
                self.state.line_start = i as isize;
            }
        }
        self.state.pos = end + 2;
        let value = self.slice(start + 2, end);
        self.push_comment(CommentKind::CommentBlock, value, start_loc);
        Ok(())
    }

    fn push_comment(&mut self, kind: CommentKind, value: String, start: Position) {
        let end = self.cur_position();
        self.state.comments.push(Comment {
            kind,
            value,
            span: Span::new(start, end),
        });
    }

    // ========================================================================
    // Core dispatch
    // ========================================================================

    /// Reads the token starting at the cursor with the base grammar's rules.
    pub fn read_token(&mut self) -> LexResult<()> {
        let Some(ch) = self.current_char() else {
            self.finish_token(TokenKind::EndOfFileToken, TokenValue::None);
            return Ok(());
        };
        let next = self.peek_char();
        match ch {
            '.' => self.read_token_dot(),
            '(' => self.op(TokenKind::OpenParenToken, 1),
            ')' => self.op(TokenKind::CloseParenToken, 1),
            ';' => self.op(TokenKind::SemicolonToken, 1),
            ',' => self.op(TokenKind::CommaToken, 1),
            '[' => self.op(TokenKind::OpenBracketToken, 1),
            ']' => self.op(TokenKind::CloseBracketToken, 1),
            '{' => self.op(TokenKind::OpenBraceToken, 1),
            '}' => self.op(TokenKind::CloseBraceToken, 1),
            ':' => self.op(TokenKind::ColonToken, 1),
            '~' => self.op(TokenKind::TildeToken, 1),
            '@' => self.op(TokenKind::AtToken, 1),
            '?' => {
                self.read_token_question();
                Ok(())
            }
            '`' => self.read_template_token(),
            '0' if matches!(next, Some('x' | 'X')) => self.read_radix_number(16),
            '0' if matches!(next, Some('o' | 'O')) => self.read_radix_number(8),
            '0' if matches!(next, Some('b' | 'B')) => self.read_radix_number(2),
            '0'..='9' => self.read_number(false),
            '"' | '\'' => self.read_string(ch),
            '/' => {
                if next == Some('=') {
                    self.finish_op(TokenKind::SlashEqualsToken, 2);
                } else {
                    self.finish_op(TokenKind::SlashToken, 1);
                }
                Ok(())
            }
            '%' | '*' => {
                self.read_token_mult_modulo(ch);
                Ok(())
            }
            '|' | '&' => {
                self.read_token_pipe_amp(ch);
                Ok(())
            }
            '^' => {
                if next == Some('=') {
                    self.finish_op(TokenKind::CaretEqualsToken, 2);
                } else {
                    self.finish_op(TokenKind::CaretToken, 1);
                }
                Ok(())
            }
            '+' | '-' => {
                self.read_token_plus_min(ch);
                Ok(())
            }
            '<' => {
                self.read_token_lt();
                Ok(())
            }
            '>' => {
                self.read_token_gt();
                Ok(())
            }
            '=' | '!' => {
                self.read_token_eq_excl(ch);
                Ok(())
            }
            '#' if self.state.pos == 0 && next == Some('!') => {
                self.read_interpreter();
                Ok(())
            }
            '#' => self.read_token_number_sign(),
            BACKSLASH => self.read_word(),
            _ if is_identifier_start(ch) => self.read_word(),
            _ => Err(INVALID_CHARACTER.at(self.cur_position(), &[&ch.to_string()])),
        }
    }

    fn read_token_dot(&mut self) -> LexResult<()> {
        match self.peek_char() {
            Some('0'..='9') => self.read_number(true),
            Some('.') if self.char_at(self.state.pos + 2) == Some('.') => {
                self.finish_op(TokenKind::DotDotDotToken, 3);
                Ok(())
            }
            _ => {
                self.finish_op(TokenKind::DotToken, 1);
                Ok(())
            }
        }
    }

    fn read_token_question(&mut self) {
        let next = self.peek_char();
        let after = self.char_at(self.state.pos + 2);
        match next {
            Some('?') if after == Some('=') => {
                self.finish_op(TokenKind::QuestionQuestionEqualsToken, 3)
            }
            Some('?') => self.finish_op(TokenKind::QuestionQuestionToken, 2),
            // `a?.5:b` is a conditional, not an optional chain.
            Some('.') if !matches!(after, Some('0'..='9')) => {
                self.finish_op(TokenKind::QuestionDotToken, 2)
            }
            _ => self.finish_op(TokenKind::QuestionToken, 1),
        }
    }

    fn read_token_mult_modulo(&mut self, ch: char) {
        let mut kind = if ch == '*' {
            TokenKind::AsteriskToken
        } else {
            TokenKind::PercentToken
        };
        let mut width = 1;
        let mut next = self.peek_char();
        if ch == '*' && next == Some('*') {
            width += 1;
            next = self.char_at(self.state.pos + 2);
            kind = TokenKind::AsteriskAsteriskToken;
        }
        if next == Some('=') {
            width += 1;
            kind = match kind {
                TokenKind::AsteriskToken => TokenKind::AsteriskEqualsToken,
                TokenKind::AsteriskAsteriskToken => TokenKind::AsteriskAsteriskEqualsToken,
                _ => TokenKind::PercentEqualsToken,
            };
        }
        self.finish_op(kind, width);
    }

    fn read_token_pipe_amp(&mut self, ch: char) {
        let next = self.peek_char();
        let pipe = ch == '|';
        if next == Some(ch) {
            if self.char_at(self.state.pos + 2) == Some('=') {
                let kind = if pipe {
                    TokenKind::BarBarEqualsToken
                } else {
                    TokenKind::AmpersandAmpersandEqualsToken
                };
                self.finish_op(kind, 3);
            } else {
                let kind = if pipe {
                    TokenKind::BarBarToken
                } else {
                    TokenKind::AmpersandAmpersandToken
                };
                self.finish_op(kind, 2);
            }
        } else if next == Some('=') {
            let kind = if pipe {
                TokenKind::BarEqualsToken
            } else {
                TokenKind::AmpersandEqualsToken
            };
            self.finish_op(kind, 2);
        } else {
            let kind = if pipe {
                TokenKind::BarToken
            } else {
                TokenKind::AmpersandToken
            };
            self.finish_op(kind, 1);
        }
    }

    fn read_token_plus_min(&mut self, ch: char) {
        let plus = ch == '+';
        match self.peek_char() {
            Some(next) if next == ch => {
                let kind = if plus {
                    TokenKind::PlusPlusToken
                } else {
                    TokenKind::MinusMinusToken
                };
                self.finish_op(kind, 2);
            }
            Some('=') => {
                let kind = if plus {
                    TokenKind::PlusEqualsToken
                } else {
                    TokenKind::MinusEqualsToken
                };
                self.finish_op(kind, 2);
            }
            _ => {
                let kind = if plus {
                    TokenKind::PlusToken
                } else {
                    TokenKind::MinusToken
                };
                self.finish_op(kind, 1);
            }
        }
    }

    fn read_token_lt(&mut self) {
        let next = self.peek_char();
        if next == Some('<') {
            if self.char_at(self.state.pos + 2) == Some('=') {
                self.finish_op(TokenKind::LessThanLessThanEqualsToken, 3);
            } else {
                self.finish_op(TokenKind::LessThanLessThanToken, 2);
            }
        } else if next == Some('=') {
            self.finish_op(TokenKind::LessThanEqualsToken, 2);
        } else {
            self.finish_op(TokenKind::LessThanToken, 1);
        }
    }

    fn read_token_gt(&mut self) {
        let pos = self.state.pos;
        let next = self.peek_char();
        if next == Some('>') {
            let size = if self.char_at(pos + 2) == Some('>') { 3 } else { 2 };
            if self.char_at(pos + size) == Some('=') {
                let kind = if size == 3 {
                    TokenKind::GreaterThanGreaterThanGreaterThanEqualsToken
                } else {
                    TokenKind::GreaterThanGreaterThanEqualsToken
                };
                self.finish_op(kind, size + 1);
            } else {
                let kind = if size == 3 {
                    TokenKind::GreaterThanGreaterThanGreaterThanToken
                } else {
                    TokenKind::GreaterThanGreaterThanToken
                };
                self.finish_op(kind, size);
            }
        } else if next == Some('=') {
            self.finish_op(TokenKind::GreaterThanEqualsToken, 2);
        } else {
            self.finish_op(TokenKind::GreaterThanToken, 1);
        }
    }

    fn read_token_eq_excl(&mut self, ch: char) {
        let next = self.peek_char();
        let eq = ch == '=';
        if next == Some('=') {
            let strict = self.char_at(self.state.pos + 2) == Some('=');
            let kind = match (eq, strict) {
                (true, true) => TokenKind::EqualsEqualsEqualsToken,
                (true, false) => TokenKind::EqualsEqualsToken,
                (false, true) => TokenKind::ExclamationEqualsEqualsToken,
                (false, false) => TokenKind::ExclamationEqualsToken,
            };
            self.finish_op(kind, if strict { 3 } else { 2 });
        } else if eq && next == Some('>') {
            self.finish_op(TokenKind::EqualsGreaterThanToken, 2);
        } else if eq {
            self.finish_op(TokenKind::EqualsToken, 1);
        } else {
            self.finish_op(TokenKind::ExclamationToken, 1);
        }
    }

    /// Re-reads the current `<`-prefixed token as a lone `<`.
    pub fn rescan_lt(&mut self) {
        self.state.pos = self.state.start;
        self.finish_op(TokenKind::LessThanToken, 1);
    }

    /// Re-reads a lone `<` or `>` split off inside a type as the full
    /// operator it starts.
    pub fn rescan_lt_gt(&mut self) {
        match self.state.kind {
            TokenKind::LessThanToken => {
                self.state.pos = self.state.start;
                self.read_token_lt();
            }
            TokenKind::GreaterThanToken => {
                self.state.pos = self.state.start;
                self.read_token_gt();
            }
            _ => {}
        }
    }

    fn read_interpreter(&mut self) {
        let start = self.state.pos;
        self.state.pos += 2;
        while let Some(ch) = self.current_char() {
            if is_new_line(ch) {
                break;
            }
            self.state.pos += 1;
        }
        let value = self.slice(start + 2, self.state.pos);
        self.finish_token(TokenKind::InterpreterDirective, TokenValue::Str(value));
    }

    fn read_token_number_sign(&mut self) -> LexResult<()> {
        match self.peek_char() {
            Some(next) if next == BACKSLASH || is_identifier_start(next) => {
                self.state.pos += 1;
                let name = self.read_word1()?;
                self.finish_token(TokenKind::PrivateName, TokenValue::Str(name));
            }
            _ => self.finish_op(TokenKind::HashToken, 1),
        }
        Ok(())
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Reads digits in `radix`. `len` bounds the digit count, and with
    /// `force_len` digits outside the radix count as invalid instead of
    /// ending the run. Returns `None` when nothing valid was read.
    pub(crate) fn read_int(
        &mut self,
        radix: u32,
        len: Option<usize>,
        force_len: bool,
        allow_separator: bool,
    ) -> LexResult<Option<f64>> {
        let start = self.state.pos;
        let limit = len.unwrap_or(usize::MAX);
        let mut total = 0f64;
        let mut invalid = false;
        let mut count = 0;
        while count < limit {
            let Some(ch) = self.current_char() else { break };
            if ch == '_' && allow_separator {
                let prev = if self.state.pos > 0 {
                    self.char_at(self.state.pos - 1)
                } else {
                    None
                };
                let next = self.peek_char();
                let allowed = next.is_some_and(|c| separator_sibling_allowed(radix, c))
                    && !prev.is_some_and(|c| separator_sibling_forbidden(radix, c))
                    && !next.is_some_and(|c| separator_sibling_forbidden(radix, c));
                if !allowed {
                    return Err(UNEXPECTED_NUMERIC_SEPARATOR.at(self.cur_position(), &[]));
                }
                self.state.pos += 1;
                count += 1;
                continue;
            }
            let value = match digit_value(ch) {
                Some(v) if v < radix => v,
                Some(v) if v <= 9 && radix < 10 && !force_len => {
                    let radix = radix.to_string();
                    return Err(INVALID_DIGIT.at(self.cur_position(), &[&radix]));
                }
                _ if force_len => {
                    invalid = true;
                    0
                }
                _ => break,
            };
            self.state.pos += 1;
            count += 1;
            total = total * radix as f64 + value as f64;
        }
        let read = self.state.pos - start;
        if read == 0 || len.is_some_and(|l| read != l) || invalid {
            return Ok(None);
        }
        Ok(Some(total))
    }

    fn read_radix_number(&mut self, radix: u32) -> LexResult<()> {
        let start = self.state.pos;
        self.state.pos += 2;
        let value = self.read_int(radix, None, false, true)?;
        let Some(value) = value else {
            let at = self.state.position_at(start + 2);
            return Err(INVALID_DIGIT.at(at, &[&radix.to_string()]));
        };
        let is_bigint = self.current_char() == Some('n');
        if is_bigint {
            self.state.pos += 1;
        }
        if self.current_char().is_some_and(is_identifier_start) {
            return Err(NUMBER_IDENTIFIER.at(self.cur_position(), &[]));
        }
        if is_bigint {
            let digits: String = self.input[start..self.state.pos]
                .iter()
                .filter(|&&c| c != '_' && c != 'n')
                .collect();
            self.finish_token(TokenKind::BigIntLiteral, TokenValue::BigInt(digits));
        } else {
            self.finish_token(TokenKind::NumericLiteral, TokenValue::Num(value));
        }
        Ok(())
    }

    fn read_number(&mut self, starts_with_dot: bool) -> LexResult<()> {
        let start = self.state.pos;
        let start_loc = self.cur_position();
        let mut is_float = false;
        let mut is_octal = false;

        if !starts_with_dot && self.read_int(10, None, false, true)?.is_none() {
            return Err(INVALID_NUMBER.at(self.cur_position(), &[]));
        }
        let has_leading_zero = self.state.pos - start >= 2 && self.input[start] == '0';
        if has_leading_zero {
            let integer = &self.input[start..self.state.pos];
            self.record_strict_error(&STRICT_OCTAL_LITERAL, start_loc)?;
            if let Some(offset) = integer.iter().position(|&c| c == '_') {
                return Err(UNEXPECTED_NUMERIC_SEPARATOR.at(self.state.position_at(start + offset), &[]));
            }
            is_octal = !integer.iter().any(|&c| c == '8' || c == '9');
        }

        let mut next = self.current_char();
        if next == Some('.') && !is_octal {
            self.state.pos += 1;
            self.read_int(10, None, false, true)?;
            is_float = true;
            next = self.current_char();
        }
        if matches!(next, Some('e' | 'E')) && !is_octal {
            self.state.pos += 1;
            if matches!(self.current_char(), Some('+' | '-')) {
                self.state.pos += 1;
            }
            if self.read_int(10, None, false, true)?.is_none() {
                return Err(INVALID_OR_MISSING_EXPONENT.at(start_loc, &[]));
            }
            is_float = true;
            next = self.current_char();
        }
        let mut is_bigint = false;
        if next == Some('n') {
            if is_float || has_leading_zero {
                return Err(INVALID_BIGINT_LITERAL.at(start_loc, &[]));
            }
            self.state.pos += 1;
            is_bigint = true;
        }
        if self.current_char().is_some_and(is_identifier_start) {
            return Err(NUMBER_IDENTIFIER.at(self.cur_position(), &[]));
        }

        let text: String = self.input[start..self.state.pos]
            .iter()
            .filter(|&&c| c != '_' && c != 'n')
            .collect();
        if is_bigint {
            self.finish_token(TokenKind::BigIntLiteral, TokenValue::BigInt(text));
            return Ok(());
        }
        let value = if is_octal {
            text.chars()
                .filter_map(digit_value)
                .fold(0f64, |acc, d| acc * 8.0 + d as f64)
        } else {
            text.parse::<f64>()
                .map_err(|_| INVALID_NUMBER.at(start_loc, &[]))?
        };
        self.finish_token(TokenKind::NumericLiteral, TokenValue::Num(value));
        Ok(())
    }

    // ========================================================================
    // Strings and escapes
    // ========================================================================

    fn read_string(&mut self, quote: char) -> LexResult<()> {
        let mut out = String::new();
        self.state.pos += 1;
        let mut chunk_start = self.state.pos;
        loop {
            let Some(ch) = self.current_char() else {
                return Err(UNTERMINATED_STRING.at(self.state.start_loc, &[]));
            };
            if ch == quote {
                break;
            }
            if ch == BACKSLASH {
                out.push_str(&self.slice(chunk_start, self.state.pos));
                if let Some(escaped) = self.read_escaped_char(false)? {
                    out.push_str(&escaped);
                }
                chunk_start = self.state.pos;
            } else if ch == '\u{2028}' || ch == '\u{2029}' {
                self.state.pos += 1;
                self.new_line();
            } else if is_new_line(ch) {
                return Err(UNTERMINATED_STRING.at(self.state.start_loc, &[]));
            } else {
                self.state.pos += 1;
            }
        }
        out.push_str(&self.slice(chunk_start, self.state.pos));
        self.state.pos += 1;
        self.finish_token(TokenKind::StringLiteral, TokenValue::Str(out));
        Ok(())
    }

    /// Reads the escape sequence at the cursor (a backslash). `None` means
    /// the escape is invalid inside a template, where that is not an error
    /// until the template turns out to be untagged.
    fn read_escaped_char(&mut self, in_template: bool) -> LexResult<Option<String>> {
        let throw_on_invalid = !in_template;
        self.state.pos += 1;
        let Some(ch) = self.current_char() else {
            return Ok(Some(String::new()));
        };
        self.state.pos += 1;
        let simple = match ch {
            'n' => "\n",
            'r' => "\r",
            't' => "\t",
            'b' => "\u{8}",
            'v' => "\u{B}",
            'f' => "\u{C}",
            'x' => {
                let code = self.read_hex_char(2, false, throw_on_invalid)?;
                return Ok(code.and_then(char::from_u32).map(String::from));
            }
            'u' => {
                let code = self.read_code_point(throw_on_invalid)?;
                return Ok(code.map(code_point_to_string));
            }
            CARRIAGE_RETURN | LINE_FEED | '\u{2028}' | '\u{2029}' => {
                if ch == CARRIAGE_RETURN && self.current_char() == Some(LINE_FEED) {
                    self.state.pos += 1;
                }
                self.new_line();
                ""
            }
            '8' | '9' => {
                if in_template {
                    return Ok(None);
                }
                let at = self.state.position_at(self.state.pos - 1);
                self.record_strict_error(&STRICT_NUMERIC_ESCAPE, at)?;
                return Ok(Some(ch.to_string()));
            }
            '0'..='7' => return self.read_legacy_octal_escape(ch, in_template),
            _ => return Ok(Some(ch.to_string())),
        };
        Ok(Some(simple.to_string()))
    }

    fn read_legacy_octal_escape(&mut self, first: char, in_template: bool) -> LexResult<Option<String>> {
        let code_pos = self.state.pos - 1;
        let mut digits: Vec<u32> = vec![first as u32 - '0' as u32];
        while digits.len() < 3 {
            match self.char_at(code_pos + digits.len()) {
                Some(c @ '0'..='7') => digits.push(c as u32 - '0' as u32),
                _ => break,
            }
        }
        let mut octal = digits.iter().fold(0, |acc, d| acc * 8 + d);
        if octal > 255 {
            digits.pop();
            octal = digits.iter().fold(0, |acc, d| acc * 8 + d);
        }
        self.state.pos += digits.len() - 1;
        let next = self.current_char();
        if octal != 0 || digits.len() > 1 || matches!(next, Some('8' | '9')) {
            if in_template {
                return Ok(None);
            }
            let at = self.state.position_at(code_pos);
            self.record_strict_error(&STRICT_NUMERIC_ESCAPE, at)?;
        }
        Ok(char::from_u32(octal).map(String::from))
    }

    fn read_hex_char(&mut self, len: usize, force_len: bool, throw_on_invalid: bool) -> LexResult<Option<u32>> {
        let code_pos = self.state.pos;
        let value = self.read_int(16, Some(len), force_len, false)?;
        match value {
            Some(v) => Ok(Some(v as u32)),
            None => {
                if throw_on_invalid {
                    return Err(INVALID_ESCAPE_SEQUENCE.at(self.state.position_at(code_pos), &[]));
                }
                self.state.pos = code_pos - 1;
                Ok(None)
            }
        }
    }

    fn read_code_point(&mut self, throw_on_invalid: bool) -> LexResult<Option<u32>> {
        if self.current_char() != Some('{') {
            return self.read_hex_char(4, false, throw_on_invalid);
        }
        self.state.pos += 1;
        let code_pos = self.state.pos;
        let len = self.input[code_pos..]
            .iter()
            .position(|&c| c == '}')
            .unwrap_or(0);
        let code = self.read_hex_char(len, true, throw_on_invalid)?;
        self.state.pos += 1;
        match code {
            Some(c) if c > 0x10FFFF => {
                if throw_on_invalid {
                    return Err(INVALID_CODE_POINT.at(self.state.position_at(code_pos), &[]));
                }
                Ok(None)
            }
            other => Ok(other),
        }
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Reads a template chunk starting at the cursor, which sits on the
    /// opening backquote or on the `}` that ends a substitution.
    pub fn read_template_token(&mut self) -> LexResult<()> {
        self.state.pos += 1;
        let mut raw = String::new();
        let mut cooked = String::new();
        let mut first_invalid: Option<Position> = None;
        let mut chunk_start = self.state.pos;

        loop {
            let Some(ch) = self.current_char() else {
                let at = self.state.start_loc.with_column_offset(1);
                return Err(UNTERMINATED_TEMPLATE.at(at, &[]));
            };
            match ch {
                '`' => {
                    let chunk = self.slice(chunk_start, self.state.pos);
                    raw.push_str(&chunk);
                    cooked.push_str(&chunk);
                    self.state.pos += 1;
                    self.finish_template(TokenKind::TemplateTail, raw, cooked, first_invalid);
                    return Ok(());
                }
                '$' if self.peek_char() == Some('{') => {
                    let chunk = self.slice(chunk_start, self.state.pos);
                    raw.push_str(&chunk);
                    cooked.push_str(&chunk);
                    self.state.pos += 2;
                    self.finish_template(TokenKind::TemplateNonTail, raw, cooked, first_invalid);
                    return Ok(());
                }
                BACKSLASH => {
                    let chunk = self.slice(chunk_start, self.state.pos);
                    cooked.push_str(&chunk);
                    let escape_start = self.state.pos;
                    let escape_loc = self.cur_position();
                    let escaped = self.read_escaped_char(true)?;
                    match escaped {
                        Some(text) => cooked.push_str(&text),
                        None => {
                            first_invalid.get_or_insert(escape_loc);
                        }
                    }
                    raw.push_str(&chunk);
                    raw.push_str(&normalize_line_endings(&self.input[escape_start..self.state.pos]));
                    chunk_start = self.state.pos;
                }
                CARRIAGE_RETURN | LINE_FEED | '\u{2028}' | '\u{2029}' => {
                    let chunk = self.slice(chunk_start, self.state.pos);
                    raw.push_str(&chunk);
                    cooked.push_str(&chunk);
                    self.state.pos += 1;
                    if ch == CARRIAGE_RETURN && self.current_char() == Some(LINE_FEED) {
                        self.state.pos += 1;
                    }
                    let normalized = if ch == CARRIAGE_RETURN { LINE_FEED } else { ch };
                    raw.push(normalized);
                    cooked.push(normalized);
                    self.new_line();
                    chunk_start = self.state.pos;
                }
                _ => self.state.pos += 1,
            }
        }
    }

    fn finish_template(
        &mut self,
        kind: TokenKind,
        raw: String,
        cooked: String,
        first_invalid: Option<Position>,
    ) {
        self.state.first_invalid_template_escape = first_invalid;
        let cooked = if first_invalid.is_some() { None } else { Some(cooked) };
        self.finish_token(kind, TokenValue::Template { raw, cooked });
    }

    /// Continues a template after a substitution. The current token must be
    /// the `}` that closes it.
    pub fn read_template_continuation(&mut self) -> LexResult<()> {
        self.state.pos = self.state.start;
        self.read_template_token()
    }

    // ========================================================================
    // Regular expressions
    // ========================================================================

    /// Re-reads the current `/` or `/=` token as a regular expression.
    pub fn read_regexp(&mut self) -> LexResult<()> {
        let start_loc = self.state.start_loc;
        let content_start = self.state.start + 1;
        let mut pos = self.state.pos;
        let mut escaped = false;
        let mut in_class = false;
        loop {
            let Some(ch) = self.char_at(pos) else {
                return Err(UNTERMINATED_REGEXP.at(start_loc.with_column_offset(1), &[]));
            };
            if is_new_line(ch) {
                return Err(UNTERMINATED_REGEXP.at(start_loc.with_column_offset(1), &[]));
            }
            if escaped {
                escaped = false;
            } else {
                match ch {
                    '[' => in_class = true,
                    ']' if in_class => in_class = false,
                    '/' if !in_class => break,
                    _ => {}
                }
                escaped = ch == BACKSLASH;
            }
            pos += 1;
        }
        let pattern = self.slice(content_start, pos);
        pos += 1;

        let mut flags = String::new();
        while let Some(ch) = self.char_at(pos) {
            if REGEXP_FLAGS.contains(&ch) {
                let flag_loc = start_loc.with_column_offset((pos - self.state.start) as u32 + 1);
                let clashes = (ch == 'u' && flags.contains('v')) || (ch == 'v' && flags.contains('u'));
                if clashes {
                    return Err(MALFORMED_REGEXP_FLAGS.at(flag_loc, &[]));
                }
                if flags.contains(ch) {
                    return Err(DUPLICATE_REGEXP_FLAGS.at(flag_loc, &[]));
                }
            } else if is_identifier_char(ch) || ch == BACKSLASH {
                let flag_loc = start_loc.with_column_offset((pos - self.state.start) as u32 + 1);
                return Err(MALFORMED_REGEXP_FLAGS.at(flag_loc, &[]));
            } else {
                break;
            }
            flags.push(ch);
            pos += 1;
        }
        self.state.pos = pos;
        self.finish_token(
            TokenKind::RegularExpressionLiteral,
            TokenValue::RegExp { pattern, flags },
        );
        Ok(())
    }

    // ========================================================================
    // Identifiers and keywords
    // ========================================================================

    /// Reads an identifier name at the cursor, decoding `\u` escapes.
    pub fn read_word1(&mut self) -> LexResult<String> {
        self.state.contains_esc = false;
        let mut word = String::new();
        let start = self.state.pos;
        let mut chunk_start = self.state.pos;
        while let Some(ch) = self.current_char() {
            if is_identifier_char(ch) {
                self.state.pos += 1;
            } else if ch == BACKSLASH {
                self.state.contains_esc = true;
                word.push_str(&self.slice(chunk_start, self.state.pos));
                let esc_start = self.cur_position();
                let at_start = self.state.pos == start;
                self.state.pos += 1;
                if self.current_char() != Some('u') {
                    return Err(MISSING_UNICODE_ESCAPE.at(self.cur_position(), &[]));
                }
                self.state.pos += 1;
                if let Some(code) = self.read_code_point(true)? {
                    let valid = char::from_u32(code).is_some_and(|c| {
                        if at_start {
                            is_identifier_start(c)
                        } else {
                            is_identifier_char(c)
                        }
                    });
                    if !valid {
                        return Err(ESCAPED_CHAR_NOT_AN_IDENTIFIER.at(esc_start, &[]));
                    }
                    word.push_str(&code_point_to_string(code));
                }
                chunk_start = self.state.pos;
            } else {
                break;
            }
        }
        word.push_str(&self.slice(chunk_start, self.state.pos));
        Ok(word)
    }

    /// Reads an identifier or reserved word. Escaped reserved words keep
    /// their keyword kind and set `contains_esc`; the grammar rejects them.
    fn read_word(&mut self) -> LexResult<()> {
        let word = self.read_word1()?;
        let kind = TokenKind::from_keyword(&word).unwrap_or(TokenKind::Identifier);
        self.finish_token(kind, TokenValue::Str(word));
        Ok(())
    }
}

fn separator_sibling_allowed(radix: u32, ch: char) -> bool {
    match radix {
        2 => matches!(ch, '0' | '1'),
        8 => matches!(ch, '0'..='7'),
        16 => ch.is_ascii_hexdigit(),
        _ => ch.is_ascii_digit(),
    }
}

fn separator_sibling_forbidden(radix: u32, ch: char) -> bool {
    if radix == 16 {
        matches!(ch, '.' | 'X' | '_' | 'x')
    } else {
        matches!(ch, '.' | 'B' | 'E' | 'O' | '_' | 'b' | 'e' | 'o')
    }
}

fn code_point_to_string(code: u32) -> String {
    // Lone surrogates cannot live in a Rust string.
    char::from_u32(code)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

fn normalize_line_endings(text: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut iter = text.iter().peekable();
    while let Some(&ch) = iter.next() {
        if ch == CARRIAGE_RETURN {
            if iter.peek() == Some(&&LINE_FEED) {
                iter.next();
            }
            out.push(LINE_FEED);
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_one(source: &str) -> LexResult<(TokenKind, TokenValue)> {
        let chars: Vec<char> = source.chars().collect();
        let mut state = TokenizerState::new(1, 0);
        let mut errors = ErrorList::new();
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.skip_space()?;
        if lexer.begin_token() {
            lexer.read_token()?;
        }
        Ok((state.kind, state.value.clone()))
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(lex_one("0x1F").unwrap().1, TokenValue::Num(31.0));
        assert_eq!(lex_one("0b101").unwrap().1, TokenValue::Num(5.0));
        assert_eq!(lex_one("1_000").unwrap().1, TokenValue::Num(1000.0));
        assert_eq!(lex_one(".5e1").unwrap().1, TokenValue::Num(5.0));
        assert_eq!(lex_one("017").unwrap().1, TokenValue::Num(15.0));
        assert_eq!(lex_one("019").unwrap().1, TokenValue::Num(19.0));
        assert_eq!(
            lex_one("10n").unwrap(),
            (TokenKind::BigIntLiteral, TokenValue::BigInt("10".into()))
        );
    }

    #[test]
    fn test_bad_numbers() {
        assert!(lex_one("1__0").unwrap_err().is(&UNEXPECTED_NUMERIC_SEPARATOR));
        assert!(lex_one("3in x").unwrap_err().is(&NUMBER_IDENTIFIER));
        assert!(lex_one("1.5n").unwrap_err().is(&INVALID_BIGINT_LITERAL));
        assert!(lex_one("0b2").unwrap_err().is(&INVALID_DIGIT));
        assert!(lex_one("1e").unwrap_err().is(&INVALID_OR_MISSING_EXPONENT));
    }

    #[test]
    fn test_string_escapes() {
        let (_, value) = lex_one(r#""a\x41\u{1F600}B\n""#).unwrap();
        assert_eq!(value, TokenValue::Str("aA\u{1F600}B\n".into()));
        let (_, value) = lex_one("'line\\\ncontinued'").unwrap();
        assert_eq!(value, TokenValue::Str("linecontinued".into()));
    }

    #[test]
    fn test_legacy_octal_escape_is_deferred() {
        let chars: Vec<char> = r#""\101""#.chars().collect();
        let mut state = TokenizerState::new(1, 0);
        let mut errors = ErrorList::new();
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.begin_token();
        lexer.read_token().unwrap();
        assert_eq!(state.value, TokenValue::Str("A".into()));
        assert_eq!(state.strict_errors.len(), 1);
        assert!(state.strict_errors[0].is(&STRICT_NUMERIC_ESCAPE));
    }

    #[test]
    fn test_unterminated_string_points_at_quote() {
        let err = lex_one("  \"abc").unwrap_err();
        assert!(err.is(&UNTERMINATED_STRING));
        assert_eq!(err.pos(), 2);
    }

    #[test]
    fn test_escaped_keyword_keeps_kind() {
        let chars: Vec<char> = "\\u0069f".chars().collect();
        let mut state = TokenizerState::new(1, 0);
        let mut errors = ErrorList::new();
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.begin_token();
        lexer.read_token().unwrap();
        assert_eq!(state.kind, TokenKind::IfKeyword);
        assert!(state.contains_esc);
    }

    #[test]
    fn test_template_chunks() {
        let (kind, value) = lex_one("`a${").unwrap();
        assert_eq!(kind, TokenKind::TemplateNonTail);
        assert_eq!(
            value,
            TokenValue::Template {
                raw: "a".into(),
                cooked: Some("a".into())
            }
        );
        let (kind, value) = lex_one("`\\unicode`").unwrap();
        assert_eq!(kind, TokenKind::TemplateTail);
        assert_eq!(
            value,
            TokenValue::Template {
                raw: "\\unicode".into(),
                cooked: None
            }
        );
    }

    #[test]
    fn test_private_name_and_hash() {
        assert_eq!(
            lex_one("#x").unwrap(),
            (TokenKind::PrivateName, TokenValue::Str("x".into()))
        );
        assert_eq!(lex_one("# x").unwrap().0, TokenKind::HashToken);
        assert_eq!(
            lex_one("#!/usr/bin/env node").unwrap(),
            (
                TokenKind::InterpreterDirective,
                TokenValue::Str("/usr/bin/env node".into())
            )
        );
    }

    #[test]
    fn test_question_variants() {
        assert_eq!(lex_one("?.x").unwrap().0, TokenKind::QuestionDotToken);
        assert_eq!(lex_one("?.5").unwrap().0, TokenKind::QuestionToken);
        assert_eq!(lex_one("??=").unwrap().0, TokenKind::QuestionQuestionEqualsToken);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = lex_one("  /* open").unwrap_err();
        assert!(err.is(&UNTERMINATED_COMMENT));
        assert_eq!(err.pos(), 2);
    }
}
