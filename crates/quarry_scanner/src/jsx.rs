//! JSX reads: text children, tag names, attribute strings and entities.

use crate::char_codes::{is_identifier_char, is_new_line, CARRIAGE_RETURN, LINE_FEED};
use crate::lexer::{LexResult, Lexer};
use crate::xhtml::xhtml_entity;
use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_diagnostics::messages::{JSX_UNEXPECTED_TOKEN, UNTERMINATED_JSX_CONTENT, UNTERMINATED_STRING};

/// Longest entity name probed before giving up on a `;`.
const MAX_ENTITY_LENGTH: usize = 10;

impl<'a> Lexer<'a> {
    /// Reads a token between an opening and a closing tag: a run of text,
    /// or the `<` / `{` that ends it.
    pub fn jsx_read_token(&mut self) -> LexResult<()> {
        let mut out = String::new();
        let mut chunk_start = self.state.pos;
        loop {
            let Some(ch) = self.current_char() else {
                return Err(UNTERMINATED_JSX_CONTENT.at(self.state.start_loc, &[]));
            };
            match ch {
                '<' | '{' => {
                    if self.state.pos == self.state.start {
                        if ch == '<' && self.state.can_start_jsx_element {
                            self.finish_op(TokenKind::JsxTagStart, 1);
                            return Ok(());
                        }
                        return self.read_token();
                    }
                    out.push_str(&self.slice(chunk_start, self.state.pos));
                    self.finish_token(TokenKind::JsxText, TokenValue::Str(out));
                    return Ok(());
                }
                '&' => {
                    out.push_str(&self.slice(chunk_start, self.state.pos));
                    out.push_str(&self.jsx_read_entity());
                    chunk_start = self.state.pos;
                }
                '>' | '}' => {
                    let entity = if ch == '}' { "&rbrace;" } else { "&gt;" };
                    let text = ch.to_string();
                    let at = self.cur_position();
                    self.raise(&JSX_UNEXPECTED_TOKEN, at, &[&text, entity])?;
                    self.state.pos += 1;
                }
                _ if is_new_line(ch) => {
                    out.push_str(&self.slice(chunk_start, self.state.pos));
                    out.push_str(&self.jsx_read_new_line(true));
                    chunk_start = self.state.pos;
                }
                _ => self.state.pos += 1,
            }
        }
    }

    /// Consumes one line terminator, returning the text it contributes.
    fn jsx_read_new_line(&mut self, normalize_crlf: bool) -> String {
        let ch = self.current_char().unwrap_or(LINE_FEED);
        self.state.pos += 1;
        let out = if ch == CARRIAGE_RETURN && self.current_char() == Some(LINE_FEED) {
            self.state.pos += 1;
            if normalize_crlf { "\n" } else { "\r\n" }.to_string()
        } else {
            ch.to_string()
        };
        self.new_line();
        out
    }

    /// Reads a quoted attribute value. Backslashes are not escapes here.
    pub fn jsx_read_string(&mut self, quote: char) -> LexResult<()> {
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
            if ch == '&' {
                out.push_str(&self.slice(chunk_start, self.state.pos));
                out.push_str(&self.jsx_read_entity());
                chunk_start = self.state.pos;
            } else if is_new_line(ch) {
                out.push_str(&self.slice(chunk_start, self.state.pos));
                out.push_str(&self.jsx_read_new_line(false));
                chunk_start = self.state.pos;
            } else {
                self.state.pos += 1;
            }
        }
        out.push_str(&self.slice(chunk_start, self.state.pos));
        self.state.pos += 1;
        self.finish_token(TokenKind::StringLiteral, TokenValue::Str(out));
        Ok(())
    }

    /// Decodes the character reference at the cursor (an `&`). Anything that
    /// is not a complete reference decodes to a literal `&`.
    fn jsx_read_entity(&mut self) -> String {
        self.state.pos += 1;
        let start = self.state.pos;
        if self.current_char() == Some('#') {
            self.state.pos += 1;
            let mut radix = 10;
            if self.current_char() == Some('x') {
                radix = 16;
                self.state.pos += 1;
            }
            if let Ok(Some(code)) = self.read_int(radix, None, false, false) {
                if self.current_char() == Some(';') {
                    if let Some(ch) = char::from_u32(code as u32) {
                        self.state.pos += 1;
                        return ch.to_string();
                    }
                }
            }
        } else {
            let mut count = 0;
            while count < MAX_ENTITY_LENGTH {
                match self.current_char() {
                    Some(';') => {
                        let name = self.slice(start, self.state.pos);
                        if let Some(ch) = xhtml_entity(&name) {
                            self.state.pos += 1;
                            return ch.to_string();
                        }
                        break;
                    }
                    Some(_) => self.state.pos += 1,
                    None => break,
                }
                count += 1;
            }
        }
        self.state.pos = start;
        "&".to_string()
    }

    /// Reads a tag or attribute name. Dashes are allowed.
    pub fn jsx_read_word(&mut self) {
        let start = self.state.pos;
        self.state.pos += 1;
        while let Some(ch) = self.current_char() {
            if is_identifier_char(ch) || ch == '-' {
                self.state.pos += 1;
            } else {
                break;
            }
        }
        let name = self.slice(start, self.state.pos);
        self.finish_token(TokenKind::JsxName, TokenValue::Str(name));
    }
}

#[cfg(test)]
mod tests {
    use crate::context::TokContext;
    use crate::lexer::Lexer;
    use crate::state::TokenizerState;
    use quarry_ast::token_kind::{TokenKind, TokenValue};
    use quarry_diagnostics::ErrorList;

    fn read_child(source: &str) -> (TokenKind, TokenValue) {
        let chars: Vec<char> = source.chars().collect();
        let mut state = TokenizerState::new(1, 0);
        state.context.push(TokContext::JsxChild);
        let mut errors = ErrorList::new();
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, true, false);
        lexer.begin_token();
        lexer.jsx_read_token().unwrap();
        (state.kind, state.value.clone())
    }

    #[test]
    fn test_text_stops_at_tag() {
        assert_eq!(
            read_child("hello </a>"),
            (TokenKind::JsxText, TokenValue::Str("hello ".into()))
        );
    }

    #[test]
    fn test_entities_decode() {
        let (_, value) = read_child("a &amp; &#65;&#x42; &bogus; <b/>");
        assert_eq!(value, TokenValue::Str("a & AB &bogus; ".into()));
    }

    #[test]
    fn test_tag_start_at_token_start() {
        assert_eq!(read_child("<b/>").0, TokenKind::JsxTagStart);
        assert_eq!(read_child("{x}").0, TokenKind::OpenBraceToken);
    }

    #[test]
    fn test_stray_gt_is_recorded() {
        let chars: Vec<char> = "a > b<".chars().collect();
        let mut state = TokenizerState::new(1, 0);
        let mut errors = ErrorList::new();
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, true, false);
        lexer.begin_token();
        lexer.jsx_read_token().unwrap();
        assert_eq!(state.value, TokenValue::Str("a > b".into()));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_word_allows_dashes() {
        let chars: Vec<char> = "data-id=".chars().collect();
        let mut state = TokenizerState::new(1, 0);
        let mut errors = ErrorList::new();
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.begin_token();
        lexer.jsx_read_word();
        assert_eq!(state.kind, TokenKind::JsxName);
        assert_eq!(state.value, TokenValue::Str("data-id".into()));
    }
}
