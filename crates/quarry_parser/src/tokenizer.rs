//! Parser-driven tokenizer entry points.
//!
//! Most tokens come straight from the lexer. Templates and regular
//! expressions depend on the grammar position, so the parser asks for them
//! to be re-read when it knows what it is looking at.

use quarry_ast::token_kind::TokenKind;
use quarry_diagnostics::messages::INVALID_CODE_POINT_IN_TAGLESS_TEMPLATE;

use crate::parser::Parser;
use crate::PResult;

impl Parser<'_> {
    pub(crate) fn base_get_token_from_code(&mut self, _ch: char) -> PResult<()> {
        self.lexer().read_token()
    }

    /// The base language keeps no lexical context beyond the bottom brace.
    pub(crate) fn base_update_context(&mut self, _prev: TokenKind) {}

    /// Re-reads the current `/` or `/=` as a regular expression literal.
    pub(crate) fn read_regexp(&mut self) -> PResult<()> {
        tracing::trace!(at = self.state.tok.start, "rescanning slash as regexp");
        self.lexer().read_regexp()
    }

    /// Re-reads the `}` that closes a template substitution as the next
    /// template chunk.
    pub(crate) fn read_template_continuation(&mut self) -> PResult<()> {
        if !self.is(TokenKind::CloseBraceToken) {
            return Err(self.unexpected(Some(TokenKind::CloseBraceToken)));
        }
        self.lexer().read_template_continuation()
    }

    /// Invalid escapes are allowed in tagged templates only.
    pub(crate) fn check_template_escape(&mut self, tagged: bool) -> PResult<()> {
        if tagged {
            return Ok(());
        }
        if let Some(at) = self.state.tok.first_invalid_template_escape {
            self.raise(&INVALID_CODE_POINT_IN_TAGLESS_TEMPLATE, at, &[])?;
        }
        Ok(())
    }

    /// Undoes the single-character `<`/`>` split once a type has ended.
    pub(crate) fn rescan_lt_gt(&mut self) {
        self.lexer().rescan_lt_gt();
    }

    /// Splits a `<<` or `<=` so a type argument list can open on it.
    pub(crate) fn rescan_lt(&mut self) {
        self.lexer().rescan_lt();
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use crate::parser::Parser;
    use quarry_ast::token_kind::{TokenKind, TokenValue};

    #[test]
    fn test_regexp_rescan() {
        let chars: Vec<char> = "/a[/]b/gi;".chars().collect();
        let options = ParserOptions::default();
        let plugins = options.plugin_set().unwrap();
        let mut p = Parser::new(&chars, &options, plugins, false);
        p.next_token().unwrap();
        assert!(p.is(TokenKind::SlashToken));
        p.read_regexp().unwrap();
        assert_eq!(
            p.state.tok.value,
            TokenValue::RegExp {
                pattern: "a[/]b".into(),
                flags: "gi".into()
            }
        );
        p.next().unwrap();
        assert!(p.is(TokenKind::SemicolonToken));
    }
}
