//! quarry_scanner: the tokenizer layer of the parser.
//!
//! Provides:
//! - `TokContext` and the context stack that selects lexical modes
//! - `TokenizerState`, the cloneable micro-state embedded in the parser state
//! - `Lexer`, the raw reads for the base language and for JSX
//! - the XHTML entity table used by JSX text
//!
//! Mode selection lives in the grammar. `tokenize` is a standalone driver for
//! plain script text that uses the base rules only.

pub mod char_codes;
pub mod context;
mod jsx;
pub mod lexer;
pub mod state;
pub mod xhtml;

pub use context::{ContextStack, TokContext};
pub use lexer::{LexResult, Lexer};
pub use state::{LookaheadToken, TokenSnapshot, TokenizerState};

use quarry_ast::token_kind::{Token, TokenKind};
use quarry_diagnostics::ErrorList;

/// Tokenizes `source` without a grammar. A `/` is read as a regular
/// expression when the previous token allows an expression to follow, and
/// template substitutions are tracked with a brace depth.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut state = TokenizerState::new(1, 0);
    let mut errors = ErrorList::new();
    let mut tokens = Vec::new();
    let mut template_depths: Vec<usize> = Vec::new();
    let mut brace_depth = 0usize;
    let mut prev = TokenKind::SemicolonToken;

    loop {
        let mut lexer = Lexer::new(&chars, &mut state, &mut errors, false, false);
        lexer.skip_space()?;
        if !lexer.begin_token() {
            break;
        }
        lexer.read_token()?;
        match lexer.state.kind {
            TokenKind::SlashToken | TokenKind::SlashEqualsToken if prev.comes_before_expression() => {
                lexer.read_regexp()?;
            }
            TokenKind::OpenBraceToken => brace_depth += 1,
            TokenKind::CloseBraceToken => {
                if template_depths.last() == Some(&brace_depth) {
                    template_depths.pop();
                    lexer.read_template_continuation()?;
                } else {
                    brace_depth = brace_depth.saturating_sub(1);
                }
            }
            _ => {}
        }
        if lexer.state.kind == TokenKind::TemplateNonTail {
            template_depths.push(brace_depth);
        }
        prev = state.kind;
        tokens.push(Token::new(
            state.kind,
            state.value.clone(),
            state.start_loc,
            state.end_loc,
        ));
    }
    Ok(tokens)
}
