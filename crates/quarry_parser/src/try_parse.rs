//! Speculative parsing.
//!
//! Ambiguous constructs (a `<` that may open JSX or type parameters, a `(`
//! that may start an arrow) are settled by parsing one reading and rolling
//! back if it fails. Every attempt runs on the live [`State`]; a clone taken
//! beforehand is put back unless the attempt succeeds cleanly, so nothing a
//! failed attempt did (tokens read, errors recorded, names declared,
//! contexts pushed) survives it.

use quarry_diagnostics::ParseError;

use crate::parser::Parser;
use crate::state::State;
use crate::PResult;

/// How a speculative parse ended.
#[derive(Debug)]
pub enum TryParse<T> {
    /// Completed without recording errors; the state was kept.
    Success(T),
    /// Completed but recorded recoverable errors. The state was rolled
    /// back; a caller that accepts the result installs `fail_state`.
    Recovered {
        node: T,
        error: ParseError,
        fail_state: Box<State>,
    },
    /// Stopped on purpose, optionally with a partial result. The state was
    /// rolled back.
    Aborted {
        node: Option<T>,
        fail_state: Box<State>,
    },
    /// Failed with a fatal error. The state was rolled back.
    Thrown {
        error: ParseError,
        fail_state: Box<State>,
    },
}

impl<T> TryParse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, TryParse::Success(_))
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            TryParse::Success(_) => "success",
            TryParse::Recovered { .. } => "recovered",
            TryParse::Aborted { .. } => "aborted",
            TryParse::Thrown { .. } => "thrown",
        }
    }

    /// The error that ended the attempt, if any.
    pub fn error(&self) -> Option<&ParseError> {
        match self {
            TryParse::Recovered { error, .. } | TryParse::Thrown { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Why an attempt stopped early.
#[derive(Debug)]
pub(crate) enum Interrupt<T> {
    Error(ParseError),
    Abort(Option<T>),
}

impl<T> From<ParseError> for Interrupt<T> {
    fn from(error: ParseError) -> Self {
        Interrupt::Error(error)
    }
}

impl Parser<'_> {
    /// Runs `f` speculatively. See [`TryParse`] for what each outcome
    /// leaves behind.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Interrupt<T>>,
    ) -> TryParse<T> {
        let old_state = self.state.clone();
        let start = self.state.tok.start;
        let result = f(self);
        let outcome = match result {
            Ok(node) if self.state.errors.len() > old_state.errors.len() => {
                let fail_state = std::mem::replace(&mut self.state, old_state);
                let error = fail_state.errors.errors()[self.state.errors.len()].clone();
                TryParse::Recovered {
                    node,
                    error,
                    fail_state: Box::new(fail_state),
                }
            }
            Ok(node) => TryParse::Success(node),
            Err(Interrupt::Error(error)) => {
                let fail_state = std::mem::replace(&mut self.state, old_state);
                TryParse::Thrown {
                    error,
                    fail_state: Box::new(fail_state),
                }
            }
            Err(Interrupt::Abort(node)) => {
                let fail_state = std::mem::replace(&mut self.state, old_state);
                TryParse::Aborted {
                    node,
                    fail_state: Box::new(fail_state),
                }
            }
        };
        tracing::debug!(at = start, outcome = outcome.outcome(), "speculative parse");
        outcome
    }

    /// Commits the state an accepted [`TryParse::Recovered`] attempt left.
    pub(crate) fn accept_state(&mut self, fail_state: Box<State>) {
        self.state = *fail_state;
    }

    /// Runs `f` and keeps what it did only if it produced something.
    pub(crate) fn try_parse_or_rewind<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<Option<T>>,
    ) -> PResult<Option<T>> {
        let old_state = self.state.clone();
        let result = f(self)?;
        if result.is_none() {
            self.state = old_state;
        }
        Ok(result)
    }

    /// Evaluates a predicate over the upcoming tokens and rewinds. A
    /// predicate that fails to tokenize answers `false`.
    pub(crate) fn look_ahead_is(&mut self, f: impl FnOnce(&mut Self) -> PResult<bool>) -> bool {
        let old_state = self.state.clone();
        let result = f(self);
        self.state = old_state;
        result.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use quarry_ast::token_kind::TokenKind;
    use quarry_diagnostics::messages::{MISSING_SEMICOLON, UNEXPECTED_TOKEN};
    use quarry_scanner::TokContext;
    use quarry_scope::{BindingFlags, ScopeFlags};

    fn parser<'a>(chars: &'a [char], options: &'a ParserOptions) -> Parser<'a> {
        let plugins = options.plugin_set().unwrap();
        let mut p = Parser::new(chars, options, plugins, false);
        p.next_token().unwrap();
        p
    }

    #[test]
    fn test_thrown_attempt_leaves_no_trace() {
        let chars: Vec<char> = "a b c d".chars().collect();
        let options = ParserOptions::default().with_error_recovery();
        let mut p = parser(&chars, &options);
        let before = p.state.clone();

        let result: TryParse<()> = p.try_parse(|p| {
            p.next()?;
            let at = p.start_pos();
            p.raise(&MISSING_SEMICOLON, at, &[])?;
            p.state.tok.context.push(TokContext::JsxOpenTag);
            p.state.labels.push(crate::state::Label {
                name: Some("l".into()),
                kind: None,
                statement_start: 0,
            });
            p.next()?;
            Err(UNEXPECTED_TOKEN.at(at, &[]).into())
        });

        assert_eq!(result.outcome(), "thrown");
        assert_eq!(p.state, before);
        assert!(p.state.errors.is_empty());
        assert!(p.state.tok.context.is_balanced());
    }

    #[test]
    fn test_failed_attempts_leave_declarations_behind() {
        let chars: Vec<char> = "a b".chars().collect();
        let options = ParserOptions::default();
        let mut p = parser(&chars, &options);
        let at = p.start_pos();
        p.state.scope.enter(ScopeFlags::PROGRAM);
        p.state.scope.declare_name("kept", BindingFlags::LEXICAL, at);
        let before = p.state.scope.clone();

        let thrown: TryParse<()> = p.try_parse(|p| {
            let at = p.start_pos();
            p.state.scope.declare_name("a", BindingFlags::LEXICAL, at);
            p.state.scope.enter(ScopeFlags::FUNCTION);
            p.state.scope.declare_name("param", BindingFlags::VAR, at);
            Err(UNEXPECTED_TOKEN.at(at, &[]).into())
        });
        assert_eq!(thrown.outcome(), "thrown");
        assert_eq!(p.state.scope, before);

        let aborted: TryParse<()> = p.try_parse(|p| {
            let at = p.start_pos();
            p.state.scope.declare_name("b", BindingFlags::VAR, at);
            p.state.scope.declare_name("c", BindingFlags::TS_TYPE, at);
            Err(Interrupt::Abort(None))
        });
        assert_eq!(aborted.outcome(), "aborted");
        assert_eq!(p.state.scope, before);

        let top = p.state.scope.current_scope().unwrap();
        assert!(top.has_binding("kept"));
        assert!(!top.has_binding("a") && !top.has_binding("b") && !top.has_type("c"));
        assert!(p.state.scope.declare_name("a", BindingFlags::LEXICAL, at).is_empty());
    }

    #[test]
    fn test_recovered_attempt_is_rolled_back_until_accepted() {
        let chars: Vec<char> = "a b".chars().collect();
        let options = ParserOptions::default().with_error_recovery();
        let mut p = parser(&chars, &options);

        let result = p.try_parse(|p| {
            p.next()?;
            let at = p.start_pos();
            p.raise(&MISSING_SEMICOLON, at, &[])?;
            Ok(p.cur())
        });
        assert!(p.state.errors.is_empty());
        assert_eq!(p.cur_str(), "a");

        let TryParse::Recovered { node, error, fail_state } = result else {
            panic!("expected a recovered attempt");
        };
        assert_eq!(node, TokenKind::Identifier);
        assert!(error.is(&MISSING_SEMICOLON));
        p.accept_state(fail_state);
        assert_eq!(p.state.errors.len(), 1);
        assert_eq!(p.cur_str(), "b");
    }

    #[test]
    fn test_abort_keeps_partial_node() {
        let chars: Vec<char> = "a b".chars().collect();
        let options = ParserOptions::default();
        let mut p = parser(&chars, &options);
        let result = p.try_parse(|p| {
            p.next()?;
            Err(Interrupt::Abort(Some(1)))
        });
        match result {
            TryParse::Aborted { node, .. } => assert_eq!(node, Some(1)),
            other => panic!("unexpected outcome {}", other.outcome()),
        }
        assert_eq!(p.cur_str(), "a");
    }

    #[test]
    fn test_success_keeps_state() {
        let chars: Vec<char> = "a b".chars().collect();
        let options = ParserOptions::default();
        let mut p = parser(&chars, &options);
        let result = p.try_parse(|p| {
            p.next()?;
            Ok(())
        });
        assert!(result.is_success());
        assert_eq!(p.cur_str(), "b");
    }

    #[test]
    fn test_look_ahead_rewinds() {
        let chars: Vec<char> = "a b c".chars().collect();
        let options = ParserOptions::default();
        let mut p = parser(&chars, &options);
        let saw_c = p.look_ahead_is(|p| {
            p.next()?;
            p.next()?;
            Ok(p.cur_str() == "c")
        });
        assert!(saw_c);
        assert_eq!(p.cur_str(), "a");
    }
}
