//! The mutable parse state.
//!
//! Everything a speculative parse may change lives in [`State`], so cloning
//! it is a complete snapshot: restoring the clone undoes the attempt,
//! including tokenizer position, recorded errors, declared names and the
//! lexical context stack.

use quarry_ast::token_kind::Token;
use quarry_core::text::{Position, Span};
use quarry_diagnostics::ErrorList;
use quarry_scanner::TokenizerState;
use quarry_scope::{ClassScopeHandler, ProductionParameterHandler, ScopeHandler};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
}

/// An enclosing label. Unnamed entries mark loops and switches for a bare
/// `break`/`continue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: Option<String>,
    pub kind: Option<LabelKind>,
    pub statement_start: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub tok: TokenizerState,
    pub errors: ErrorList,
    pub strict: bool,

    pub scope: ScopeHandler,
    pub class_scope: ClassScopeHandler,
    pub prod_param: ProductionParameterHandler,
    pub labels: Vec<Label>,

    // TypeScript
    pub in_type: bool,
    pub is_ambient_context: bool,
    pub in_abstract_class: bool,
    pub in_disallow_conditional_types_context: bool,
    pub no_anon_function_type: bool,

    /// Parsing the parameters of what may be a generic arrow.
    pub maybe_in_arrow_parameters: bool,
    /// Start offset of an expression that may turn out to be an arrow head.
    pub potential_arrow_at: Option<usize>,
    /// First `yield` / `await` seen in the current parameter position.
    pub yield_pos: Option<Position>,
    pub await_pos: Option<Position>,
    /// First `await` used as an identifier, fatal only in async arrow heads.
    pub await_ident_pos: Option<Position>,

    /// Names exported so far, for duplicate export checks.
    pub exported_identifiers: FxHashSet<String>,
    /// Expressions that were written inside parentheses, by span.
    pub parenthesized: FxHashSet<(u32, u32)>,
    /// Tokens read so far, when the caller asked for them.
    pub tokens: Vec<Token>,
}

impl State {
    pub fn new(start_line: u32, start_column: u32, in_module: bool, strict: bool) -> Self {
        Self {
            tok: TokenizerState::new(start_line, start_column),
            errors: ErrorList::new(),
            strict,
            scope: ScopeHandler::new(in_module),
            class_scope: ClassScopeHandler::new(),
            prod_param: ProductionParameterHandler::new(),
            labels: Vec::new(),
            in_type: false,
            is_ambient_context: false,
            in_abstract_class: false,
            in_disallow_conditional_types_context: false,
            no_anon_function_type: false,
            maybe_in_arrow_parameters: false,
            potential_arrow_at: None,
            yield_pos: None,
            await_pos: None,
            await_ident_pos: None,
            exported_identifiers: FxHashSet::default(),
            parenthesized: FxHashSet::default(),
            tokens: Vec::new(),
        }
    }

    #[inline]
    pub fn mark_parenthesized(&mut self, span: &Span) {
        self.parenthesized.insert((span.start.index, span.end.index));
    }

    #[inline]
    pub fn is_parenthesized(&self, span: &Span) -> bool {
        self.parenthesized.contains(&(span.start.index, span.end.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_scope::ScopeFlags;

    #[test]
    fn test_clone_is_isolated() {
        let mut original = State::new(1, 0, true, true);
        original.scope.enter(ScopeFlags::PROGRAM);
        let mut copy = original.clone();
        copy.tok.pos = 10;
        copy.labels.push(Label {
            name: Some("outer".into()),
            kind: Some(LabelKind::Loop),
            statement_start: 0,
        });
        copy.scope.enter(ScopeFlags::FUNCTION);
        copy.exported_identifiers.insert("x".into());

        assert_eq!(original.tok.pos, 0);
        assert!(original.labels.is_empty());
        assert_eq!(original.scope.depth(), 1);
        assert!(original.exported_identifiers.is_empty());
        assert_ne!(original, copy);
    }

    #[test]
    fn test_parenthesized_marks() {
        let mut state = State::new(1, 0, false, false);
        let span = Span::new(Position::new(1, 1, 1), Position::new(1, 2, 2));
        assert!(!state.is_parenthesized(&span));
        state.mark_parenthesized(&span);
        assert!(state.is_parenthesized(&span));
    }
}
