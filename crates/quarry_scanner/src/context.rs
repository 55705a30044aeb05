//! Lexical modes consulted by the tokenizer.
//!
//! The stack starts with a single `Brace` sentinel that is never popped.
//! Pushes and pops happen only in the grammar's context-update hook, which
//! runs after each token and inspects the previous token kind.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokContext {
    /// Ordinary code, including the body of any `{ ... }`.
    Brace,
    /// Inside `<tag ...`, up to the closing `>`.
    JsxOpenTag,
    /// Inside `</tag`, up to the closing `>`.
    JsxCloseTag,
    /// Between an opening and a closing tag, where text is significant.
    JsxChild,
}

impl TokContext {
    /// Whether whitespace and comments are part of the content in this mode.
    #[inline]
    pub fn preserves_space(self) -> bool {
        matches!(self, TokContext::JsxChild)
    }

    pub fn label(self) -> &'static str {
        match self {
            TokContext::Brace => "{",
            TokContext::JsxOpenTag => "<tag",
            TokContext::JsxCloseTag => "</tag",
            TokContext::JsxChild => "<tag>...</tag>",
        }
    }

    #[inline]
    pub fn is_jsx_tag(self) -> bool {
        matches!(self, TokContext::JsxOpenTag | TokContext::JsxCloseTag)
    }
}

impl fmt::Display for TokContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStack {
    stack: Vec<TokContext>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    pub fn new() -> Self {
        Self {
            stack: vec![TokContext::Brace],
        }
    }

    #[inline]
    pub fn current(&self) -> TokContext {
        self.stack.last().copied().unwrap_or(TokContext::Brace)
    }

    pub fn push(&mut self, ctx: TokContext) {
        tracing::trace!(context = %ctx, depth = self.stack.len() + 1, "push context");
        self.stack.push(ctx);
    }

    /// Pops the top context. The sentinel stays in place; a `}` with no
    /// matching `{` is a syntax error reported by the grammar, not here.
    pub fn pop(&mut self) -> Option<TokContext> {
        if self.stack.len() > 1 {
            let ctx = self.stack.pop();
            tracing::trace!(context = ?ctx, depth = self.stack.len(), "pop context");
            ctx
        } else {
            None
        }
    }

    /// Replaces the top entry.
    pub fn set_current(&mut self, ctx: TokContext) {
        let depth = self.stack.len();
        if depth > 1 {
            self.stack[depth - 1] = ctx;
        } else {
            self.stack.push(ctx);
        }
    }

    /// Replaces the top two entries with `ctx`: a `</` turns the opening-tag
    /// pair pushed for `<` into a single closing-tag entry.
    pub fn replace_top_pair(&mut self, ctx: TokContext) {
        let keep = self.stack.len().saturating_sub(2).max(1);
        self.stack.truncate(keep);
        self.stack.push(ctx);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Only the sentinel remains.
    pub fn is_balanced(&self) -> bool {
        self.stack.len() == 1 && self.stack[0] == TokContext::Brace
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokContext> {
        self.stack.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_never_popped() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.current(), TokContext::Brace);
        assert!(stack.is_balanced());
    }

    #[test]
    fn test_set_current_on_sentinel_pushes() {
        let mut stack = ContextStack::new();
        stack.set_current(TokContext::JsxChild);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter().next(), Some(&TokContext::Brace));
    }

    #[test]
    fn test_set_current_replaces_top_above_sentinel() {
        let mut stack = ContextStack::new();
        stack.push(TokContext::JsxOpenTag);
        stack.set_current(TokContext::JsxChild);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.current(), TokContext::JsxChild);
        stack.pop();
        assert!(stack.is_balanced());
    }

    #[test]
    fn test_closing_tag_transition() {
        let mut stack = ContextStack::new();
        stack.push(TokContext::JsxChild);
        stack.push(TokContext::JsxOpenTag);
        stack.replace_top_pair(TokContext::JsxCloseTag);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.current(), TokContext::JsxCloseTag);
        stack.pop();
        assert!(stack.is_balanced());
    }

    #[test]
    fn test_preserve_space() {
        assert!(TokContext::JsxChild.preserves_space());
        assert!(!TokContext::Brace.preserves_space());
        assert!(TokContext::JsxOpenTag.is_jsx_tag());
    }
}
