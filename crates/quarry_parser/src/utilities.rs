//! Small value types threaded through the productions.

use quarry_ast::node::{Expression, LiteralValue};
use quarry_ast::ops::UnaryOperator;
use quarry_ast::token_kind::TokenKind;
use quarry_core::text::Position;

/// Where a statement appears, for the rules that forbid declarations in
/// single-statement positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementContext {
    /// A statement list, where declarations are allowed.
    Declaration,
    /// The body of an `if` or `else`.
    If,
    /// The body of a label in a statement list.
    Label,
    /// Loop and `with` bodies, and labels nested in single statements.
    Nested,
}

impl StatementContext {
    #[inline]
    pub fn is_single_statement(self) -> bool {
        self != StatementContext::Declaration
    }

    /// Context for the body of a label that appears in this context.
    pub fn labeled(self) -> StatementContext {
        match self {
            StatementContext::Declaration | StatementContext::Label => StatementContext::Label,
            StatementContext::If | StatementContext::Nested => StatementContext::Nested,
        }
    }
}

/// Errors that only become errors once an expression is known not to be
/// an assignment target (`{ a = 1 }`, duplicate `__proto__`, `#x` outside
/// `in`). Reported by `check_expression_errors`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionErrors {
    pub shorthand_assign: Option<Position>,
    pub double_proto: Option<Position>,
    pub private_key: Option<Position>,
    /// `(a?)` in TypeScript, valid only as an arrow parameter.
    pub optional_parameters: Option<Position>,
}

impl ExpressionErrors {
    pub fn has_errors(&self) -> bool {
        self.shorthand_assign.is_some()
            || self.double_proto.is_some()
            || self.private_key.is_some()
            || self.optional_parameters.is_some()
    }
}

/// Progress through a chain of member accesses and calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptState {
    pub optional_chain_member: bool,
    /// The base is a bare `async` that may still become an arrow head.
    pub maybe_async_arrow: bool,
    pub stop: bool,
}

/// Per-class facts collected while parsing the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassState {
    pub had_constructor: bool,
    pub had_super_class: bool,
}

/// The kind of function whose body is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
    ObjectMethod,
    ClassMethod,
    ClassPrivateMethod,
}

impl FunctionKind {
    /// Whether a missing body is allowed (overloads and ambient signatures).
    #[inline]
    pub fn may_be_bodiless(self) -> bool {
        matches!(
            self,
            FunctionKind::Declaration | FunctionKind::ClassMethod | FunctionKind::ClassPrivateMethod
        )
    }
}

/// What an arrow head contributes beyond its parameters.
#[derive(Debug, Default)]
pub struct ArrowHead {
    pub return_type: Option<Box<quarry_ast::ts::TSTypeAnnotation>>,
}

/// Whether a node may appear as an assignment or binding target, and how
/// to descend into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LvalRule {
    Invalid,
    /// A valid leaf with nothing to check below it.
    Valid,
    /// Check the node's children. `parenthesized` marks them as sitting
    /// under a parenthesized ancestor.
    Children { parenthesized: bool },
}

/// The construct an assignment target belongs to, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LvalAncestor {
    ArrayPattern,
    AssignmentExpression,
    CatchClause,
    ForInStatement,
    ForOfStatement,
    FormalParameters,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ObjectPattern,
    ParenthesizedExpression,
    Update { prefix: bool },
    VariableDeclarator,
}

impl LvalAncestor {
    pub fn description(self) -> &'static str {
        match self {
            LvalAncestor::ArrayPattern => "array destructuring pattern",
            LvalAncestor::AssignmentExpression => "assignment expression",
            LvalAncestor::CatchClause => "catch clause",
            LvalAncestor::ForInStatement => "for-in statement",
            LvalAncestor::ForOfStatement => "for-of statement",
            LvalAncestor::FormalParameters => "function parameter list",
            LvalAncestor::ImportSpecifier => "import specifier",
            LvalAncestor::ImportDefaultSpecifier => "import default specifier",
            LvalAncestor::ImportNamespaceSpecifier => "import namespace specifier",
            LvalAncestor::ObjectPattern => "object destructuring pattern",
            LvalAncestor::ParenthesizedExpression => "parenthesized expression",
            LvalAncestor::Update { prefix: true } => "prefix operation",
            LvalAncestor::Update { prefix: false } => "postfix operation",
            LvalAncestor::VariableDeclarator => "variable declaration",
        }
    }

    #[inline]
    pub fn is_assignment(self) -> bool {
        self == LvalAncestor::AssignmentExpression
    }
}

/// Whether `expr` may initialize a `const` in an ambient context: a string,
/// boolean or number literal, a negated number, a template without
/// substitutions, or something that may name an enum member.
pub fn is_ambient_const_initializer(expr: &Expression) -> bool {
    match expr {
        Expression::StringLiteral(_) | Expression::BooleanLiteral(_) => true,
        Expression::Literal(lit) => {
            lit.bigint.is_some()
                || matches!(
                    lit.value,
                    LiteralValue::String(_) | LiteralValue::Boolean(_) | LiteralValue::Number(_)
                )
        }
        Expression::TemplateLiteral(template) => template.expressions.is_empty(),
        Expression::UnaryExpression(unary) => {
            unary.operator == UnaryOperator::Minus && is_number(&unary.argument)
        }
        Expression::MemberExpression(member) => {
            let key_ok = !member.computed
                || match member.property.as_ref() {
                    Expression::StringLiteral(_) => true,
                    Expression::Literal(lit) => matches!(lit.value, LiteralValue::String(_)),
                    Expression::TemplateLiteral(template) => template.expressions.is_empty(),
                    _ => false,
                };
            key_ok && is_uncomputed_member_chain(&member.object)
        }
        other => is_number(other),
    }
}

fn is_number(expr: &Expression) -> bool {
    match expr {
        Expression::NumericLiteral(_) | Expression::BigIntLiteral(_) => true,
        Expression::Literal(lit) => lit.bigint.is_some() || matches!(lit.value, LiteralValue::Number(_)),
        _ => false,
    }
}

fn is_uncomputed_member_chain(expr: &Expression) -> bool {
    match expr {
        Expression::Identifier(_) => true,
        Expression::MemberExpression(member) => !member.computed && is_uncomputed_member_chain(&member.object),
        _ => false,
    }
}

const STRICT_RESERVED_WORDS: &[&str] = &[
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

/// Reserved words that are tokenized as plain keywords.
#[inline]
pub fn is_keyword(word: &str) -> bool {
    TokenKind::from_keyword(word).is_some()
}

/// Words reserved in all code.
pub fn is_reserved_word(word: &str, in_module: bool) -> bool {
    (in_module && word == "await") || word == "enum"
}

pub fn is_strict_reserved_word(word: &str, in_module: bool) -> bool {
    is_reserved_word(word, in_module) || STRICT_RESERVED_WORDS.contains(&word)
}

/// Names that strict code may reference but never bind.
#[inline]
pub fn is_strict_bind_only_reserved_word(word: &str) -> bool {
    word == "eval" || word == "arguments"
}

pub fn is_strict_bind_reserved_word(word: &str, in_module: bool) -> bool {
    is_strict_reserved_word(word, in_module) || is_strict_bind_only_reserved_word(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_context() {
        assert_eq!(StatementContext::Declaration.labeled(), StatementContext::Label);
        assert_eq!(StatementContext::If.labeled(), StatementContext::Nested);
        assert!(!StatementContext::Declaration.is_single_statement());
        assert!(StatementContext::Label.is_single_statement());
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved_word("await", true));
        assert!(!is_reserved_word("await", false));
        assert!(is_strict_reserved_word("yield", false));
        assert!(!is_strict_reserved_word("eval", false));
        assert!(is_strict_bind_reserved_word("eval", false));
        assert!(is_keyword("instanceof"));
        assert!(!is_keyword("let"));
    }

    #[test]
    fn test_ancestor_descriptions() {
        assert_eq!(LvalAncestor::Update { prefix: true }.description(), "prefix operation");
        assert_eq!(LvalAncestor::ForOfStatement.description(), "for-of statement");
    }
}
