//! Binary operator precedence.

use quarry_ast::token_kind::TokenKind;

/// Binding power of binary operators, lowest first. `None` is the floor
/// passed when any operator may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    None = 0,
    /// `||` and `??` share a level; mixing them is rejected separately.
    LogicalOr = 1,
    LogicalAnd = 2,
    BitwiseOr = 3,
    BitwiseXor = 4,
    BitwiseAnd = 5,
    Equality = 6,
    /// Also `in`, `instanceof`, and TypeScript's `as` / `satisfies`.
    Relational = 7,
    Shift = 8,
    Additive = 9,
    Multiplicative = 10,
    Exponentiation = 11,
}

impl OperatorPrecedence {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// The precedence of `kind` as a binary operator, if it is one.
pub fn binary_precedence(kind: TokenKind) -> Option<OperatorPrecedence> {
    Some(match kind {
        TokenKind::QuestionQuestionToken | TokenKind::BarBarToken => OperatorPrecedence::LogicalOr,
        TokenKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        TokenKind::BarToken => OperatorPrecedence::BitwiseOr,
        TokenKind::CaretToken => OperatorPrecedence::BitwiseXor,
        TokenKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        TokenKind::EqualsEqualsToken
        | TokenKind::ExclamationEqualsToken
        | TokenKind::EqualsEqualsEqualsToken
        | TokenKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        TokenKind::LessThanToken
        | TokenKind::GreaterThanToken
        | TokenKind::LessThanEqualsToken
        | TokenKind::GreaterThanEqualsToken
        | TokenKind::InstanceOfKeyword
        | TokenKind::InKeyword => OperatorPrecedence::Relational,
        TokenKind::LessThanLessThanToken
        | TokenKind::GreaterThanGreaterThanToken
        | TokenKind::GreaterThanGreaterThanGreaterThanToken => OperatorPrecedence::Shift,
        TokenKind::PlusToken | TokenKind::MinusToken => OperatorPrecedence::Additive,
        TokenKind::AsteriskToken | TokenKind::SlashToken | TokenKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        TokenKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
        _ => return None,
    })
}
