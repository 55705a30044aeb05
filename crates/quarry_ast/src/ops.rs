//! Operator enums carried by expression nodes.

use crate::token_kind::TokenKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "==")]
    Equality,
    #[serde(rename = "!=")]
    Inequality,
    #[serde(rename = "===")]
    StrictEquality,
    #[serde(rename = "!==")]
    StrictInequality,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessEqualThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterEqualThan,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = ">>>")]
    ShiftRightZeroFill,
    #[serde(rename = "+")]
    Addition,
    #[serde(rename = "-")]
    Subtraction,
    #[serde(rename = "*")]
    Multiplication,
    #[serde(rename = "/")]
    Division,
    #[serde(rename = "%")]
    Remainder,
    #[serde(rename = "**")]
    Exponential,
    #[serde(rename = "|")]
    BitwiseOr,
    #[serde(rename = "^")]
    BitwiseXor,
    #[serde(rename = "&")]
    BitwiseAnd,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::EqualsEqualsToken => Self::Equality,
            TokenKind::ExclamationEqualsToken => Self::Inequality,
            TokenKind::EqualsEqualsEqualsToken => Self::StrictEquality,
            TokenKind::ExclamationEqualsEqualsToken => Self::StrictInequality,
            TokenKind::LessThanToken => Self::LessThan,
            TokenKind::LessThanEqualsToken => Self::LessEqualThan,
            TokenKind::GreaterThanToken => Self::GreaterThan,
            TokenKind::GreaterThanEqualsToken => Self::GreaterEqualThan,
            TokenKind::LessThanLessThanToken => Self::ShiftLeft,
            TokenKind::GreaterThanGreaterThanToken => Self::ShiftRight,
            TokenKind::GreaterThanGreaterThanGreaterThanToken => Self::ShiftRightZeroFill,
            TokenKind::PlusToken => Self::Addition,
            TokenKind::MinusToken => Self::Subtraction,
            TokenKind::AsteriskToken => Self::Multiplication,
            TokenKind::SlashToken => Self::Division,
            TokenKind::PercentToken => Self::Remainder,
            TokenKind::AsteriskAsteriskToken => Self::Exponential,
            TokenKind::BarToken => Self::BitwiseOr,
            TokenKind::CaretToken => Self::BitwiseXor,
            TokenKind::AmpersandToken => Self::BitwiseAnd,
            TokenKind::InKeyword => Self::In,
            TokenKind::InstanceOfKeyword => Self::Instanceof,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalOperator {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "??")]
    Coalesce,
}

impl LogicalOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::BarBarToken => Some(Self::Or),
            TokenKind::AmpersandAmpersandToken => Some(Self::And),
            TokenKind::QuestionQuestionToken => Some(Self::Coalesce),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    LogicalNot,
    #[serde(rename = "~")]
    BitwiseNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::MinusToken => Some(Self::Minus),
            TokenKind::PlusToken => Some(Self::Plus),
            TokenKind::ExclamationToken => Some(Self::LogicalNot),
            TokenKind::TildeToken => Some(Self::BitwiseNot),
            TokenKind::TypeOfKeyword => Some(Self::Typeof),
            TokenKind::VoidKeyword => Some(Self::Void),
            TokenKind::DeleteKeyword => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UpdateOperator {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignmentOperator {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    Addition,
    #[serde(rename = "-=")]
    Subtraction,
    #[serde(rename = "*=")]
    Multiplication,
    #[serde(rename = "/=")]
    Division,
    #[serde(rename = "%=")]
    Remainder,
    #[serde(rename = "**=")]
    Exponential,
    #[serde(rename = "<<=")]
    ShiftLeft,
    #[serde(rename = ">>=")]
    ShiftRight,
    #[serde(rename = ">>>=")]
    ShiftRightZeroFill,
    #[serde(rename = "|=")]
    BitwiseOr,
    #[serde(rename = "^=")]
    BitwiseXor,
    #[serde(rename = "&=")]
    BitwiseAnd,
    #[serde(rename = "&&=")]
    LogicalAnd,
    #[serde(rename = "||=")]
    LogicalOr,
    #[serde(rename = "??=")]
    LogicalNullish,
}

impl AssignmentOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::EqualsToken => Self::Assign,
            TokenKind::PlusEqualsToken => Self::Addition,
            TokenKind::MinusEqualsToken => Self::Subtraction,
            TokenKind::AsteriskEqualsToken => Self::Multiplication,
            TokenKind::SlashEqualsToken => Self::Division,
            TokenKind::PercentEqualsToken => Self::Remainder,
            TokenKind::AsteriskAsteriskEqualsToken => Self::Exponential,
            TokenKind::LessThanLessThanEqualsToken => Self::ShiftLeft,
            TokenKind::GreaterThanGreaterThanEqualsToken => Self::ShiftRight,
            TokenKind::GreaterThanGreaterThanGreaterThanEqualsToken => Self::ShiftRightZeroFill,
            TokenKind::BarEqualsToken => Self::BitwiseOr,
            TokenKind::CaretEqualsToken => Self::BitwiseXor,
            TokenKind::AmpersandEqualsToken => Self::BitwiseAnd,
            TokenKind::AmpersandAmpersandEqualsToken => Self::LogicalAnd,
            TokenKind::BarBarEqualsToken => Self::LogicalOr,
            TokenKind::QuestionQuestionEqualsToken => Self::LogicalNullish,
            _ => return None,
        })
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr | Self::LogicalNullish)
    }
}
