//! TokenKind enum - every token the tokenizer can produce.
//!
//! Contextual keywords (`as`, `async`, `let`, `type`, `interface`, ...) are
//! not separate kinds: they arrive as `Identifier` tokens and the grammar
//! inspects the token value.

use quarry_core::text::{Position, Span};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    Unknown = 0,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    /// A template chunk ending in `${`.
    TemplateNonTail,
    /// A template chunk ending in the closing backquote.
    TemplateTail,
    Identifier,
    /// `#name`; the value holds the name without the hash.
    PrivateName,
    /// `#!...` on the first line.
    InterpreterDirective,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    ColonToken,
    QuestionToken,
    QuestionDotToken,
    EqualsGreaterThanToken,
    AtToken,
    HashToken,

    // Operators
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionQuestionToken,

    // Assignments
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    AmpersandAmpersandEqualsToken,
    BarBarEqualsToken,
    QuestionQuestionEqualsToken,

    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,

    // JSX
    JsxName,
    JsxText,
    /// The `<` that opens a JSX tag.
    JsxTagStart,
    /// The `>` that closes a JSX tag.
    JsxTagEnd,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        self >= TokenKind::BreakKeyword && self <= TokenKind::WithKeyword
    }

    /// Identifier or reserved word: anything usable as a property name.
    pub fn is_keyword_or_identifier(self) -> bool {
        self == TokenKind::Identifier || self.is_keyword()
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::NumericLiteral
                | TokenKind::BigIntLiteral
                | TokenKind::StringLiteral
                | TokenKind::RegularExpressionLiteral
        )
    }

    pub fn is_template(self) -> bool {
        matches!(self, TokenKind::TemplateNonTail | TokenKind::TemplateTail)
    }

    pub fn is_assignment_operator(self) -> bool {
        self >= TokenKind::EqualsToken && self <= TokenKind::QuestionQuestionEqualsToken
    }

    pub fn is_compound_assignment(self) -> bool {
        self > TokenKind::EqualsToken && self <= TokenKind::QuestionQuestionEqualsToken
    }

    /// Prefix operators that produce a `UnaryExpression`.
    pub fn is_prefix_operator(self) -> bool {
        matches!(
            self,
            TokenKind::ExclamationToken
                | TokenKind::TildeToken
                | TokenKind::PlusToken
                | TokenKind::MinusToken
                | TokenKind::TypeOfKeyword
                | TokenKind::VoidKeyword
                | TokenKind::DeleteKeyword
        )
    }

    pub fn is_update_operator(self) -> bool {
        matches!(self, TokenKind::PlusPlusToken | TokenKind::MinusMinusToken)
    }

    pub fn is_loop_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::DoKeyword | TokenKind::ForKeyword | TokenKind::WhileKeyword
        )
    }

    /// Whether an expression may follow this token directly. Decides
    /// whether `/` starts a regular expression and whether `<` may open a
    /// JSX element.
    pub fn comes_before_expression(self) -> bool {
        if self.is_assignment_operator() {
            return true;
        }
        matches!(
            self,
            TokenKind::OpenBracketToken
                | TokenKind::OpenBraceToken
                | TokenKind::OpenParenToken
                | TokenKind::CommaToken
                | TokenKind::SemicolonToken
                | TokenKind::ColonToken
                | TokenKind::QuestionToken
                | TokenKind::EqualsGreaterThanToken
                | TokenKind::DotDotDotToken
                | TokenKind::TemplateNonTail
                | TokenKind::LessThanToken
                | TokenKind::GreaterThanToken
                | TokenKind::LessThanEqualsToken
                | TokenKind::GreaterThanEqualsToken
                | TokenKind::EqualsEqualsToken
                | TokenKind::ExclamationEqualsToken
                | TokenKind::EqualsEqualsEqualsToken
                | TokenKind::ExclamationEqualsEqualsToken
                | TokenKind::PlusToken
                | TokenKind::MinusToken
                | TokenKind::AsteriskToken
                | TokenKind::AsteriskAsteriskToken
                | TokenKind::SlashToken
                | TokenKind::PercentToken
                | TokenKind::LessThanLessThanToken
                | TokenKind::GreaterThanGreaterThanToken
                | TokenKind::GreaterThanGreaterThanGreaterThanToken
                | TokenKind::AmpersandToken
                | TokenKind::BarToken
                | TokenKind::CaretToken
                | TokenKind::ExclamationToken
                | TokenKind::TildeToken
                | TokenKind::AmpersandAmpersandToken
                | TokenKind::BarBarToken
                | TokenKind::QuestionQuestionToken
                | TokenKind::AtToken
                | TokenKind::CaseKeyword
                | TokenKind::DefaultKeyword
                | TokenKind::DoKeyword
                | TokenKind::ElseKeyword
                | TokenKind::ReturnKeyword
                | TokenKind::ThrowKeyword
                | TokenKind::NewKeyword
                | TokenKind::ExtendsKeyword
                | TokenKind::InKeyword
                | TokenKind::InstanceOfKeyword
                | TokenKind::TypeOfKeyword
                | TokenKind::VoidKeyword
                | TokenKind::DeleteKeyword
                | TokenKind::JsxTagStart
                | TokenKind::JsxText
        )
    }

    /// Whether this token can begin an expression.
    pub fn starts_expression(self) -> bool {
        if self.is_literal() || self.is_template() {
            return true;
        }
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::PrivateName
                | TokenKind::HashToken
                | TokenKind::OpenBracketToken
                | TokenKind::OpenBraceToken
                | TokenKind::OpenParenToken
                | TokenKind::SlashToken
                | TokenKind::SlashEqualsToken
                | TokenKind::PlusToken
                | TokenKind::MinusToken
                | TokenKind::PlusPlusToken
                | TokenKind::MinusMinusToken
                | TokenKind::ExclamationToken
                | TokenKind::TildeToken
                | TokenKind::LessThanToken
                | TokenKind::AtToken
                | TokenKind::ClassKeyword
                | TokenKind::FunctionKeyword
                | TokenKind::ImportKeyword
                | TokenKind::NewKeyword
                | TokenKind::NullKeyword
                | TokenKind::SuperKeyword
                | TokenKind::ThisKeyword
                | TokenKind::TrueKeyword
                | TokenKind::FalseKeyword
                | TokenKind::TypeOfKeyword
                | TokenKind::VoidKeyword
                | TokenKind::DeleteKeyword
                | TokenKind::JsxTagStart
        )
    }

    /// Get the text of a reserved word.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            TokenKind::BreakKeyword => Some("break"),
            TokenKind::CaseKeyword => Some("case"),
            TokenKind::CatchKeyword => Some("catch"),
            TokenKind::ClassKeyword => Some("class"),
            TokenKind::ConstKeyword => Some("const"),
            TokenKind::ContinueKeyword => Some("continue"),
            TokenKind::DebuggerKeyword => Some("debugger"),
            TokenKind::DefaultKeyword => Some("default"),
            TokenKind::DeleteKeyword => Some("delete"),
            TokenKind::DoKeyword => Some("do"),
            TokenKind::ElseKeyword => Some("else"),
            TokenKind::ExportKeyword => Some("export"),
            TokenKind::ExtendsKeyword => Some("extends"),
            TokenKind::FalseKeyword => Some("false"),
            TokenKind::FinallyKeyword => Some("finally"),
            TokenKind::ForKeyword => Some("for"),
            TokenKind::FunctionKeyword => Some("function"),
            TokenKind::IfKeyword => Some("if"),
            TokenKind::ImportKeyword => Some("import"),
            TokenKind::InKeyword => Some("in"),
            TokenKind::InstanceOfKeyword => Some("instanceof"),
            TokenKind::NewKeyword => Some("new"),
            TokenKind::NullKeyword => Some("null"),
            TokenKind::ReturnKeyword => Some("return"),
            TokenKind::SuperKeyword => Some("super"),
            TokenKind::SwitchKeyword => Some("switch"),
            TokenKind::ThisKeyword => Some("this"),
            TokenKind::ThrowKeyword => Some("throw"),
            TokenKind::TrueKeyword => Some("true"),
            TokenKind::TryKeyword => Some("try"),
            TokenKind::TypeOfKeyword => Some("typeof"),
            TokenKind::VarKeyword => Some("var"),
            TokenKind::VoidKeyword => Some("void"),
            TokenKind::WhileKeyword => Some("while"),
            TokenKind::WithKeyword => Some("with"),
            _ => None,
        }
    }

    /// Look up a reserved word.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "break" => Some(TokenKind::BreakKeyword),
            "case" => Some(TokenKind::CaseKeyword),
            "catch" => Some(TokenKind::CatchKeyword),
            "class" => Some(TokenKind::ClassKeyword),
            "const" => Some(TokenKind::ConstKeyword),
            "continue" => Some(TokenKind::ContinueKeyword),
            "debugger" => Some(TokenKind::DebuggerKeyword),
            "default" => Some(TokenKind::DefaultKeyword),
            "delete" => Some(TokenKind::DeleteKeyword),
            "do" => Some(TokenKind::DoKeyword),
            "else" => Some(TokenKind::ElseKeyword),
            "export" => Some(TokenKind::ExportKeyword),
            "extends" => Some(TokenKind::ExtendsKeyword),
            "false" => Some(TokenKind::FalseKeyword),
            "finally" => Some(TokenKind::FinallyKeyword),
            "for" => Some(TokenKind::ForKeyword),
            "function" => Some(TokenKind::FunctionKeyword),
            "if" => Some(TokenKind::IfKeyword),
            "import" => Some(TokenKind::ImportKeyword),
            "in" => Some(TokenKind::InKeyword),
            "instanceof" => Some(TokenKind::InstanceOfKeyword),
            "new" => Some(TokenKind::NewKeyword),
            "null" => Some(TokenKind::NullKeyword),
            "return" => Some(TokenKind::ReturnKeyword),
            "super" => Some(TokenKind::SuperKeyword),
            "switch" => Some(TokenKind::SwitchKeyword),
            "this" => Some(TokenKind::ThisKeyword),
            "throw" => Some(TokenKind::ThrowKeyword),
            "true" => Some(TokenKind::TrueKeyword),
            "try" => Some(TokenKind::TryKeyword),
            "typeof" => Some(TokenKind::TypeOfKeyword),
            "var" => Some(TokenKind::VarKeyword),
            "void" => Some(TokenKind::VoidKeyword),
            "while" => Some(TokenKind::WhileKeyword),
            "with" => Some(TokenKind::WithKeyword),
            _ => None,
        }
    }

    /// Get the text of a punctuation or operator token.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            TokenKind::OpenBraceToken => Some("{"),
            TokenKind::CloseBraceToken => Some("}"),
            TokenKind::OpenParenToken => Some("("),
            TokenKind::CloseParenToken => Some(")"),
            TokenKind::OpenBracketToken => Some("["),
            TokenKind::CloseBracketToken => Some("]"),
            TokenKind::DotToken => Some("."),
            TokenKind::DotDotDotToken => Some("..."),
            TokenKind::SemicolonToken => Some(";"),
            TokenKind::CommaToken => Some(","),
            TokenKind::ColonToken => Some(":"),
            TokenKind::QuestionToken => Some("?"),
            TokenKind::QuestionDotToken => Some("?."),
            TokenKind::EqualsGreaterThanToken => Some("=>"),
            TokenKind::AtToken => Some("@"),
            TokenKind::HashToken => Some("#"),
            TokenKind::LessThanToken => Some("<"),
            TokenKind::GreaterThanToken => Some(">"),
            TokenKind::LessThanEqualsToken => Some("<="),
            TokenKind::GreaterThanEqualsToken => Some(">="),
            TokenKind::EqualsEqualsToken => Some("=="),
            TokenKind::ExclamationEqualsToken => Some("!="),
            TokenKind::EqualsEqualsEqualsToken => Some("==="),
            TokenKind::ExclamationEqualsEqualsToken => Some("!=="),
            TokenKind::PlusToken => Some("+"),
            TokenKind::MinusToken => Some("-"),
            TokenKind::AsteriskToken => Some("*"),
            TokenKind::AsteriskAsteriskToken => Some("**"),
            TokenKind::SlashToken => Some("/"),
            TokenKind::PercentToken => Some("%"),
            TokenKind::PlusPlusToken => Some("++"),
            TokenKind::MinusMinusToken => Some("--"),
            TokenKind::LessThanLessThanToken => Some("<<"),
            TokenKind::GreaterThanGreaterThanToken => Some(">>"),
            TokenKind::GreaterThanGreaterThanGreaterThanToken => Some(">>>"),
            TokenKind::AmpersandToken => Some("&"),
            TokenKind::BarToken => Some("|"),
            TokenKind::CaretToken => Some("^"),
            TokenKind::ExclamationToken => Some("!"),
            TokenKind::TildeToken => Some("~"),
            TokenKind::AmpersandAmpersandToken => Some("&&"),
            TokenKind::BarBarToken => Some("||"),
            TokenKind::QuestionQuestionToken => Some("??"),
            TokenKind::EqualsToken => Some("="),
            TokenKind::PlusEqualsToken => Some("+="),
            TokenKind::MinusEqualsToken => Some("-="),
            TokenKind::AsteriskEqualsToken => Some("*="),
            TokenKind::AsteriskAsteriskEqualsToken => Some("**="),
            TokenKind::SlashEqualsToken => Some("/="),
            TokenKind::PercentEqualsToken => Some("%="),
            TokenKind::LessThanLessThanEqualsToken => Some("<<="),
            TokenKind::GreaterThanGreaterThanEqualsToken => Some(">>="),
            TokenKind::GreaterThanGreaterThanGreaterThanEqualsToken => Some(">>>="),
            TokenKind::AmpersandEqualsToken => Some("&="),
            TokenKind::BarEqualsToken => Some("|="),
            TokenKind::CaretEqualsToken => Some("^="),
            TokenKind::AmpersandAmpersandEqualsToken => Some("&&="),
            TokenKind::BarBarEqualsToken => Some("||="),
            TokenKind::QuestionQuestionEqualsToken => Some("??="),
            TokenKind::JsxTagStart => Some("<"),
            TokenKind::JsxTagEnd => Some(">"),
            _ => None,
        }
    }

    /// Human-readable label used in "expected ..." messages.
    pub fn label(self) -> &'static str {
        self.punctuation_text()
            .or_else(|| self.keyword_text())
            .unwrap_or(match self {
                TokenKind::EndOfFileToken => "eof",
                TokenKind::NumericLiteral => "num",
                TokenKind::BigIntLiteral => "bigint",
                TokenKind::StringLiteral => "string",
                TokenKind::RegularExpressionLiteral => "regexp",
                TokenKind::TemplateNonTail | TokenKind::TemplateTail => "template",
                TokenKind::Identifier => "name",
                TokenKind::PrivateName => "#name",
                TokenKind::InterpreterDirective => "interpreterDirective",
                TokenKind::JsxName => "jsxName",
                TokenKind::JsxText => "jsxText",
                _ => "token",
            })
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The literal payload of a token.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    #[default]
    None,
    /// Identifier names, cooked string contents, JSX text and names.
    Str(String),
    Num(f64),
    /// BigInt digits as written (radix prefix kept), without separators
    /// or the `n` suffix.
    BigInt(String),
    RegExp { pattern: String, flags: String },
    /// A template chunk. `cooked` is `None` when it holds an invalid escape.
    Template { raw: String, cooked: Option<String> },
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for TokenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenValue::None => serializer.serialize_none(),
            TokenValue::Str(s) | TokenValue::BigInt(s) => serializer.serialize_str(s),
            TokenValue::Num(n) => serializer.serialize_f64(*n),
            TokenValue::RegExp { pattern, flags } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("pattern", pattern)?;
                map.serialize_entry("flags", flags)?;
                map.end()
            }
            TokenValue::Template { raw, cooked } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("raw", raw)?;
                map.serialize_entry("cooked", cooked)?;
                map.end()
            }
        }
    }
}

/// A finished token as retained on the output when `tokens` is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, start: Position, end: Position) -> Self {
        Self {
            kind,
            value,
            span: Span::new(start, end),
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.label())?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("start", &self.span.start.index)?;
        map.serialize_entry("end", &self.span.end.index)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_roundtrip() {
        for kind in [
            TokenKind::BreakKeyword,
            TokenKind::InstanceOfKeyword,
            TokenKind::WithKeyword,
        ] {
            let text = kind.keyword_text().unwrap();
            assert_eq!(TokenKind::from_keyword(text), Some(kind));
            assert!(kind.is_keyword());
        }
        assert_eq!(TokenKind::from_keyword("let"), None);
        assert_eq!(TokenKind::from_keyword("interface"), None);
    }

    #[test]
    fn test_assignment_ranges() {
        assert!(TokenKind::EqualsToken.is_assignment_operator());
        assert!(!TokenKind::EqualsToken.is_compound_assignment());
        assert!(TokenKind::QuestionQuestionEqualsToken.is_compound_assignment());
        assert!(!TokenKind::EqualsEqualsToken.is_assignment_operator());
    }

    #[test]
    fn test_before_expression() {
        assert!(TokenKind::OpenParenToken.comes_before_expression());
        assert!(TokenKind::ReturnKeyword.comes_before_expression());
        assert!(!TokenKind::CloseParenToken.comes_before_expression());
        assert!(!TokenKind::Identifier.comes_before_expression());
    }

    #[test]
    fn test_labels() {
        assert_eq!(TokenKind::EqualsGreaterThanToken.to_string(), "=>");
        assert_eq!(TokenKind::EndOfFileToken.to_string(), "eof");
        assert_eq!(TokenKind::JsxTagEnd.label(), ">");
    }
}
