//! AST node definitions.
//!
//! Nodes are grouped into sum types per syntactic category (`Expression`,
//! `Statement`, `ObjectMember`, `ClassMember`, ...). Each variant is named
//! after the node type it represents, and that name becomes the `type` field
//! when the tree is serialized. Patterns live inside `Expression` because
//! an already-parsed expression can turn out to be an assignment target.

use crate::jsx::{JSXElement, JSXFragment};
use crate::ops::*;
use crate::ts::*;
use quarry_core::text::{Position, Span};
use serde::Serialize;

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

// ============================================================================
// Root
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct File {
    #[serde(flatten)]
    pub span: Span,
    pub program: Program,
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<crate::token_kind::Token>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Program {
    #[serde(flatten)]
    pub span: Span,
    pub source_type: SourceType,
    pub interpreter: Option<InterpreterDirective>,
    pub body: Vec<Statement>,
    /// `None` once directives have been folded into `body`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directives: Option<Vec<Directive>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InterpreterDirective {
    #[serde(flatten)]
    pub span: Span,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    CommentLine,
    CommentBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub value: String,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Directive {
    #[serde(flatten)]
    pub span: Span,
    pub value: DirectiveLiteral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct DirectiveLiteral {
    #[serde(flatten)]
    pub span: Span,
    /// The text between the quotes, escapes left as written.
    pub value: String,
    pub extra: LiteralExtra,
    /// The cooked string value, for turning the directive back into an
    /// expression statement.
    #[serde(skip)]
    pub expression_value: String,
}

/// Raw source text of a literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralExtra {
    pub raw: String,
}

// ============================================================================
// Identifiers and literals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(flatten)]
    pub span: Span,
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

impl Identifier {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
            optional: false,
            type_annotation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivateName {
    #[serde(flatten)]
    pub span: Span,
    pub id: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub value: String,
    pub extra: LiteralExtra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub value: f64,
    pub extra: LiteralExtra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BigIntLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub value: String,
    pub extra: LiteralExtra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullLiteral {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegExpLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub pattern: String,
    pub flags: String,
    pub extra: LiteralExtra,
}

/// The single literal node of the ESTree shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    #[serde(flatten)]
    pub span: Span,
    pub value: LiteralValue,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegExpValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// `null`, and the value of regular expression and BigInt literals.
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegExpValue {
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TemplateElement {
    #[serde(flatten)]
    pub span: Span,
    pub value: TemplateElementValue,
    pub tail: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateElementValue {
    pub raw: String,
    pub cooked: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedTemplateExpression {
    #[serde(flatten)]
    pub span: Span,
    pub tag: Box<Expression>,
    pub quasi: TemplateLiteral,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

/// A node with no children besides its span (`this`, `super`, `import`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaProperty {
    #[serde(flatten)]
    pub span: Span,
    pub meta: Identifier,
    pub property: Identifier,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    PrivateName(PrivateName),
    StringLiteral(StringLiteral),
    NumericLiteral(NumericLiteral),
    BigIntLiteral(BigIntLiteral),
    BooleanLiteral(BooleanLiteral),
    NullLiteral(NullLiteral),
    RegExpLiteral(RegExpLiteral),
    TemplateLiteral(TemplateLiteral),
    TaggedTemplateExpression(TaggedTemplateExpression),
    ThisExpression(Keyword),
    Super(Keyword),
    Import(Keyword),
    MetaProperty(MetaProperty),
    ArrayExpression(ArrayExpression),
    ObjectExpression(ObjectExpression),
    FunctionExpression(Function),
    ArrowFunctionExpression(ArrowFunctionExpression),
    ClassExpression(Class),
    UnaryExpression(UnaryExpression),
    UpdateExpression(UpdateExpression),
    BinaryExpression(BinaryExpression),
    LogicalExpression(LogicalExpression),
    AssignmentExpression(AssignmentExpression),
    ConditionalExpression(ConditionalExpression),
    SequenceExpression(SequenceExpression),
    CallExpression(CallExpression),
    OptionalCallExpression(CallExpression),
    NewExpression(CallExpression),
    MemberExpression(MemberExpression),
    OptionalMemberExpression(MemberExpression),
    YieldExpression(YieldExpression),
    AwaitExpression(AwaitExpression),
    SpreadElement(SpreadElement),
    ParenthesizedExpression(ParenthesizedExpression),

    // Patterns
    ObjectPattern(ObjectPattern),
    ArrayPattern(ArrayPattern),
    AssignmentPattern(AssignmentPattern),
    RestElement(RestElement),

    // JSX
    JSXElement(Box<JSXElement>),
    JSXFragment(Box<JSXFragment>),

    // TypeScript
    TSAsExpression(TSAsExpression),
    TSSatisfiesExpression(TSAsExpression),
    TSTypeAssertion(TSTypeAssertion),
    TSNonNullExpression(TSNonNullExpression),
    TSInstantiationExpression(TSInstantiationExpression),
    /// Transient `(expr: Type)` form; only valid inside arrow parameters.
    TSTypeCastExpression(TSTypeCastExpression),
    TSParameterProperty(TSParameterProperty),

    // ESTree
    Literal(Literal),
    ImportExpression(ImportExpression),
    ChainExpression(ChainExpression),
    PrivateIdentifier(PrivateIdentifier),
}

macro_rules! expression_accessors {
    ($($variant:ident),* $(,)?) => {
        impl Expression {
            pub fn span(&self) -> &Span {
                match self {
                    $(Expression::$variant(n) => &n.span,)*
                }
            }

            pub fn span_mut(&mut self) -> &mut Span {
                match self {
                    $(Expression::$variant(n) => &mut n.span,)*
                }
            }

            /// The node type name, as it appears in serialized output.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Expression::$variant(_) => stringify!($variant),)*
                }
            }
        }
    };
}

expression_accessors!(
    Identifier, PrivateName, StringLiteral, NumericLiteral, BigIntLiteral,
    BooleanLiteral, NullLiteral, RegExpLiteral, TemplateLiteral,
    TaggedTemplateExpression, ThisExpression, Super, Import, MetaProperty,
    ArrayExpression, ObjectExpression, FunctionExpression,
    ArrowFunctionExpression, ClassExpression, UnaryExpression,
    UpdateExpression, BinaryExpression, LogicalExpression,
    AssignmentExpression, ConditionalExpression, SequenceExpression,
    CallExpression, OptionalCallExpression, NewExpression, MemberExpression,
    OptionalMemberExpression, YieldExpression, AwaitExpression,
    SpreadElement, ParenthesizedExpression, ObjectPattern, ArrayPattern,
    AssignmentPattern, RestElement, JSXElement, JSXFragment, TSAsExpression,
    TSSatisfiesExpression, TSTypeAssertion, TSNonNullExpression,
    TSInstantiationExpression, TSTypeCastExpression, TSParameterProperty,
    Literal, ImportExpression, ChainExpression, PrivateIdentifier,
);

impl Expression {
    pub fn is_identifier(&self) -> bool {
        matches!(self, Expression::Identifier(_))
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this is a plain or optional member access.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            Expression::MemberExpression(_) | Expression::OptionalMemberExpression(_)
        )
    }

    /// String value of a string-literal node in either tree shape.
    pub fn string_value(&self) -> Option<&str> {
        match self {
            Expression::StringLiteral(lit) => Some(&lit.value),
            Expression::Literal(Literal {
                value: LiteralValue::String(s),
                ..
            }) => Some(s),
            _ => None,
        }
    }

    pub fn is_string_literal(&self) -> bool {
        self.string_value().is_some()
    }

    /// Builds a bare identifier expression.
    pub fn ident(span: Span, name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(span, name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpression {
    #[serde(flatten)]
    pub span: Span,
    pub elements: Vec<Option<Expression>>,
    /// Position of a trailing comma, kept for the rest-element check.
    #[serde(skip)]
    pub trailing_comma: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpression {
    #[serde(flatten)]
    pub span: Span,
    pub properties: Vec<ObjectMember>,
    #[serde(skip)]
    pub trailing_comma: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    #[serde(flatten)]
    pub span: Span,
    pub operator: UnaryOperator,
    pub prefix: bool,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateExpression {
    #[serde(flatten)]
    pub span: Span,
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    #[serde(flatten)]
    pub span: Span,
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalExpression {
    #[serde(flatten)]
    pub span: Span,
    pub operator: LogicalOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentExpression {
    #[serde(flatten)]
    pub span: Span,
    pub operator: AssignmentOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalExpression {
    #[serde(flatten)]
    pub span: Span,
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expressions: Vec<Expression>,
}

/// Shared by `CallExpression`, `OptionalCallExpression` and `NewExpression`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallExpression {
    #[serde(flatten)]
    pub span: Span,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    /// `Some` only on optional-chain calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

/// Shared by `MemberExpression` and `OptionalMemberExpression`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpression {
    #[serde(flatten)]
    pub span: Span,
    pub object: Box<Expression>,
    pub property: Box<Expression>,
    pub computed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldExpression {
    #[serde(flatten)]
    pub span: Span,
    pub delegate: bool,
    pub argument: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwaitExpression {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadElement {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenthesizedExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPattern {
    #[serde(flatten)]
    pub span: Span,
    pub properties: Vec<ObjectMember>,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayPattern {
    #[serde(flatten)]
    pub span: Span,
    pub elements: Vec<Option<Expression>>,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPattern {
    #[serde(flatten)]
    pub span: Span,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestElement {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Box<Expression>,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

// ============================================================================
// Functions
// ============================================================================

/// Parameters, body and signature shared by every function-like node.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionParts {
    pub params: Vec<Expression>,
    /// `None` for bodiless declarations (overloads, ambient functions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BlockStatement>,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Box<TSTypeAnnotation>>,
    /// Where the signature starts (the `(` or the type parameter list).
    #[serde(skip)]
    pub params_start: Position,
}

/// `FunctionDeclaration`, `FunctionExpression` or `TSDeclareFunction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    #[serde(flatten)]
    pub span: Span,
    pub id: Option<Identifier>,
    #[serde(flatten)]
    pub function: FunctionParts,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ArrowBody {
    BlockStatement(BlockStatement),
    #[serde(untagged)]
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowFunctionExpression {
    #[serde(flatten)]
    pub span: Span,
    pub params: Vec<Expression>,
    pub body: ArrowBody,
    #[serde(rename = "async")]
    pub is_async: bool,
    /// True when the body is an expression.
    pub expression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Box<TSTypeAnnotation>>,
}

// ============================================================================
// Object members
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ObjectMember {
    ObjectProperty(ObjectProperty),
    ObjectMethod(ObjectMethod),
    SpreadElement(SpreadElement),
    RestElement(RestElement),
    /// ESTree object member.
    Property(Property),
}

impl ObjectMember {
    pub fn span(&self) -> &Span {
        match self {
            ObjectMember::ObjectProperty(n) => &n.span,
            ObjectMember::ObjectMethod(n) => &n.span,
            ObjectMember::SpreadElement(n) => &n.span,
            ObjectMember::RestElement(n) => &n.span,
            ObjectMember::Property(n) => &n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProperty {
    #[serde(flatten)]
    pub span: Span,
    pub key: Box<Expression>,
    pub value: Box<Expression>,
    pub computed: bool,
    pub shorthand: bool,
    pub method: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMethod {
    #[serde(flatten)]
    pub span: Span,
    pub kind: MethodKind,
    pub key: Box<Expression>,
    pub computed: bool,
    pub method: bool,
    #[serde(flatten)]
    pub function: FunctionParts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// ESTree `Property`. Methods carry a `FunctionExpression` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    #[serde(flatten)]
    pub span: Span,
    pub key: Box<Expression>,
    pub value: Box<Expression>,
    pub kind: PropertyKind,
    pub method: bool,
    pub shorthand: bool,
    pub computed: bool,
}

// ============================================================================
// Classes
// ============================================================================

/// `ClassDeclaration` or `ClassExpression`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(flatten)]
    pub span: Span,
    pub id: Option<Identifier>,
    pub super_class: Option<Box<Expression>>,
    pub body: ClassBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_type_parameters: Option<TSTypeParameterInstantiation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TSExpressionWithTypeArguments>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ClassBody {
    #[serde(flatten)]
    pub span: Span,
    pub body: Vec<ClassMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Public,
    Private,
    Protected,
}

impl Accessibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Private => "private",
            Accessibility::Protected => "protected",
        }
    }
}

/// TypeScript modifiers a class member may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClassMemberModifiers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub is_override: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub definite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClassMember {
    ClassMethod(ClassMethod),
    ClassPrivateMethod(ClassMethod),
    ClassProperty(ClassProperty),
    ClassPrivateProperty(ClassProperty),
    StaticBlock(StaticBlock),
    TSIndexSignature(TSIndexSignature),
    TSDeclareMethod(ClassMethod),
    /// ESTree method; `value` is a `FunctionExpression`.
    MethodDefinition(MethodDefinition),
    /// ESTree class field.
    PropertyDefinition(ClassProperty),
}

impl ClassMember {
    pub fn span(&self) -> &Span {
        match self {
            ClassMember::ClassMethod(n)
            | ClassMember::ClassPrivateMethod(n)
            | ClassMember::TSDeclareMethod(n) => &n.span,
            ClassMember::ClassProperty(n)
            | ClassMember::ClassPrivateProperty(n)
            | ClassMember::PropertyDefinition(n) => &n.span,
            ClassMember::StaticBlock(n) => &n.span,
            ClassMember::TSIndexSignature(n) => &n.span,
            ClassMember::MethodDefinition(n) => &n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMethod {
    #[serde(flatten)]
    pub span: Span,
    pub kind: MethodKind,
    pub key: Box<Expression>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub modifiers: ClassMemberModifiers,
    #[serde(flatten)]
    pub function: FunctionParts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProperty {
    #[serde(flatten)]
    pub span: Span,
    pub key: Box<Expression>,
    pub value: Option<Box<Expression>>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub modifiers: ClassMemberModifiers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticBlock {
    #[serde(flatten)]
    pub span: Span,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    #[serde(flatten)]
    pub span: Span,
    pub kind: MethodKind,
    pub key: Box<Expression>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub modifiers: ClassMemberModifiers,
    pub value: Box<Expression>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    BlockStatement(BlockStatement),
    EmptyStatement(Keyword),
    DebuggerStatement(Keyword),
    ExpressionStatement(ExpressionStatement),
    IfStatement(IfStatement),
    LabeledStatement(LabeledStatement),
    BreakStatement(JumpStatement),
    ContinueStatement(JumpStatement),
    WithStatement(WithStatement),
    SwitchStatement(SwitchStatement),
    ReturnStatement(ReturnStatement),
    ThrowStatement(ThrowStatement),
    TryStatement(TryStatement),
    WhileStatement(WhileStatement),
    DoWhileStatement(WhileStatement),
    ForStatement(ForStatement),
    ForInStatement(ForInStatement),
    ForOfStatement(ForInStatement),
    FunctionDeclaration(Function),
    VariableDeclaration(VariableDeclaration),
    ClassDeclaration(Class),
    ImportDeclaration(ImportDeclaration),
    ExportNamedDeclaration(ExportNamedDeclaration),
    ExportDefaultDeclaration(ExportDefaultDeclaration),
    ExportAllDeclaration(ExportAllDeclaration),

    // TypeScript
    TSDeclareFunction(Function),
    TSInterfaceDeclaration(TSInterfaceDeclaration),
    TSTypeAliasDeclaration(TSTypeAliasDeclaration),
    TSEnumDeclaration(TSEnumDeclaration),
    TSModuleDeclaration(TSModuleDeclaration),
    TSImportEqualsDeclaration(TSImportEqualsDeclaration),
    TSExportAssignment(TSExportAssignment),
    TSNamespaceExportDeclaration(TSNamespaceExportDeclaration),
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::BlockStatement(n) => &n.span,
            Statement::EmptyStatement(n) | Statement::DebuggerStatement(n) => &n.span,
            Statement::ExpressionStatement(n) => &n.span,
            Statement::IfStatement(n) => &n.span,
            Statement::LabeledStatement(n) => &n.span,
            Statement::BreakStatement(n) | Statement::ContinueStatement(n) => &n.span,
            Statement::WithStatement(n) => &n.span,
            Statement::SwitchStatement(n) => &n.span,
            Statement::ReturnStatement(n) => &n.span,
            Statement::ThrowStatement(n) => &n.span,
            Statement::TryStatement(n) => &n.span,
            Statement::WhileStatement(n) | Statement::DoWhileStatement(n) => &n.span,
            Statement::ForStatement(n) => &n.span,
            Statement::ForInStatement(n) | Statement::ForOfStatement(n) => &n.span,
            Statement::FunctionDeclaration(n) | Statement::TSDeclareFunction(n) => &n.span,
            Statement::VariableDeclaration(n) => &n.span,
            Statement::ClassDeclaration(n) => &n.span,
            Statement::ImportDeclaration(n) => &n.span,
            Statement::ExportNamedDeclaration(n) => &n.span,
            Statement::ExportDefaultDeclaration(n) => &n.span,
            Statement::ExportAllDeclaration(n) => &n.span,
            Statement::TSInterfaceDeclaration(n) => &n.span,
            Statement::TSTypeAliasDeclaration(n) => &n.span,
            Statement::TSEnumDeclaration(n) => &n.span,
            Statement::TSModuleDeclaration(n) => &n.span,
            Statement::TSImportEqualsDeclaration(n) => &n.span,
            Statement::TSExportAssignment(n) => &n.span,
            Statement::TSNamespaceExportDeclaration(n) => &n.span,
        }
    }

    pub fn span_mut(&mut self) -> &mut Span {
        match self {
            Statement::BlockStatement(n) => &mut n.span,
            Statement::EmptyStatement(n) | Statement::DebuggerStatement(n) => &mut n.span,
            Statement::ExpressionStatement(n) => &mut n.span,
            Statement::IfStatement(n) => &mut n.span,
            Statement::LabeledStatement(n) => &mut n.span,
            Statement::BreakStatement(n) | Statement::ContinueStatement(n) => &mut n.span,
            Statement::WithStatement(n) => &mut n.span,
            Statement::SwitchStatement(n) => &mut n.span,
            Statement::ReturnStatement(n) => &mut n.span,
            Statement::ThrowStatement(n) => &mut n.span,
            Statement::TryStatement(n) => &mut n.span,
            Statement::WhileStatement(n) | Statement::DoWhileStatement(n) => &mut n.span,
            Statement::ForStatement(n) => &mut n.span,
            Statement::ForInStatement(n) | Statement::ForOfStatement(n) => &mut n.span,
            Statement::FunctionDeclaration(n) | Statement::TSDeclareFunction(n) => &mut n.span,
            Statement::VariableDeclaration(n) => &mut n.span,
            Statement::ClassDeclaration(n) => &mut n.span,
            Statement::ImportDeclaration(n) => &mut n.span,
            Statement::ExportNamedDeclaration(n) => &mut n.span,
            Statement::ExportDefaultDeclaration(n) => &mut n.span,
            Statement::ExportAllDeclaration(n) => &mut n.span,
            Statement::TSInterfaceDeclaration(n) => &mut n.span,
            Statement::TSTypeAliasDeclaration(n) => &mut n.span,
            Statement::TSEnumDeclaration(n) => &mut n.span,
            Statement::TSModuleDeclaration(n) => &mut n.span,
            Statement::TSImportEqualsDeclaration(n) => &mut n.span,
            Statement::TSExportAssignment(n) => &mut n.span,
            Statement::TSNamespaceExportDeclaration(n) => &mut n.span,
        }
    }

    /// Whether this statement introduces a declaration that may follow
    /// `export`.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Statement::FunctionDeclaration(_)
                | Statement::VariableDeclaration(_)
                | Statement::ClassDeclaration(_)
                | Statement::TSDeclareFunction(_)
                | Statement::TSInterfaceDeclaration(_)
                | Statement::TSTypeAliasDeclaration(_)
                | Statement::TSEnumDeclaration(_)
                | Statement::TSModuleDeclaration(_)
                | Statement::TSImportEqualsDeclaration(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BlockStatement {
    #[serde(flatten)]
    pub span: Span,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directives: Option<Vec<Directive>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
    /// Raw directive text; set only in the ESTree shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    #[serde(flatten)]
    pub span: Span,
    pub test: Box<Expression>,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledStatement {
    #[serde(flatten)]
    pub span: Span,
    pub label: Identifier,
    pub body: Box<Statement>,
}

/// `break` or `continue`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpStatement {
    #[serde(flatten)]
    pub span: Span,
    pub label: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithStatement {
    #[serde(flatten)]
    pub span: Span,
    pub object: Box<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchStatement {
    #[serde(flatten)]
    pub span: Span,
    pub discriminant: Box<Expression>,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SwitchCase {
    #[serde(flatten)]
    pub span: Span,
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowStatement {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TryStatement {
    #[serde(flatten)]
    pub span: Span,
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CatchClause {
    #[serde(flatten)]
    pub span: Span,
    pub param: Option<Box<Expression>>,
    pub body: BlockStatement,
}

/// `while` and `do ... while`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    #[serde(flatten)]
    pub span: Span,
    pub test: Box<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ForInit {
    VariableDeclaration(VariableDeclaration),
    #[serde(untagged)]
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    #[serde(flatten)]
    pub span: Span,
    pub init: Option<ForInit>,
    pub test: Option<Box<Expression>>,
    pub update: Option<Box<Expression>>,
    pub body: Box<Statement>,
}

/// `for ... in` and `for ... of`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForInStatement {
    #[serde(flatten)]
    pub span: Span,
    pub left: ForInit,
    pub right: Box<Expression>,
    pub body: Box<Statement>,
    #[serde(rename = "await", skip_serializing_if = "is_false")]
    pub is_await: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclarator {
    #[serde(flatten)]
    pub span: Span,
    pub id: Box<Expression>,
    pub init: Option<Box<Expression>>,
    #[serde(skip_serializing_if = "is_false")]
    pub definite: bool,
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportOrExportKind {
    Value,
    Type,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub specifiers: Vec<ImportSpecifier>,
    /// A string literal node in either tree shape.
    pub source: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_kind: Option<ImportOrExportKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ImportSpecifier {
    ImportDefaultSpecifier(ImportLocalSpecifier),
    ImportNamespaceSpecifier(ImportLocalSpecifier),
    ImportSpecifier(ImportNamedSpecifier),
}

impl ImportSpecifier {
    pub fn local(&self) -> &Identifier {
        match self {
            ImportSpecifier::ImportDefaultSpecifier(s)
            | ImportSpecifier::ImportNamespaceSpecifier(s) => &s.local,
            ImportSpecifier::ImportSpecifier(s) => &s.local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportLocalSpecifier {
    #[serde(flatten)]
    pub span: Span,
    pub local: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportNamedSpecifier {
    #[serde(flatten)]
    pub span: Span,
    /// Identifier or string literal.
    pub imported: Box<Expression>,
    pub local: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_kind: Option<ImportOrExportKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNamedDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub declaration: Option<Box<Statement>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<Box<Expression>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ImportOrExportKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ExportSpecifier {
    ExportSpecifier(ExportNamedSpecifier),
    ExportNamespaceSpecifier(ExportNamespaceSpecifier),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNamedSpecifier {
    #[serde(flatten)]
    pub span: Span,
    /// Identifier or string literal.
    pub local: Box<Expression>,
    pub exported: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ImportOrExportKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNamespaceSpecifier {
    #[serde(flatten)]
    pub span: Span,
    pub exported: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ExportDefaultKind {
    FunctionDeclaration(Function),
    TSDeclareFunction(Function),
    ClassDeclaration(Class),
    TSInterfaceDeclaration(TSInterfaceDeclaration),
    #[serde(untagged)]
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDefaultDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub declaration: ExportDefaultKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAllDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub source: Box<Expression>,
    /// Set only in the ESTree shape for `export * as ns from`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported: Option<Box<Expression>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ImportOrExportKind>,
}

// ============================================================================
// ESTree-only expression nodes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportExpression {
    #[serde(flatten)]
    pub span: Span,
    pub source: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivateIdentifier {
    #[serde(flatten)]
    pub span: Span,
    pub name: String,
}
