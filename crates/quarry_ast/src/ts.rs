//! TypeScript node definitions: types, type elements and declarations.

use crate::node::{is_false, Expression, Identifier, Statement, TemplateElement};
use quarry_core::text::Span;
use serde::Serialize;

// ============================================================================
// Annotations and parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct TSTypeAnnotation {
    #[serde(flatten)]
    pub span: Span,
    pub type_annotation: TSType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TSTypeParameterDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub params: Vec<TSTypeParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TSTypeParameter {
    #[serde(flatten)]
    pub span: Span,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Box<TSType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Box<TSType>>,
    #[serde(rename = "in", skip_serializing_if = "is_false")]
    pub is_in: bool,
    #[serde(rename = "out", skip_serializing_if = "is_false")]
    pub is_out: bool,
    #[serde(rename = "const", skip_serializing_if = "is_false")]
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TSTypeParameterInstantiation {
    #[serde(flatten)]
    pub span: Span,
    pub params: Vec<TSType>,
}

/// `A` or `A.B.C`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSEntityName {
    Identifier(Identifier),
    TSQualifiedName(Box<TSQualifiedName>),
}

impl TSEntityName {
    pub fn span(&self) -> &Span {
        match self {
            TSEntityName::Identifier(id) => &id.span,
            TSEntityName::TSQualifiedName(q) => &q.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSQualifiedName {
    #[serde(flatten)]
    pub span: Span,
    pub left: TSEntityName,
    pub right: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct TSExpressionWithTypeArguments {
    #[serde(flatten)]
    pub span: Span,
    pub expression: TSEntityName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSKeyword {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSType {
    TSAnyKeyword(TSKeyword),
    TSUnknownKeyword(TSKeyword),
    TSNumberKeyword(TSKeyword),
    TSObjectKeyword(TSKeyword),
    TSBooleanKeyword(TSKeyword),
    TSBigIntKeyword(TSKeyword),
    TSStringKeyword(TSKeyword),
    TSSymbolKeyword(TSKeyword),
    TSVoidKeyword(TSKeyword),
    TSUndefinedKeyword(TSKeyword),
    TSNullKeyword(TSKeyword),
    TSNeverKeyword(TSKeyword),
    TSIntrinsicKeyword(TSKeyword),
    TSThisType(TSKeyword),
    TSFunctionType(TSSignature),
    TSConstructorType(TSSignature),
    TSTypeReference(TSTypeReference),
    TSTypePredicate(TSTypePredicate),
    TSTypeQuery(TSTypeQuery),
    TSTypeLiteral(TSTypeLiteral),
    TSArrayType(TSArrayType),
    TSTupleType(TSTupleType),
    TSOptionalType(TSWrappedType),
    TSRestType(TSWrappedType),
    TSNamedTupleMember(TSNamedTupleMember),
    TSUnionType(TSTypeList),
    TSIntersectionType(TSTypeList),
    TSConditionalType(TSConditionalType),
    TSInferType(TSInferType),
    TSParenthesizedType(TSWrappedType),
    TSTypeOperator(TSTypeOperator),
    TSIndexedAccessType(TSIndexedAccessType),
    TSMappedType(TSMappedType),
    TSLiteralType(TSLiteralType),
    TSImportType(TSImportType),
}

macro_rules! type_accessors {
    ($($variant:ident),* $(,)?) => {
        impl TSType {
            pub fn span(&self) -> &Span {
                match self {
                    $(TSType::$variant(n) => &n.span,)*
                }
            }

            pub fn span_mut(&mut self) -> &mut Span {
                match self {
                    $(TSType::$variant(n) => &mut n.span,)*
                }
            }
        }
    };
}

type_accessors!(
    TSAnyKeyword, TSUnknownKeyword, TSNumberKeyword, TSObjectKeyword,
    TSBooleanKeyword, TSBigIntKeyword, TSStringKeyword, TSSymbolKeyword,
    TSVoidKeyword, TSUndefinedKeyword, TSNullKeyword, TSNeverKeyword,
    TSIntrinsicKeyword, TSThisType, TSFunctionType, TSConstructorType,
    TSTypeReference, TSTypePredicate, TSTypeQuery, TSTypeLiteral, TSArrayType,
    TSTupleType, TSOptionalType, TSRestType, TSNamedTupleMember, TSUnionType,
    TSIntersectionType, TSConditionalType, TSInferType, TSParenthesizedType,
    TSTypeOperator, TSIndexedAccessType, TSMappedType, TSLiteralType,
    TSImportType,
);

impl TSType {
    /// Keyword type for a reserved type name such as `string` or `never`.
    pub fn keyword(name: &str, span: Span) -> Option<TSType> {
        let k = TSKeyword { span };
        Some(match name {
            "any" => TSType::TSAnyKeyword(k),
            "unknown" => TSType::TSUnknownKeyword(k),
            "number" => TSType::TSNumberKeyword(k),
            "object" => TSType::TSObjectKeyword(k),
            "boolean" => TSType::TSBooleanKeyword(k),
            "bigint" => TSType::TSBigIntKeyword(k),
            "string" => TSType::TSStringKeyword(k),
            "symbol" => TSType::TSSymbolKeyword(k),
            "undefined" => TSType::TSUndefinedKeyword(k),
            "never" => TSType::TSNeverKeyword(k),
            _ => return None,
        })
    }

    pub fn is_this_type(&self) -> bool {
        matches!(self, TSType::TSThisType(_))
    }
}

/// Function, constructor, call and construct signatures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSSignature {
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    pub parameters: Vec<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypeReference {
    #[serde(flatten)]
    pub span: Span,
    pub type_name: TSEntityName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSTypePredicateName {
    Identifier(Identifier),
    TSThisType(TSKeyword),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypePredicate {
    #[serde(flatten)]
    pub span: Span,
    pub parameter_name: TSTypePredicateName,
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
    pub asserts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSTypeQueryName {
    Identifier(Identifier),
    TSQualifiedName(Box<TSQualifiedName>),
    TSImportType(TSImportType),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypeQuery {
    #[serde(flatten)]
    pub span: Span,
    pub expr_name: TSTypeQueryName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSTypeLiteral {
    #[serde(flatten)]
    pub span: Span,
    pub members: Vec<TSTypeElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSArrayType {
    #[serde(flatten)]
    pub span: Span,
    pub element_type: Box<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTupleType {
    #[serde(flatten)]
    pub span: Span,
    pub element_types: Vec<TSType>,
}

/// A single wrapped type: optional, rest and parenthesized types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSWrappedType {
    #[serde(flatten)]
    pub span: Span,
    pub type_annotation: Box<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSNamedTupleMember {
    #[serde(flatten)]
    pub span: Span,
    pub label: Identifier,
    pub element_type: Box<TSType>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSTypeList {
    #[serde(flatten)]
    pub span: Span,
    pub types: Vec<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSConditionalType {
    #[serde(flatten)]
    pub span: Span,
    pub check_type: Box<TSType>,
    pub extends_type: Box<TSType>,
    pub true_type: Box<TSType>,
    pub false_type: Box<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSInferType {
    #[serde(flatten)]
    pub span: Span,
    pub type_parameter: TSTypeParameter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TSTypeOperatorKind {
    Keyof,
    Unique,
    Readonly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypeOperator {
    #[serde(flatten)]
    pub span: Span,
    pub operator: TSTypeOperatorKind,
    pub type_annotation: Box<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSIndexedAccessType {
    #[serde(flatten)]
    pub span: Span,
    pub object_type: Box<TSType>,
    pub index_type: Box<TSType>,
}

/// `readonly` / `?` modifier on a mapped type: plain, `+` or `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TSMappedModifier {
    Plain(bool),
    Signed(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSMappedType {
    #[serde(flatten)]
    pub span: Span,
    pub type_parameter: TSTypeParameter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_type: Option<Box<TSType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<TSMappedModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<TSMappedModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSTemplateLiteralType {
    #[serde(flatten)]
    pub span: Span,
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSLiteral {
    TemplateLiteral(TSTemplateLiteralType),
    /// String, numeric, boolean or BigInt literal, or a negated number.
    #[serde(untagged)]
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSLiteralType {
    #[serde(flatten)]
    pub span: Span,
    pub literal: TSLiteral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSImportType {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<TSEntityName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

// ============================================================================
// Type elements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSTypeElement {
    TSPropertySignature(TSPropertySignature),
    TSMethodSignature(TSMethodSignature),
    TSCallSignatureDeclaration(TSSignature),
    TSConstructSignatureDeclaration(TSSignature),
    TSIndexSignature(TSIndexSignature),
}

impl TSTypeElement {
    pub fn span(&self) -> &Span {
        match self {
            TSTypeElement::TSPropertySignature(n) => &n.span,
            TSTypeElement::TSMethodSignature(n) => &n.span,
            TSTypeElement::TSCallSignatureDeclaration(n)
            | TSTypeElement::TSConstructSignatureDeclaration(n) => &n.span,
            TSTypeElement::TSIndexSignature(n) => &n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSPropertySignature {
    #[serde(flatten)]
    pub span: Span,
    pub key: Box<Expression>,
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TSMethodSignatureKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSMethodSignature {
    #[serde(flatten)]
    pub span: Span,
    pub key: Box<Expression>,
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    pub kind: TSMethodSignatureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    pub parameters: Vec<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSIndexSignature {
    #[serde(flatten)]
    pub span: Span,
    pub parameters: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<Box<TSTypeAnnotation>>,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(rename = "static", skip_serializing_if = "is_false")]
    pub is_static: bool,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TSInterfaceBody {
    #[serde(flatten)]
    pub span: Span,
    pub body: Vec<TSTypeElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSInterfaceDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TSExpressionWithTypeArguments>,
    pub body: TSInterfaceBody,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypeAliasDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterDeclaration>,
    pub type_annotation: TSType,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSEnumDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub id: Identifier,
    pub members: Vec<TSEnumMember>,
    #[serde(rename = "const", skip_serializing_if = "is_false")]
    pub is_const: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TSEnumMember {
    #[serde(flatten)]
    pub span: Span,
    /// Identifier or string literal.
    pub id: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Box<Expression>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TSModuleKind {
    Global,
    Module,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSModuleBody {
    TSModuleBlock(TSModuleBlock),
    TSModuleDeclaration(Box<TSModuleDeclaration>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSModuleBlock {
    #[serde(flatten)]
    pub span: Span,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSModuleDeclaration {
    #[serde(flatten)]
    pub span: Span,
    /// Identifier or string literal.
    pub id: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<TSModuleBody>,
    pub kind: TSModuleKind,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TSModuleReference {
    Identifier(Identifier),
    TSQualifiedName(Box<TSQualifiedName>),
    TSExternalModuleReference(TSExternalModuleReference),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSExternalModuleReference {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSImportEqualsDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub id: Identifier,
    pub module_reference: TSModuleReference,
    pub is_export: bool,
    pub import_kind: crate::node::ImportOrExportKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSExportAssignment {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSNamespaceExportDeclaration {
    #[serde(flatten)]
    pub span: Span,
    pub id: Identifier,
}

// ============================================================================
// Expression-level nodes
// ============================================================================

/// `expr as T` and `expr satisfies T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSAsExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
    pub type_annotation: Box<TSType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypeAssertion {
    #[serde(flatten)]
    pub span: Span,
    pub type_annotation: Box<TSType>,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSNonNullExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSInstantiationExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
    pub type_parameters: TSTypeParameterInstantiation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TSTypeCastExpression {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
    pub type_annotation: Box<TSTypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TSParameterProperty {
    #[serde(flatten)]
    pub span: Span,
    /// Identifier or assignment pattern.
    pub parameter: Box<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<crate::node::Accessibility>,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub is_override: bool,
}
