//! JSX node definitions.

use crate::node::{Expression, LiteralExtra};
use crate::ts::TSTypeParameterInstantiation;
use quarry_core::text::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JSXElement {
    #[serde(flatten)]
    pub span: Span,
    pub opening_element: JSXOpeningElement,
    pub closing_element: Option<JSXClosingElement>,
    pub children: Vec<JSXChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct JSXOpeningElement {
    #[serde(flatten)]
    pub span: Span,
    pub name: JSXElementName,
    pub attributes: Vec<JSXAttributeItem>,
    pub self_closing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TSTypeParameterInstantiation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct JSXClosingElement {
    #[serde(flatten)]
    pub span: Span,
    pub name: JSXElementName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JSXFragment {
    #[serde(flatten)]
    pub span: Span,
    pub opening_fragment: JSXOpeningFragment,
    pub closing_fragment: JSXClosingFragment,
    pub children: Vec<JSXChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct JSXOpeningFragment {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct JSXClosingFragment {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXIdentifier {
    #[serde(flatten)]
    pub span: Span,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXNamespacedName {
    #[serde(flatten)]
    pub span: Span,
    pub namespace: JSXIdentifier,
    pub name: JSXIdentifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXMemberExpression {
    #[serde(flatten)]
    pub span: Span,
    pub object: Box<JSXElementName>,
    pub property: JSXIdentifier,
}

/// Tag names. Only identifiers and member expressions may be the object
/// of a member expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JSXElementName {
    JSXIdentifier(JSXIdentifier),
    JSXNamespacedName(JSXNamespacedName),
    JSXMemberExpression(JSXMemberExpression),
}

impl JSXElementName {
    pub fn span(&self) -> &Span {
        match self {
            JSXElementName::JSXIdentifier(n) => &n.span,
            JSXElementName::JSXNamespacedName(n) => &n.span,
            JSXElementName::JSXMemberExpression(n) => &n.span,
        }
    }

    /// Qualified name used to match opening and closing tags.
    pub fn qualified_name(&self) -> String {
        match self {
            JSXElementName::JSXIdentifier(id) => id.name.clone(),
            JSXElementName::JSXNamespacedName(ns) => {
                format!("{}:{}", ns.namespace.name, ns.name.name)
            }
            JSXElementName::JSXMemberExpression(m) => {
                format!("{}.{}", m.object.qualified_name(), m.property.name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JSXAttributeName {
    JSXIdentifier(JSXIdentifier),
    JSXNamespacedName(JSXNamespacedName),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JSXAttributeItem {
    JSXAttribute(JSXAttribute),
    JSXSpreadAttribute(JSXSpreadAttribute),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXAttribute {
    #[serde(flatten)]
    pub span: Span,
    pub name: JSXAttributeName,
    pub value: Option<JSXAttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JSXAttributeValue {
    JSXExpressionContainer(JSXExpressionContainer),
    JSXElement(Box<JSXElement>),
    JSXFragment(Box<JSXFragment>),
    /// A string literal in either tree shape.
    #[serde(untagged)]
    Literal(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXSpreadAttribute {
    #[serde(flatten)]
    pub span: Span,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JSXExpression {
    JSXEmptyExpression(JSXEmptyExpression),
    #[serde(untagged)]
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXEmptyExpression {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXExpressionContainer {
    #[serde(flatten)]
    pub span: Span,
    pub expression: JSXExpression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXSpreadChild {
    #[serde(flatten)]
    pub span: Span,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JSXText {
    #[serde(flatten)]
    pub span: Span,
    pub value: String,
    pub extra: LiteralExtra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum JSXChild {
    JSXText(JSXText),
    JSXExpressionContainer(JSXExpressionContainer),
    JSXSpreadChild(JSXSpreadChild),
    JSXElement(Box<JSXElement>),
    JSXFragment(Box<JSXFragment>),
}

impl JSXChild {
    pub fn span(&self) -> &Span {
        match self {
            JSXChild::JSXText(n) => &n.span,
            JSXChild::JSXExpressionContainer(n) => &n.span,
            JSXChild::JSXSpreadChild(n) => &n.span,
            JSXChild::JSXElement(n) => &n.span,
            JSXChild::JSXFragment(n) => &n.span,
        }
    }
}
