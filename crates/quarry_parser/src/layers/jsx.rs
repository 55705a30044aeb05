//! JSX elements and the tag/child lexical modes they need.

use quarry_ast::jsx::*;
use quarry_ast::node::{Expression, LiteralExtra};
use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scanner::char_codes::is_identifier_start;
use quarry_scanner::TokContext;

use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::utilities::ExpressionErrors;
use crate::PResult;

pub(crate) struct JsxLayer {
    next: &'static dyn Grammar,
}

impl JsxLayer {
    pub(crate) fn new(next: &'static dyn Grammar) -> Self {
        Self { next }
    }
}

impl Grammar for JsxLayer {
    fn name(&self) -> &'static str {
        "jsx"
    }

    fn next(&self) -> &'static dyn Grammar {
        self.next
    }

    fn get_token_from_code(&self, p: &mut Parser<'_>, ch: char) -> PResult<()> {
        let context = p.cur_context();
        if context == TokContext::JsxChild {
            return p.lexer().jsx_read_token();
        }
        if context.is_jsx_tag() {
            if is_identifier_start(ch) {
                p.lexer().jsx_read_word();
                return Ok(());
            }
            if ch == '>' {
                let mut lexer = p.lexer();
                lexer.state.pos += 1;
                lexer.finish_token(TokenKind::JsxTagEnd, TokenValue::None);
                return Ok(());
            }
            if matches!(ch, '"' | '\'') && context == TokContext::JsxOpenTag {
                return p.lexer().jsx_read_string(ch);
            }
        }
        if ch == '<' && p.state.tok.can_start_jsx_element && p.char_at(p.state.tok.pos + 1) != Some('!') {
            let mut lexer = p.lexer();
            lexer.state.pos += 1;
            lexer.finish_token(TokenKind::JsxTagStart, TokenValue::None);
            return Ok(());
        }
        self.next.get_token_from_code(p, ch)
    }

    fn update_context(&self, p: &mut Parser<'_>, prev: TokenKind) {
        let kind = p.cur();
        let tok = &mut p.state.tok;
        match kind {
            TokenKind::SlashToken if prev == TokenKind::JsxTagStart => {
                tok.context.replace_top_pair(TokContext::JsxCloseTag);
                tok.can_start_jsx_element = false;
            }
            TokenKind::JsxTagStart => tok.context.push(TokContext::JsxOpenTag),
            TokenKind::JsxTagEnd => {
                let out = tok.context.current();
                if (out == TokContext::JsxOpenTag && prev == TokenKind::SlashToken) || out == TokContext::JsxCloseTag {
                    tok.context.pop();
                    tok.can_start_jsx_element = tok.context.current() == TokContext::JsxChild;
                } else {
                    tracing::trace!(at = tok.start, "tag end enters children");
                    tok.context.set_current(TokContext::JsxChild);
                    tok.can_start_jsx_element = true;
                }
            }
            _ => {
                tok.can_start_jsx_element = kind.comes_before_expression();
                self.next.update_context(p, prev);
            }
        }
    }

    fn parse_expr_atom(&self, p: &mut Parser<'_>, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        match p.cur() {
            TokenKind::JsxText => Err(p.unexpected(None)),
            TokenKind::JsxTagStart => Ok(p.jsx_parse_element()?.into_expression()),
            TokenKind::LessThanToken if p.char_at(p.state.tok.pos) != Some('!') => {
                p.replace_token(TokenKind::JsxTagStart);
                Ok(p.jsx_parse_element()?.into_expression())
            }
            _ => self.next.parse_expr_atom(p, refs),
        }
    }
}

/// A parsed element or fragment, before it is placed in a parent.
pub(crate) enum JsxNode {
    Element(Box<JSXElement>),
    Fragment(Box<JSXFragment>),
}

impl JsxNode {
    pub(crate) fn into_expression(self) -> Expression {
        match self {
            JsxNode::Element(element) => Expression::JSXElement(element),
            JsxNode::Fragment(fragment) => Expression::JSXFragment(fragment),
        }
    }

    fn into_child(self) -> JSXChild {
        match self {
            JsxNode::Element(element) => JSXChild::JSXElement(element),
            JsxNode::Fragment(fragment) => JSXChild::JSXFragment(fragment),
        }
    }
}

enum Opening {
    Element(JSXOpeningElement),
    Fragment(JSXOpeningFragment),
}

enum Closing {
    Element(JSXClosingElement),
    Fragment(JSXClosingFragment),
}

impl Parser<'_> {
    /// Parses an element whose `<` is the current token.
    pub(crate) fn jsx_parse_element(&mut self) -> PResult<JsxNode> {
        let start = self.start_pos();
        self.next()?;
        self.jsx_parse_element_at(start)
    }

    fn jsx_parse_element_at(&mut self, start: Position) -> PResult<JsxNode> {
        let opening = self.jsx_parse_opening_element_at(start)?;
        let self_closing = matches!(&opening, Opening::Element(el) if el.self_closing);
        let mut children = Vec::new();
        let mut closing = None;

        if !self_closing {
            loop {
                match self.cur() {
                    TokenKind::JsxTagStart => {
                        let child_start = self.start_pos();
                        self.next()?;
                        if self.eat(TokenKind::SlashToken)? {
                            closing = Some(self.jsx_parse_closing_element_at(child_start)?);
                            break;
                        }
                        children.push(self.jsx_parse_element_at(child_start)?.into_child());
                    }
                    TokenKind::JsxText => children.push(JSXChild::JSXText(self.jsx_parse_text()?)),
                    TokenKind::OpenBraceToken => {
                        let child_start = self.start_pos();
                        self.state.tok.context.set_current(TokContext::Brace);
                        self.next()?;
                        if self.is(TokenKind::DotDotDotToken) {
                            children.push(JSXChild::JSXSpreadChild(self.jsx_parse_spread_child(child_start)?));
                        } else {
                            let container = self.jsx_parse_expression_container(child_start, TokContext::JsxChild)?;
                            children.push(JSXChild::JSXExpressionContainer(container));
                        }
                    }
                    _ => return Err(self.unexpected(None)),
                }
            }
            if let Some(closing) = &closing {
                self.check_closing_tag(&opening, closing)?;
            }
        }

        let span = self.span_from(start);
        if self.is(TokenKind::LessThanToken) {
            return Err(JSX_UNWRAPPED_ADJACENT_ELEMENTS.at(self.start_pos(), &[]));
        }

        let node = match opening {
            Opening::Fragment(opening_fragment) => {
                let closing_fragment = match closing {
                    Some(Closing::Fragment(fragment)) => fragment,
                    Some(Closing::Element(element)) => JSXClosingFragment { span: element.span },
                    None => JSXClosingFragment { span: self.span_from(self.last_end()) },
                };
                JsxNode::Fragment(Box::new(JSXFragment {
                    span,
                    opening_fragment,
                    closing_fragment,
                    children,
                }))
            }
            Opening::Element(opening_element) => {
                let closing_element = match closing {
                    Some(Closing::Element(element)) => Some(element),
                    Some(Closing::Fragment(fragment)) => Some(JSXClosingElement {
                        span: fragment.span,
                        name: opening_element.name.clone(),
                    }),
                    None => None,
                };
                JsxNode::Element(Box::new(JSXElement {
                    span,
                    opening_element,
                    closing_element,
                    children,
                }))
            }
        };
        Ok(node)
    }

    fn check_closing_tag(&mut self, opening: &Opening, closing: &Closing) -> PResult<()> {
        match (opening, closing) {
            (Opening::Fragment(_), Closing::Element(el)) => {
                self.raise(&JSX_MISSING_CLOSING_TAG_FRAGMENT, el.span.start, &[])
            }
            (Opening::Element(open), Closing::Fragment(frag)) => {
                let name = open.name.qualified_name();
                self.raise(&JSX_MISSING_CLOSING_TAG_ELEMENT, frag.span.start, &[&name])
            }
            (Opening::Element(open), Closing::Element(close)) => {
                let name = open.name.qualified_name();
                if close.name.qualified_name() != name {
                    self.raise(&JSX_MISSING_CLOSING_TAG_ELEMENT, close.span.start, &[&name])?;
                }
                Ok(())
            }
            (Opening::Fragment(_), Closing::Fragment(_)) => Ok(()),
        }
    }

    fn jsx_parse_opening_element_at(&mut self, start: Position) -> PResult<Opening> {
        if self.eat(TokenKind::JsxTagEnd)? {
            return Ok(Opening::Fragment(JSXOpeningFragment {
                span: self.span_from(start),
            }));
        }
        let name = self.jsx_parse_element_name()?;
        let type_parameters = self.jsx_parse_type_arguments()?;
        let mut attributes = Vec::new();
        while !self.is(TokenKind::SlashToken) && !self.is(TokenKind::JsxTagEnd) {
            attributes.push(self.jsx_parse_attribute()?);
        }
        let self_closing = self.eat(TokenKind::SlashToken)?;
        self.expect(TokenKind::JsxTagEnd)?;
        Ok(Opening::Element(JSXOpeningElement {
            span: self.span_from(start),
            name,
            attributes,
            self_closing,
            type_parameters,
        }))
    }

    fn jsx_parse_closing_element_at(&mut self, start: Position) -> PResult<Closing> {
        if self.eat(TokenKind::JsxTagEnd)? {
            return Ok(Closing::Fragment(JSXClosingFragment {
                span: self.span_from(start),
            }));
        }
        let name = self.jsx_parse_element_name()?;
        self.expect(TokenKind::JsxTagEnd)?;
        Ok(Closing::Element(JSXClosingElement {
            span: self.span_from(start),
            name,
        }))
    }

    fn jsx_parse_identifier(&mut self) -> PResult<JSXIdentifier> {
        let start = self.start_pos();
        let name = match self.cur() {
            TokenKind::JsxName => self.cur_str().to_string(),
            kind if kind.is_keyword() => kind.label().to_string(),
            _ => return Err(self.unexpected(None)),
        };
        self.next()?;
        Ok(JSXIdentifier {
            span: self.span_from(start),
            name,
        })
    }

    /// `name` or `namespace:name`.
    fn jsx_parse_namespaced_name(&mut self) -> PResult<JSXAttributeName> {
        let start = self.start_pos();
        let namespace = self.jsx_parse_identifier()?;
        if !self.eat(TokenKind::ColonToken)? {
            return Ok(JSXAttributeName::JSXIdentifier(namespace));
        }
        let name = self.jsx_parse_identifier()?;
        Ok(JSXAttributeName::JSXNamespacedName(JSXNamespacedName {
            span: self.span_from(start),
            namespace,
            name,
        }))
    }

    fn jsx_parse_element_name(&mut self) -> PResult<JSXElementName> {
        let start = self.start_pos();
        let mut node = match self.jsx_parse_namespaced_name()? {
            JSXAttributeName::JSXNamespacedName(name) => return Ok(JSXElementName::JSXNamespacedName(name)),
            JSXAttributeName::JSXIdentifier(id) => JSXElementName::JSXIdentifier(id),
        };
        while self.eat(TokenKind::DotToken)? {
            let property = self.jsx_parse_identifier()?;
            node = JSXElementName::JSXMemberExpression(JSXMemberExpression {
                span: self.span_from(start),
                object: Box::new(node),
                property,
            });
        }
        Ok(node)
    }

    fn jsx_parse_attribute(&mut self) -> PResult<JSXAttributeItem> {
        let start = self.start_pos();
        if self.is(TokenKind::OpenBraceToken) {
            self.state.tok.context.set_current(TokContext::Brace);
            self.next()?;
            self.expect(TokenKind::DotDotDotToken)?;
            let argument = self.parse_maybe_assign_allow_in()?;
            self.state.tok.context.set_current(TokContext::JsxOpenTag);
            self.state.tok.can_start_jsx_element = true;
            self.expect(TokenKind::CloseBraceToken)?;
            return Ok(JSXAttributeItem::JSXSpreadAttribute(JSXSpreadAttribute {
                span: self.span_from(start),
                argument: Box::new(argument),
            }));
        }
        let name = self.jsx_parse_namespaced_name()?;
        let value = if self.eat(TokenKind::EqualsToken)? {
            Some(self.jsx_parse_attribute_value()?)
        } else {
            None
        };
        Ok(JSXAttributeItem::JSXAttribute(JSXAttribute {
            span: self.span_from(start),
            name,
            value,
        }))
    }

    fn jsx_parse_attribute_value(&mut self) -> PResult<JSXAttributeValue> {
        match self.cur() {
            TokenKind::OpenBraceToken => {
                let start = self.start_pos();
                self.state.tok.context.set_current(TokContext::Brace);
                self.next()?;
                let container = self.jsx_parse_expression_container(start, TokContext::JsxOpenTag)?;
                if matches!(container.expression, JSXExpression::JSXEmptyExpression(_)) {
                    self.raise(&JSX_ATTRIBUTE_IS_EMPTY, start, &[])?;
                }
                Ok(JSXAttributeValue::JSXExpressionContainer(container))
            }
            TokenKind::JsxTagStart => Ok(match self.jsx_parse_element()? {
                JsxNode::Element(element) => JSXAttributeValue::JSXElement(element),
                JsxNode::Fragment(fragment) => JSXAttributeValue::JSXFragment(fragment),
            }),
            TokenKind::StringLiteral => Ok(JSXAttributeValue::Literal(Box::new(self.parse_expr_atom(None)?))),
            _ => Err(JSX_UNSUPPORTED_VALUE.at(self.start_pos(), &[])),
        }
    }

    fn jsx_parse_text(&mut self) -> PResult<JSXText> {
        let start = self.start_pos();
        let value = self.cur_str().to_string();
        let raw = self.source_slice(self.state.tok.start as u32, self.state.tok.end as u32);
        self.next()?;
        Ok(JSXText {
            span: self.span_from(start),
            value,
            extra: LiteralExtra { raw },
        })
    }

    /// `{ ...expr }` as a child. The `{` is already consumed.
    fn jsx_parse_spread_child(&mut self, start: Position) -> PResult<JSXSpreadChild> {
        self.next()?;
        let expression = self.parse_expression()?;
        self.state.tok.context.set_current(TokContext::JsxChild);
        self.state.tok.can_start_jsx_element = true;
        self.expect(TokenKind::CloseBraceToken)?;
        Ok(JSXSpreadChild {
            span: self.span_from(start),
            expression: Box::new(expression),
        })
    }

    /// The rest of `{ expr }` after its `{`. `previous` is the mode the
    /// closing brace returns to.
    fn jsx_parse_expression_container(
        &mut self,
        start: Position,
        previous: TokContext,
    ) -> PResult<JSXExpressionContainer> {
        let expression = if self.is(TokenKind::CloseBraceToken) {
            let at = self.last_end();
            JSXExpression::JSXEmptyExpression(JSXEmptyExpression {
                span: quarry_core::text::Span::new(at, self.start_pos()),
            })
        } else {
            let expression = self.parse_expression()?;
            if let Expression::SequenceExpression(seq) = &expression {
                if !self.state.is_parenthesized(&seq.span) {
                    if let Some(second) = seq.expressions.get(1) {
                        let at = second.span().start;
                        self.raise(&JSX_UNEXPECTED_SEQUENCE_EXPRESSION, at, &[])?;
                    }
                }
            }
            JSXExpression::Expression(Box::new(expression))
        };
        self.state.tok.context.set_current(previous);
        self.state.tok.can_start_jsx_element = true;
        self.expect(TokenKind::CloseBraceToken)?;
        Ok(JSXExpressionContainer {
            span: self.span_from(start),
            expression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::parse_expression;
    use crate::options::ParserOptions;

    fn jsx() -> ParserOptions {
        ParserOptions::default().with_plugin("jsx")
    }

    fn element(source: &str) -> Box<JSXElement> {
        match parse_expression(source, &jsx()).unwrap().expression {
            Expression::JSXElement(element) => element,
            other => panic!("expected element, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_text_and_container_children() {
        let el = element("<div>hi {name}!</div>");
        assert_eq!(el.opening_element.name.qualified_name(), "div");
        assert_eq!(el.children.len(), 3);
        let JSXChild::JSXText(text) = &el.children[0] else { panic!() };
        assert_eq!(text.value, "hi ");
        assert!(matches!(el.children[1], JSXChild::JSXExpressionContainer(_)));
        assert!(el.closing_element.is_some());
    }

    #[test]
    fn test_member_and_namespaced_names() {
        let el = element("<a.b.c />");
        assert_eq!(el.opening_element.name.qualified_name(), "a.b.c");
        assert!(el.opening_element.self_closing);

        let el = element("<svg:rect />");
        assert!(matches!(el.opening_element.name, JSXElementName::JSXNamespacedName(_)));
    }

    #[test]
    fn test_attributes() {
        let el = element(r#"<input type="text" disabled {...rest} value={v} data-x='&amp;' />"#);
        let attrs = &el.opening_element.attributes;
        assert_eq!(attrs.len(), 5);
        assert!(matches!(attrs[2], JSXAttributeItem::JSXSpreadAttribute(_)));
        let JSXAttributeItem::JSXAttribute(data) = &attrs[4] else { panic!() };
        let Some(JSXAttributeValue::Literal(lit)) = &data.value else { panic!() };
        assert_eq!(lit.string_value(), Some("&"));
    }

    #[test]
    fn test_fragment_and_nesting() {
        let output = parse_expression("<><a></a><b/></>", &jsx()).unwrap();
        let Expression::JSXFragment(fragment) = output.expression else { panic!() };
        assert_eq!(fragment.children.len(), 2);
    }

    #[test]
    fn test_empty_expression_child() {
        let el = element("<a>{/* note */}</a>");
        let JSXChild::JSXExpressionContainer(container) = &el.children[0] else { panic!() };
        assert!(matches!(container.expression, JSXExpression::JSXEmptyExpression(_)));
    }

    #[test]
    fn test_empty_attribute_value() {
        let err = parse_expression("<a b={} />", &jsx()).unwrap_err();
        assert!(err.is(&JSX_ATTRIBUTE_IS_EMPTY));
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse_expression("<a></b>", &jsx()).unwrap_err();
        assert!(err.is(&JSX_MISSING_CLOSING_TAG_ELEMENT));
        assert_eq!(err.to_string(), "Expected corresponding JSX closing tag for <a>. (1:3)");

        let err = parse_expression("<></a>", &jsx()).unwrap_err();
        assert!(err.is(&JSX_MISSING_CLOSING_TAG_FRAGMENT));
    }

    #[test]
    fn test_adjacent_elements() {
        let err = parse_expression("<a></a><b></b>", &jsx()).unwrap_err();
        assert!(err.is(&JSX_UNWRAPPED_ADJACENT_ELEMENTS));
    }

    #[test]
    fn test_context_stack_is_balanced_after_element() {
        let chars: Vec<char> = "<a><b>{x}</b></a>".chars().collect();
        let options = jsx();
        let plugins = options.plugin_set().unwrap();
        let mut p = Parser::new(&chars, &options, plugins, false);
        p.enter_initial_scopes();
        p.next_token().unwrap();
        p.parse_expression().unwrap();
        assert!(p.state.tok.context.is_balanced());
    }

    #[test]
    fn test_without_plugin_less_than_is_rejected() {
        let err = parse_expression("<a/>", &ParserOptions::default()).unwrap_err();
        assert!(err.is(&MISSING_ONE_OF_PLUGINS) || err.is(&MISSING_PLUGIN));
    }
}
