//! TypeScript type syntax.
//!
//! Types are read with `in_type` set. The tokenizer then splits `<` and
//! `>` into single characters, so `Array<Array<T>>` closes one bracket at
//! a time. Type argument lists additionally run without JSX context so a
//! `<C<T>>` tag does not read its type as tag names.

use quarry_ast::node::*;
use quarry_ast::ops::UnaryOperator;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::*;
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::*;
use quarry_diagnostics::DiagnosticMessage;
use quarry_scanner::{ContextStack, TokContext};

use super::modifiers::{TsModifier, TS_TYPE_MEMBER_DISALLOWED};
use crate::parser::Parser;
use crate::PResult;

/// Which modifiers a type parameter list accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeParamModifiers {
    /// Interfaces and type aliases: `in` and `out`.
    InOut,
    /// Functions, methods and arrows: `const`.
    Const,
    /// Classes: all three.
    InOutConst,
}

impl TypeParamModifiers {
    fn allowed(self) -> TsModifier {
        match self {
            TypeParamModifiers::InOut => TsModifier::IN | TsModifier::OUT,
            TypeParamModifiers::Const => TsModifier::CONST,
            TypeParamModifiers::InOutConst => TsModifier::IN | TsModifier::OUT | TsModifier::CONST,
        }
    }

    fn disallowed(self) -> TsModifier {
        match self {
            TypeParamModifiers::Const => TsModifier::IN | TsModifier::OUT,
            TypeParamModifiers::InOut => TsModifier::CONST | TsModifier::MEMBER_ONLY,
            TypeParamModifiers::InOutConst => TsModifier::MEMBER_ONLY,
        }
    }

    fn error(self) -> &'static DiagnosticMessage {
        match self {
            TypeParamModifiers::Const => &TS_INVALID_MODIFIER_ON_TYPE_PARAMETER_POSITIONS,
            _ => &TS_INVALID_MODIFIER_ON_TYPE_PARAMETER,
        }
    }
}

impl Parser<'_> {
    // ========================================================================
    // Lexical modes
    // ========================================================================

    pub(crate) fn ts_in_type<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let old = std::mem::replace(&mut self.state.in_type, true);
        let result = f(self);
        self.state.in_type = old;
        result
    }

    /// Runs `f` with only the bottom brace context on the stack.
    pub(crate) fn ts_in_no_context<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let old = std::mem::replace(&mut self.state.tok.context, ContextStack::new());
        let result = f(self);
        self.state.tok.context = old;
        result
    }

    fn ts_with_conditional_types<T>(
        &mut self,
        disallow: bool,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let old = std::mem::replace(&mut self.state.in_disallow_conditional_types_context, disallow);
        let result = f(self);
        self.state.in_disallow_conditional_types_context = old;
        result
    }

    /// `: Type` at the current `:`.
    pub(crate) fn ts_parse_type_annotation(&mut self) -> PResult<Box<TSTypeAnnotation>> {
        let start = self.start_pos();
        self.ts_parse_type_annotation_from(start, true)
    }

    /// A type annotation node starting at `start`. Without `eat_colon` the
    /// colon is already consumed or absent.
    pub(crate) fn ts_parse_type_annotation_from(
        &mut self,
        start: Position,
        eat_colon: bool,
    ) -> PResult<Box<TSTypeAnnotation>> {
        self.ts_in_type(|p| {
            if eat_colon {
                p.expect(TokenKind::ColonToken)?;
            }
            let type_annotation = p.ts_parse_type()?;
            Ok(Box::new(TSTypeAnnotation {
                span: p.span_from(start),
                type_annotation,
            }))
        })
    }

    pub(crate) fn ts_try_parse_type_annotation(&mut self) -> PResult<Option<Box<TSTypeAnnotation>>> {
        if self.is(TokenKind::ColonToken) {
            self.ts_parse_type_annotation().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `=> T` or `: T` where the type may be `x is T`, `asserts x` or
    /// `asserts x is T`.
    pub(crate) fn ts_parse_type_or_type_predicate_annotation(
        &mut self,
        return_token: TokenKind,
    ) -> PResult<Box<TSTypeAnnotation>> {
        self.ts_in_type(|p| {
            let start = p.start_pos();
            p.expect(return_token)?;
            let predicate_start = p.start_pos();

            let asserts = p
                .try_parse_or_rewind(|p| {
                    if !p.is_contextual("asserts") {
                        return Ok(None);
                    }
                    p.next()?;
                    let follows = p.is(TokenKind::Identifier) || p.is(TokenKind::ThisKeyword);
                    Ok(follows.then_some(()))
                })?
                .is_some();

            if asserts && p.is(TokenKind::ThisKeyword) {
                let this_type = p.ts_parse_this_type_or_this_type_predicate()?;
                let predicate = match this_type {
                    TSType::TSThisType(keyword) => TSTypePredicate {
                        span: p.span_from(predicate_start),
                        parameter_name: TSTypePredicateName::TSThisType(keyword),
                        type_annotation: None,
                        asserts: true,
                    },
                    TSType::TSTypePredicate(mut predicate) => {
                        predicate.span = p.span_from(predicate_start);
                        predicate.asserts = true;
                        predicate
                    }
                    _ => return Err(p.unexpected_at(predicate_start, None)),
                };
                return Ok(Box::new(TSTypeAnnotation {
                    span: p.span_from(start),
                    type_annotation: TSType::TSTypePredicate(predicate),
                }));
            }

            let variable = if p.is(TokenKind::Identifier) {
                p.try_parse_or_rewind(|p| {
                    let id = p.parse_identifier(false)?;
                    if p.is_contextual("is") && !p.has_preceding_line_break() {
                        p.next()?;
                        Ok(Some(id))
                    } else {
                        Ok(None)
                    }
                })?
            } else {
                None
            };

            let Some(variable) = variable else {
                if !asserts {
                    return p.ts_parse_type_annotation_from(start, false);
                }
                let parameter = p.parse_identifier(false)?;
                let predicate = TSTypePredicate {
                    span: p.span_from(predicate_start),
                    parameter_name: TSTypePredicateName::Identifier(parameter),
                    type_annotation: None,
                    asserts,
                };
                return Ok(Box::new(TSTypeAnnotation {
                    span: p.span_from(start),
                    type_annotation: TSType::TSTypePredicate(predicate),
                }));
            };

            let type_start = p.start_pos();
            let type_annotation = p.ts_parse_type_annotation_from(type_start, false)?;
            let predicate = TSTypePredicate {
                span: p.span_from(predicate_start),
                parameter_name: TSTypePredicateName::Identifier(variable),
                type_annotation: Some(type_annotation),
                asserts,
            };
            Ok(Box::new(TSTypeAnnotation {
                span: p.span_from(start),
                type_annotation: TSType::TSTypePredicate(predicate),
            }))
        })
    }

    pub(crate) fn ts_try_parse_type_or_type_predicate_annotation(
        &mut self,
    ) -> PResult<Option<Box<TSTypeAnnotation>>> {
        if self.is(TokenKind::ColonToken) {
            self.ts_parse_type_or_type_predicate_annotation(TokenKind::ColonToken)
                .map(Some)
        } else {
            Ok(None)
        }
    }

    /// Consumes `token` and reads a type after it.
    pub(super) fn ts_next_then_parse_type(&mut self) -> PResult<TSType> {
        self.ts_in_type(|p| {
            p.next()?;
            p.ts_parse_type()
        })
    }

    fn ts_eat_then_parse_type(&mut self, token: TokenKind) -> PResult<Option<Box<TSType>>> {
        if !self.is(token) {
            return Ok(None);
        }
        Ok(Some(Box::new(self.ts_next_then_parse_type()?)))
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub(crate) fn ts_parse_type(&mut self) -> PResult<TSType> {
        self.with_recursion_guard(|p| {
            let start = p.start_pos();
            let check_type = p.ts_parse_non_conditional_type()?;
            if p.state.in_disallow_conditional_types_context
                || p.has_preceding_line_break()
                || !p.eat(TokenKind::ExtendsKeyword)?
            {
                return Ok(check_type);
            }
            let extends_type = p.ts_with_conditional_types(true, |p| p.ts_parse_non_conditional_type())?;
            p.expect(TokenKind::QuestionToken)?;
            let true_type = p.ts_with_conditional_types(false, |p| p.ts_parse_type())?;
            p.expect(TokenKind::ColonToken)?;
            let false_type = p.ts_with_conditional_types(false, |p| p.ts_parse_type())?;
            Ok(TSType::TSConditionalType(TSConditionalType {
                span: p.span_from(start),
                check_type: Box::new(check_type),
                extends_type: Box::new(extends_type),
                true_type: Box::new(true_type),
                false_type: Box::new(false_type),
            }))
        })
    }

    fn ts_parse_non_conditional_type(&mut self) -> PResult<TSType> {
        if self.ts_is_start_of_function_type() {
            return self.ts_parse_function_or_constructor_type(false, false);
        }
        if self.is(TokenKind::NewKeyword) {
            return self.ts_parse_function_or_constructor_type(true, false);
        }
        if self.is_contextual("abstract") && self.is_lookahead_contextual("new") {
            return self.ts_parse_function_or_constructor_type(true, true);
        }
        self.ts_parse_union_or_intersection(true)
    }

    fn ts_is_start_of_function_type(&mut self) -> bool {
        if self.is(TokenKind::LessThanToken) {
            return true;
        }
        self.is(TokenKind::OpenParenToken) && self.look_ahead_is(|p| p.ts_is_unambiguously_start_of_function_type())
    }

    fn ts_is_unambiguously_start_of_function_type(&mut self) -> PResult<bool> {
        self.next()?;
        if self.is(TokenKind::CloseParenToken) || self.is(TokenKind::DotDotDotToken) {
            return Ok(true);
        }
        if self.ts_skip_parameter_start()? {
            if matches!(
                self.cur(),
                TokenKind::ColonToken | TokenKind::CommaToken | TokenKind::QuestionToken | TokenKind::EqualsToken
            ) {
                return Ok(true);
            }
            if self.is(TokenKind::CloseParenToken) {
                self.next()?;
                if self.is(TokenKind::EqualsGreaterThanToken) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn ts_skip_parameter_start(&mut self) -> PResult<bool> {
        if self.is(TokenKind::Identifier) || self.is(TokenKind::ThisKeyword) {
            self.next()?;
            return Ok(true);
        }
        let before = self.state.errors.len();
        if self.is(TokenKind::OpenBraceToken) {
            self.parse_object_like(true, None)?;
            return Ok(self.state.errors.len() == before);
        }
        if self.is(TokenKind::OpenBracketToken) {
            self.next()?;
            self.parse_binding_list(TokenKind::CloseBracketToken, true, None)?;
            return Ok(self.state.errors.len() == before);
        }
        Ok(false)
    }

    fn ts_parse_function_or_constructor_type(&mut self, constructor: bool, is_abstract: bool) -> PResult<TSType> {
        let start = self.start_pos();
        if is_abstract {
            self.next()?;
        }
        if constructor {
            self.expect(TokenKind::NewKeyword)?;
        }
        let signature = self.ts_with_conditional_types(false, |p| {
            p.ts_fill_signature(start, TokenKind::EqualsGreaterThanToken)
        })?;
        let signature = TSSignature { is_abstract, ..signature };
        Ok(if constructor {
            TSType::TSConstructorType(signature)
        } else {
            TSType::TSFunctionType(signature)
        })
    }

    /// Type parameters, parameter list and return type of a signature.
    /// With `=>` as the return token the return type is required.
    pub(crate) fn ts_fill_signature(&mut self, start: Position, return_token: TokenKind) -> PResult<TSSignature> {
        let type_parameters = self.ts_try_parse_type_parameters(TypeParamModifiers::Const)?;
        self.expect(TokenKind::OpenParenToken)?;
        let parameters = self.ts_parse_binding_list_for_signature()?;
        let type_annotation = if return_token == TokenKind::EqualsGreaterThanToken || self.is(return_token) {
            Some(self.ts_parse_type_or_type_predicate_annotation(return_token)?)
        } else {
            None
        };
        Ok(TSSignature {
            span: self.span_from(start),
            type_parameters,
            parameters,
            type_annotation,
            is_abstract: false,
        })
    }

    fn ts_parse_binding_list_for_signature(&mut self) -> PResult<Vec<Expression>> {
        let params: Vec<Expression> = self
            .parse_binding_list(TokenKind::CloseParenToken, false, Some(false))?
            .into_iter()
            .flatten()
            .collect();
        for param in &params {
            if !matches!(
                param,
                Expression::Identifier(_)
                    | Expression::RestElement(_)
                    | Expression::ObjectPattern(_)
                    | Expression::ArrayPattern(_)
            ) {
                self.raise(&TS_UNSUPPORTED_SIGNATURE_PARAMETER_KIND, param.span().start, &[param.type_name()])?;
            }
        }
        Ok(params)
    }

    /// `A | B` when `union`, else `A & B`. A single member without a
    /// leading operator is returned as is.
    fn ts_parse_union_or_intersection(&mut self, union: bool) -> PResult<TSType> {
        let start = self.start_pos();
        let operator = if union { TokenKind::BarToken } else { TokenKind::AmpersandToken };
        let has_leading_operator = self.eat(operator)?;
        let mut types = Vec::new();
        loop {
            types.push(if union {
                self.ts_parse_union_or_intersection(false)?
            } else {
                self.ts_parse_type_operator_or_higher()?
            });
            if !self.eat(operator)? {
                break;
            }
        }
        if types.len() == 1 && !has_leading_operator {
            if let Some(only) = types.pop() {
                return Ok(only);
            }
        }
        let list = TSTypeList {
            span: self.span_from(start),
            types,
        };
        Ok(if union {
            TSType::TSUnionType(list)
        } else {
            TSType::TSIntersectionType(list)
        })
    }

    fn ts_parse_type_operator_or_higher(&mut self) -> PResult<TSType> {
        let operator = if self.is(TokenKind::Identifier) && !self.state.tok.contains_esc {
            match self.cur_str() {
                "keyof" => Some(TSTypeOperatorKind::Keyof),
                "unique" => Some(TSTypeOperatorKind::Unique),
                "readonly" => Some(TSTypeOperatorKind::Readonly),
                _ => None,
            }
        } else {
            None
        };
        if let Some(operator) = operator {
            let start = self.start_pos();
            self.next()?;
            let type_annotation = self.ts_parse_type_operator_or_higher()?;
            if operator == TSTypeOperatorKind::Readonly
                && !matches!(type_annotation, TSType::TSArrayType(_) | TSType::TSTupleType(_))
            {
                self.raise(&TS_UNEXPECTED_READONLY, start, &[])?;
            }
            return Ok(TSType::TSTypeOperator(TSTypeOperator {
                span: self.span_from(start),
                operator,
                type_annotation: Box::new(type_annotation),
            }));
        }
        if self.is_contextual("infer") {
            return self.ts_parse_infer_type();
        }
        self.ts_with_conditional_types(false, |p| p.ts_parse_array_type_or_higher())
    }

    fn ts_parse_infer_type(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        self.expect_contextual("infer")?;
        let param_start = self.start_pos();
        let name = self.parse_identifier(false)?.name;
        let constraint = self.try_parse_or_rewind(|p| {
            if !p.is(TokenKind::ExtendsKeyword) {
                return Ok(None);
            }
            let constraint = p.ts_with_conditional_types(true, |p| p.ts_next_then_parse_type())?;
            if p.state.in_disallow_conditional_types_context || !p.is(TokenKind::QuestionToken) {
                Ok(Some(constraint))
            } else {
                Ok(None)
            }
        })?;
        let type_parameter = TSTypeParameter {
            span: self.span_from(param_start),
            name,
            constraint: constraint.map(Box::new),
            default: None,
            is_in: false,
            is_out: false,
            is_const: false,
        };
        Ok(TSType::TSInferType(TSInferType {
            span: self.span_from(start),
            type_parameter,
        }))
    }

    fn ts_parse_array_type_or_higher(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        let mut ty = self.ts_parse_non_array_type()?;
        while !self.has_preceding_line_break() && self.eat(TokenKind::OpenBracketToken)? {
            if self.eat(TokenKind::CloseBracketToken)? {
                ty = TSType::TSArrayType(TSArrayType {
                    span: self.span_from(start),
                    element_type: Box::new(ty),
                });
            } else {
                let index_type = self.ts_parse_type()?;
                self.expect(TokenKind::CloseBracketToken)?;
                ty = TSType::TSIndexedAccessType(TSIndexedAccessType {
                    span: self.span_from(start),
                    object_type: Box::new(ty),
                    index_type: Box::new(index_type),
                });
            }
        }
        Ok(ty)
    }

    fn ts_parse_non_array_type(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        match self.cur() {
            TokenKind::StringLiteral
            | TokenKind::NumericLiteral
            | TokenKind::BigIntLiteral
            | TokenKind::TrueKeyword
            | TokenKind::FalseKeyword => {
                let literal = self.parse_literal()?;
                Ok(literal_type(self.span_from(start), literal))
            }
            TokenKind::MinusToken => {
                let next = self.lookahead()?.kind;
                if !matches!(next, TokenKind::NumericLiteral | TokenKind::BigIntLiteral) {
                    return Err(self.unexpected(None));
                }
                self.next()?;
                let argument = self.parse_literal()?;
                let unary = Expression::UnaryExpression(UnaryExpression {
                    span: self.span_from(start),
                    operator: UnaryOperator::Minus,
                    prefix: true,
                    argument: Box::new(argument),
                });
                Ok(literal_type(self.span_from(start), unary))
            }
            TokenKind::ThisKeyword => self.ts_parse_this_type_or_this_type_predicate(),
            TokenKind::TypeOfKeyword => self.ts_parse_type_query(),
            TokenKind::ImportKeyword => Ok(TSType::TSImportType(self.ts_parse_import_type()?)),
            TokenKind::OpenBraceToken => {
                if self.look_ahead_is(|p| p.ts_is_start_of_mapped_type()) {
                    self.ts_parse_mapped_type()
                } else {
                    self.ts_parse_type_literal()
                }
            }
            TokenKind::OpenBracketToken => self.ts_parse_tuple_type(),
            TokenKind::OpenParenToken => {
                self.next()?;
                let type_annotation = self.ts_parse_type()?;
                self.expect(TokenKind::CloseParenToken)?;
                Ok(TSType::TSParenthesizedType(TSWrappedType {
                    span: self.span_from(start),
                    type_annotation: Box::new(type_annotation),
                }))
            }
            TokenKind::TemplateNonTail | TokenKind::TemplateTail => self.ts_parse_template_literal_type(),
            TokenKind::VoidKeyword | TokenKind::NullKeyword => {
                let kind = self.cur();
                self.next()?;
                let keyword = TSKeyword {
                    span: self.span_from(start),
                };
                Ok(if kind == TokenKind::VoidKeyword {
                    TSType::TSVoidKeyword(keyword)
                } else {
                    TSType::TSNullKeyword(keyword)
                })
            }
            TokenKind::Identifier => {
                if !self.state.tok.contains_esc && self.lookahead_char() != Some('.') {
                    let name = self.cur_str().to_string();
                    if let Some(keyword) = TSType::keyword(&name, self.token_span()) {
                        self.next()?;
                        return Ok(keyword);
                    }
                }
                self.ts_parse_type_reference()
            }
            _ => Err(self.unexpected(None)),
        }
    }

    fn ts_parse_this_type_or_this_type_predicate(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        self.expect(TokenKind::ThisKeyword)?;
        let keyword = TSKeyword {
            span: self.span_from(start),
        };
        if !self.is_contextual("is") || self.has_preceding_line_break() {
            return Ok(TSType::TSThisType(keyword));
        }
        self.next()?;
        let type_start = self.start_pos();
        let type_annotation = self.ts_parse_type_annotation_from(type_start, false)?;
        Ok(TSType::TSTypePredicate(TSTypePredicate {
            span: self.span_from(start),
            parameter_name: TSTypePredicateName::TSThisType(keyword),
            type_annotation: Some(type_annotation),
            asserts: false,
        }))
    }

    fn ts_parse_type_query(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        self.expect(TokenKind::TypeOfKeyword)?;
        let expr_name = if self.is(TokenKind::ImportKeyword) {
            TSTypeQueryName::TSImportType(self.ts_parse_import_type()?)
        } else {
            match self.ts_parse_entity_name(true)? {
                TSEntityName::Identifier(id) => TSTypeQueryName::Identifier(id),
                TSEntityName::TSQualifiedName(name) => TSTypeQueryName::TSQualifiedName(name),
            }
        };
        let type_parameters = if !self.has_preceding_line_break() && self.is(TokenKind::LessThanToken) {
            Some(self.ts_parse_type_arguments()?)
        } else {
            None
        };
        Ok(TSType::TSTypeQuery(TSTypeQuery {
            span: self.span_from(start),
            expr_name,
            type_parameters,
        }))
    }

    /// `import("mod").Name<T>`.
    pub(crate) fn ts_parse_import_type(&mut self) -> PResult<TSImportType> {
        let start = self.start_pos();
        self.expect(TokenKind::ImportKeyword)?;
        self.expect(TokenKind::OpenParenToken)?;
        if !self.is(TokenKind::StringLiteral) {
            let at = self.start_pos();
            self.raise(&TS_UNSUPPORTED_IMPORT_TYPE_ARGUMENT, at, &[])?;
        }
        let argument = self.parse_expr_atom(None)?;
        self.expect(TokenKind::CloseParenToken)?;
        let qualifier = if self.eat(TokenKind::DotToken)? {
            Some(self.ts_parse_entity_name(true)?)
        } else {
            None
        };
        let type_parameters = if self.is(TokenKind::LessThanToken) {
            Some(self.ts_parse_type_arguments()?)
        } else {
            None
        };
        Ok(TSImportType {
            span: self.span_from(start),
            argument: Box::new(argument),
            qualifier,
            type_parameters,
        })
    }

    /// `A` or `A.B.C`.
    pub(crate) fn ts_parse_entity_name(&mut self, allow_reserved: bool) -> PResult<TSEntityName> {
        let start = self.start_pos();
        let mut entity = TSEntityName::Identifier(self.parse_identifier(allow_reserved)?);
        while self.eat(TokenKind::DotToken)? {
            let right = self.parse_identifier(allow_reserved)?;
            entity = TSEntityName::TSQualifiedName(Box::new(TSQualifiedName {
                span: self.span_from(start),
                left: entity,
                right,
            }));
        }
        Ok(entity)
    }

    pub(crate) fn ts_parse_type_reference(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        let type_name = self.ts_parse_entity_name(true)?;
        let type_parameters = if !self.has_preceding_line_break() && self.is(TokenKind::LessThanToken) {
            Some(self.ts_parse_type_arguments()?)
        } else {
            None
        };
        Ok(TSType::TSTypeReference(TSTypeReference {
            span: self.span_from(start),
            type_name,
            type_parameters,
        }))
    }

    fn ts_parse_template_literal_type(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        let mut quasis = vec![self.parse_template_element(false)?];
        let mut expressions = Vec::new();
        while !quasis.last().is_some_and(|quasi| quasi.tail) {
            expressions.push(self.ts_parse_type()?);
            self.read_template_continuation()?;
            quasis.push(self.parse_template_element(false)?);
        }
        let span = self.span_from(start);
        Ok(TSType::TSLiteralType(TSLiteralType {
            span,
            literal: TSLiteral::TemplateLiteral(TSTemplateLiteralType {
                span,
                quasis,
                expressions,
            }),
        }))
    }

    // ========================================================================
    // Delimited lists
    // ========================================================================

    /// Comma-separated elements up to, not including, `close`. Returns the
    /// elements and the position of a trailing comma.
    pub(crate) fn ts_parse_delimited_list<T>(
        &mut self,
        close: TokenKind,
        mut element: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<(Vec<T>, Option<Position>)> {
        let mut items = Vec::new();
        let mut trailing_comma = None;
        loop {
            if self.is(close) {
                break;
            }
            trailing_comma = None;
            items.push(element(self)?);
            if self.eat(TokenKind::CommaToken)? {
                trailing_comma = Some(self.state.tok.last_tok_start_loc);
                continue;
            }
            if self.is(close) {
                break;
            }
            self.expect(TokenKind::CommaToken)?;
        }
        Ok((items, trailing_comma))
    }

    // ========================================================================
    // Type parameters and arguments
    // ========================================================================

    /// `<A, B>` after an expression or type name.
    pub(crate) fn ts_parse_type_arguments(&mut self) -> PResult<TSTypeParameterInstantiation> {
        let start = self.start_pos();
        let (params, _) = self.ts_in_type(|p| {
            p.ts_in_no_context(|p| {
                p.expect(TokenKind::LessThanToken)?;
                p.ts_parse_delimited_list(TokenKind::GreaterThanToken, |p| p.ts_parse_type())
            })
        })?;
        if params.is_empty() {
            self.raise(&TS_EMPTY_TYPE_ARGUMENTS, start, &[])?;
        } else if !self.state.in_type && self.cur_context() == TokContext::Brace {
            self.rescan_lt_gt();
        }
        self.expect(TokenKind::GreaterThanToken)?;
        Ok(TSTypeParameterInstantiation {
            span: self.span_from(start),
            params,
        })
    }

    pub(crate) fn ts_try_parse_type_parameters(
        &mut self,
        modifiers: TypeParamModifiers,
    ) -> PResult<Option<TSTypeParameterDeclaration>> {
        if self.is(TokenKind::LessThanToken) {
            Ok(Some(self.ts_parse_type_parameters(modifiers)?.0))
        } else {
            Ok(None)
        }
    }

    /// `<T extends U = V, ...>`. Also reports whether the list ended in a
    /// trailing comma.
    pub(crate) fn ts_parse_type_parameters(
        &mut self,
        modifiers: TypeParamModifiers,
    ) -> PResult<(TSTypeParameterDeclaration, bool)> {
        let start = self.start_pos();
        if self.is(TokenKind::LessThanToken) || self.is(TokenKind::JsxTagStart) {
            self.next()?;
        } else {
            return Err(self.unexpected(None));
        }
        let (params, trailing_comma) =
            self.ts_parse_delimited_list(TokenKind::GreaterThanToken, |p| p.ts_parse_type_parameter(modifiers))?;
        if params.is_empty() {
            self.raise(&TS_EMPTY_TYPE_PARAMETERS, start, &[])?;
        }
        self.expect(TokenKind::GreaterThanToken)?;
        let declaration = TSTypeParameterDeclaration {
            span: self.span_from(start),
            params,
        };
        Ok((declaration, trailing_comma.is_some()))
    }

    fn ts_parse_type_parameter(&mut self, modifiers: TypeParamModifiers) -> PResult<TSTypeParameter> {
        let start = self.start_pos();
        let modified =
            self.ts_parse_modifiers(modifiers.allowed(), modifiers.disallowed(), false, modifiers.error())?;
        let name = self.parse_identifier(false)?.name;
        let constraint = self.ts_eat_then_parse_type(TokenKind::ExtendsKeyword)?;
        let default = self.ts_eat_then_parse_type(TokenKind::EqualsToken)?;
        Ok(TSTypeParameter {
            span: self.span_from(start),
            name,
            constraint,
            default,
            is_in: modified.flags.contains(TsModifier::IN),
            is_out: modified.flags.contains(TsModifier::OUT),
            is_const: modified.flags.contains(TsModifier::CONST),
        })
    }

    /// `extends A, B.C<T>` or `implements ...` after the keyword.
    pub(crate) fn ts_parse_heritage_clause(&mut self, token: &str) -> PResult<Vec<TSExpressionWithTypeArguments>> {
        let start = self.start_pos();
        let (list, _) = self.ts_parse_delimited_list(TokenKind::OpenBraceToken, |p| {
            let start = p.start_pos();
            let expression = p.ts_parse_entity_name(true)?;
            let type_parameters = if p.is(TokenKind::LessThanToken) {
                Some(p.ts_parse_type_arguments()?)
            } else {
                None
            };
            Ok(TSExpressionWithTypeArguments {
                span: p.span_from(start),
                expression,
                type_parameters,
            })
        })?;
        if list.is_empty() {
            self.raise(&TS_EMPTY_HERITAGE_CLAUSE_TYPE, start, &[token])?;
        }
        Ok(list)
    }

    // ========================================================================
    // Object types
    // ========================================================================

    fn ts_parse_type_literal(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        let members = self.ts_parse_object_type_members()?;
        Ok(TSType::TSTypeLiteral(TSTypeLiteral {
            span: self.span_from(start),
            members,
        }))
    }

    /// `{ member; member }` of a type literal or interface body.
    pub(crate) fn ts_parse_object_type_members(&mut self) -> PResult<Vec<TSTypeElement>> {
        self.expect(TokenKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while !self.is(TokenKind::CloseBraceToken) {
            members.push(self.ts_parse_type_member()?);
        }
        self.expect(TokenKind::CloseBraceToken)?;
        Ok(members)
    }

    fn ts_parse_type_member_semicolon(&mut self) -> PResult<()> {
        if !self.eat(TokenKind::CommaToken)? && !self.is_line_terminator()? {
            self.expect(TokenKind::SemicolonToken)?;
        }
        Ok(())
    }

    fn ts_parse_type_member(&mut self) -> PResult<TSTypeElement> {
        let start = self.start_pos();
        if self.is(TokenKind::OpenParenToken) || self.is(TokenKind::LessThanToken) {
            let signature = self.ts_fill_signature(start, TokenKind::ColonToken)?;
            self.ts_parse_type_member_semicolon()?;
            return Ok(TSTypeElement::TSCallSignatureDeclaration(TSSignature {
                span: self.span_from(start),
                ..signature
            }));
        }
        if self.is(TokenKind::NewKeyword) {
            self.next()?;
            if self.is(TokenKind::OpenParenToken) || self.is(TokenKind::LessThanToken) {
                let signature = self.ts_fill_signature(start, TokenKind::ColonToken)?;
                self.ts_parse_type_member_semicolon()?;
                return Ok(TSTypeElement::TSConstructSignatureDeclaration(TSSignature {
                    span: self.span_from(start),
                    ..signature
                }));
            }
            let key = Expression::ident(self.span_from(start), "new");
            return self.ts_parse_property_or_method_signature(start, key, false, false, None);
        }

        let modified = self.ts_parse_modifiers(
            TsModifier::READONLY,
            TS_TYPE_MEMBER_DISALLOWED,
            false,
            &TS_INVALID_MODIFIER_ON_TYPE_MEMBER,
        )?;
        let readonly = modified.flags.contains(TsModifier::READONLY);
        if let Some(index) = self.ts_try_parse_index_signature(start, readonly, false)? {
            return Ok(TSTypeElement::TSIndexSignature(index));
        }

        let (mut key, mut computed) = self.parse_property_name(None)?;
        let mut kind = None;
        if let Expression::Identifier(id) = &key {
            if !computed && matches!(id.name.as_str(), "get" | "set") && self.ts_token_can_follow_modifier() {
                kind = Some(if id.name == "get" {
                    TSMethodSignatureKind::Get
                } else {
                    TSMethodSignatureKind::Set
                });
                (key, computed) = self.parse_property_name(None)?;
            }
        }
        self.ts_parse_property_or_method_signature(start, key, computed, readonly, kind)
    }

    fn ts_parse_property_or_method_signature(
        &mut self,
        start: Position,
        key: Expression,
        computed: bool,
        readonly: bool,
        kind: Option<TSMethodSignatureKind>,
    ) -> PResult<TSTypeElement> {
        let optional = self.eat(TokenKind::QuestionToken)?;
        if !(self.is(TokenKind::OpenParenToken) || self.is(TokenKind::LessThanToken)) {
            let type_annotation = self.ts_try_parse_type_annotation()?;
            self.ts_parse_type_member_semicolon()?;
            return Ok(TSTypeElement::TSPropertySignature(TSPropertySignature {
                span: self.span_from(start),
                key: Box::new(key),
                computed,
                optional,
                readonly,
                type_annotation,
            }));
        }

        if readonly {
            self.raise(&TS_READONLY_FOR_METHOD_SIGNATURE, start, &[])?;
        }
        if kind.is_some() && self.is(TokenKind::LessThanToken) {
            let at = self.start_pos();
            self.raise(&TS_ACCESSOR_CANNOT_HAVE_TYPE_PARAMETERS, at, &[])?;
        }
        let signature = self.ts_fill_signature(start, TokenKind::ColonToken)?;
        self.ts_parse_type_member_semicolon()?;
        let at = self.start_pos();
        match kind {
            Some(TSMethodSignatureKind::Get) => {
                if let Some(first) = signature.parameters.first() {
                    self.raise(&BAD_GETTER_ARITY, at, &[])?;
                    if is_this_param(first) {
                        self.raise(&TS_ACCESSOR_CANNOT_DECLARE_THIS_PARAMETER, at, &[])?;
                    }
                }
            }
            Some(TSMethodSignatureKind::Set) => {
                match signature.parameters.as_slice() {
                    [first] => {
                        if is_this_param(first) {
                            self.raise(&TS_ACCESSOR_CANNOT_DECLARE_THIS_PARAMETER, at, &[])?;
                        }
                        if matches!(first, Expression::Identifier(id) if id.optional) {
                            self.raise(&TS_SET_ACCESSOR_CANNOT_HAVE_OPTIONAL_PARAMETER, at, &[])?;
                        }
                        if matches!(first, Expression::RestElement(_)) {
                            self.raise(&TS_SET_ACCESSOR_CANNOT_HAVE_REST_PARAMETER, at, &[])?;
                        }
                    }
                    _ => self.raise(&BAD_SETTER_ARITY, at, &[])?,
                }
                if let Some(return_type) = &signature.type_annotation {
                    let at = return_type.span.start;
                    self.raise(&TS_SET_ACCESSOR_CANNOT_HAVE_RETURN_TYPE, at, &[])?;
                }
            }
            _ => {}
        }
        Ok(TSTypeElement::TSMethodSignature(TSMethodSignature {
            span: self.span_from(start),
            key: Box::new(key),
            computed,
            optional,
            kind: kind.unwrap_or(TSMethodSignatureKind::Method),
            type_parameters: signature.type_parameters,
            parameters: signature.parameters,
            type_annotation: signature.type_annotation,
        }))
    }

    /// `[key: K]: V` when the brackets hold exactly a typed identifier.
    pub(crate) fn ts_try_parse_index_signature(
        &mut self,
        start: Position,
        readonly: bool,
        is_static: bool,
    ) -> PResult<Option<TSIndexSignature>> {
        let unambiguous = self.is(TokenKind::OpenBracketToken)
            && self.look_ahead_is(|p| {
                p.next()?;
                if !p.is(TokenKind::Identifier) {
                    return Ok(false);
                }
                p.next()?;
                Ok(p.is(TokenKind::ColonToken))
            });
        if !unambiguous {
            return Ok(None);
        }
        self.expect(TokenKind::OpenBracketToken)?;
        let mut id = self.parse_identifier(false)?;
        let annotation = self.ts_parse_type_annotation()?;
        id.span.end = annotation.span.end;
        id.type_annotation = Some(annotation);
        self.expect(TokenKind::CloseBracketToken)?;
        let type_annotation = self.ts_try_parse_type_annotation()?;
        self.ts_parse_type_member_semicolon()?;
        Ok(Some(TSIndexSignature {
            span: self.span_from(start),
            parameters: vec![id],
            type_annotation,
            readonly,
            is_static,
        }))
    }

    fn ts_is_start_of_mapped_type(&mut self) -> PResult<bool> {
        self.next()?;
        if self.eat(TokenKind::PlusToken)? || self.eat(TokenKind::MinusToken)? {
            return Ok(self.is_contextual("readonly"));
        }
        if self.is_contextual("readonly") {
            self.next()?;
        }
        if !self.is(TokenKind::OpenBracketToken) {
            return Ok(false);
        }
        self.next()?;
        if !self.is(TokenKind::Identifier) {
            return Ok(false);
        }
        self.next()?;
        Ok(self.is(TokenKind::InKeyword))
    }

    fn ts_parse_mapped_modifier(&mut self) -> PResult<Option<&'static str>> {
        let sign = match self.cur() {
            TokenKind::PlusToken => "+",
            TokenKind::MinusToken => "-",
            _ => return Ok(None),
        };
        self.next()?;
        Ok(Some(sign))
    }

    fn ts_parse_mapped_type(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        self.expect(TokenKind::OpenBraceToken)?;
        let readonly = if let Some(sign) = self.ts_parse_mapped_modifier()? {
            self.expect_contextual("readonly")?;
            Some(TSMappedModifier::Signed(sign))
        } else if self.eat_contextual("readonly")? {
            Some(TSMappedModifier::Plain(true))
        } else {
            None
        };

        self.expect(TokenKind::OpenBracketToken)?;
        let param_start = self.start_pos();
        let name = self.parse_identifier(false)?.name;
        self.expect(TokenKind::InKeyword)?;
        let constraint = self.ts_parse_type()?;
        let type_parameter = TSTypeParameter {
            span: self.span_from(param_start),
            name,
            constraint: Some(Box::new(constraint)),
            default: None,
            is_in: false,
            is_out: false,
            is_const: false,
        };
        let name_type = if self.eat_contextual("as")? {
            Some(Box::new(self.ts_parse_type()?))
        } else {
            None
        };
        self.expect(TokenKind::CloseBracketToken)?;

        let optional = if let Some(sign) = self.ts_parse_mapped_modifier()? {
            self.expect(TokenKind::QuestionToken)?;
            Some(TSMappedModifier::Signed(sign))
        } else if self.eat(TokenKind::QuestionToken)? {
            Some(TSMappedModifier::Plain(true))
        } else {
            None
        };
        let type_annotation = self.ts_eat_then_parse_type(TokenKind::ColonToken)?;
        self.semicolon(true)?;
        self.expect(TokenKind::CloseBraceToken)?;
        Ok(TSType::TSMappedType(TSMappedType {
            span: self.span_from(start),
            type_parameter,
            name_type,
            readonly,
            optional,
            type_annotation,
        }))
    }

    // ========================================================================
    // Tuples
    // ========================================================================

    fn ts_parse_tuple_type(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        self.expect(TokenKind::OpenBracketToken)?;
        let (element_types, _) =
            self.ts_parse_delimited_list(TokenKind::CloseBracketToken, |p| p.ts_parse_tuple_element_type())?;
        self.expect(TokenKind::CloseBracketToken)?;

        let mut seen_optional = false;
        let mut labeled_elements = None;
        for element in &element_types {
            let is_optional_member = matches!(element, TSType::TSNamedTupleMember(member) if member.optional);
            let is_optional = is_optional_member || matches!(element, TSType::TSOptionalType(_));
            if seen_optional && !is_optional && !matches!(element, TSType::TSRestType(_)) {
                self.raise(&TS_OPTIONAL_TYPE_BEFORE_REQUIRED, element.span().start, &[])?;
            }
            seen_optional |= is_optional;

            let is_labeled = match element {
                TSType::TSNamedTupleMember(_) => true,
                TSType::TSOptionalType(wrapped) | TSType::TSRestType(wrapped) => {
                    matches!(*wrapped.type_annotation, TSType::TSNamedTupleMember(_))
                }
                _ => false,
            };
            match labeled_elements {
                None => labeled_elements = Some(is_labeled),
                Some(labeled) if labeled != is_labeled => {
                    self.raise(&TS_MIXED_LABELED_AND_UNLABELED_ELEMENTS, element.span().start, &[])?;
                }
                Some(_) => {}
            }
        }

        Ok(TSType::TSTupleType(TSTupleType {
            span: self.span_from(start),
            element_types,
        }))
    }

    fn ts_parse_tuple_element_type(&mut self) -> PResult<TSType> {
        let start = self.start_pos();
        let rest = self.eat(TokenKind::DotDotDotToken)?;

        let after_word = if self.cur().is_keyword_or_identifier() {
            self.lookahead_char()
        } else {
            None
        };
        let mut label = None;
        let (ty, optional, labeled) = match after_word {
            Some(':') => {
                label = Some(self.parse_identifier(true)?);
                self.expect(TokenKind::ColonToken)?;
                (self.ts_parse_type()?, false, true)
            }
            Some('?') => {
                let word_start = self.start_pos();
                let word = self.cur_str().to_string();
                let type_or_label = self.ts_parse_non_array_type()?;
                if self.lookahead_char() == Some(':') {
                    label = Some(Identifier::new(self.span_from(word_start), word));
                    self.expect(TokenKind::QuestionToken)?;
                    self.expect(TokenKind::ColonToken)?;
                    (self.ts_parse_type()?, true, true)
                } else {
                    self.expect(TokenKind::QuestionToken)?;
                    (type_or_label, true, false)
                }
            }
            _ => {
                let ty = self.ts_parse_type()?;
                let optional = self.eat(TokenKind::QuestionToken)?;
                let labeled = self.eat(TokenKind::ColonToken)?;
                (ty, optional, labeled)
            }
        };

        let mut element = if labeled {
            let (label, element_type) = match label {
                Some(label) => (label, ty),
                None => {
                    // `[a.b: T]`: keep the written text as the label.
                    let span = *ty.span();
                    self.raise(&TS_INVALID_TUPLE_MEMBER_LABEL, span.start, &[])?;
                    let text = self.source_slice(span.start.index, span.end.index);
                    (Identifier::new(span, text), self.ts_parse_type()?)
                }
            };
            let optional = optional || self.eat(TokenKind::QuestionToken)?;
            TSType::TSNamedTupleMember(TSNamedTupleMember {
                span: self.span_from(label.span.start),
                label,
                element_type: Box::new(element_type),
                optional,
            })
        } else if optional {
            TSType::TSOptionalType(TSWrappedType {
                span: self.span_from(ty.span().start),
                type_annotation: Box::new(ty),
            })
        } else {
            ty
        };

        if rest {
            element = TSType::TSRestType(TSWrappedType {
                span: self.span_from(start),
                type_annotation: Box::new(element),
            });
        }
        Ok(element)
    }

    /// Whether the token after a modifier word lets the word act as one.
    pub(crate) fn ts_token_can_follow_modifier(&self) -> bool {
        let kind = self.cur();
        let fits = matches!(
            kind,
            TokenKind::OpenBracketToken
                | TokenKind::OpenBraceToken
                | TokenKind::AsteriskToken
                | TokenKind::DotDotDotToken
                | TokenKind::PrivateName
                | TokenKind::StringLiteral
                | TokenKind::NumericLiteral
                | TokenKind::BigIntLiteral
        ) || kind.is_keyword_or_identifier();
        fits && !self.has_preceding_line_break()
    }
}

fn literal_type(span: Span, literal: Expression) -> TSType {
    TSType::TSLiteralType(TSLiteralType {
        span,
        literal: TSLiteral::Expression(Box::new(literal)),
    })
}

/// A `this` pseudo-parameter, as in `function f(this: Window) {}`.
pub(crate) fn is_this_param(param: &Expression) -> bool {
    matches!(param, Expression::Identifier(id) if id.name == "this")
}

#[cfg(test)]
mod tests {
    use crate::entry::parse;
    use crate::options::ParserOptions;
    use quarry_ast::node::Statement;
    use quarry_ast::ts::*;
    use quarry_diagnostics::messages::*;

    fn ts() -> ParserOptions {
        ParserOptions::module().with_plugin("typescript")
    }

    /// The aliased type of `type T = ...;`.
    fn alias(source: &str) -> TSType {
        let output = parse(source, &ts()).unwrap();
        match output.file.program.body.into_iter().next() {
            Some(Statement::TSTypeAliasDeclaration(alias)) => alias.type_annotation,
            other => panic!("expected a type alias, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_type_arguments_close_one_bracket_at_a_time() {
        let TSType::TSTypeReference(outer) = alias("type T = Map<string, Array<Set<number>>>;") else {
            panic!("expected reference");
        };
        let args = outer.type_parameters.unwrap();
        assert_eq!(args.params.len(), 2);
        assert!(matches!(args.params[1], TSType::TSTypeReference(_)));
    }

    #[test]
    fn test_union_and_intersection_precedence() {
        let TSType::TSUnionType(union) = alias("type T = | A & B | C;") else {
            panic!("expected union");
        };
        assert_eq!(union.types.len(), 2);
        assert!(matches!(union.types[0], TSType::TSIntersectionType(_)));
    }

    #[test]
    fn test_conditional_with_infer() {
        let TSType::TSConditionalType(cond) = alias("type T<X> = X extends Array<infer U extends string> ? U : never;")
        else {
            panic!("expected conditional");
        };
        assert!(matches!(*cond.false_type, TSType::TSNeverKeyword(_)));
    }

    #[test]
    fn test_function_and_constructor_types() {
        assert!(matches!(alias("type F = (a: string, ...rest: number[]) => void;"), TSType::TSFunctionType(_)));
        assert!(matches!(alias("type F = <T>(x: T) => x is string;"), TSType::TSFunctionType(_)));
        let TSType::TSConstructorType(ctor) = alias("type C = abstract new () => object;") else {
            panic!("expected constructor type");
        };
        assert!(ctor.is_abstract);
        assert!(matches!(alias("type P = (string);"), TSType::TSParenthesizedType(_)));
    }

    #[test]
    fn test_type_literal_members() {
        let TSType::TSTypeLiteral(lit) =
            alias("type O = { a?: string; readonly b: number, (x: number): string; new (): O; [k: string]: any; m<T>(): T; get g(): number }")
        else {
            panic!("expected literal");
        };
        assert_eq!(lit.members.len(), 7);
        assert!(matches!(lit.members[2], TSTypeElement::TSCallSignatureDeclaration(_)));
        assert!(matches!(lit.members[3], TSTypeElement::TSConstructSignatureDeclaration(_)));
        assert!(matches!(lit.members[4], TSTypeElement::TSIndexSignature(_)));
        let TSTypeElement::TSMethodSignature(getter) = &lit.members[6] else {
            panic!("expected getter");
        };
        assert_eq!(getter.kind, TSMethodSignatureKind::Get);
    }

    #[test]
    fn test_mapped_type_modifiers() {
        let TSType::TSMappedType(mapped) = alias("type M = { -readonly [K in keyof T as `get${K}`]+?: T[K] };") else {
            panic!("expected mapped type");
        };
        assert_eq!(mapped.readonly, Some(TSMappedModifier::Signed("-")));
        assert_eq!(mapped.optional, Some(TSMappedModifier::Signed("+")));
        assert!(mapped.name_type.is_some());
        assert!(matches!(mapped.type_annotation.as_deref(), Some(TSType::TSIndexedAccessType(_))));
    }

    #[test]
    fn test_tuples() {
        let TSType::TSTupleType(tuple) = alias("type T = [a: string, b?: number, ...rest: boolean[]];") else {
            panic!("expected tuple");
        };
        assert_eq!(tuple.element_types.len(), 3);
        assert!(matches!(tuple.element_types[2], TSType::TSRestType(_)));

        let err = parse("type T = [a?, b];", &ts()).unwrap_err();
        assert!(err.is(&TS_OPTIONAL_TYPE_BEFORE_REQUIRED));

        let err = parse("type T = [a: string, number];", &ts()).unwrap_err();
        assert!(err.is(&TS_MIXED_LABELED_AND_UNLABELED_ELEMENTS));
    }

    #[test]
    fn test_literal_and_query_types() {
        assert!(matches!(alias("type N = -1;"), TSType::TSLiteralType(_)));
        assert!(matches!(alias("type Q = typeof a.b<string>;"), TSType::TSTypeQuery(_)));
        assert!(matches!(alias("type I = import('./mod').Thing<T>;"), TSType::TSImportType(_)));
        assert!(matches!(alias("type V = void;"), TSType::TSVoidKeyword(_)));
    }

    #[test]
    fn test_readonly_operator_needs_array_or_tuple() {
        assert!(matches!(alias("type R = readonly string[];"), TSType::TSTypeOperator(_)));
        let err = parse("type R = readonly Foo;", &ts()).unwrap_err();
        assert!(err.is(&TS_UNEXPECTED_READONLY));
    }

    #[test]
    fn test_empty_lists() {
        let err = parse("let x: Foo<>;", &ts()).unwrap_err();
        assert!(err.is(&TS_EMPTY_TYPE_ARGUMENTS));
        let err = parse("function f<>() {}", &ts()).unwrap_err();
        assert!(err.is(&TS_EMPTY_TYPE_PARAMETERS));
    }

    #[test]
    fn test_type_parameter_modifier_positions() {
        let err = parse("function f<in T>() {}", &ts()).unwrap_err();
        assert!(err.is(&TS_INVALID_MODIFIER_ON_TYPE_PARAMETER_POSITIONS));
        parse("function f<const T>(x: T) {}", &ts()).unwrap();
        parse("interface I<in out T> {}", &ts()).unwrap();
    }

    #[test]
    fn test_setter_signature_rules() {
        let err = parse("type S = { set v(a?: number) };", &ts()).unwrap_err();
        assert!(err.is(&TS_SET_ACCESSOR_CANNOT_HAVE_OPTIONAL_PARAMETER));
        let err = parse("type S = { set v(a: number): void };", &ts()).unwrap_err();
        assert!(err.is(&TS_SET_ACCESSOR_CANNOT_HAVE_RETURN_TYPE));
        let err = parse("type S = { get v(a: number): number };", &ts()).unwrap_err();
        assert!(err.is(&BAD_GETTER_ARITY));
    }
}
