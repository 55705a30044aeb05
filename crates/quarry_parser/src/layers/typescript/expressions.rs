//! Expression forms: generic arrows, `as`/`satisfies`, `<T>x`, `x!`,
//! explicit type arguments on calls, and the `(x?: T)` cover grammar of
//! arrow parameters.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::*;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_diagnostics::ParseError;
use quarry_scanner::TokContext;

use super::types::TypeParamModifiers;
use crate::grammar::{Grammar, LayerSet};
use crate::parser::Parser;
use crate::precedence::OperatorPrecedence;
use crate::try_parse::{Interrupt, TryParse};
use crate::utilities::{ExpressionErrors, SubscriptState};
use crate::PResult;

fn thrown<T>(attempt: &TryParse<T>) -> Option<&ParseError> {
    match attempt {
        TryParse::Thrown { error, .. } => Some(error),
        _ => None,
    }
}

impl Parser<'_> {
    /// Runs `f` speculatively and keeps its result when it produced one,
    /// committing recoverable errors along with it.
    pub(super) fn ts_try_parse_and_catch<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<Option<T>>) -> Option<T> {
        let attempt = self.try_parse(|p| match f(p) {
            Ok(Some(node)) => Ok(node),
            Ok(None) => Err(Interrupt::Abort(None)),
            Err(error) => Err(Interrupt::Error(error)),
        });
        match attempt {
            TryParse::Success(node) => Some(node),
            TryParse::Recovered { node, fail_state, .. } => {
                self.accept_state(fail_state);
                Some(node)
            }
            TryParse::Aborted { .. } | TryParse::Thrown { .. } => None,
        }
    }

    // ========================================================================
    // `<` at the start of an assignment expression
    // ========================================================================

    /// A leading `<` may open a JSX element, a generic arrow or (without
    /// JSX) a type assertion. Each reading is tried in that order and the
    /// first that parses cleanly wins; otherwise the first reading that at
    /// least produced a tree is kept with its errors.
    pub(super) fn ts_parse_maybe_assign(
        &mut self,
        next: &'static dyn Grammar,
        mut refs: Option<&mut ExpressionErrors>,
        paren_item: bool,
    ) -> PResult<Expression> {
        let has_jsx = self.has_layer(LayerSet::JSX);
        let mut jsx = None;
        if has_jsx && (self.is(TokenKind::JsxTagStart) || self.is(TokenKind::LessThanToken)) {
            let attempt = self.try_parse(|p| {
                next.parse_maybe_assign(p, refs.as_deref_mut(), paren_item)
                    .map_err(Interrupt::Error)
            });
            if let TryParse::Success(node) = attempt {
                return Ok(node);
            }
            if matches!(self.cur_context(), TokContext::JsxOpenTag | TokContext::JsxChild) {
                self.state.tok.context.pop();
            }
            jsx = Some(attempt);
        }

        if jsx.is_none() && !self.is(TokenKind::LessThanToken) {
            return next.parse_maybe_assign(self, refs, paren_item);
        }

        let arrow = self.try_parse(|p| {
            let (type_parameters, trailing_comma) = p.ts_parse_type_parameters(TypeParamModifiers::Const)?;
            let expr = next.parse_maybe_assign(p, refs.as_deref_mut(), paren_item)?;
            let Expression::ArrowFunctionExpression(mut arrow) = expr else {
                return Err(Interrupt::Abort(None));
            };
            if p.state.is_parenthesized(&arrow.span) {
                return Err(Interrupt::Abort(None));
            }
            if !type_parameters.params.is_empty() {
                arrow.span.start = type_parameters.span.start;
            }
            arrow.type_parameters = Some(type_parameters);
            Ok((Expression::ArrowFunctionExpression(arrow), trailing_comma))
        });
        tracing::debug!(outcome = arrow.outcome(), "generic arrow attempt");
        let arrow = match arrow {
            TryParse::Success((expr, trailing_comma)) => {
                self.ts_report_reserved_arrow_type_param(&expr, trailing_comma)?;
                return Ok(expr);
            }
            other => other,
        };

        let mut type_cast = None;
        if jsx.is_none() {
            let attempt = self.try_parse(|p| {
                next.parse_maybe_assign(p, refs.as_deref_mut(), paren_item)
                    .map_err(Interrupt::Error)
            });
            if let TryParse::Success(node) = attempt {
                return Ok(node);
            }
            type_cast = Some(attempt);
        }

        if let Some(TryParse::Recovered { node, fail_state, .. }) = jsx {
            self.accept_state(fail_state);
            return Ok(node);
        }
        if let TryParse::Recovered {
            node: (expr, trailing_comma),
            fail_state,
            ..
        } = arrow
        {
            self.accept_state(fail_state);
            self.ts_report_reserved_arrow_type_param(&expr, trailing_comma)?;
            return Ok(expr);
        }
        if let Some(TryParse::Recovered { node, fail_state, .. }) = type_cast {
            self.accept_state(fail_state);
            return Ok(node);
        }

        let error = jsx
            .as_ref()
            .and_then(thrown)
            .or_else(|| thrown(&arrow))
            .or_else(|| type_cast.as_ref().and_then(thrown))
            .or_else(|| jsx.as_ref().and_then(TryParse::error))
            .or_else(|| arrow.error())
            .or_else(|| type_cast.as_ref().and_then(TryParse::error))
            .cloned();
        Err(error.unwrap_or_else(|| self.unexpected(None)))
    }

    /// `<T>() => x` reads as JSX to some tools; the option rejects it.
    fn ts_report_reserved_arrow_type_param(&mut self, expr: &Expression, trailing_comma: bool) -> PResult<()> {
        let Expression::ArrowFunctionExpression(arrow) = expr else {
            return Ok(());
        };
        let Some(params) = &arrow.type_parameters else {
            return Ok(());
        };
        if params.params.len() == 1 && !trailing_comma && self.plugins.disallow_ambiguous_jsx_like {
            self.raise(&TS_RESERVED_ARROW_TYPE_PARAM, params.span.start, &[])?;
        }
        Ok(())
    }

    // ========================================================================
    // Operators and assertions
    // ========================================================================

    /// `<T>expr`, only reachable without JSX.
    pub(super) fn ts_parse_type_assertion(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        if self.plugins.disallow_ambiguous_jsx_like {
            self.raise(&TS_RESERVED_TYPE_ASSERTION, start, &[])?;
        }
        let type_annotation = match self.ts_try_next_parse_constant_context()? {
            Some(constant) => constant,
            None => self.ts_next_then_parse_type()?,
        };
        self.expect(TokenKind::GreaterThanToken)?;
        let expression = self.parse_maybe_unary(None, false)?;
        Ok(Expression::TSTypeAssertion(TSTypeAssertion {
            span: self.span_from(start),
            type_annotation: Box::new(type_annotation),
            expression: Box::new(expression),
        }))
    }

    /// `const` in `x as const` and `<const>x`, read as a type reference.
    fn ts_try_next_parse_constant_context(&mut self) -> PResult<Option<TSType>> {
        if self.lookahead()?.kind != TokenKind::ConstKeyword {
            return Ok(None);
        }
        self.next()?;
        self.ts_parse_type_reference().map(Some)
    }

    /// `expr as T` and `expr satisfies T` bind like relational operators.
    pub(super) fn ts_parse_expr_op(
        &mut self,
        next: &'static dyn Grammar,
        left: Expression,
        left_start: Position,
        min_prec: u8,
    ) -> PResult<Expression> {
        let satisfies = self.is_contextual("satisfies");
        if OperatorPrecedence::Relational.as_u8() > min_prec
            && !self.has_preceding_line_break()
            && (satisfies || self.is_contextual("as"))
        {
            let type_annotation = match self.ts_try_next_parse_constant_context()? {
                Some(constant) => constant,
                None => self.ts_next_then_parse_type()?,
            };
            let node = TSAsExpression {
                span: self.span_from(left_start),
                expression: Box::new(left),
                type_annotation: Box::new(type_annotation),
            };
            let node = if satisfies {
                Expression::TSSatisfiesExpression(node)
            } else {
                Expression::TSAsExpression(node)
            };
            self.rescan_lt_gt();
            return self.parse_expr_op(node, left_start, min_prec);
        }
        next.parse_expr_op(self, left, left_start, min_prec)
    }

    // ========================================================================
    // Subscripts
    // ========================================================================

    pub(super) fn ts_parse_subscript(
        &mut self,
        next: &'static dyn Grammar,
        base: Expression,
        start: Position,
        no_calls: bool,
        st: &mut SubscriptState,
    ) -> PResult<Expression> {
        if !self.has_preceding_line_break() && self.is(TokenKind::ExclamationToken) {
            self.state.tok.can_start_jsx_element = false;
            self.next()?;
            return Ok(Expression::TSNonNullExpression(TSNonNullExpression {
                span: self.span_from(start),
                expression: Box::new(base),
            }));
        }

        let mut is_optional_call = false;
        if self.is(TokenKind::QuestionDotToken) && self.lookahead_char() == Some('<') {
            if no_calls {
                st.stop = true;
                return Ok(base);
            }
            st.optional_chain_member = true;
            is_optional_call = true;
            self.next()?;
        }

        if self.is(TokenKind::LessThanToken) || self.is(TokenKind::LessThanLessThanToken) {
            let mut missing_paren = None;
            let result = self.ts_try_parse_and_catch(|p| {
                p.ts_parse_type_argument_subscript(&base, start, no_calls, st, is_optional_call, &mut missing_paren)
            });
            if let Some(at) = missing_paren {
                return Err(self.unexpected_at(at, Some(TokenKind::OpenParenToken)));
            }
            if let Some(result) = result {
                let property_access = self.is(TokenKind::DotToken)
                    || (self.is(TokenKind::QuestionDotToken) && self.lookahead_char() != Some('('));
                if matches!(result, Expression::TSInstantiationExpression(_)) && property_access {
                    let at = self.start_pos();
                    self.raise(&TS_INVALID_PROPERTY_ACCESS_AFTER_INSTANTIATION, at, &[])?;
                }
                return Ok(result);
            }
        }

        next.parse_subscript(self, base, start, no_calls, st)
    }

    /// What follows `base<...>`: a generic async arrow, a tagged template,
    /// a call, or a bare instantiation. `None` when the `<` is a
    /// comparison after all.
    fn ts_parse_type_argument_subscript(
        &mut self,
        base: &Expression,
        start: Position,
        no_calls: bool,
        st: &mut SubscriptState,
        is_optional_call: bool,
        missing_paren: &mut Option<Position>,
    ) -> PResult<Option<Expression>> {
        if !no_calls && self.at_possible_async_arrow(base) {
            if let Some(arrow) = self.ts_try_parse_generic_async_arrow(start)? {
                return Ok(Some(arrow));
            }
        }

        self.rescan_lt();
        if !self.is(TokenKind::LessThanToken) {
            return Ok(None);
        }
        let type_arguments = self.ts_parse_type_arguments()?;

        if is_optional_call && !self.is(TokenKind::OpenParenToken) {
            *missing_paren = Some(self.start_pos());
            return Ok(None);
        }

        if self.cur().is_template() {
            let tagged = self.parse_tagged_template(base.clone(), start, st)?;
            return Ok(Some(match tagged {
                Expression::TaggedTemplateExpression(mut tagged) => {
                    tagged.type_parameters = Some(type_arguments);
                    Expression::TaggedTemplateExpression(tagged)
                }
                other => other,
            }));
        }

        if !no_calls && self.eat(TokenKind::OpenParenToken)? {
            let (arguments, _) = self.parse_call_expression_arguments(None)?;
            self.ts_check_type_casts(&arguments.iter().collect::<Vec<_>>())?;
            let call = CallExpression {
                span: self.span_from(start),
                callee: Box::new(base.clone()),
                arguments,
                optional: st.optional_chain_member.then_some(is_optional_call),
                type_parameters: Some(type_arguments),
            };
            return self.finish_call_expression(call, st.optional_chain_member).map(Some);
        }

        let kind = self.cur();
        let continues_expression = kind != TokenKind::OpenParenToken
            && kind.starts_expression()
            && !self.has_preceding_line_break();
        if matches!(
            kind,
            TokenKind::GreaterThanToken
                | TokenKind::GreaterThanGreaterThanToken
                | TokenKind::GreaterThanGreaterThanGreaterThanToken
        ) || continues_expression
        {
            return Ok(None);
        }

        Ok(Some(Expression::TSInstantiationExpression(TSInstantiationExpression {
            span: self.span_from(start),
            expression: Box::new(base.clone()),
            type_parameters: type_arguments,
        })))
    }

    /// `async <T>(x: T): R => x`
    fn ts_try_parse_generic_async_arrow(&mut self, start: Position) -> PResult<Option<Expression>> {
        if !self.is(TokenKind::LessThanToken) {
            return Ok(None);
        }
        let old_maybe_in_arrow_parameters = std::mem::replace(&mut self.state.maybe_in_arrow_parameters, true);
        let head = self.ts_try_parse_and_catch(|p| {
            let (type_parameters, _) = p.ts_parse_type_parameters(TypeParamModifiers::Const)?;
            let mut parts = FunctionParts {
                type_parameters: Some(type_parameters),
                ..FunctionParts::default()
            };
            p.parse_function_params(&mut parts, false)?;
            parts.return_type = p.ts_try_parse_type_or_type_predicate_annotation()?;
            p.expect(TokenKind::EqualsGreaterThanToken)?;
            Ok(Some(parts))
        });
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow_parameters;
        let Some(parts) = head else {
            return Ok(None);
        };
        self.parse_arrow_expression(start, parts.params, true, None, parts.type_parameters, parts.return_type)
            .map(Some)
    }

    /// `new C<T>()` reads its type arguments as part of the callee first;
    /// move them onto the `new` expression unless parenthesized.
    pub(super) fn ts_split_instantiation(
        &mut self,
        callee: Expression,
        type_parameters: Option<TSTypeParameterInstantiation>,
    ) -> (Expression, Option<TSTypeParameterInstantiation>) {
        match callee {
            Expression::TSInstantiationExpression(inst) if !self.state.is_parenthesized(&inst.span) => {
                (*inst.expression, Some(inst.type_parameters))
            }
            other => (other, type_parameters),
        }
    }

    /// `<C<T> />`
    pub(super) fn ts_jsx_parse_type_arguments(&mut self) -> PResult<Option<TSTypeParameterInstantiation>> {
        if !self.is(TokenKind::LessThanToken) && !self.is(TokenKind::LessThanLessThanToken) {
            return Ok(None);
        }
        Ok(self.ts_try_parse_and_catch(|p| {
            p.rescan_lt();
            if !p.is(TokenKind::LessThanToken) {
                return Ok(None);
            }
            p.ts_parse_type_arguments().map(Some)
        }))
    }

    // ========================================================================
    // Parenthesized items
    // ========================================================================

    /// Inside a possible arrow head, `a ? b : c` might be the optional
    /// parameter `a?: c`. When the conditional does not parse, leave the
    /// `?` for the parenthesized item and remember where it failed.
    pub(super) fn ts_parse_conditional(
        &mut self,
        next: &'static dyn Grammar,
        expr: Expression,
        start: Position,
        refs: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression> {
        if !self.state.maybe_in_arrow_parameters || !self.is(TokenKind::QuestionToken) {
            return next.parse_conditional(self, expr, start, refs);
        }
        let attempt = self.try_parse(|p| {
            next.parse_conditional(p, expr.clone(), start, None)
                .map_err(Interrupt::Error)
        });
        match attempt {
            TryParse::Success(node) => Ok(node),
            TryParse::Recovered { node, fail_state, .. } => {
                self.accept_state(fail_state);
                Ok(node)
            }
            TryParse::Thrown { error, .. } => {
                if let Some(refs) = refs {
                    refs.optional_parameters = Some(error.loc);
                }
                Ok(expr)
            }
            TryParse::Aborted { .. } => Ok(expr),
        }
    }

    /// `(x?: T` inside parentheses.
    pub(super) fn ts_parse_paren_item(
        &mut self,
        next: &'static dyn Grammar,
        expr: Expression,
        start: Position,
    ) -> PResult<Expression> {
        let mut node = next.parse_paren_item(self, expr, start)?;
        if self.eat(TokenKind::QuestionToken)? {
            match &mut node {
                Expression::Identifier(id) => id.optional = true,
                Expression::ObjectPattern(pattern) => pattern.optional = true,
                Expression::ArrayPattern(pattern) => pattern.optional = true,
                Expression::RestElement(rest) => rest.optional = true,
                _ => {}
            }
            node.span_mut().end = self.last_end();
        }
        if self.is(TokenKind::ColonToken) {
            let type_annotation = self.ts_parse_type_annotation()?;
            return Ok(Expression::TSTypeCastExpression(TSTypeCastExpression {
                span: self.span_from(start),
                expression: Box::new(node),
                type_annotation,
            }));
        }
        Ok(node)
    }

    /// A `(x: T)` cast that did not become an arrow parameter.
    pub(super) fn ts_check_type_casts(&mut self, exprs: &[&Expression]) -> PResult<()> {
        for expr in exprs {
            if let Expression::TSTypeCastExpression(cast) = expr {
                self.raise(&TS_UNEXPECTED_TYPE_ANNOTATION, cast.type_annotation.span.start, &[])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::parse;
    use crate::options::ParserOptions;
    use quarry_ast::node::*;
    use quarry_diagnostics::messages::*;

    fn ts() -> ParserOptions {
        ParserOptions::module().with_plugin("typescript")
    }

    fn expr(source: &str) -> Expression {
        expr_with(source, &ts())
    }

    fn expr_with(source: &str, options: &ParserOptions) -> Expression {
        let output = parse(source, options).unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        match output.file.program.body.into_iter().next() {
            Some(Statement::ExpressionStatement(stmt)) => *stmt.expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_as_and_satisfies() {
        match expr("x as any as string;") {
            Expression::TSAsExpression(outer) => {
                assert!(matches!(*outer.expression, Expression::TSAsExpression(_)));
            }
            other => panic!("expected as, got {other:?}"),
        }
        assert!(matches!(expr("x satisfies T;"), Expression::TSSatisfiesExpression(_)));
        match expr("a < b as c;") {
            Expression::TSAsExpression(node) => {
                assert!(matches!(*node.expression, Expression::BinaryExpression(_)));
            }
            other => panic!("expected as, got {other:?}"),
        }
    }

    #[test]
    fn test_as_const() {
        match expr("[1, 2] as const;") {
            Expression::TSAsExpression(node) => {
                assert!(matches!(*node.type_annotation, quarry_ast::ts::TSType::TSTypeReference(_)));
            }
            other => panic!("expected as, got {other:?}"),
        }
    }

    #[test]
    fn test_type_assertion_without_jsx() {
        match expr("<string>x;") {
            Expression::TSTypeAssertion(node) => {
                assert!(matches!(*node.expression, Expression::Identifier(_)));
            }
            other => panic!("expected assertion, got {other:?}"),
        }
    }

    #[test]
    fn test_non_null_and_calls_with_type_arguments() {
        assert!(matches!(expr("a!;"), Expression::TSNonNullExpression(_)));
        match expr("f<string>(x);") {
            Expression::CallExpression(call) => assert!(call.type_parameters.is_some()),
            other => panic!("expected call, got {other:?}"),
        }
        match expr("new C<T>();") {
            Expression::NewExpression(call) => {
                assert!(call.type_parameters.is_some());
                assert!(matches!(*call.callee, Expression::Identifier(_)));
            }
            other => panic!("expected new, got {other:?}"),
        }
    }

    #[test]
    fn test_comparison_is_not_type_arguments() {
        assert!(matches!(expr("a < b > c;"), Expression::BinaryExpression(_)));
        assert!(matches!(expr("f<T>;"), Expression::TSInstantiationExpression(_)));
    }

    #[test]
    fn test_property_access_after_instantiation() {
        let output = parse("f<T>.x;", &ts().with_error_recovery()).unwrap();
        assert!(output
            .errors
            .iter()
            .any(|e| e.is(&TS_INVALID_PROPERTY_ACCESS_AFTER_INSTANTIATION)));
    }

    #[test]
    fn test_arrow_parameters_with_types_and_optionals() {
        match expr("(a?: number, b: string = ''): void => {};") {
            Expression::ArrowFunctionExpression(arrow) => {
                assert_eq!(arrow.params.len(), 2);
                assert!(arrow.return_type.is_some());
                match &arrow.params[0] {
                    Expression::Identifier(id) => {
                        assert!(id.optional);
                        assert!(id.type_annotation.is_some());
                    }
                    other => panic!("expected identifier, got {other:?}"),
                }
                assert!(matches!(arrow.params[1], Expression::AssignmentPattern(_)));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_conditional_inside_parens_is_still_conditional() {
        assert!(matches!(expr("(a ? b : c);"), Expression::ConditionalExpression(_)));
    }

    #[test]
    fn test_type_cast_outside_arrow_is_rejected() {
        let output = parse("(a: number);", &ts().with_error_recovery()).unwrap();
        assert!(output.errors.iter().any(|e| e.is(&TS_UNEXPECTED_TYPE_ANNOTATION)));
    }

    #[test]
    fn test_generic_async_arrow() {
        match expr("async <T>(x: T): Promise<T> => x;") {
            Expression::ArrowFunctionExpression(arrow) => {
                assert!(arrow.is_async);
                assert!(arrow.type_parameters.is_some());
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_arrow_type_param_option() {
        let options = ParserOptions::module()
            .with_plugin_options("typescript", serde_json::json!({ "disallowAmbiguousJSXLike": true }))
            .with_error_recovery();
        let output = parse("<T>() => x;", &options).unwrap();
        assert!(output.errors.iter().any(|e| e.is(&TS_RESERVED_ARROW_TYPE_PARAM)));
        let output = parse("<T,>() => x;", &options).unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
    }

    #[test]
    fn test_jsx_element_type_arguments() {
        match expr_with("<C<string> prop />;", &ts().with_plugin("jsx")) {
            Expression::JSXElement(element) => {
                assert!(element.opening_element.type_parameters.is_some());
            }
            other => panic!("expected element, got {other:?}"),
        }
    }
}
