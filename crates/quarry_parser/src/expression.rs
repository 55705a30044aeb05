//! Expressions.
//!
//! The descent runs sequence → assignment → conditional → binary operators
//! → unary → update → subscripts → atoms. Constructs that cannot be told
//! apart from an assignment target or an arrow head until later (`{a = 1}`,
//! `(a, b)`, `async(x)`) are parsed as expressions first; the deferred
//! errors travel in [`ExpressionErrors`] and are reported once the reading
//! is settled.

use quarry_ast::node::*;
use quarry_ast::ops::{AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator};
use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_ast::ts::TSTypeParameterInstantiation;
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::*;
use quarry_diagnostics::{DiagnosticMessage, ErrorList};
use quarry_scanner::char_codes::is_identifier_start;
use quarry_scope::{function_flags, BindingFlags, ParamFlags, ScopeFlags};

use crate::parser::Parser;
use crate::precedence::{binary_precedence, OperatorPrecedence};
use crate::utilities::{
    is_keyword, is_reserved_word, is_strict_bind_reserved_word, is_strict_reserved_word, ArrowHead,
    ExpressionErrors, FunctionKind, LvalAncestor, SubscriptState,
};
use crate::PResult;

impl Parser<'_> {
    // ========================================================================
    // `in` handling
    // ========================================================================

    /// Runs `f` with the `in` operator allowed.
    pub(crate) fn allow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let flags = self.state.prod_param.current();
        if flags.contains(ParamFlags::IN) {
            return f(self);
        }
        self.state.prod_param.enter(flags | ParamFlags::IN);
        let result = f(self);
        self.state.prod_param.exit();
        result
    }

    /// Runs `f` with `in` read as the end of the expression, for
    /// `for (init in ...)` heads.
    pub(crate) fn disallow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let flags = self.state.prod_param.current();
        if !flags.contains(ParamFlags::IN) {
            return f(self);
        }
        self.state.prod_param.enter(flags - ParamFlags::IN);
        let result = f(self);
        self.state.prod_param.exit();
        result
    }

    // ========================================================================
    // Sequences and assignment
    // ========================================================================

    pub(crate) fn parse_expression(&mut self) -> PResult<Expression> {
        self.allow_in_and(|p| p.parse_expression_base(None))
    }

    pub(crate) fn parse_expression_base(&mut self, mut refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        let expr = self.parse_maybe_assign(refs.as_deref_mut(), false)?;
        if !self.is(TokenKind::CommaToken) {
            return Ok(expr);
        }
        let mut expressions = vec![expr];
        while self.eat(TokenKind::CommaToken)? {
            expressions.push(self.parse_maybe_assign(refs.as_deref_mut(), false)?);
        }
        self.to_referenced_list(expressions.iter().collect(), false)?;
        Ok(Expression::SequenceExpression(SequenceExpression {
            span: self.span_from(start),
            expressions,
        }))
    }

    pub(crate) fn parse_maybe_assign_allow_in(&mut self) -> PResult<Expression> {
        self.allow_in_and(|p| p.parse_maybe_assign(None, false))
    }

    pub(crate) fn parse_maybe_assign_disallow_in(&mut self) -> PResult<Expression> {
        self.disallow_in_and(|p| p.parse_maybe_assign(None, false))
    }

    /// An assignment expression, or anything below it. With `paren_item`
    /// the left side gets the parenthesized-item treatment before any
    /// assignment operator is considered.
    pub(crate) fn base_parse_maybe_assign(
        &mut self,
        refs: Option<&mut ExpressionErrors>,
        paren_item: bool,
    ) -> PResult<Expression> {
        self.with_recursion_guard(|p| p.parse_maybe_assign_guarded(refs, paren_item))
    }

    fn parse_maybe_assign_guarded(
        &mut self,
        refs: Option<&mut ExpressionErrors>,
        paren_item: bool,
    ) -> PResult<Expression> {
        let start = self.start_pos();
        if self.is_contextual("yield") && self.state.prod_param.has_yield() {
            let left = self.parse_yield(start)?;
            return if paren_item {
                self.parse_paren_item(left, start)
            } else {
                Ok(left)
            };
        }

        let owns_errors = refs.is_none();
        let mut own = ExpressionErrors::default();
        let refs = refs.unwrap_or(&mut own);

        if self.is(TokenKind::OpenParenToken) || self.is(TokenKind::Identifier) {
            self.state.potential_arrow_at = Some(self.state.tok.start);
        }

        let mut left = self.parse_maybe_conditional(Some(&mut *refs))?;
        if paren_item {
            left = self.parse_paren_item(left, start)?;
        }

        let kind = self.cur();
        if kind.is_assignment_operator() {
            let operator = AssignmentOperator::from_token(kind).ok_or_else(|| self.unexpected(None))?;
            if kind == TokenKind::EqualsToken {
                left = self.to_assignable(left, true)?;
                let from = start.index;
                if refs.double_proto.is_some_and(|at| at.index >= from) {
                    refs.double_proto = None;
                }
                if refs.shorthand_assign.is_some_and(|at| at.index >= from) {
                    refs.shorthand_assign = None;
                }
                if refs.private_key.is_some_and(|at| at.index >= from) {
                    self.check_destructuring_private(refs)?;
                    refs.private_key = None;
                }
            }
            self.next()?;
            let right = self.parse_maybe_assign(None, false)?;
            self.check_lval(&left, LvalAncestor::AssignmentExpression, BindingFlags::NONE)?;
            return Ok(Expression::AssignmentExpression(AssignmentExpression {
                span: self.span_from(start),
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }));
        }
        if owns_errors {
            self.check_expression_errors(Some(refs), true)?;
        }
        Ok(left)
    }

    /// Reports deferred errors, or with `and_throw` unset only says whether
    /// there are any.
    pub(crate) fn check_expression_errors(
        &mut self,
        refs: Option<&mut ExpressionErrors>,
        and_throw: bool,
    ) -> PResult<bool> {
        let Some(refs) = refs else {
            return Ok(false);
        };
        if !and_throw {
            return Ok(refs.has_errors());
        }
        if let Some(at) = refs.shorthand_assign {
            self.raise(&INVALID_COVER_INITIALIZED_NAME, at, &[])?;
        }
        if let Some(at) = refs.double_proto {
            self.raise(&DUPLICATE_PROTO, at, &[])?;
        }
        if let Some(at) = refs.private_key {
            self.raise(&UNEXPECTED_PRIVATE_FIELD, at, &[])?;
        }
        if let Some(at) = refs.optional_parameters {
            return Err(self.unexpected_at(at, None));
        }
        Ok(refs.has_errors())
    }

    /// A private key in a destructuring pattern.
    pub(crate) fn check_destructuring_private(&mut self, refs: &ExpressionErrors) -> PResult<()> {
        match refs.private_key {
            Some(at) => Err(self.missing_plugin(at, &["destructuringPrivate"])),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Conditional and binary operators
    // ========================================================================

    fn parse_maybe_conditional(&mut self, mut refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        let potential_arrow_at = self.state.potential_arrow_at;
        let expr = self.parse_expr_ops(refs.as_deref_mut())?;
        if self.should_exit_descending(&expr, potential_arrow_at) {
            return Ok(expr);
        }
        self.parse_conditional(expr, start, refs)
    }

    pub(crate) fn base_parse_conditional(
        &mut self,
        expr: Expression,
        start: Position,
        _refs: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression> {
        if !self.eat(TokenKind::QuestionToken)? {
            return Ok(expr);
        }
        let consequent = self.parse_maybe_assign_allow_in()?;
        self.expect(TokenKind::ColonToken)?;
        let alternate = self.parse_maybe_assign(None, false)?;
        Ok(Expression::ConditionalExpression(ConditionalExpression {
            span: self.span_from(start),
            test: Box::new(expr),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }))
    }

    /// An unparenthesized arrow ends the expression; nothing may follow it
    /// as an operand.
    fn should_exit_descending(&self, expr: &Expression, potential_arrow_at: Option<usize>) -> bool {
        matches!(expr, Expression::ArrowFunctionExpression(_))
            && potential_arrow_at == Some(expr.span().start.index as usize)
            && !self.state.is_parenthesized(expr.span())
    }

    fn parse_expr_ops(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        let potential_arrow_at = self.state.potential_arrow_at;
        let expr = self.parse_maybe_unary_or_private(refs)?;
        if self.should_exit_descending(&expr, potential_arrow_at) {
            return Ok(expr);
        }
        self.parse_expr_op(expr, start, OperatorPrecedence::None.as_u8())
    }

    pub(crate) fn parse_maybe_unary_or_private(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        if self.is(TokenKind::PrivateName) {
            Ok(self.parse_private_name()?)
        } else {
            self.parse_maybe_unary(refs, false)
        }
    }

    /// Precedence climbing over binary operators binding tighter than
    /// `min_prec`.
    pub(crate) fn base_parse_expr_op(
        &mut self,
        left: Expression,
        left_start: Position,
        min_prec: u8,
    ) -> PResult<Expression> {
        if let Some(name) = private_name_of(&left) {
            let at = left.span().start;
            if min_prec >= OperatorPrecedence::Relational.as_u8()
                || !self.state.prod_param.has_in()
                || !self.is(TokenKind::InKeyword)
            {
                self.raise(&PRIVATE_IN_EXPECTED_IN, at, &[&name])?;
            }
            self.use_private_name(&name, at)?;
        }

        let op = self.cur();
        let Some(precedence) = binary_precedence(op) else {
            return Ok(left);
        };
        if op == TokenKind::InKeyword && !self.state.prod_param.has_in() {
            return Ok(left);
        }
        let mut prec = precedence.as_u8();
        if prec <= min_prec {
            return Ok(left);
        }

        let logical = LogicalOperator::from_token(op);
        let coalesce = op == TokenKind::QuestionQuestionToken;
        if coalesce {
            prec = OperatorPrecedence::LogicalAnd.as_u8();
        }
        self.next()?;

        let right_start = self.start_pos();
        let right = self.parse_maybe_unary_or_private(None)?;
        let right_prec = if op == TokenKind::AsteriskAsteriskToken { prec - 1 } else { prec };
        let right = self.parse_expr_op(right, right_start, right_prec)?;

        let span = self.span_from(left_start);
        let node = match logical {
            Some(operator) => Expression::LogicalExpression(LogicalExpression {
                span,
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
            None => Expression::BinaryExpression(BinaryExpression {
                span,
                operator: BinaryOperator::from_token(op).ok_or_else(|| self.unexpected(None))?,
                left: Box::new(left),
                right: Box::new(right),
            }),
        };

        let next = self.cur();
        let mixes = if coalesce {
            matches!(next, TokenKind::BarBarToken | TokenKind::AmpersandAmpersandToken)
        } else {
            logical.is_some() && next == TokenKind::QuestionQuestionToken
        };
        if mixes {
            return Err(MIXING_COALESCE_WITH_LOGICAL.at(self.start_pos(), &[]));
        }
        self.parse_expr_op(node, left_start, min_prec)
    }

    // ========================================================================
    // Unary, update, await and yield
    // ========================================================================

    pub(crate) fn base_parse_maybe_unary(
        &mut self,
        refs: Option<&mut ExpressionErrors>,
        saw_unary: bool,
    ) -> PResult<Expression> {
        let start = self.start_pos();
        let is_await = self.is_contextual("await");
        if is_await && self.record_await_if_allowed() {
            self.next()?;
            let expr = self.parse_await(start)?;
            if !saw_unary {
                self.check_exponential_after_unary(&expr)?;
            }
            return Ok(expr);
        }

        let kind = self.cur();
        let update = kind.is_update_operator();
        if update || kind.is_prefix_operator() {
            self.next()?;
            let argument = self.parse_maybe_unary(None, true)?;
            self.check_expression_errors(refs, true)?;
            if update {
                self.check_lval(&argument, LvalAncestor::Update { prefix: true }, BindingFlags::NONE)?;
                return Ok(Expression::UpdateExpression(UpdateExpression {
                    span: self.span_from(start),
                    operator: update_operator(kind),
                    prefix: true,
                    argument: Box::new(argument),
                }));
            }
            if self.state.strict && kind == TokenKind::DeleteKeyword {
                if argument.is_identifier() {
                    self.raise(&STRICT_DELETE, start, &[])?;
                } else if has_private_property(&argument) {
                    self.raise(&DELETE_PRIVATE_FIELD, start, &[])?;
                }
            }
            let node = Expression::UnaryExpression(UnaryExpression {
                span: self.span_from(start),
                operator: UnaryOperator::from_token(kind).ok_or_else(|| self.unexpected_at(start, None))?,
                prefix: true,
                argument: Box::new(argument),
            });
            if !saw_unary {
                self.check_exponential_after_unary(&node)?;
            }
            return Ok(node);
        }

        let expr = self.parse_update(refs)?;
        if is_await {
            let next = self.cur();
            if next.starts_expression() && next != TokenKind::PercentToken && !self.is_ambiguous_await() {
                self.raise_overwrite(&AWAIT_NOT_IN_ASYNC_CONTEXT, start)?;
                return self.parse_await(start);
            }
        }
        Ok(expr)
    }

    fn parse_update(&mut self, mut refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        let mut expr = self.parse_expr_subscripts(refs.as_deref_mut())?;
        if self.check_expression_errors(refs, false)? {
            return Ok(expr);
        }
        while self.cur().is_update_operator() && !self.can_insert_semicolon() {
            let operator = update_operator(self.cur());
            self.next()?;
            self.check_lval(&expr, LvalAncestor::Update { prefix: false }, BindingFlags::NONE)?;
            expr = Expression::UpdateExpression(UpdateExpression {
                span: self.span_from(start),
                operator,
                prefix: false,
                argument: Box::new(expr),
            });
        }
        Ok(expr)
    }

    /// `-x ** 2` is ambiguous and rejected; `(-x) ** 2` is fine.
    fn check_exponential_after_unary(&mut self, node: &Expression) -> PResult<()> {
        if !self.is(TokenKind::AsteriskAsteriskToken) || self.state.is_parenthesized(node.span()) {
            return Ok(());
        }
        let at = match node {
            Expression::UnaryExpression(unary) => unary.argument.span().start,
            Expression::AwaitExpression(await_expr) => await_expr.argument.span().start,
            other => other.span().start,
        };
        self.raise(&UNEXPECTED_TOKEN_UNARY_EXPONENTIATION, at, &[])
    }

    /// Replaces an error already recorded at `at` with `message`.
    fn raise_overwrite(&mut self, message: &DiagnosticMessage, at: Position) -> PResult<()> {
        if self.options.error_recovery && !self.is_lookahead {
            let kept: Vec<_> = std::mem::take(&mut self.state.errors)
                .into_vec()
                .into_iter()
                .filter(|error| error.pos() != at.index)
                .collect();
            let mut errors = ErrorList::new();
            for error in kept {
                errors.push(error);
            }
            self.state.errors = errors;
        }
        self.raise(message, at, &[])
    }

    pub(crate) fn record_await_if_allowed(&self) -> bool {
        self.state.prod_param.has_await()
            || (self.options.allow_await_outside_function && !self.state.scope.in_function())
    }

    /// After `await`, whether the next token reads the same as a script
    /// identifier followed by an operator.
    fn is_ambiguous_await(&self) -> bool {
        if self.has_preceding_line_break() {
            return true;
        }
        let kind = self.cur();
        matches!(
            kind,
            TokenKind::PlusToken
                | TokenKind::MinusToken
                | TokenKind::OpenParenToken
                | TokenKind::OpenBracketToken
                | TokenKind::SlashToken
                | TokenKind::SlashEqualsToken
                | TokenKind::RegularExpressionLiteral
        ) || kind.is_template()
    }

    fn parse_await(&mut self, start: Position) -> PResult<Expression> {
        if self.state.await_pos.is_none() {
            self.state.await_pos = Some(start);
        }
        if !self.state.scope.in_function() && !self.options.allow_await_outside_function {
            if self.is_ambiguous_await() {
                self.ambiguous_script_different_ast = true;
            } else {
                self.saw_unambiguous_esm = true;
            }
        }
        let argument = self.parse_maybe_unary(None, true)?;
        Ok(Expression::AwaitExpression(AwaitExpression {
            span: self.span_from(start),
            argument: Box::new(argument),
        }))
    }

    fn parse_yield(&mut self, start: Position) -> PResult<Expression> {
        if self.state.yield_pos.is_none() {
            self.state.yield_pos = Some(start);
        }
        self.next()?;
        let mut delegate = false;
        let mut argument = None;
        if !self.has_preceding_line_break() {
            delegate = self.eat(TokenKind::AsteriskToken)?;
            let ends = matches!(
                self.cur(),
                TokenKind::SemicolonToken
                    | TokenKind::EndOfFileToken
                    | TokenKind::CloseBraceToken
                    | TokenKind::CloseParenToken
                    | TokenKind::CloseBracketToken
                    | TokenKind::ColonToken
                    | TokenKind::CommaToken
            );
            if delegate || !ends {
                argument = Some(Box::new(self.parse_maybe_assign(None, false)?));
            }
        }
        Ok(Expression::YieldExpression(YieldExpression {
            span: self.span_from(start),
            delegate,
            argument,
        }))
    }

    // ========================================================================
    // Calls and member accesses
    // ========================================================================

    pub(crate) fn parse_expr_subscripts(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        let potential_arrow_at = self.state.potential_arrow_at;
        let expr = self.parse_expr_atom(refs)?;
        if self.should_exit_descending(&expr, potential_arrow_at) {
            return Ok(expr);
        }
        self.parse_subscripts(expr, start, false)
    }

    pub(crate) fn parse_subscripts(&mut self, mut base: Expression, start: Position, no_calls: bool) -> PResult<Expression> {
        let mut st = SubscriptState {
            optional_chain_member: false,
            maybe_async_arrow: self.at_possible_async_arrow(&base),
            stop: false,
        };
        loop {
            base = self.parse_subscript(base, start, no_calls, &mut st)?;
            st.maybe_async_arrow = false;
            if st.stop {
                return Ok(base);
            }
        }
    }

    pub(crate) fn base_parse_subscript(
        &mut self,
        base: Expression,
        start: Position,
        no_calls: bool,
        st: &mut SubscriptState,
    ) -> PResult<Expression> {
        if self.cur().is_template() {
            return self.parse_tagged_template(base, start, st);
        }
        let mut optional = false;
        if self.is(TokenKind::QuestionDotToken) {
            if no_calls {
                let at = self.start_pos();
                self.raise(&OPTIONAL_CHAINING_NO_NEW, at, &[])?;
                if self.lookahead_char() == Some('(') {
                    st.stop = true;
                    return Ok(base);
                }
            }
            st.optional_chain_member = true;
            optional = true;
            self.next()?;
        }
        if !no_calls && self.is(TokenKind::OpenParenToken) {
            return self.parse_cover_call_and_async_arrow_head(base, start, st, optional);
        }
        let computed = self.eat(TokenKind::OpenBracketToken)?;
        if computed || optional || self.eat(TokenKind::DotToken)? {
            return self.parse_member(base, start, st, computed, optional);
        }
        st.stop = true;
        Ok(base)
    }

    fn parse_member(
        &mut self,
        base: Expression,
        start: Position,
        st: &SubscriptState,
        computed: bool,
        optional: bool,
    ) -> PResult<Expression> {
        let property = if computed {
            let property = self.parse_expression()?;
            self.expect(TokenKind::CloseBracketToken)?;
            property
        } else if self.is(TokenKind::PrivateName) {
            if matches!(base, Expression::Super(_)) {
                self.raise(&SUPER_PRIVATE_FIELD, start, &[])?;
            }
            let name = self.cur_str().to_string();
            let at = self.start_pos();
            self.use_private_name(&name, at)?;
            self.parse_private_name()?
        } else {
            Expression::Identifier(self.parse_identifier(true)?)
        };
        let member = MemberExpression {
            span: self.span_from(start),
            object: Box::new(base),
            property: Box::new(property),
            computed,
            optional: st.optional_chain_member.then_some(optional),
        };
        Ok(if st.optional_chain_member {
            Expression::OptionalMemberExpression(member)
        } else {
            Expression::MemberExpression(member)
        })
    }

    /// `async` directly followed by `(` on the same line, at a position
    /// where an arrow may start.
    pub(crate) fn at_possible_async_arrow(&self, base: &Expression) -> bool {
        let Expression::Identifier(id) = base else {
            return false;
        };
        id.name == "async"
            && self.last_end().index == id.span.end.index
            && !self.can_insert_semicolon()
            && id.span.len() == 5
            && self.state.potential_arrow_at == Some(id.span.start.index as usize)
    }

    fn parse_cover_call_and_async_arrow_head(
        &mut self,
        base: Expression,
        start: Position,
        st: &mut SubscriptState,
        optional: bool,
    ) -> PResult<Expression> {
        let old_maybe_in_arrow_parameters = self.state.maybe_in_arrow_parameters;
        self.state.maybe_in_arrow_parameters = true;
        self.next()?;

        let maybe_async_arrow = st.maybe_async_arrow;
        let saved = maybe_async_arrow.then(|| self.take_param_positions());
        let mut arrow_errors = ExpressionErrors::default();
        let refs = (maybe_async_arrow && !optional).then_some(&mut arrow_errors);
        let (arguments, trailing_comma) = self.parse_call_expression_arguments(refs)?;

        let call = CallExpression {
            span: self.span_from(start),
            callee: Box::new(base),
            arguments,
            optional: st.optional_chain_member.then_some(optional),
            type_parameters: None,
        };
        let finished = self.finish_call_expression(call, st.optional_chain_member)?;

        let result = if maybe_async_arrow && self.should_parse_async_arrow() && !optional {
            st.stop = true;
            self.check_destructuring_private(&arrow_errors)?;
            self.check_param_positions(true)?;
            if let Some(saved) = saved {
                self.restore_param_positions(saved);
            }
            let params = match finished {
                Expression::CallExpression(call) | Expression::OptionalCallExpression(call) => call.arguments,
                _ => Vec::new(),
            };
            self.parse_async_arrow_from_call(start, params, trailing_comma)?
        } else {
            if maybe_async_arrow {
                self.check_expression_errors(Some(&mut arrow_errors), true)?;
            }
            if let Some(saved) = saved {
                self.merge_param_positions(saved);
            }
            if let Expression::CallExpression(call) | Expression::OptionalCallExpression(call) = &finished {
                self.to_referenced_list(call.arguments.iter().collect(), false)?;
            }
            finished
        };
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow_parameters;
        Ok(result)
    }

    /// Arguments up to and including `)`. Returns the position of a
    /// trailing comma, which an async arrow head must reject.
    pub(crate) fn parse_call_expression_arguments(
        &mut self,
        mut refs: Option<&mut ExpressionErrors>,
    ) -> PResult<(Vec<Expression>, Option<Position>)> {
        let mut arguments = Vec::new();
        let mut trailing_comma = None;
        let mut first = true;
        while !self.eat(TokenKind::CloseParenToken)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::CommaToken)?;
                if self.is(TokenKind::CloseParenToken) {
                    trailing_comma = Some(self.state.tok.last_tok_start_loc);
                    self.next()?;
                    break;
                }
            }
            arguments.push(self.parse_expr_list_item(false, refs.as_deref_mut())?.ok_or_else(|| self.unexpected(None))?);
        }
        Ok((arguments, trailing_comma))
    }

    pub(crate) fn base_finish_call_expression(&mut self, call: CallExpression, optional: bool) -> PResult<Expression> {
        if matches!(*call.callee, Expression::Import(_)) {
            if call.arguments.is_empty() || call.arguments.len() > 2 {
                self.raise(&IMPORT_CALL_ARITY, call.span.start, &[])?;
            } else {
                for argument in &call.arguments {
                    if let Expression::SpreadElement(spread) = argument {
                        self.raise(&IMPORT_CALL_SPREAD_ARGUMENT, spread.span.start, &[])?;
                    }
                }
            }
        }
        Ok(if optional {
            Expression::OptionalCallExpression(call)
        } else {
            Expression::CallExpression(call)
        })
    }

    pub(crate) fn base_should_parse_async_arrow(&mut self) -> bool {
        self.is(TokenKind::EqualsGreaterThanToken) && !self.can_insert_semicolon()
    }

    pub(crate) fn base_parse_async_arrow_return_type(
        &mut self,
    ) -> PResult<Option<Box<quarry_ast::ts::TSTypeAnnotation>>> {
        Ok(None)
    }

    fn parse_async_arrow_from_call(
        &mut self,
        start: Position,
        params: Vec<Expression>,
        trailing_comma: Option<Position>,
    ) -> PResult<Expression> {
        let return_type = self.parse_async_arrow_return_type()?;
        self.expect(TokenKind::EqualsGreaterThanToken)?;
        self.parse_arrow_expression(start, params, true, trailing_comma, None, return_type)
    }

    pub(crate) fn parse_tagged_template(&mut self, tag: Expression, start: Position, st: &SubscriptState) -> PResult<Expression> {
        let quasi = self.parse_template(true)?;
        if st.optional_chain_member {
            self.raise(&OPTIONAL_CHAINING_NO_TEMPLATE, start, &[])?;
        }
        Ok(Expression::TaggedTemplateExpression(TaggedTemplateExpression {
            span: self.span_from(start),
            tag: Box::new(tag),
            quasi,
            type_parameters: None,
        }))
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    pub(crate) fn base_parse_expr_atom(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        match self.cur() {
            TokenKind::SuperKeyword => self.parse_super(),
            TokenKind::ImportKeyword => self.parse_import_atom(),
            TokenKind::ThisKeyword => {
                self.next()?;
                Ok(Expression::ThisExpression(Keyword {
                    span: self.span_from(start),
                }))
            }
            TokenKind::OpenParenToken => {
                let can_be_arrow = self.state.potential_arrow_at == Some(self.state.tok.start);
                self.parse_paren_and_distinguish(can_be_arrow)
            }
            TokenKind::OpenBracketToken => self.parse_array_like(refs),
            TokenKind::OpenBraceToken => self.parse_object_like(false, refs),
            TokenKind::FunctionKeyword => {
                self.next()?;
                let function = self.parse_function(start, false, false, false, false)?;
                Ok(Expression::FunctionExpression(function))
            }
            TokenKind::ClassKeyword => {
                let class = self.parse_class(start, false, false)?;
                Ok(Expression::ClassExpression(class))
            }
            TokenKind::NewKeyword => self.parse_new_or_new_target(),
            TokenKind::TemplateNonTail | TokenKind::TemplateTail => {
                Ok(Expression::TemplateLiteral(self.parse_template(false)?))
            }
            TokenKind::PrivateName => {
                let name = self.cur_str().to_string();
                let node = self.parse_private_name()?;
                if self.is(TokenKind::InKeyword) {
                    self.use_private_name(&name, start)?;
                } else {
                    self.raise(&PRIVATE_IN_EXPECTED_IN, start, &[&name])?;
                }
                Ok(node)
            }
            TokenKind::LessThanToken => {
                let next = self.char_at(self.state.tok.end);
                if next.is_some_and(|c| is_identifier_start(c) || c == '>') {
                    Err(self.missing_plugin(start, &["jsx", "typescript"]))
                } else {
                    Err(self.unexpected(None))
                }
            }
            TokenKind::SlashToken | TokenKind::SlashEqualsToken => {
                self.read_regexp()?;
                self.parse_literal()
            }
            TokenKind::NumericLiteral
            | TokenKind::BigIntLiteral
            | TokenKind::StringLiteral
            | TokenKind::RegularExpressionLiteral
            | TokenKind::NullKeyword
            | TokenKind::TrueKeyword
            | TokenKind::FalseKeyword => self.parse_literal(),
            TokenKind::Identifier => self.parse_identifier_atom(),
            _ => Err(self.unexpected(None)),
        }
    }

    fn parse_identifier_atom(&mut self) -> PResult<Expression> {
        let can_be_arrow = self.state.potential_arrow_at == Some(self.state.tok.start);
        let contains_esc = self.state.tok.contains_esc;
        let id = self.parse_identifier(false)?;
        let start = id.span.start;

        if !contains_esc && id.name == "async" && !self.can_insert_semicolon() {
            if self.is(TokenKind::FunctionKeyword) {
                self.next()?;
                let function = self.parse_function(start, false, false, true, false)?;
                return Ok(Expression::FunctionExpression(function));
            }
            if self.is(TokenKind::Identifier) {
                return if self.lookahead_char() == Some('=') {
                    self.parse_async_arrow_unary_function(start)
                } else {
                    Ok(Expression::Identifier(id))
                };
            }
        }

        if can_be_arrow && self.is(TokenKind::EqualsGreaterThanToken) && !self.can_insert_semicolon() {
            self.next()?;
            return self.parse_arrow_expression(start, vec![Expression::Identifier(id)], false, None, None, None);
        }
        Ok(Expression::Identifier(id))
    }

    /// `async x => ...`
    fn parse_async_arrow_unary_function(&mut self, start: Position) -> PResult<Expression> {
        let flags = function_flags(true, self.state.prod_param.has_yield());
        self.state.prod_param.enter(flags);
        let param = self.parse_identifier(false);
        self.state.prod_param.exit();
        let param = param?;
        if self.has_preceding_line_break() {
            let at = self.start_pos();
            self.raise(&LINE_TERMINATOR_BEFORE_ARROW, at, &[])?;
        }
        self.expect(TokenKind::EqualsGreaterThanToken)?;
        self.parse_arrow_expression(start, vec![Expression::Identifier(param)], true, None, None, None)
    }

    fn parse_super(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        let scope = &self.state.scope;
        let allow_outside = self.options.allow_super_outside_method;
        if self.is(TokenKind::OpenParenToken) && !scope.allow_direct_super() && !allow_outside {
            self.raise(&SUPER_NOT_ALLOWED, start, &[])?;
        } else if !self.state.scope.allow_super() && !allow_outside {
            self.raise(&UNEXPECTED_SUPER, start, &[])?;
        }
        if !matches!(
            self.cur(),
            TokenKind::OpenParenToken | TokenKind::OpenBracketToken | TokenKind::DotToken
        ) {
            self.raise(&UNSUPPORTED_SUPER, start, &[])?;
        }
        Ok(Expression::Super(Keyword {
            span: self.span_from(start),
        }))
    }

    fn parse_import_atom(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        if self.is(TokenKind::DotToken) {
            return self.parse_import_meta_property(start);
        }
        if !self.is(TokenKind::OpenParenToken) {
            let at = self.state.tok.last_tok_start_loc;
            self.raise(&UNSUPPORTED_IMPORT, at, &[])?;
        }
        Ok(Expression::Import(Keyword {
            span: self.span_from(start),
        }))
    }

    fn parse_import_meta_property(&mut self, start: Position) -> PResult<Expression> {
        let meta = Identifier::new(self.span_from(start), "import");
        self.next()?;
        if self.is_contextual("meta") {
            if !self.in_module {
                self.raise(&IMPORT_META_OUTSIDE_MODULE, start, &[])?;
            }
            self.saw_unambiguous_esm = true;
        }
        self.parse_meta_property(start, meta, "meta")
    }

    fn parse_meta_property(&mut self, start: Position, meta: Identifier, property_name: &str) -> PResult<Expression> {
        let contains_esc = self.state.tok.contains_esc;
        let property = self.parse_identifier(true)?;
        if property.name != property_name || contains_esc {
            self.raise(&UNSUPPORTED_META_PROPERTY, property.span.start, &[&meta.name, property_name])?;
        }
        Ok(Expression::MetaProperty(MetaProperty {
            span: self.span_from(start),
            meta,
            property,
        }))
    }

    fn parse_new_or_new_target(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        if self.is(TokenKind::DotToken) {
            let meta = Identifier::new(self.span_from(start), "new");
            self.next()?;
            let meta_property = self.parse_meta_property(start, meta, "target")?;
            if !self.state.scope.in_non_arrow_function() && !self.state.scope.in_class() {
                self.raise(&UNEXPECTED_NEW_TARGET, start, &[])?;
            }
            return Ok(meta_property);
        }

        let (callee, type_parameters) = self.parse_new_callee()?;
        let arguments = if self.eat(TokenKind::OpenParenToken)? {
            let arguments = self.parse_expr_list(TokenKind::CloseParenToken, false, None)?.0;
            let arguments: Vec<Expression> = arguments.into_iter().flatten().collect();
            self.to_referenced_list(arguments.iter().collect(), false)?;
            arguments
        } else {
            Vec::new()
        };
        Ok(Expression::NewExpression(CallExpression {
            span: self.span_from(start),
            callee: Box::new(callee),
            arguments,
            optional: None,
            type_parameters,
        }))
    }

    pub(crate) fn base_parse_new_callee(&mut self) -> PResult<(Expression, Option<TSTypeParameterInstantiation>)> {
        let is_import = self.is(TokenKind::ImportKeyword);
        let start = self.start_pos();
        let atom = self.parse_expr_atom(None)?;
        let callee = self.parse_subscripts(atom, start, true)?;
        if is_import && matches!(callee, Expression::Import(_) | Expression::ImportExpression(_)) {
            self.raise(&IMPORT_CALL_NOT_NEW_EXPRESSION, start, &[])?;
        }
        Ok((callee, None))
    }

    // ========================================================================
    // Literals and templates
    // ========================================================================

    /// The literal at the current token.
    pub(crate) fn parse_literal(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        let kind = self.cur();
        let value = self.value().clone();
        let raw = self.source_slice(self.state.tok.start as u32, self.state.tok.end as u32);
        self.next()?;
        let span = self.span_from(start);
        let literal = match (kind, value) {
            (TokenKind::NumericLiteral, TokenValue::Num(value)) => Expression::NumericLiteral(NumericLiteral {
                span,
                value,
                extra: LiteralExtra { raw },
            }),
            (TokenKind::BigIntLiteral, TokenValue::BigInt(value)) => Expression::BigIntLiteral(BigIntLiteral {
                span,
                value,
                extra: LiteralExtra { raw },
            }),
            (TokenKind::StringLiteral, TokenValue::Str(value)) => Expression::StringLiteral(StringLiteral {
                span,
                value,
                extra: LiteralExtra { raw },
            }),
            (TokenKind::RegularExpressionLiteral, TokenValue::RegExp { pattern, flags }) => {
                Expression::RegExpLiteral(RegExpLiteral {
                    span,
                    pattern,
                    flags,
                    extra: LiteralExtra { raw },
                })
            }
            (TokenKind::NullKeyword, _) => Expression::NullLiteral(NullLiteral { span }),
            (TokenKind::TrueKeyword, _) => Expression::BooleanLiteral(BooleanLiteral { span, value: true }),
            (TokenKind::FalseKeyword, _) => Expression::BooleanLiteral(BooleanLiteral { span, value: false }),
            _ => return Err(self.unexpected_at(start, None)),
        };
        Ok(self.finish_literal(literal))
    }

    pub(crate) fn base_finish_literal(&mut self, lit: Expression) -> Expression {
        lit
    }

    pub(crate) fn parse_string_literal(&mut self) -> PResult<Expression> {
        if !self.is(TokenKind::StringLiteral) {
            return Err(self.unexpected(Some(TokenKind::StringLiteral)));
        }
        self.parse_literal()
    }

    pub(crate) fn parse_template(&mut self, tagged: bool) -> PResult<TemplateLiteral> {
        let start = self.start_pos();
        let mut quasis = vec![self.parse_template_element(tagged)?];
        let mut expressions = Vec::new();
        while !quasis.last().is_some_and(|quasi| quasi.tail) {
            expressions.push(self.parse_expression()?);
            self.read_template_continuation()?;
            quasis.push(self.parse_template_element(tagged)?);
        }
        Ok(TemplateLiteral {
            span: self.span_from(start),
            quasis,
            expressions,
        })
    }

    pub(crate) fn parse_template_element(&mut self, tagged: bool) -> PResult<TemplateElement> {
        let TokenValue::Template { raw, cooked } = self.value().clone() else {
            return Err(self.unexpected(None));
        };
        if cooked.is_none() {
            self.check_template_escape(tagged)?;
        }
        let tail = self.is(TokenKind::TemplateTail);
        let start = self.start_pos().with_column_offset(1);
        let token_end = self.state.tok.end_loc;
        self.next()?;
        // The element excludes the closing backquote or `${`.
        let trim = if tail { 1 } else { 2 };
        let end = Position::new(
            token_end.line,
            token_end.column.saturating_sub(trim),
            token_end.index.saturating_sub(trim).max(start.index),
        );
        Ok(TemplateElement {
            span: Span::new(start, end),
            value: TemplateElementValue { raw, cooked },
            tail,
        })
    }

    // ========================================================================
    // Parentheses and arrows
    // ========================================================================

    fn parse_paren_and_distinguish(&mut self, can_be_arrow: bool) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        let saved = self.take_param_positions();
        let old_maybe_in_arrow_parameters = self.state.maybe_in_arrow_parameters;
        self.state.maybe_in_arrow_parameters = true;

        let inner_start = self.start_pos();
        let mut exprs = Vec::new();
        let mut refs = ExpressionErrors::default();
        let mut first = true;
        let mut spread_start = None;
        let mut optional_comma_start = None;
        while !self.is(TokenKind::CloseParenToken) {
            if first {
                first = false;
            } else {
                if !self.is(TokenKind::CommaToken) {
                    let at = refs.optional_parameters.unwrap_or_else(|| self.start_pos());
                    return Err(self.unexpected_at(at, Some(TokenKind::CommaToken)));
                }
                self.next()?;
                if self.is(TokenKind::CloseParenToken) {
                    optional_comma_start = Some(self.start_pos());
                    break;
                }
            }
            if self.is(TokenKind::DotDotDotToken) {
                let spread_node_start = self.start_pos();
                spread_start = Some(spread_node_start);
                let rest = self.parse_rest_binding()?;
                exprs.push(self.parse_paren_item(rest, spread_node_start)?);
                if !self.check_comma_after_rest(TokenKind::CloseParenToken)? {
                    break;
                }
            } else {
                let item = self.allow_in_and(|p| p.parse_maybe_assign(Some(&mut refs), true))?;
                exprs.push(item);
            }
        }
        let inner_end = self.last_end();
        self.expect(TokenKind::CloseParenToken)?;
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow_parameters;

        if can_be_arrow && self.should_parse_arrow() {
            if let Some(head) = self.parse_arrow()? {
                self.check_destructuring_private(&refs)?;
                self.check_param_positions(false)?;
                self.restore_param_positions(saved);
                return self.parse_arrow_expression(start, exprs, false, None, None, head.return_type);
            }
        }
        self.merge_param_positions(saved);

        if exprs.is_empty() {
            return Err(self.unexpected_at(self.state.tok.last_tok_start_loc, None));
        }
        if let Some(at) = optional_comma_start {
            return Err(self.unexpected_at(at, None));
        }
        if let Some(at) = spread_start {
            return Err(self.unexpected_at(at, None));
        }
        self.check_expression_errors(Some(&mut refs), true)?;
        self.to_referenced_list_deep(&exprs, true)?;

        let value = if exprs.len() > 1 {
            Expression::SequenceExpression(SequenceExpression {
                span: Span::new(inner_start, inner_end),
                expressions: exprs,
            })
        } else {
            exprs.pop().ok_or_else(|| self.unexpected(None))?
        };
        Ok(self.wrap_parenthesis(start, value))
    }

    /// Records that `expression` was written in parentheses, or wraps it
    /// in a `ParenthesizedExpression` when the options ask for one.
    pub(crate) fn wrap_parenthesis(&mut self, start: Position, expression: Expression) -> Expression {
        if !self.options.create_parenthesized_expressions {
            self.state.mark_parenthesized(expression.span());
            return expression;
        }
        Expression::ParenthesizedExpression(ParenthesizedExpression {
            span: self.span_from(start),
            expression: Box::new(expression),
        })
    }

    pub(crate) fn base_should_parse_arrow(&mut self) -> bool {
        !self.can_insert_semicolon()
    }

    pub(crate) fn base_parse_arrow(&mut self) -> PResult<Option<ArrowHead>> {
        Ok(self
            .eat(TokenKind::EqualsGreaterThanToken)?
            .then(ArrowHead::default))
    }

    pub(crate) fn base_parse_paren_item(&mut self, expr: Expression, _start: Position) -> PResult<Expression> {
        Ok(expr)
    }

    pub(crate) fn base_to_referenced_list(&mut self, _exprs: Vec<&Expression>, _is_paren: bool) -> PResult<()> {
        Ok(())
    }

    fn to_referenced_list_deep(&mut self, exprs: &[Expression], is_paren: bool) -> PResult<()> {
        self.to_referenced_list(exprs.iter().collect(), is_paren)?;
        for expr in exprs {
            if let Expression::ArrayExpression(array) = expr {
                let elements: Vec<Expression> = array.elements.iter().flatten().cloned().collect();
                self.to_referenced_list_deep(&elements, false)?;
            }
        }
        Ok(())
    }

    /// Finishes an arrow whose head has been read up to and including
    /// `=>`. `params` are still in expression form.
    pub(crate) fn parse_arrow_expression(
        &mut self,
        start: Position,
        params: Vec<Expression>,
        is_async: bool,
        trailing_comma: Option<Position>,
        type_parameters: Option<quarry_ast::ts::TSTypeParameterDeclaration>,
        return_type: Option<Box<quarry_ast::ts::TSTypeAnnotation>>,
    ) -> PResult<Expression> {
        let scope_depth = self.state.scope.depth();
        self.state.scope.enter(ScopeFlags::FUNCTION | ScopeFlags::ARROW);
        let mut flags = function_flags(is_async, false);
        if !self.is(TokenKind::OpenBraceToken) && self.state.prod_param.has_in() {
            flags |= ParamFlags::IN;
        }
        self.state.prod_param.enter(flags);
        let old_maybe_in_arrow_parameters = self.state.maybe_in_arrow_parameters;

        let result = (|| {
            self.state.maybe_in_arrow_parameters = true;
            let params: Vec<Expression> = self
                .to_assignable_list(params.into_iter().map(Some).collect(), trailing_comma, false)?
                .into_iter()
                .flatten()
                .collect();
            self.state.maybe_in_arrow_parameters = false;
            let body = self.parse_function_body(&params, true, false, start)?;
            Ok((params, body))
        })();

        self.state.prod_param.exit();
        // A failed body can leave its inner scopes open.
        let exited = self.state.scope.exit_to(scope_depth);
        debug_assert!(result.is_err() || exited.contains(ScopeFlags::ARROW));
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow_parameters;

        let (params, body) = result?;
        let expression = matches!(body, ArrowBody::Expression(_));
        Ok(Expression::ArrowFunctionExpression(ArrowFunctionExpression {
            span: self.span_from(start),
            params,
            body,
            is_async,
            expression,
            type_parameters,
            return_type,
        }))
    }

    // ========================================================================
    // Array and object literals
    // ========================================================================

    fn parse_array_like(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        let (elements, trailing_comma) = self.parse_expr_list(TokenKind::CloseBracketToken, true, refs)?;
        Ok(Expression::ArrayExpression(ArrayExpression {
            span: self.span_from(start),
            elements,
            trailing_comma,
        }))
    }

    /// Comma-separated items up to and including `close`.
    pub(crate) fn parse_expr_list(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
        mut refs: Option<&mut ExpressionErrors>,
    ) -> PResult<(Vec<Option<Expression>>, Option<u32>)> {
        let mut elements = Vec::new();
        let mut trailing_comma = None;
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::CommaToken)?;
                if self.is(close) {
                    trailing_comma = Some(self.state.tok.last_tok_start as u32);
                    self.next()?;
                    break;
                }
            }
            elements.push(self.parse_expr_list_item(allow_empty, refs.as_deref_mut())?);
        }
        Ok((elements, trailing_comma))
    }

    fn parse_expr_list_item(
        &mut self,
        allow_empty: bool,
        refs: Option<&mut ExpressionErrors>,
    ) -> PResult<Option<Expression>> {
        if self.is(TokenKind::CommaToken) {
            if !allow_empty {
                return Err(self.unexpected(None));
            }
            return Ok(None);
        }
        if self.is(TokenKind::DotDotDotToken) {
            let start = self.start_pos();
            let spread = self.parse_spread(refs)?;
            return Ok(Some(self.parse_paren_item(spread, start)?));
        }
        Ok(Some(self.allow_in_and(|p| p.parse_maybe_assign(refs, true))?))
    }

    pub(crate) fn parse_spread(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        let argument = self.allow_in_and(|p| p.parse_maybe_assign(refs, false))?;
        Ok(Expression::SpreadElement(SpreadElement {
            span: self.span_from(start),
            argument: Box::new(argument),
        }))
    }

    /// `{ ... }` as an object literal, or with `is_pattern` as an object
    /// binding pattern.
    pub(crate) fn parse_object_like(
        &mut self,
        is_pattern: bool,
        mut refs: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        let mut properties = Vec::new();
        let mut trailing_comma = None;
        let mut proto_used = false;
        let mut first = true;
        while !self.is(TokenKind::CloseBraceToken) {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::CommaToken)?;
                if self.is(TokenKind::CloseBraceToken) {
                    trailing_comma = Some(self.state.tok.last_tok_start as u32);
                    break;
                }
            }
            let member = if is_pattern {
                self.parse_binding_property()?
            } else {
                let member = self.parse_property_definition(refs.as_deref_mut())?;
                self.check_proto(&member, &mut proto_used, refs.as_deref_mut())?;
                member
            };
            properties.push(self.finish_object_member(member));
        }
        self.next()?;
        let span = self.span_from(start);
        Ok(if is_pattern {
            Expression::ObjectPattern(ObjectPattern {
                span,
                properties,
                optional: false,
                type_annotation: None,
            })
        } else {
            Expression::ObjectExpression(ObjectExpression {
                span,
                properties,
                trailing_comma,
            })
        })
    }

    pub(crate) fn base_finish_object_member(&mut self, member: ObjectMember) -> ObjectMember {
        member
    }

    fn check_proto(
        &mut self,
        member: &ObjectMember,
        proto_used: &mut bool,
        refs: Option<&mut ExpressionErrors>,
    ) -> PResult<()> {
        let key = match member {
            ObjectMember::ObjectProperty(prop) if !prop.computed && !prop.shorthand => &prop.key,
            ObjectMember::Property(prop)
                if !prop.computed && !prop.shorthand && !prop.method && prop.kind == PropertyKind::Init =>
            {
                &prop.key
            }
            _ => return Ok(()),
        };
        let name = match key.as_ref() {
            Expression::Identifier(id) => Some(id.name.as_str()),
            other => other.string_value(),
        };
        if name != Some("__proto__") {
            return Ok(());
        }
        if *proto_used {
            let at = key.span().start;
            match refs {
                Some(refs) => {
                    if refs.double_proto.is_none() {
                        refs.double_proto = Some(at);
                    }
                }
                None => self.raise(&DUPLICATE_PROTO, at, &[])?,
            }
        }
        *proto_used = true;
        Ok(())
    }

    fn parse_binding_property(&mut self) -> PResult<ObjectMember> {
        let start = self.start_pos();
        if self.is(TokenKind::DotDotDotToken) {
            self.next()?;
            let argument = self.parse_identifier(false)?;
            self.check_comma_after_rest(TokenKind::CloseBraceToken)?;
            return Ok(ObjectMember::RestElement(RestElement {
                span: self.span_from(start),
                argument: Box::new(Expression::Identifier(argument)),
                optional: false,
                type_annotation: None,
            }));
        }
        if self.is(TokenKind::PrivateName) {
            return Err(self.missing_plugin(start, &["destructuringPrivate"]));
        }
        let (key, computed) = self.parse_property_name(None)?;
        self.parse_obj_prop_value(start, key, computed, false, false, true, None, None)
    }

    fn parse_property_definition(&mut self, refs: Option<&mut ExpressionErrors>) -> PResult<ObjectMember> {
        let start = self.start_pos();
        if self.is(TokenKind::DotDotDotToken) {
            let Expression::SpreadElement(spread) = self.parse_spread(None)? else {
                return Err(self.unexpected_at(start, None));
            };
            return Ok(ObjectMember::SpreadElement(spread));
        }
        if self.is(TokenKind::AtToken) {
            return Err(self.unexpected(None));
        }

        let mut refs = refs;
        let mut is_generator = self.eat(TokenKind::AsteriskToken)?;
        let mut is_async = false;
        let mut accessor = None;
        let contains_esc = self.state.tok.contains_esc;
        let (mut key, mut computed) = self.parse_property_name(refs.as_deref_mut())?;

        if !is_generator && !contains_esc && !computed && self.maybe_async_or_accessor_prop() {
            let key_name = key.as_identifier().map(|id| id.name.clone()).unwrap_or_default();
            if key_name == "async" && !self.has_preceding_line_break() {
                is_async = true;
                is_generator = self.eat(TokenKind::AsteriskToken)?;
                (key, computed) = self.parse_property_name(None)?;
            } else if key_name == "get" || key_name == "set" {
                let kind = if key_name == "get" { MethodKind::Get } else { MethodKind::Set };
                accessor = Some(kind);
                if self.is(TokenKind::AsteriskToken) {
                    is_generator = true;
                    let at = self.start_pos();
                    self.raise(&ACCESSOR_IS_GENERATOR, at, &[&key_name])?;
                    self.next()?;
                }
                (key, computed) = self.parse_property_name(None)?;
            }
        }
        self.parse_obj_prop_value(start, key, computed, is_generator, is_async, false, accessor, refs)
    }

    /// After a bare `async`, `get` or `set`, whether a property name
    /// follows, making the word a modifier.
    fn maybe_async_or_accessor_prop(&self) -> bool {
        let kind = self.cur();
        kind.is_keyword_or_identifier()
            || matches!(
                kind,
                TokenKind::StringLiteral
                    | TokenKind::NumericLiteral
                    | TokenKind::BigIntLiteral
                    | TokenKind::PrivateName
                    | TokenKind::OpenBracketToken
                    | TokenKind::AsteriskToken
            )
    }

    /// A property key. Returns the key and whether it was computed.
    pub(crate) fn parse_property_name(
        &mut self,
        refs: Option<&mut ExpressionErrors>,
    ) -> PResult<(Expression, bool)> {
        if self.eat(TokenKind::OpenBracketToken)? {
            let key = self.parse_maybe_assign_allow_in()?;
            self.expect(TokenKind::CloseBracketToken)?;
            return Ok((key, true));
        }
        let kind = self.cur();
        let key = if kind.is_keyword_or_identifier() {
            Expression::Identifier(self.parse_identifier(true)?)
        } else {
            match kind {
                TokenKind::NumericLiteral | TokenKind::StringLiteral | TokenKind::BigIntLiteral => self.parse_literal()?,
                TokenKind::PrivateName => {
                    let at = self.start_pos();
                    match refs {
                        Some(refs) => {
                            if refs.private_key.is_none() {
                                refs.private_key = Some(at);
                            }
                        }
                        None => self.raise(&UNEXPECTED_PRIVATE_FIELD, at, &[])?,
                    }
                    self.parse_private_name()?
                }
                _ => return Err(self.unexpected(None)),
            }
        };
        Ok((key, false))
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_obj_prop_value(
        &mut self,
        start: Position,
        key: Expression,
        computed: bool,
        is_generator: bool,
        is_async: bool,
        is_pattern: bool,
        accessor: Option<MethodKind>,
        refs: Option<&mut ExpressionErrors>,
    ) -> PResult<ObjectMember> {
        let type_parameters = if is_pattern { None } else { self.parse_maybe_type_parameters(false)? };

        if let Some(kind) = accessor {
            let function = self.parse_method(is_generator, false, false, false, type_parameters, FunctionKind::ObjectMethod)?;
            let method = ObjectMethod {
                span: self.span_from(start),
                kind,
                key: Box::new(key),
                computed,
                method: false,
                function,
            };
            self.check_getter_setter_params(method.kind, &method.function, method.span.start)?;
            return Ok(ObjectMember::ObjectMethod(method));
        }
        if is_async || is_generator || type_parameters.is_some() || self.is(TokenKind::OpenParenToken) {
            if is_pattern {
                return Err(self.unexpected(None));
            }
            let function = self.parse_method(is_generator, is_async, false, false, type_parameters, FunctionKind::ObjectMethod)?;
            return Ok(ObjectMember::ObjectMethod(ObjectMethod {
                span: self.span_from(start),
                kind: MethodKind::Method,
                key: Box::new(key),
                computed,
                method: true,
                function,
            }));
        }

        if self.eat(TokenKind::ColonToken)? {
            let value = if is_pattern {
                let value_start = self.start_pos();
                self.parse_maybe_default(value_start, None)?
            } else {
                self.allow_in_and(|p| p.parse_maybe_assign(refs, false))?
            };
            return Ok(ObjectMember::ObjectProperty(ObjectProperty {
                span: self.span_from(start),
                key: Box::new(key),
                value: Box::new(value),
                computed,
                shorthand: false,
                method: false,
            }));
        }

        let Expression::Identifier(id) = &key else {
            return Err(self.unexpected(None));
        };
        if computed {
            return Err(self.unexpected(None));
        }
        let name = id.name.clone();
        self.check_reserved_word(&name, id.span.start, true, false)?;
        let shorthand_value = Expression::Identifier(Identifier::new(id.span, name));
        let value = if is_pattern {
            self.parse_maybe_default(start, Some(shorthand_value))?
        } else if self.is(TokenKind::EqualsToken) {
            let at = self.start_pos();
            match refs {
                Some(refs) => {
                    if refs.shorthand_assign.is_none() {
                        refs.shorthand_assign = Some(at);
                    }
                }
                None => self.raise(&INVALID_COVER_INITIALIZED_NAME, at, &[])?,
            }
            self.parse_maybe_default(start, Some(shorthand_value))?
        } else {
            shorthand_value
        };
        Ok(ObjectMember::ObjectProperty(ObjectProperty {
            span: self.span_from(start),
            key: Box::new(key),
            value: Box::new(value),
            computed: false,
            shorthand: true,
            method: false,
        }))
    }

    // ========================================================================
    // Identifiers and private names
    // ========================================================================

    pub(crate) fn parse_identifier(&mut self, liberal: bool) -> PResult<Identifier> {
        let start = self.start_pos();
        let name = self.parse_identifier_name(liberal)?;
        Ok(Identifier::new(self.span_from(start), name))
    }

    /// An identifier name. `liberal` accepts reserved words, as in
    /// property names.
    pub(crate) fn parse_identifier_name(&mut self, liberal: bool) -> PResult<String> {
        let start = self.start_pos();
        let kind = self.cur();
        if !kind.is_keyword_or_identifier() {
            return Err(self.unexpected(None));
        }
        let name = self.cur_str().to_string();
        if liberal {
            if kind.is_keyword() {
                self.replace_token(TokenKind::Identifier);
            }
        } else {
            self.check_reserved_word(&name, start, kind.is_keyword(), false)?;
        }
        self.next()?;
        Ok(name)
    }

    /// Retypes the current token and lets the layers see the new kind.
    pub(crate) fn replace_token(&mut self, kind: TokenKind) {
        let prev = std::mem::replace(&mut self.state.tok.kind, kind);
        self.update_context(prev);
    }

    pub(crate) fn base_check_reserved_word(
        &mut self,
        word: &str,
        start: Position,
        check_keywords: bool,
        is_binding: bool,
    ) -> PResult<()> {
        if word.len() > 10 {
            return Ok(());
        }
        if check_keywords && is_keyword(word) {
            return self.raise(&UNEXPECTED_KEYWORD, start, &[word]);
        }
        let reserved = if !self.state.strict {
            is_reserved_word(word, self.in_module)
        } else if is_binding {
            is_strict_bind_reserved_word(word, self.in_module)
        } else {
            is_strict_reserved_word(word, self.in_module)
        };
        if reserved {
            return self.raise(&UNEXPECTED_RESERVED_WORD, start, &[word]);
        }
        match word {
            "yield" if self.state.prod_param.has_yield() => self.raise(&YIELD_BINDING_IDENTIFIER, start, &[]),
            "await" => {
                if self.state.prod_param.has_await() {
                    self.raise(&AWAIT_BINDING_IDENTIFIER, start, &[])
                } else if self.state.scope.in_static_block() {
                    self.raise(&AWAIT_BINDING_IDENTIFIER_IN_STATIC_BLOCK, start, &[])
                } else {
                    if self.state.await_ident_pos.is_none() {
                        self.state.await_ident_pos = Some(start);
                    }
                    Ok(())
                }
            }
            "arguments" if self.state.scope.in_class_and_not_in_non_arrow_function() => {
                self.raise(&ARGUMENTS_IN_CLASS, start, &[])
            }
            _ => Ok(()),
        }
    }

    /// `#name` at the current token.
    pub(crate) fn parse_private_name(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        let id_start = start.with_column_offset(1);
        let name = self.cur_str().to_string();
        self.next()?;
        let span = self.span_from(start);
        let id = Identifier::new(Span::new(id_start, span.end), name);
        Ok(self.finish_private_name(PrivateName { span, id }))
    }

    pub(crate) fn base_finish_private_name(&mut self, name: PrivateName) -> Expression {
        Expression::PrivateName(name)
    }

    pub(crate) fn use_private_name(&mut self, name: &str, at: Position) -> PResult<()> {
        match self.state.class_scope.use_private_name(name, at) {
            Some(error) => self.raise_all(vec![error]),
            None => Ok(()),
        }
    }
}

fn update_operator(kind: TokenKind) -> UpdateOperator {
    if kind == TokenKind::PlusPlusToken {
        UpdateOperator::Increment
    } else {
        UpdateOperator::Decrement
    }
}

fn private_name_of(expr: &Expression) -> Option<String> {
    match expr {
        Expression::PrivateName(private) => Some(private.id.name.clone()),
        Expression::PrivateIdentifier(private) => Some(private.name.clone()),
        _ => None,
    }
}

/// `a.#x`, `a?.#x` and `a?.b.#x`.
fn has_private_property(expr: &Expression) -> bool {
    match expr {
        Expression::MemberExpression(member) | Expression::OptionalMemberExpression(member) => {
            private_name_of(&member.property).is_some()
        }
        Expression::ChainExpression(chain) => has_private_property(&chain.expression),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;

    fn expr(source: &str, options: &ParserOptions) -> PResult<(Expression, Vec<quarry_diagnostics::ParseError>)> {
        let chars: Vec<char> = source.chars().collect();
        let plugins = options.plugin_set()?;
        let mut p = Parser::new(&chars, options, plugins, false);
        p.state.scope.enter(ScopeFlags::PROGRAM);
        p.next_token()?;
        let expr = p.parse_expression()?;
        Ok((expr, p.state.errors.clone().into_vec()))
    }

    #[test]
    fn test_precedence_and_associativity() {
        let options = ParserOptions::default();
        let (e, _) = expr("a + b * c ** d ** e", &options).unwrap();
        let Expression::BinaryExpression(add) = e else { panic!() };
        assert_eq!(add.operator, BinaryOperator::Addition);
        let Expression::BinaryExpression(mul) = *add.right else { panic!() };
        let Expression::BinaryExpression(pow) = *mul.right else { panic!() };
        assert_eq!(pow.operator, BinaryOperator::Exponential);
        assert!(matches!(*pow.right, Expression::BinaryExpression(_)));
    }

    #[test]
    fn test_coalesce_cannot_mix_with_logical() {
        let options = ParserOptions::default();
        let err = expr("a ?? b || c", &options).unwrap_err();
        assert!(err.is(&MIXING_COALESCE_WITH_LOGICAL));
        assert!(expr("(a ?? b) || c", &options).is_ok());
    }

    #[test]
    fn test_unary_before_exponent() {
        let options = ParserOptions::default().with_error_recovery();
        let (_, errors) = expr("-a ** 2", &options).unwrap();
        assert!(errors[0].is(&UNEXPECTED_TOKEN_UNARY_EXPONENTIATION));
        let (_, errors) = expr("(-a) ** 2", &options).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_optional_chain_shapes() {
        let options = ParserOptions::default();
        let (e, _) = expr("a?.b.c()", &options).unwrap();
        let Expression::OptionalCallExpression(call) = e else { panic!("{e:?}") };
        assert_eq!(call.optional, Some(false));
        assert!(matches!(*call.callee, Expression::OptionalMemberExpression(_)));
    }

    #[test]
    fn test_shorthand_initializer_outside_pattern() {
        let options = ParserOptions::default().with_error_recovery();
        let (_, errors) = expr("({ a = 1 })", &options).unwrap();
        assert!(errors[0].is(&INVALID_COVER_INITIALIZED_NAME));
        let (_, errors) = expr("({ a = 1 } = b)", &options).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_duplicate_proto() {
        let options = ParserOptions::default().with_error_recovery();
        let (_, errors) = expr("({ __proto__: a, '__proto__': b })", &options).unwrap();
        assert!(errors[0].is(&DUPLICATE_PROTO));
        let (_, errors) = expr("({ __proto__: a, __proto__ })", &options).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_arrow_heads() {
        let options = ParserOptions::default();
        let (e, _) = expr("(a, [b], {c}) => a", &options).unwrap();
        let Expression::ArrowFunctionExpression(arrow) = e else { panic!() };
        assert_eq!(arrow.params.len(), 3);
        assert!(matches!(arrow.params[1], Expression::ArrayPattern(_)));
        assert!(arrow.expression);

        let (e, _) = expr("async x => x", &options).unwrap();
        assert!(matches!(e, Expression::ArrowFunctionExpression(ArrowFunctionExpression { is_async: true, .. })));

        let (e, _) = expr("async (x)", &options).unwrap();
        assert!(matches!(e, Expression::CallExpression(_)));
    }

    #[test]
    fn test_template_elements() {
        let options = ParserOptions::default();
        let (e, _) = expr("`a${b}c`", &options).unwrap();
        let Expression::TemplateLiteral(t) = e else { panic!() };
        assert_eq!(t.quasis.len(), 2);
        assert_eq!(t.quasis[0].value.raw, "a");
        assert_eq!(t.quasis[0].span.start.index, 1);
        assert_eq!(t.quasis[0].span.end.index, 2);
        assert!(t.quasis[1].tail);
    }

    #[test]
    fn test_parenthesized_marks_inner_expression() {
        let options = ParserOptions::default();
        let chars: Vec<char> = "(a)".chars().collect();
        let plugins = options.plugin_set().unwrap();
        let mut p = Parser::new(&chars, &options, plugins, false);
        p.state.scope.enter(ScopeFlags::PROGRAM);
        p.next_token().unwrap();
        let e = p.parse_expression().unwrap();
        assert!(p.state.is_parenthesized(e.span()));
    }

    #[test]
    fn test_jsx_like_without_plugin() {
        let options = ParserOptions::default();
        let err = expr("<div />", &options).unwrap_err();
        assert!(err.is(&MISSING_ONE_OF_PLUGINS));
        assert_eq!(err.missing_plugins, vec!["jsx", "typescript"]);
    }
}
