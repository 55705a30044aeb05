//! Functions, methods, parameter lists and binding patterns.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::TSTypeParameterDeclaration;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scope::{function_flags, BindingFlags, ParamFlags, ScopeFlags};
use rustc_hash::FxHashSet;

use crate::parser::Parser;
use crate::utilities::{FunctionKind, LvalAncestor};
use crate::PResult;

/// The first `yield` and `await` seen since a parameter list started.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ParamPositions {
    yield_pos: Option<Position>,
    await_pos: Option<Position>,
    await_ident_pos: Option<Position>,
}

impl Parser<'_> {
    // ========================================================================
    // Function declarations and expressions
    // ========================================================================

    /// A function after its `function` keyword. `hanging` marks a
    /// declaration in a single-statement position (`if (a) function f() {}`).
    pub(crate) fn parse_function(
        &mut self,
        start: Position,
        is_declaration: bool,
        hanging: bool,
        is_async: bool,
        nullable_id: bool,
    ) -> PResult<Function> {
        let generator = self.eat(TokenKind::AsteriskToken)?;
        if hanging && generator {
            self.raise(&GENERATOR_IN_SINGLE_STATEMENT_CONTEXT, start, &[])?;
        }

        let mut id = None;
        if is_declaration {
            id = self.parse_function_id(!nullable_id)?;
        }

        let old_maybe_in_arrow_parameters = self.state.maybe_in_arrow_parameters;
        self.state.maybe_in_arrow_parameters = false;
        self.state.scope.enter(ScopeFlags::FUNCTION);
        self.state.prod_param.enter(function_flags(is_async, generator));

        let outer_strict = self.state.strict;
        let kind = if is_declaration { FunctionKind::Declaration } else { FunctionKind::Expression };
        let result = (|| {
            if !is_declaration {
                id = self.parse_function_id(false)?;
            }
            let mut parts = FunctionParts {
                generator,
                is_async,
                ..FunctionParts::default()
            };
            self.parse_function_params(&mut parts, false)?;
            self.parse_function_body_and_finish(&mut parts, kind)?;
            Ok(parts)
        })();

        self.state.prod_param.exit();
        self.state.scope.exit();
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow_parameters;
        let parts = result?;

        if let (Some(id), Some(body)) = (&id, &parts.body) {
            let directive_strict = has_use_strict_directive(body);
            if outer_strict || directive_strict {
                self.check_function_name(id, !outer_strict && directive_strict)?;
            }
        }

        let function = Function {
            span: self.span_from(start),
            id,
            function: parts,
            declare: false,
        };
        if is_declaration && !hanging {
            self.register_function_statement_id(&function)?;
        }
        Ok(function)
    }

    fn parse_function_id(&mut self, required: bool) -> PResult<Option<Identifier>> {
        if required || self.cur().is_keyword_or_identifier() {
            Ok(Some(self.parse_identifier(false)?))
        } else {
            Ok(None)
        }
    }

    /// A function whose body turned out strict may not be named `eval`
    /// or `arguments`.
    fn check_function_name(&mut self, id: &Identifier, strict_mode_changed: bool) -> PResult<()> {
        let outer = std::mem::replace(&mut self.state.strict, true);
        let result = self.check_identifier(id, BindingFlags::OUTSIDE, strict_mode_changed);
        self.state.strict = outer;
        result
    }

    pub(crate) fn base_register_function_statement_id(&mut self, function: &Function) -> PResult<()> {
        let Some(id) = &function.id else {
            return Ok(());
        };
        let binding = if self.state.strict || function.function.generator || function.function.is_async {
            if self.state.scope.treat_functions_as_var() {
                BindingFlags::VAR
            } else {
                BindingFlags::LEXICAL
            }
        } else {
            BindingFlags::FUNCTION
        };
        let errors = self.state.scope.declare_name(&id.name, binding, id.span.start);
        self.raise_all(errors)
    }

    /// The parameter list, including any type parameters in front of it.
    pub(crate) fn parse_function_params(&mut self, parts: &mut FunctionParts, is_constructor: bool) -> PResult<()> {
        parts.params_start = self.start_pos();
        if parts.type_parameters.is_none() {
            parts.type_parameters = self.parse_maybe_type_parameters(false)?;
        }
        self.expect(TokenKind::OpenParenToken)?;
        let saved = self.take_param_positions();
        let params = self
            .parse_binding_list(TokenKind::CloseParenToken, false, Some(is_constructor))
            .and_then(|params| {
                self.check_param_positions(false)?;
                Ok(params)
            });
        self.restore_param_positions(saved);
        parts.params = params?.into_iter().flatten().collect();
        Ok(())
    }

    pub(crate) fn base_parse_function_body_and_finish(
        &mut self,
        parts: &mut FunctionParts,
        kind: FunctionKind,
    ) -> PResult<bool> {
        let is_method = matches!(
            kind,
            FunctionKind::ObjectMethod | FunctionKind::ClassMethod | FunctionKind::ClassPrivateMethod
        );
        let body = self.parse_function_block(&parts.params, parts.params_start, false, is_method)?;
        parts.body = Some(body);
        Ok(false)
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// An object or class method from its parameter list on.
    pub(crate) fn parse_method(
        &mut self,
        generator: bool,
        is_async: bool,
        is_constructor: bool,
        allow_direct_super: bool,
        type_parameters: Option<TSTypeParameterDeclaration>,
        kind: FunctionKind,
    ) -> PResult<FunctionParts> {
        let mut flags = ScopeFlags::FUNCTION | ScopeFlags::SUPER;
        if matches!(kind, FunctionKind::ClassMethod | FunctionKind::ClassPrivateMethod) {
            flags |= ScopeFlags::CLASS;
        }
        if allow_direct_super {
            flags |= ScopeFlags::DIRECT_SUPER;
        }
        self.state.scope.enter(flags);
        self.state.prod_param.enter(function_flags(is_async, generator));

        let mut parts = FunctionParts {
            generator,
            is_async,
            type_parameters,
            ..FunctionParts::default()
        };
        let result = self
            .parse_function_params(&mut parts, is_constructor)
            .and_then(|()| self.parse_function_body_and_finish(&mut parts, kind));

        self.state.prod_param.exit();
        self.state.scope.exit();
        result?;
        Ok(parts)
    }

    /// Getters take no parameters and setters exactly one, not counting a
    /// leading `this` annotation.
    pub(crate) fn check_getter_setter_params(
        &mut self,
        kind: MethodKind,
        parts: &FunctionParts,
        at: Position,
    ) -> PResult<()> {
        let params = &parts.params;
        let this_param = params.first().and_then(|param| param.as_identifier()).is_some_and(|id| id.name == "this");
        let expected = match kind {
            MethodKind::Get => 0,
            MethodKind::Set => 1,
            _ => return Ok(()),
        } + usize::from(this_param);

        if params.len() != expected {
            let message = if kind == MethodKind::Get { &BAD_GETTER_ARITY } else { &BAD_SETTER_ARITY };
            self.raise(message, at, &[])?;
        }
        if kind == MethodKind::Set && matches!(params.last(), Some(Expression::RestElement(_))) {
            self.raise(&BAD_SETTER_REST_PARAMETER, at, &[])?;
        }
        Ok(())
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// An arrow or function body. An expression body is accepted only
    /// with `allow_expression`.
    pub(crate) fn parse_function_body(
        &mut self,
        params: &[Expression],
        allow_expression: bool,
        is_method: bool,
        params_start: Position,
    ) -> PResult<ArrowBody> {
        if allow_expression && !self.is(TokenKind::OpenBraceToken) {
            let saved = self.take_param_positions();
            let body = self.parse_maybe_assign(None, false);
            self.restore_param_positions(saved);
            let body = body?;
            self.check_params(params, false, true, false)?;
            return Ok(ArrowBody::Expression(Box::new(body)));
        }
        let body = self.parse_function_block(params, params_start, allow_expression, is_method)?;
        Ok(ArrowBody::BlockStatement(body))
    }

    fn parse_function_block(
        &mut self,
        params: &[Expression],
        params_start: Position,
        is_arrow: bool,
        is_method: bool,
    ) -> PResult<BlockStatement> {
        let saved = self.take_param_positions();
        let old_labels = std::mem::take(&mut self.state.labels);
        let old_strict = self.state.strict;
        let flags = self.state.prod_param.current() | ParamFlags::RETURN;
        self.state.prod_param.enter(flags);

        let body = self.parse_block_with(true, false, |p, has_strict_directive| {
            let simple = is_simple_parameter_list(params);
            if has_strict_directive && !simple {
                p.raise(&ILLEGAL_LANGUAGE_MODE_DIRECTIVE, params_start, &[])?;
            }
            let strict_mode_changed = !old_strict && p.state.strict;
            let allow_duplicates = !p.state.strict && !is_arrow && !is_method && simple;
            p.check_params(params, allow_duplicates, is_arrow, strict_mode_changed)
        });

        self.state.prod_param.exit();
        self.state.labels = old_labels;
        self.restore_param_positions(saved);
        body
    }

    /// Checks every parameter as a binding, rejecting repeated names unless
    /// `allow_duplicates`.
    pub(crate) fn check_params(
        &mut self,
        params: &[Expression],
        allow_duplicates: bool,
        _is_arrow: bool,
        strict_mode_changed: bool,
    ) -> PResult<()> {
        let mut clashes = (!allow_duplicates).then(FxHashSet::default);
        for param in params {
            self.check_lval_with(
                param,
                LvalAncestor::FormalParameters,
                BindingFlags::VAR,
                &mut clashes,
                strict_mode_changed,
                false,
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // Parameter positions
    // ========================================================================

    /// Starts a fresh parameter region, returning the enclosing one.
    pub(crate) fn take_param_positions(&mut self) -> ParamPositions {
        ParamPositions {
            yield_pos: self.state.yield_pos.take(),
            await_pos: self.state.await_pos.take(),
            await_ident_pos: self.state.await_ident_pos.take(),
        }
    }

    pub(crate) fn restore_param_positions(&mut self, saved: ParamPositions) {
        self.state.yield_pos = saved.yield_pos;
        self.state.await_pos = saved.await_pos;
        self.state.await_ident_pos = saved.await_ident_pos;
    }

    /// Ends a region that turned out not to be a parameter list; what it
    /// saw still counts for the enclosing one.
    pub(crate) fn merge_param_positions(&mut self, saved: ParamPositions) {
        self.state.yield_pos = saved.yield_pos.or(self.state.yield_pos);
        self.state.await_pos = saved.await_pos.or(self.state.await_pos);
        self.state.await_ident_pos = saved.await_ident_pos.or(self.state.await_ident_pos);
    }

    /// Rejects `yield` and `await` expressions in the current region.
    /// Async arrow heads also reject `await` used as a name.
    pub(crate) fn check_param_positions(&mut self, is_async: bool) -> PResult<()> {
        if let Some(at) = self.state.yield_pos {
            self.raise(&YIELD_IN_PARAMETER, at, &[])?;
        }
        if let Some(at) = self.state.await_pos {
            self.raise(&AWAIT_IN_PARAMETER, at, &[])?;
        }
        if is_async {
            if let Some(at) = self.state.await_ident_pos {
                self.raise(&AWAIT_BINDING_IDENTIFIER, at, &[])?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Binding lists and patterns
    // ========================================================================

    /// Bindings up to and including `close`. `allow_empty` permits array
    /// holes; `allow_modifiers` is `Some` for function parameter lists.
    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenKind,
        allow_empty: bool,
        allow_modifiers: Option<bool>,
    ) -> PResult<Vec<Option<Expression>>> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::CommaToken)?;
            }
            if allow_empty && self.is(TokenKind::CommaToken) {
                elements.push(None);
            } else if self.eat(close)? {
                break;
            } else if self.is(TokenKind::DotDotDotToken) {
                let mut rest = self.parse_rest_binding()?;
                if allow_modifiers.is_some() {
                    rest = self.parse_assignable_list_item_types(rest)?;
                }
                elements.push(Some(rest));
                if !self.check_comma_after_rest(close)? {
                    self.expect(close)?;
                    break;
                }
            } else {
                if self.is(TokenKind::AtToken) {
                    return Err(self.unexpected(None));
                }
                elements.push(Some(self.parse_assignable_list_item(allow_modifiers)?));
            }
        }
        Ok(elements)
    }

    pub(crate) fn base_parse_assignable_list_item(&mut self, _allow_modifiers: Option<bool>) -> PResult<Expression> {
        let start = self.start_pos();
        let left = self.parse_maybe_default(start, None)?;
        let left = self.parse_assignable_list_item_types(left)?;
        self.parse_maybe_default(start, Some(left))
    }

    pub(crate) fn base_parse_assignable_list_item_types(&mut self, param: Expression) -> PResult<Expression> {
        Ok(param)
    }

    /// A binding, and its default value if `=` follows.
    pub(crate) fn parse_maybe_default(&mut self, start: Position, left: Option<Expression>) -> PResult<Expression> {
        let left = match left {
            Some(left) => left,
            None => self.parse_binding_atom()?,
        };
        if !self.eat(TokenKind::EqualsToken)? {
            return Ok(left);
        }
        let right = self.parse_maybe_assign_allow_in()?;
        Ok(Expression::AssignmentPattern(AssignmentPattern {
            span: self.span_from(start),
            left: Box::new(left),
            right: Box::new(right),
            type_annotation: None,
        }))
    }

    /// `...binding`
    pub(crate) fn parse_rest_binding(&mut self) -> PResult<Expression> {
        let start = self.start_pos();
        self.next()?;
        let argument = self.parse_binding_atom()?;
        Ok(Expression::RestElement(RestElement {
            span: self.span_from(start),
            argument: Box::new(argument),
            optional: false,
            type_annotation: None,
        }))
    }

    pub(crate) fn base_parse_binding_atom(&mut self) -> PResult<Expression> {
        match self.cur() {
            TokenKind::OpenBracketToken => {
                let start = self.start_pos();
                self.next()?;
                let elements = self.parse_binding_list(TokenKind::CloseBracketToken, true, None)?;
                Ok(Expression::ArrayPattern(ArrayPattern {
                    span: self.span_from(start),
                    elements,
                    optional: false,
                    type_annotation: None,
                }))
            }
            TokenKind::OpenBraceToken => self.parse_object_like(true, None),
            _ => Ok(Expression::Identifier(self.parse_identifier(false)?)),
        }
    }

    pub(crate) fn base_check_comma_after_rest(&mut self, close: TokenKind) -> PResult<bool> {
        if !self.is(TokenKind::CommaToken) {
            return Ok(false);
        }
        let close_char = match close {
            TokenKind::CloseParenToken => ')',
            TokenKind::CloseBracketToken => ']',
            _ => '}',
        };
        let message = if self.lookahead_char() == Some(close_char) {
            &REST_TRAILING_COMMA
        } else {
            &ELEMENT_AFTER_REST
        };
        let at = self.start_pos();
        self.raise(message, at, &[])?;
        Ok(true)
    }
}

/// Plain identifiers only, optionally as TypeScript parameter properties.
pub(crate) fn is_simple_parameter_list(params: &[Expression]) -> bool {
    params.iter().all(|param| match param {
        Expression::Identifier(_) => true,
        Expression::TSParameterProperty(prop) => matches!(*prop.parameter, Expression::Identifier(_)),
        _ => false,
    })
}

/// Checks the prologue in either shape: `directives`, or the leading
/// directive statements ESTree output folds them into.
fn has_use_strict_directive(body: &BlockStatement) -> bool {
    match &body.directives {
        Some(directives) => directives.iter().any(|directive| directive.value.value == "use strict"),
        None => body
            .body
            .iter()
            .map_while(|stmt| match stmt {
                Statement::ExpressionStatement(stmt) => stmt.directive.as_deref(),
                _ => None,
            })
            .any(|directive| directive == "use strict"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;

    fn ident(name: &str) -> Expression {
        Expression::ident(Default::default(), name)
    }

    #[test]
    fn test_simple_parameter_list() {
        assert!(is_simple_parameter_list(&[ident("a"), ident("b")]));
        let rest = Expression::RestElement(RestElement {
            span: Default::default(),
            argument: Box::new(ident("a")),
            optional: false,
            type_annotation: None,
        });
        assert!(!is_simple_parameter_list(&[rest]));
    }

    #[test]
    fn test_param_positions_nest() {
        let chars: Vec<char> = "x".chars().collect();
        let options = ParserOptions::default();
        let plugins = options.plugin_set().unwrap();
        let mut p = Parser::new(&chars, &options, plugins, false);
        let at = Position::new(1, 3, 3);
        p.state.yield_pos = Some(at);
        let outer = p.take_param_positions();
        assert!(p.state.yield_pos.is_none());
        p.state.await_pos = Some(at);
        p.merge_param_positions(outer);
        assert_eq!(p.state.yield_pos, Some(at));
        assert_eq!(p.state.await_pos, Some(at));
    }
}
