//! Typed bindings: parameters, parameter properties, variable declarators,
//! catch parameters, arrow return types and the conversion of `(x: T)`
//! covers into typed patterns.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::*;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scope::BindingFlags;

use super::modifiers::TsModifier;
use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::try_parse::{Interrupt, TryParse};
use crate::utilities::{is_ambient_const_initializer, ArrowHead, FunctionKind};
use crate::PResult;

/// Attaches `annotation` to a binding node that can carry one. Returns the
/// annotation back when the node cannot.
fn set_type_annotation(
    expr: &mut Expression,
    annotation: Box<TSTypeAnnotation>,
) -> Option<Box<TSTypeAnnotation>> {
    let end = annotation.span.end;
    let slot = match expr {
        Expression::Identifier(node) => &mut node.type_annotation,
        Expression::ObjectPattern(node) => &mut node.type_annotation,
        Expression::ArrayPattern(node) => &mut node.type_annotation,
        Expression::RestElement(node) => &mut node.type_annotation,
        Expression::AssignmentPattern(node) => &mut node.type_annotation,
        _ => return Some(annotation),
    };
    *slot = Some(annotation);
    expr.span_mut().end = end;
    None
}

fn type_annotation_of(expr: &Expression) -> Option<&TSTypeAnnotation> {
    match expr {
        Expression::Identifier(node) => node.type_annotation.as_deref(),
        Expression::ObjectPattern(node) => node.type_annotation.as_deref(),
        Expression::ArrayPattern(node) => node.type_annotation.as_deref(),
        Expression::RestElement(node) => node.type_annotation.as_deref(),
        Expression::AssignmentPattern(node) => node.type_annotation.as_deref(),
        _ => None,
    }
}

fn set_optional(expr: &mut Expression) {
    match expr {
        Expression::Identifier(node) => node.optional = true,
        Expression::ObjectPattern(node) => node.optional = true,
        Expression::ArrayPattern(node) => node.optional = true,
        Expression::RestElement(node) => node.optional = true,
        _ => {}
    }
}

impl Parser<'_> {
    /// Reads `: T` after `binding` when present and attaches it.
    pub(super) fn ts_with_type_annotation(&mut self, mut binding: Expression) -> PResult<Expression> {
        if let Some(annotation) = self.ts_try_parse_type_annotation()? {
            if let Some(annotation) = set_type_annotation(&mut binding, annotation) {
                self.raise(&TS_UNEXPECTED_TYPE_ANNOTATION, annotation.span.start, &[])?;
            }
        }
        Ok(binding)
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// In an ambient context only `const` may have an initializer, and only
    /// a literal or enum-member-like one.
    pub(super) fn ts_parse_var_statement(
        &mut self,
        next: &'static dyn Grammar,
        start: Position,
        kind: VariableKind,
        allow_missing_initializer: bool,
    ) -> PResult<VariableDeclaration> {
        let ambient = self.state.is_ambient_context;
        let declaration = next.parse_var_statement(self, start, kind, allow_missing_initializer || ambient)?;
        if !ambient {
            return Ok(declaration);
        }
        for declarator in &declaration.declarations {
            let Some(init) = &declarator.init else {
                continue;
            };
            let at = init.span().start;
            if kind != VariableKind::Const || type_annotation_of(&declarator.id).is_some() {
                self.raise(&TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT, at, &[])?;
            } else if !is_ambient_const_initializer(init) {
                self.raise(&TS_CONST_INITIALIZER_MUST_BE_LITERAL, at, &[])?;
            }
        }
        Ok(declaration)
    }

    /// `x!: T` and `x: T` after the binding.
    pub(super) fn ts_parse_var_id(
        &mut self,
        next: &'static dyn Grammar,
        kind: VariableKind,
    ) -> PResult<(Expression, bool)> {
        let (id, mut definite) = next.parse_var_id(self, kind)?;
        if matches!(id, Expression::Identifier(_))
            && !self.has_preceding_line_break()
            && self.eat(TokenKind::ExclamationToken)?
        {
            definite = true;
        }
        let id = self.ts_with_type_annotation(id)?;
        Ok((id, definite))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Reads the return type, then either stops at a bodiless signature
    /// (overloads, ambient declarations) or reads the body.
    pub(super) fn ts_parse_function_body_and_finish(
        &mut self,
        next: &'static dyn Grammar,
        parts: &mut FunctionParts,
        kind: FunctionKind,
    ) -> PResult<bool> {
        if self.is(TokenKind::ColonToken) {
            parts.return_type = Some(self.ts_parse_type_or_type_predicate_annotation(TokenKind::ColonToken)?);
        }
        if kind.may_be_bodiless() && !self.is(TokenKind::OpenBraceToken) && self.is_line_terminator()? {
            return Ok(true);
        }
        if kind == FunctionKind::Declaration && self.state.is_ambient_context {
            self.raise(&TS_DECLARE_FUNCTION_HAS_IMPLEMENTATION, parts.params_start, &[])?;
        }
        next.parse_function_body_and_finish(self, parts, kind)
    }

    /// A signature without a body is an overload; it binds like an ambient
    /// declaration so the implementation may follow.
    pub(super) fn ts_register_function_statement_id(
        &mut self,
        next: &'static dyn Grammar,
        function: &Function,
    ) -> PResult<()> {
        match &function.id {
            Some(id) if function.function.body.is_none() => self.check_identifier(id, BindingFlags::TS_AMBIENT, false),
            _ => next.register_function_statement_id(self, function),
        }
    }

    /// `(a): T => ...`. A return type that is not followed by `=>` on the
    /// same line means this was not an arrow head.
    pub(super) fn ts_parse_arrow(&mut self, next: &'static dyn Grammar) -> PResult<Option<ArrowHead>> {
        let mut return_type = None;
        if self.is(TokenKind::ColonToken) {
            let attempt = self.try_parse(|p| {
                let annotation = p.ts_parse_type_or_type_predicate_annotation(TokenKind::ColonToken)?;
                if p.can_insert_semicolon() || !p.is(TokenKind::EqualsGreaterThanToken) {
                    return Err(Interrupt::Abort(None));
                }
                Ok(annotation)
            });
            match attempt {
                TryParse::Aborted { .. } => return Ok(None),
                TryParse::Success(annotation) => return_type = Some(annotation),
                TryParse::Recovered { node, fail_state, .. } => {
                    self.accept_state(fail_state);
                    return_type = Some(node);
                }
                TryParse::Thrown { .. } => {}
            }
        }
        Ok(next.parse_arrow(self)?.map(|head| ArrowHead {
            return_type: return_type.or(head.return_type),
        }))
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// A parameter, with accessibility, `override` and `readonly` turning
    /// a constructor parameter into a parameter property.
    pub(super) fn ts_parse_assignable_list_item(&mut self, allow_modifiers: Option<bool>) -> PResult<Expression> {
        let start = self.start_pos();
        let mut accessibility = None;
        let mut readonly = false;
        let mut is_override = false;
        if let Some(allowed) = allow_modifiers {
            let modified = self.ts_parse_modifiers(
                TsModifier::ACCESSIBILITY | TsModifier::OVERRIDE | TsModifier::READONLY,
                TsModifier::empty(),
                false,
                &TS_UNEXPECTED_PARAMETER_MODIFIER,
            )?;
            accessibility = modified.accessibility;
            readonly = modified.has(TsModifier::READONLY);
            is_override = modified.has(TsModifier::OVERRIDE);
            if !allowed && !modified.is_empty() {
                self.raise(&TS_UNEXPECTED_PARAMETER_MODIFIER, start, &[])?;
            }
        }

        let left_start = self.start_pos();
        let left = self.parse_maybe_default(left_start, None)?;
        let left = self.parse_assignable_list_item_types(left)?;
        let element = self.parse_maybe_default(left_start, Some(left))?;
        if let Expression::AssignmentPattern(pattern) = &element {
            if let Some(annotation) = pattern.type_annotation.as_deref() {
                if pattern.right.span().start.index < annotation.span.start.index {
                    self.raise(&TS_TYPE_ANNOTATION_AFTER_ASSIGN, annotation.span.start, &[])?;
                }
            }
        }

        if accessibility.is_none() && !readonly && !is_override {
            return Ok(element);
        }
        if !matches!(element, Expression::Identifier(_) | Expression::AssignmentPattern(_)) {
            self.raise(&TS_UNSUPPORTED_PARAMETER_PROPERTY_KIND, start, &[])?;
        }
        Ok(Expression::TSParameterProperty(TSParameterProperty {
            span: self.span_from(start),
            parameter: Box::new(element),
            accessibility,
            readonly,
            is_override,
        }))
    }

    /// `?` and `: T` after a parameter binding.
    pub(super) fn ts_parse_assignable_list_item_types(&mut self, mut param: Expression) -> PResult<Expression> {
        if self.eat(TokenKind::QuestionToken)? {
            if !matches!(param, Expression::Identifier(_)) && !self.state.is_ambient_context && !self.state.in_type {
                self.raise(&TS_PATTERN_IS_OPTIONAL, param.span().start, &[])?;
            }
            set_optional(&mut param);
            param.span_mut().end = self.last_end();
        }
        self.ts_with_type_annotation(param)
    }

    // ========================================================================
    // Assignment targets
    // ========================================================================

    pub(super) fn ts_to_assignable(
        &mut self,
        next: &'static dyn Grammar,
        expr: Expression,
        is_lhs: bool,
    ) -> PResult<Expression> {
        match expr {
            Expression::TSAsExpression(mut node) => {
                self.ts_check_cast_target(node.span.start, is_lhs)?;
                node.expression = Box::new(self.to_assignable(*node.expression, is_lhs)?);
                Ok(Expression::TSAsExpression(node))
            }
            Expression::TSSatisfiesExpression(mut node) => {
                self.ts_check_cast_target(node.span.start, is_lhs)?;
                node.expression = Box::new(self.to_assignable(*node.expression, is_lhs)?);
                Ok(Expression::TSSatisfiesExpression(node))
            }
            Expression::TSNonNullExpression(mut node) => {
                self.ts_check_cast_target(node.span.start, is_lhs)?;
                node.expression = Box::new(self.to_assignable(*node.expression, is_lhs)?);
                Ok(Expression::TSNonNullExpression(node))
            }
            Expression::TSTypeAssertion(mut node) => {
                self.ts_check_cast_target(node.span.start, is_lhs)?;
                node.expression = Box::new(self.to_assignable(*node.expression, is_lhs)?);
                Ok(Expression::TSTypeAssertion(node))
            }
            Expression::ParenthesizedExpression(mut paren) if is_cast_or_paren(&paren.expression) => {
                paren.expression = Box::new(self.to_assignable(*paren.expression, is_lhs)?);
                Ok(Expression::ParenthesizedExpression(paren))
            }
            Expression::AssignmentExpression(AssignmentExpression { span, operator, left, right })
                if !is_lhs && matches!(*left, Expression::TSTypeCastExpression(_)) =>
            {
                let left = match *left {
                    Expression::TSTypeCastExpression(cast) => self.ts_type_cast_to_parameter(cast, is_lhs)?,
                    other => other,
                };
                let assign = AssignmentExpression { span, operator, left: Box::new(left), right };
                next.to_assignable(self, Expression::AssignmentExpression(assign), is_lhs)
            }
            other => next.to_assignable(self, other, is_lhs),
        }
    }

    /// Casts are fine as assignment targets but not as parameters.
    fn ts_check_cast_target(&mut self, at: Position, is_lhs: bool) -> PResult<()> {
        if !is_lhs {
            self.raise(&TS_UNEXPECTED_TYPE_CAST_IN_PARAMETER, at, &[])?;
        }
        Ok(())
    }

    pub(super) fn ts_to_assignable_list(
        &mut self,
        next: &'static dyn Grammar,
        exprs: Vec<Option<Expression>>,
        trailing_comma: Option<Position>,
        is_lhs: bool,
    ) -> PResult<Vec<Option<Expression>>> {
        let mut converted = Vec::with_capacity(exprs.len());
        for expr in exprs {
            converted.push(match expr {
                Some(Expression::TSTypeCastExpression(cast)) => Some(self.ts_type_cast_to_parameter(cast, is_lhs)?),
                other => other,
            });
        }
        next.to_assignable_list(self, converted, trailing_comma, is_lhs)
    }

    /// `(x: T)` becomes the binding `x` annotated with `T`.
    fn ts_type_cast_to_parameter(&mut self, cast: TSTypeCastExpression, is_lhs: bool) -> PResult<Expression> {
        let mut binding = self.to_assignable(*cast.expression, is_lhs)?;
        if let Some(annotation) = set_type_annotation(&mut binding, cast.type_annotation) {
            self.raise(&TS_UNEXPECTED_TYPE_ANNOTATION, annotation.span.start, &[])?;
        }
        Ok(binding)
    }
}

fn is_cast_or_paren(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::TSAsExpression(_)
            | Expression::TSSatisfiesExpression(_)
            | Expression::TSNonNullExpression(_)
            | Expression::TSTypeAssertion(_)
            | Expression::ParenthesizedExpression(_)
    )
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

    fn recovering() -> ParserOptions {
        ts().with_error_recovery()
    }

    fn has_error(source: &str, message: &quarry_diagnostics::DiagnosticMessage) -> bool {
        let output = parse(source, &recovering()).unwrap();
        output.errors.iter().any(|e| e.is(message))
    }

    fn function_params(source: &str) -> Vec<Expression> {
        let output = parse(source, &ts()).unwrap();
        match output.file.program.body.into_iter().next() {
            Some(Statement::FunctionDeclaration(function)) | Some(Statement::TSDeclareFunction(function)) => {
                function.function.params
            }
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_and_optional_parameters() {
        let params = function_params("function f(a?: string, [b]: number[], ...rest: any[]) {}");
        match &params[0] {
            Expression::Identifier(id) => {
                assert!(id.optional);
                assert!(id.type_annotation.is_some());
            }
            other => panic!("expected identifier, got {other:?}"),
        }
        assert!(matches!(&params[1], Expression::ArrayPattern(p) if p.type_annotation.is_some()));
        assert!(matches!(&params[2], Expression::RestElement(r) if r.type_annotation.is_some()));
    }

    #[test]
    fn test_optional_pattern_outside_ambient_context() {
        assert!(has_error("function f({ a }?) {}", &TS_PATTERN_IS_OPTIONAL));
        assert!(!has_error("declare function f({ a }?): void;", &TS_PATTERN_IS_OPTIONAL));
    }

    #[test]
    fn test_parameter_properties() {
        let output = parse(
            "class A { constructor(public a: string, private readonly b = 1) {} }",
            &ts(),
        )
        .unwrap();
        assert!(output.errors.is_empty());
        assert!(has_error("function f(public a) {}", &TS_UNEXPECTED_PARAMETER_MODIFIER));
        assert!(has_error(
            "class A { constructor(public { a }) {} }",
            &TS_UNSUPPORTED_PARAMETER_PROPERTY_KIND
        ));
    }

    #[test]
    fn test_annotation_after_default() {
        assert!(has_error("function f(a = 1: number) {}", &TS_TYPE_ANNOTATION_AFTER_ASSIGN));
    }

    #[test]
    fn test_definite_and_typed_declarators() {
        let output = parse("let x!: number, y: string = '';", &ts()).unwrap();
        match &output.file.program.body[0] {
            Statement::VariableDeclaration(decl) => {
                assert!(decl.declarations[0].definite);
                assert!(!decl.declarations[1].definite);
                assert!(matches!(&*decl.declarations[1].id, Expression::Identifier(id) if id.type_annotation.is_some()));
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_ambient_initializers() {
        assert!(parse("declare const a = 1;", &ts()).is_ok());
        assert!(has_error("declare let a = 1;", &TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT));
        assert!(has_error("declare const a: number = 1;", &TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT));
        assert!(has_error("declare const a = f();", &TS_CONST_INITIALIZER_MUST_BE_LITERAL));
    }

    #[test]
    fn test_overloads_bind_once() {
        let output = parse(
            "function f(a: string): void; function f(a: number): void; function f(a: any) {}",
            &ts(),
        )
        .unwrap();
        assert_eq!(output.file.program.body.len(), 3);
        assert!(matches!(output.file.program.body[0], Statement::TSDeclareFunction(_)));
        assert!(matches!(output.file.program.body[2], Statement::FunctionDeclaration(_)));
    }

    #[test]
    fn test_cast_targets() {
        assert!(parse("(a as any) = 1;", &ts()).is_ok());
        assert!(parse("a! = 1;", &ts()).is_ok());
        assert!(has_error("((a as any)) => 1;", &TS_UNEXPECTED_TYPE_CAST_IN_PARAMETER));
    }

    #[test]
    fn test_catch_clause_annotation() {
        let output = parse("try {} catch (e: unknown) {}", &ts()).unwrap();
        assert!(output.errors.is_empty());
    }

    #[test]
    fn test_arrow_return_type_needs_arrow() {
        assert!(matches!(
            parse("a ? (b) : c;", &ts()).unwrap().file.program.body[0],
            Statement::ExpressionStatement(_)
        ));
    }
}
