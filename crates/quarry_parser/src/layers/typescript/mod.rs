//! The TypeScript layer.
//!
//! Adds type annotations, type-level declarations (interfaces, aliases,
//! enums, namespaces), ambient `declare` forms, class member modifiers and
//! the expression forms that only exist in TypeScript (`as`, `satisfies`,
//! `x!`, `<T>x`, `f<T>`). The lexical side is small: inside a type every
//! `<` and `>` is a single-character token so that `Array<Array<T>>` closes
//! one bracket at a time.
//!
//! The productions themselves live on [`Parser`] in the submodules; this
//! file only wires them into the grammar chain.

mod bindings;
mod classes;
mod declarations;
mod expressions;
mod modifiers;
mod modules;
mod types;

use quarry_ast::node::*;
use quarry_ast::token_kind::{TokenKind, TokenValue};
use quarry_ast::ts::*;
use quarry_core::text::Position;
use quarry_scope::BindingFlags;

use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::utilities::{
    ArrowHead, ClassState, ExpressionErrors, FunctionKind, LvalRule, StatementContext, SubscriptState,
};
use crate::PResult;

use types::TypeParamModifiers;

pub(crate) struct TypeScriptLayer {
    next: &'static dyn Grammar,
}

impl TypeScriptLayer {
    pub(crate) fn new(next: &'static dyn Grammar) -> Self {
        Self { next }
    }
}

impl Grammar for TypeScriptLayer {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn next(&self) -> &'static dyn Grammar {
        self.next
    }

    // ========================================================================
    // Tokenizer
    // ========================================================================

    fn get_token_from_code(&self, p: &mut Parser<'_>, ch: char) -> PResult<()> {
        if p.state.in_type {
            let kind = match ch {
                '<' => Some(TokenKind::LessThanToken),
                '>' => Some(TokenKind::GreaterThanToken),
                _ => None,
            };
            if let Some(kind) = kind {
                let mut lexer = p.lexer();
                lexer.state.pos += 1;
                lexer.finish_token(kind, TokenValue::None);
                return Ok(());
            }
        }
        self.next.get_token_from_code(p, ch)
    }

    // ========================================================================
    // Statements and modules
    // ========================================================================

    fn parse_statement_content(
        &self,
        p: &mut Parser<'_>,
        ctx: StatementContext,
        top_level: bool,
    ) -> PResult<Statement> {
        p.ts_parse_statement_content(self.next, ctx, top_level)
    }

    fn parse_expression_statement(&self, p: &mut Parser<'_>, start: Position, expr: Expression) -> PResult<Statement> {
        p.ts_parse_expression_statement(self.next, start, expr)
    }

    fn parse_var_statement(
        &self,
        p: &mut Parser<'_>,
        start: Position,
        kind: VariableKind,
        allow_missing_initializer: bool,
    ) -> PResult<VariableDeclaration> {
        p.ts_parse_var_statement(self.next, start, kind, allow_missing_initializer)
    }

    fn parse_var_id(&self, p: &mut Parser<'_>, kind: VariableKind) -> PResult<(Expression, bool)> {
        p.ts_parse_var_id(self.next, kind)
    }

    fn parse_catch_clause_param(&self, p: &mut Parser<'_>) -> PResult<Expression> {
        let param = self.next.parse_catch_clause_param(p)?;
        p.ts_with_type_annotation(param)
    }

    fn parse_import(&self, p: &mut Parser<'_>, start: Position) -> PResult<Statement> {
        p.ts_parse_import(self.next, start)
    }

    fn parse_import_specifier(&self, p: &mut Parser<'_>, type_only_import: bool) -> PResult<ImportSpecifier> {
        p.ts_parse_import_specifier(type_only_import)
    }

    fn parse_export(&self, p: &mut Parser<'_>, start: Position) -> PResult<Statement> {
        p.ts_parse_export(self.next, start)
    }

    fn should_parse_export_declaration(&self, p: &mut Parser<'_>) -> bool {
        p.ts_is_declaration_start() || self.next.should_parse_export_declaration(p)
    }

    fn parse_export_declaration(&self, p: &mut Parser<'_>) -> PResult<Option<Statement>> {
        p.ts_parse_export_declaration(self.next)
    }

    fn parse_export_default_expression(&self, p: &mut Parser<'_>) -> PResult<ExportDefaultKind> {
        p.ts_parse_export_default_expression(self.next)
    }

    fn parse_export_specifier(&self, p: &mut Parser<'_>, type_only_export: bool) -> PResult<ExportNamedSpecifier> {
        p.ts_parse_export_specifier(type_only_export)
    }

    /// Overloads and merged declarations may export one name repeatedly.
    fn check_duplicate_export(&self, _p: &mut Parser<'_>, _name: &str, _at: Position) -> PResult<()> {
        Ok(())
    }

    // ========================================================================
    // Functions and parameters
    // ========================================================================

    fn parse_maybe_type_parameters(
        &self,
        p: &mut Parser<'_>,
        allow_in_out: bool,
    ) -> PResult<Option<TSTypeParameterDeclaration>> {
        let modifiers = if allow_in_out {
            TypeParamModifiers::InOutConst
        } else {
            TypeParamModifiers::Const
        };
        p.ts_try_parse_type_parameters(modifiers)
    }

    fn parse_function_body_and_finish(
        &self,
        p: &mut Parser<'_>,
        parts: &mut FunctionParts,
        kind: FunctionKind,
    ) -> PResult<bool> {
        p.ts_parse_function_body_and_finish(self.next, parts, kind)
    }

    fn register_function_statement_id(&self, p: &mut Parser<'_>, function: &Function) -> PResult<()> {
        p.ts_register_function_statement_id(self.next, function)
    }

    fn parse_arrow(&self, p: &mut Parser<'_>) -> PResult<Option<ArrowHead>> {
        p.ts_parse_arrow(self.next)
    }

    fn should_parse_arrow(&self, p: &mut Parser<'_>) -> bool {
        p.is(TokenKind::ColonToken) || self.next.should_parse_arrow(p)
    }

    fn should_parse_async_arrow(&self, p: &mut Parser<'_>) -> bool {
        p.is(TokenKind::ColonToken) || self.next.should_parse_async_arrow(p)
    }

    fn parse_async_arrow_return_type(&self, p: &mut Parser<'_>) -> PResult<Option<Box<TSTypeAnnotation>>> {
        if p.is(TokenKind::ColonToken) {
            p.ts_parse_type_annotation().map(Some)
        } else {
            self.next.parse_async_arrow_return_type(p)
        }
    }

    fn parse_assignable_list_item(&self, p: &mut Parser<'_>, allow_modifiers: Option<bool>) -> PResult<Expression> {
        p.ts_parse_assignable_list_item(allow_modifiers)
    }

    fn parse_assignable_list_item_types(&self, p: &mut Parser<'_>, param: Expression) -> PResult<Expression> {
        p.ts_parse_assignable_list_item_types(param)
    }

    fn parse_binding_atom(&self, p: &mut Parser<'_>) -> PResult<Expression> {
        if p.is(TokenKind::ThisKeyword) {
            return p.parse_identifier(true).map(Expression::Identifier);
        }
        self.next.parse_binding_atom(p)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_maybe_assign(
        &self,
        p: &mut Parser<'_>,
        refs: Option<&mut ExpressionErrors>,
        paren_item: bool,
    ) -> PResult<Expression> {
        p.ts_parse_maybe_assign(self.next, refs, paren_item)
    }

    fn parse_conditional(
        &self,
        p: &mut Parser<'_>,
        expr: Expression,
        start: Position,
        refs: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression> {
        p.ts_parse_conditional(self.next, expr, start, refs)
    }

    fn parse_paren_item(&self, p: &mut Parser<'_>, expr: Expression, start: Position) -> PResult<Expression> {
        p.ts_parse_paren_item(self.next, expr, start)
    }

    fn parse_expr_op(&self, p: &mut Parser<'_>, left: Expression, left_start: Position, min_prec: u8) -> PResult<Expression> {
        p.ts_parse_expr_op(self.next, left, left_start, min_prec)
    }

    fn parse_maybe_unary(
        &self,
        p: &mut Parser<'_>,
        refs: Option<&mut ExpressionErrors>,
        saw_unary: bool,
    ) -> PResult<Expression> {
        if !p.has_layer(crate::grammar::LayerSet::JSX) && p.is(TokenKind::LessThanToken) {
            return p.ts_parse_type_assertion();
        }
        self.next.parse_maybe_unary(p, refs, saw_unary)
    }

    fn parse_subscript(
        &self,
        p: &mut Parser<'_>,
        base: Expression,
        start: Position,
        no_calls: bool,
        st: &mut SubscriptState,
    ) -> PResult<Expression> {
        p.ts_parse_subscript(self.next, base, start, no_calls, st)
    }

    fn parse_new_callee(&self, p: &mut Parser<'_>) -> PResult<(Expression, Option<TSTypeParameterInstantiation>)> {
        let (callee, type_parameters) = self.next.parse_new_callee(p)?;
        Ok(p.ts_split_instantiation(callee, type_parameters))
    }

    fn to_referenced_list(&self, p: &mut Parser<'_>, exprs: Vec<&Expression>, is_paren: bool) -> PResult<()> {
        p.ts_check_type_casts(&exprs)?;
        self.next.to_referenced_list(p, exprs, is_paren)
    }

    fn check_reserved_word(
        &self,
        p: &mut Parser<'_>,
        word: &str,
        start: Position,
        check_keywords: bool,
        is_binding: bool,
    ) -> PResult<()> {
        if p.state.is_ambient_context {
            return Ok(());
        }
        self.next.check_reserved_word(p, word, start, check_keywords, is_binding)
    }

    // ========================================================================
    // Assignment targets
    // ========================================================================

    fn to_assignable(&self, p: &mut Parser<'_>, expr: Expression, is_lhs: bool) -> PResult<Expression> {
        p.ts_to_assignable(self.next, expr, is_lhs)
    }

    fn to_assignable_list(
        &self,
        p: &mut Parser<'_>,
        exprs: Vec<Option<Expression>>,
        trailing_comma: Option<Position>,
        is_lhs: bool,
    ) -> PResult<Vec<Option<Expression>>> {
        p.ts_to_assignable_list(self.next, exprs, trailing_comma, is_lhs)
    }

    fn is_valid_lval(
        &self,
        p: &mut Parser<'_>,
        expr: &Expression,
        unparenthesized_in_assign: bool,
        binding: BindingFlags,
    ) -> LvalRule {
        match expr {
            Expression::TSTypeCastExpression(_) => LvalRule::Valid,
            Expression::TSParameterProperty(_)
            | Expression::TSNonNullExpression(_)
            | Expression::TSInstantiationExpression(_) => LvalRule::Children { parenthesized: false },
            Expression::TSAsExpression(_) | Expression::TSSatisfiesExpression(_) | Expression::TSTypeAssertion(_) => {
                if binding != BindingFlags::NONE || !unparenthesized_in_assign {
                    LvalRule::Children { parenthesized: true }
                } else {
                    LvalRule::Invalid
                }
            }
            _ => self.next.is_valid_lval(p, expr, unparenthesized_in_assign, binding),
        }
    }

    /// Ambient signatures may end a parameter list as `(...args,)`.
    fn check_comma_after_rest(&self, p: &mut Parser<'_>, close: TokenKind) -> PResult<bool> {
        let close_char = match close {
            TokenKind::CloseParenToken => Some(')'),
            TokenKind::CloseBracketToken => Some(']'),
            TokenKind::CloseBraceToken => Some('}'),
            _ => None,
        };
        if p.state.is_ambient_context
            && p.is(TokenKind::CommaToken)
            && close_char.is_some()
            && p.lookahead_char() == close_char
        {
            p.next()?;
            return Ok(false);
        }
        self.next.check_comma_after_rest(p, close)
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_id(&self, p: &mut Parser<'_>, class: &mut Class, is_statement: bool, optional_id: bool) -> PResult<()> {
        p.ts_parse_class_id(self.next, class, is_statement, optional_id)
    }

    fn parse_class_super(&self, p: &mut Parser<'_>, class: &mut Class) -> PResult<()> {
        p.ts_parse_class_super(self.next, class)
    }

    fn parse_class_member(&self, p: &mut Parser<'_>, body: &mut Vec<ClassMember>, st: &mut ClassState) -> PResult<()> {
        p.ts_parse_class_member(body, st)
    }

    fn parse_post_member_name_modifiers(
        &self,
        p: &mut Parser<'_>,
        mods: &mut ClassMemberModifiers,
        start: Position,
    ) -> PResult<()> {
        p.ts_parse_post_member_name_modifiers(mods, start)
    }

    fn parse_class_property_annotation(
        &self,
        p: &mut Parser<'_>,
        mods: &mut ClassMemberModifiers,
    ) -> PResult<Option<Box<TSTypeAnnotation>>> {
        if !mods.optional && p.eat(TokenKind::ExclamationToken)? {
            mods.definite = true;
        }
        p.ts_try_parse_type_annotation()
    }

    fn is_class_method(&self, p: &mut Parser<'_>) -> bool {
        p.is(TokenKind::LessThanToken) || self.next.is_class_method(p)
    }

    fn is_class_property(&self, p: &mut Parser<'_>) -> bool {
        p.is(TokenKind::ExclamationToken) || p.is(TokenKind::ColonToken) || self.next.is_class_property(p)
    }

    fn finish_class_member(&self, p: &mut Parser<'_>, member: ClassMember) -> PResult<ClassMember> {
        p.ts_check_class_member(&member)?;
        self.next.finish_class_member(p, member)
    }

    // ========================================================================
    // JSX
    // ========================================================================

    fn jsx_parse_type_arguments(&self, p: &mut Parser<'_>) -> PResult<Option<TSTypeParameterInstantiation>> {
        p.ts_jsx_parse_type_arguments()
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

    fn ts_jsx() -> ParserOptions {
        ts().with_plugin("jsx")
    }

    fn first_expression(source: &str, options: &ParserOptions) -> Expression {
        let output = parse(source, options).unwrap();
        match output.file.program.body.into_iter().next() {
            Some(Statement::ExpressionStatement(stmt)) => *stmt.expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_arrow_without_jsx() {
        match first_expression("<T,>() => x", &ts()) {
            Expression::ArrowFunctionExpression(arrow) => {
                let params = arrow.type_parameters.expect("type parameters");
                assert_eq!(params.params.len(), 1);
                assert_eq!(params.params[0].name, "T");
            }
            other => panic!("expected an arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_arrow_with_jsx_falls_back_from_element() {
        match first_expression("<T,>() => x", &ts_jsx()) {
            Expression::ArrowFunctionExpression(arrow) => assert!(arrow.type_parameters.is_some()),
            other => panic!("expected an arrow, got {other:?}"),
        }
        assert!(matches!(
            first_expression("<div>hi</div>", &ts_jsx()),
            Expression::JSXElement(_)
        ));
    }

    #[test]
    fn test_nested_type_arguments_in_annotation() {
        let output = parse("let x: Array<Array<number>> = y;", &ts()).unwrap();
        assert!(output.errors.is_empty());
        assert!(matches!(
            output.file.program.body[0],
            Statement::VariableDeclaration(_)
        ));
    }

    #[test]
    fn test_enum_merging() {
        assert!(parse("enum A { X } enum A { Y }", &ts()).is_ok());
        assert!(parse("const enum A { X } const enum A { Y }", &ts()).is_ok());
        let err = parse("const enum A {} enum A {}", &ts()).unwrap_err();
        assert!(err.is(&VAR_REDECLARATION));
    }

    #[test]
    fn test_this_parameter_and_ambient_trailing_rest_comma() {
        assert!(parse("function f(this: Window, a: number) {}", &ts()).is_ok());
        assert!(parse("declare function f(...args: any[],): void;", &ts()).is_ok());
    }
}
