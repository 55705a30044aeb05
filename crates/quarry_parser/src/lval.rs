//! Assignment targets and binding patterns.
//!
//! An expression parsed before the parser knew it was a target (`[a, b] =`
//! or an arrow head) is first rewritten into pattern form by
//! `to_assignable`, then validated by `check_lval`, which also declares
//! the names it binds.

use quarry_ast::node::*;
use quarry_ast::ops::AssignmentOperator;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scope::BindingFlags;
use rustc_hash::FxHashSet;

use crate::parser::Parser;
use crate::utilities::{is_strict_bind_only_reserved_word, is_strict_bind_reserved_word, LvalAncestor, LvalRule};
use crate::PResult;

impl Parser<'_> {
    // ========================================================================
    // Conversion to patterns
    // ========================================================================

    /// Rewrites an expression into the pattern it stands for. `is_lhs`
    /// distinguishes the left of `=` from an arrow parameter.
    pub(crate) fn base_to_assignable(&mut self, expr: Expression, is_lhs: bool) -> PResult<Expression> {
        if self.is_parenthesized_expr(&expr) {
            let inner = unwrap_parenthesized(&expr);
            let allowed = is_lhs && (inner.is_identifier() || inner.is_member());
            if !allowed {
                self.raise(&INVALID_PARENTHESIZED_ASSIGNMENT, expr.span().start, &[])?;
            }
        }

        match expr {
            Expression::ObjectExpression(object) => {
                let last = object.properties.len().saturating_sub(1);
                let mut properties = Vec::with_capacity(object.properties.len());
                for (i, member) in object.properties.into_iter().enumerate() {
                    let is_last = i == last;
                    let member = self.to_assignable_object_member(member, is_last, is_lhs)?;
                    if is_last && matches!(member, ObjectMember::RestElement(_)) {
                        if let Some(at) = object.trailing_comma {
                            let at = self.position_of(at);
                            self.raise(&REST_TRAILING_COMMA, at, &[])?;
                        }
                    }
                    properties.push(member);
                }
                Ok(Expression::ObjectPattern(ObjectPattern {
                    span: object.span,
                    properties,
                    optional: false,
                    type_annotation: None,
                }))
            }
            Expression::ArrayExpression(array) => {
                let trailing_comma = array.trailing_comma.map(|at| self.position_of(at));
                let elements = self.to_assignable_list(array.elements, trailing_comma, is_lhs)?;
                Ok(Expression::ArrayPattern(ArrayPattern {
                    span: array.span,
                    elements,
                    optional: false,
                    type_annotation: None,
                }))
            }
            Expression::AssignmentExpression(assign) => {
                if assign.operator != AssignmentOperator::Assign {
                    self.raise(&MISSING_EQ_IN_ASSIGNMENT, assign.left.span().end, &[])?;
                }
                let left = self.to_assignable(*assign.left, is_lhs)?;
                Ok(Expression::AssignmentPattern(AssignmentPattern {
                    span: assign.span,
                    left: Box::new(left),
                    right: assign.right,
                    type_annotation: None,
                }))
            }
            Expression::ParenthesizedExpression(paren) => {
                let inner = self.to_assignable(*paren.expression, is_lhs)?;
                Ok(Expression::ParenthesizedExpression(ParenthesizedExpression {
                    span: paren.span,
                    expression: Box::new(inner),
                }))
            }
            other => Ok(other),
        }
    }

    pub(crate) fn base_to_assignable_object_member(
        &mut self,
        member: ObjectMember,
        is_last: bool,
        is_lhs: bool,
    ) -> PResult<ObjectMember> {
        match member {
            ObjectMember::ObjectMethod(method) => {
                let message = match method.kind {
                    MethodKind::Get | MethodKind::Set => &PATTERN_HAS_ACCESSOR,
                    _ => &PATTERN_HAS_METHOD,
                };
                self.raise(message, method.key.span().start, &[])?;
                Ok(ObjectMember::ObjectMethod(method))
            }
            ObjectMember::SpreadElement(spread) => {
                self.check_to_rest_conversion(&spread.argument, false)?;
                let argument = self.to_assignable(*spread.argument, is_lhs)?;
                if !is_last {
                    self.raise(&REST_TRAILING_COMMA, spread.span.start, &[])?;
                }
                Ok(ObjectMember::RestElement(RestElement {
                    span: spread.span,
                    argument: Box::new(argument),
                    optional: false,
                    type_annotation: None,
                }))
            }
            ObjectMember::ObjectProperty(mut prop) => {
                if let Some(name) = private_key_name(&prop.key) {
                    self.use_private_name(&name, prop.key.span().start)?;
                }
                let value = std::mem::replace(&mut *prop.value, Expression::ident(prop.span, ""));
                *prop.value = self.to_assignable(value, is_lhs)?;
                Ok(ObjectMember::ObjectProperty(prop))
            }
            ObjectMember::Property(mut prop) => {
                let value = std::mem::replace(&mut *prop.value, Expression::ident(prop.span, ""));
                *prop.value = self.to_assignable(value, is_lhs)?;
                Ok(ObjectMember::Property(prop))
            }
            rest @ ObjectMember::RestElement(_) => Ok(rest),
        }
    }

    /// Converts the items of an array literal or an arrow head. A rest
    /// element must be last and may not be followed by a comma.
    pub(crate) fn base_to_assignable_list(
        &mut self,
        exprs: Vec<Option<Expression>>,
        trailing_comma: Option<Position>,
        is_lhs: bool,
    ) -> PResult<Vec<Option<Expression>>> {
        let end = exprs.len().saturating_sub(1);
        let mut out = Vec::with_capacity(exprs.len());
        for (i, expr) in exprs.into_iter().enumerate() {
            let Some(expr) = expr else {
                out.push(None);
                continue;
            };
            let converted = match expr {
                Expression::SpreadElement(spread) => {
                    self.check_to_rest_conversion(&spread.argument, true)?;
                    let argument = self.to_assignable(*spread.argument, is_lhs)?;
                    Expression::RestElement(RestElement {
                        span: spread.span,
                        argument: Box::new(argument),
                        optional: false,
                        type_annotation: None,
                    })
                }
                other => self.to_assignable(other, is_lhs)?,
            };
            if let Expression::RestElement(rest) = &converted {
                if i < end {
                    self.raise(&REST_TRAILING_COMMA, rest.span.start, &[])?;
                } else if let Some(at) = trailing_comma {
                    self.raise(&REST_TRAILING_COMMA, at, &[])?;
                }
            }
            out.push(Some(converted));
        }
        Ok(out)
    }

    /// What may follow `...` in a pattern: a name, a member, and in array
    /// patterns a nested pattern.
    fn check_to_rest_conversion(&mut self, argument: &Expression, allow_pattern: bool) -> PResult<()> {
        match argument {
            Expression::ParenthesizedExpression(paren) => self.check_to_rest_conversion(&paren.expression, allow_pattern),
            Expression::Identifier(_) | Expression::MemberExpression(_) => Ok(()),
            Expression::ArrayExpression(_) | Expression::ObjectExpression(_) if allow_pattern => Ok(()),
            other => self.raise(&INVALID_REST_ASSIGNMENT_PATTERN, other.span().start, &[]),
        }
    }

    fn is_parenthesized_expr(&self, expr: &Expression) -> bool {
        matches!(expr, Expression::ParenthesizedExpression(_)) || self.state.is_parenthesized(expr.span())
    }

    /// The line and column of a character offset already tokenized.
    fn position_of(&self, index: u32) -> Position {
        self.state.tok.position_at(index as usize)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    pub(crate) fn check_lval(&mut self, expr: &Expression, ancestor: LvalAncestor, binding: BindingFlags) -> PResult<()> {
        self.check_lval_with(expr, ancestor, binding, &mut None, false, false)
    }

    /// Validates `expr` as a target of `ancestor` and declares what it
    /// binds. `clashes` collects names to reject duplicates.
    pub(crate) fn check_lval_with(
        &mut self,
        expr: &Expression,
        ancestor: LvalAncestor,
        binding: BindingFlags,
        clashes: &mut Option<FxHashSet<String>>,
        strict_mode_changed: bool,
        has_parenthesized_ancestor: bool,
    ) -> PResult<()> {
        if is_member_target(expr) {
            let at = expr.span().start;
            if is_optional_member(expr) {
                if !ancestor.is_assignment() {
                    return self.raise(&INVALID_LHS_OPTIONAL_CHAINING, at, &[ancestor.description()]);
                }
                return Err(self.missing_plugin(at, &["optionalChainingAssign"]));
            }
            if binding != BindingFlags::NONE {
                self.raise(&INVALID_PROPERTY_BINDING_PATTERN, at, &[])?;
            }
            return Ok(());
        }

        if let Expression::Identifier(id) = expr {
            self.check_identifier_in(id, binding, strict_mode_changed, ancestor == LvalAncestor::CatchClause)?;
            if let Some(seen) = clashes {
                if !seen.insert(id.name.clone()) {
                    self.raise(&PARAM_DUPE, id.span.start, &[])?;
                }
            }
            return Ok(());
        }

        let unparenthesized_in_assign =
            !(has_parenthesized_ancestor || self.state.is_parenthesized(expr.span())) && ancestor.is_assignment();
        let parenthesized = match self.is_valid_lval(expr, unparenthesized_in_assign, binding) {
            LvalRule::Valid => return Ok(()),
            LvalRule::Invalid => {
                let message = if binding == BindingFlags::NONE { &INVALID_LHS } else { &INVALID_LHS_BINDING };
                return self.raise(message, expr.span().start, &[ancestor.description()]);
            }
            LvalRule::Children { parenthesized } => parenthesized,
        };

        let next_ancestor = match expr {
            Expression::ArrayPattern(_) => LvalAncestor::ArrayPattern,
            Expression::ObjectPattern(_) => LvalAncestor::ObjectPattern,
            Expression::ParenthesizedExpression(_) => LvalAncestor::ParenthesizedExpression,
            _ => ancestor,
        };
        let mut check = |p: &mut Self, child: &Expression| {
            p.check_lval_with(child, next_ancestor, binding, clashes, strict_mode_changed, parenthesized)
        };

        match expr {
            Expression::AssignmentPattern(pattern) => check(self, &pattern.left),
            Expression::RestElement(rest) => check(self, &rest.argument),
            Expression::ParenthesizedExpression(paren) => check(self, &paren.expression),
            Expression::ArrayPattern(pattern) => {
                for element in pattern.elements.iter().flatten() {
                    check(self, element)?;
                }
                Ok(())
            }
            Expression::ObjectPattern(pattern) => {
                for member in &pattern.properties {
                    match member {
                        ObjectMember::ObjectMethod(_) => {}
                        ObjectMember::ObjectProperty(prop) => check(self, &prop.value)?,
                        ObjectMember::Property(prop) => check(self, &prop.value)?,
                        ObjectMember::RestElement(rest) => check(self, &rest.argument)?,
                        ObjectMember::SpreadElement(spread) => {
                            let message =
                                if binding == BindingFlags::NONE { &INVALID_LHS } else { &INVALID_LHS_BINDING };
                            self.raise(message, spread.span.start, &[next_ancestor.description()])?;
                        }
                    }
                }
                Ok(())
            }
            Expression::TSParameterProperty(prop) => check(self, &prop.parameter),
            Expression::TSNonNullExpression(node) => check(self, &node.expression),
            Expression::TSInstantiationExpression(node) => check(self, &node.expression),
            Expression::TSAsExpression(node) | Expression::TSSatisfiesExpression(node) => check(self, &node.expression),
            Expression::TSTypeAssertion(node) => check(self, &node.expression),
            Expression::TSTypeCastExpression(node) => check(self, &node.expression),
            _ => Ok(()),
        }
    }

    pub(crate) fn base_is_valid_lval(
        &mut self,
        expr: &Expression,
        _unparenthesized_in_assign: bool,
        _binding: BindingFlags,
    ) -> LvalRule {
        match expr {
            Expression::AssignmentPattern(_)
            | Expression::RestElement(_)
            | Expression::ArrayPattern(_)
            | Expression::ObjectPattern(_) => LvalRule::Children { parenthesized: false },
            Expression::ParenthesizedExpression(_) => LvalRule::Children { parenthesized: true },
            _ => LvalRule::Invalid,
        }
    }

    pub(crate) fn check_identifier(
        &mut self,
        id: &Identifier,
        binding: BindingFlags,
        strict_mode_changed: bool,
    ) -> PResult<()> {
        self.check_identifier_in(id, binding, strict_mode_changed, false)
    }

    fn check_identifier_in(
        &mut self,
        id: &Identifier,
        binding: BindingFlags,
        strict_mode_changed: bool,
        in_catch: bool,
    ) -> PResult<()> {
        let name = id.name.as_str();
        let at = id.span.start;
        if self.state.strict {
            let reserved = if strict_mode_changed {
                is_strict_bind_reserved_word(name, self.in_module)
            } else {
                is_strict_bind_only_reserved_word(name)
            };
            if reserved {
                let message = if binding == BindingFlags::NONE {
                    &STRICT_EVAL_ARGUMENTS
                } else {
                    &STRICT_EVAL_ARGUMENTS_BINDING
                };
                self.raise(message, at, &[name])?;
            }
        }
        let no_let = binding == BindingFlags::CLASS || (binding == BindingFlags::LEXICAL && !in_catch);
        if no_let && name == "let" {
            self.raise(&LET_IN_LEXICAL_BINDING, at, &[])?;
        }
        if !binding.contains(BindingFlags::FLAG_NONE) {
            let errors = self.state.scope.declare_name(name, binding, at);
            self.raise_all(errors)?;
        }
        Ok(())
    }
}

fn unwrap_parenthesized(expr: &Expression) -> &Expression {
    match expr {
        Expression::ParenthesizedExpression(paren) => unwrap_parenthesized(&paren.expression),
        other => other,
    }
}

fn is_optional_member(expr: &Expression) -> bool {
    match expr {
        Expression::OptionalMemberExpression(_) => true,
        Expression::ChainExpression(chain) => matches!(*chain.expression, Expression::MemberExpression(_)),
        _ => false,
    }
}

fn is_member_target(expr: &Expression) -> bool {
    matches!(expr, Expression::MemberExpression(_)) || is_optional_member(expr)
}

fn private_key_name(key: &Expression) -> Option<String> {
    match key {
        Expression::PrivateName(private) => Some(private.id.name.clone()),
        Expression::PrivateIdentifier(private) => Some(private.name.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use quarry_diagnostics::ParseError;
    use quarry_scope::ScopeFlags;

    fn assign(source: &str, options: &ParserOptions) -> Result<Vec<ParseError>, ParseError> {
        let chars: Vec<char> = source.chars().collect();
        let plugins = options.plugin_set()?;
        let mut p = Parser::new(&chars, options, plugins, false);
        p.state.scope.enter(ScopeFlags::PROGRAM);
        p.next_token()?;
        p.parse_expression()?;
        Ok(p.state.errors.clone().into_vec())
    }

    #[test]
    fn test_destructuring_assignment() {
        let options = ParserOptions::default();
        assert!(assign("[a, { b, c: [d] }, ...e] = f", &options).unwrap().is_empty());
        assert!(assign("({ a: b.c, ...d } = e)", &options).unwrap().is_empty());
    }

    #[test]
    fn test_parenthesized_targets() {
        let options = ParserOptions::default().with_error_recovery();
        assert!(assign("(a) = 1", &options).unwrap().is_empty());
        assert!(assign("(a.b) = 1", &options).unwrap().is_empty());
        let errors = assign("({a,...b}) = c", &options).unwrap();
        assert!(errors[0].is(&INVALID_PARENTHESIZED_ASSIGNMENT));
        assert_eq!(errors[0].kind, quarry_diagnostics::ErrorKind::Binding);
    }

    #[test]
    fn test_invalid_target_names_enclosing_parens() {
        let lhs_message = |options: &ParserOptions| {
            assign("(a + b) = 1", options)
                .unwrap()
                .into_iter()
                .find(|e| e.is(&INVALID_LHS))
                .map(|e| e.message)
        };
        let plain = ParserOptions::default().with_error_recovery();
        let created = ParserOptions {
            create_parenthesized_expressions: true,
            ..plain.clone()
        };
        assert_eq!(lhs_message(&plain).as_deref(), Some("Invalid left-hand side in assignment expression."));
        assert_eq!(lhs_message(&created).as_deref(), Some("Invalid left-hand side in parenthesized expression."));
    }

    #[test]
    fn test_rest_must_be_last() {
        let options = ParserOptions::default().with_error_recovery();
        let errors = assign("[...a, b] = c", &options).unwrap();
        assert!(errors[0].is(&REST_TRAILING_COMMA));
        let errors = assign("({...a,} = c)", &options).unwrap();
        assert!(errors[0].is(&REST_TRAILING_COMMA));
    }

    #[test]
    fn test_invalid_targets() {
        let options = ParserOptions::default().with_error_recovery();
        let errors = assign("a + b = c", &options).unwrap();
        assert!(errors[0].is(&INVALID_LHS));
        let errors = assign("({ get a() {} } = b)", &options).unwrap();
        assert!(errors[0].is(&PATTERN_HAS_ACCESSOR));
        let errors = assign("a?.b = c", &options);
        assert!(matches!(errors, Err(e) if e.is(&MISSING_PLUGIN)));
        let errors = assign("a?.b++", &options).unwrap();
        assert!(errors[0].is(&INVALID_LHS_OPTIONAL_CHAINING));
    }

    #[test]
    fn test_strict_eval_assignment() {
        let options = ParserOptions::module().with_error_recovery();
        let chars: Vec<char> = "eval = 1".chars().collect();
        let plugins = options.plugin_set().unwrap();
        let mut p = Parser::new(&chars, &options, plugins, true);
        p.state.scope.enter(ScopeFlags::PROGRAM);
        p.next_token().unwrap();
        p.parse_expression().unwrap();
        assert!(p.state.errors.errors()[0].is(&STRICT_EVAL_ARGUMENTS));
    }
}
