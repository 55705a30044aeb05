//! Reshapes the tree into the ESTree node set.
//!
//! Every override lets the layers below build their usual node first and
//! rewrites the result, so the grammar itself is unchanged.

use quarry_ast::node::*;
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::{PATTERN_HAS_ACCESSOR, PATTERN_HAS_METHOD};

use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::utilities::SubscriptState;
use crate::PResult;

pub(crate) struct EstreeLayer {
    next: &'static dyn Grammar,
}

impl EstreeLayer {
    pub(crate) fn new(next: &'static dyn Grammar) -> Self {
        Self { next }
    }
}

impl Grammar for EstreeLayer {
    fn name(&self) -> &'static str {
        "estree"
    }

    fn next(&self) -> &'static dyn Grammar {
        self.next
    }

    fn finish_literal(&self, p: &mut Parser<'_>, lit: Expression) -> Expression {
        let lit = self.next.finish_literal(p, lit);
        let raw_of = |p: &Parser<'_>, span: &Span| p.source_slice(span.start.index, span.end.index);
        let (span, value, raw, regex, bigint) = match lit {
            Expression::StringLiteral(lit) => (lit.span, LiteralValue::String(lit.value), lit.extra.raw, None, None),
            Expression::NumericLiteral(lit) => (lit.span, LiteralValue::Number(lit.value), lit.extra.raw, None, None),
            Expression::BooleanLiteral(lit) => {
                let raw = raw_of(p, &lit.span);
                (lit.span, LiteralValue::Boolean(lit.value), raw, None, None)
            }
            Expression::NullLiteral(lit) => {
                let raw = raw_of(p, &lit.span);
                (lit.span, LiteralValue::Null, raw, None, None)
            }
            Expression::RegExpLiteral(lit) => {
                let regex = RegExpValue {
                    pattern: lit.pattern,
                    flags: lit.flags,
                };
                (lit.span, LiteralValue::Null, lit.extra.raw, Some(regex), None)
            }
            Expression::BigIntLiteral(lit) => (lit.span, LiteralValue::Null, lit.extra.raw, None, Some(lit.value)),
            other => return other,
        };
        Expression::Literal(Literal {
            span,
            value,
            raw,
            regex,
            bigint,
        })
    }

    /// Directives become leading expression statements with a `directive`,
    /// and the node loses its `directives` key.
    fn finish_block_body(&self, p: &mut Parser<'_>, body: &mut Vec<Statement>, directives: &mut Option<Vec<Directive>>) {
        self.next.finish_block_body(p, body, directives);
        let Some(prologue) = directives.take() else {
            return;
        };
        body.splice(0..0, prologue.into_iter().map(directive_to_statement));
    }

    fn finish_object_member(&self, p: &mut Parser<'_>, member: ObjectMember) -> ObjectMember {
        match self.next.finish_object_member(p, member) {
            ObjectMember::ObjectProperty(prop) => ObjectMember::Property(Property {
                span: prop.span,
                key: prop.key,
                value: prop.value,
                kind: PropertyKind::Init,
                method: prop.method,
                shorthand: prop.shorthand,
                computed: prop.computed,
            }),
            ObjectMember::ObjectMethod(method) => {
                let kind = match method.kind {
                    MethodKind::Get => PropertyKind::Get,
                    MethodKind::Set => PropertyKind::Set,
                    MethodKind::Method | MethodKind::Constructor => PropertyKind::Init,
                };
                let value = function_expression(method.function, method.span.end);
                ObjectMember::Property(Property {
                    span: method.span,
                    key: method.key,
                    value: Box::new(value),
                    kind,
                    method: method.kind == MethodKind::Method,
                    shorthand: false,
                    computed: method.computed,
                })
            }
            other => other,
        }
    }

    fn to_assignable_object_member(
        &self,
        p: &mut Parser<'_>,
        member: ObjectMember,
        is_last: bool,
        is_lhs: bool,
    ) -> PResult<ObjectMember> {
        if let ObjectMember::Property(prop) = &member {
            let at = prop.key.span().start;
            if matches!(prop.kind, PropertyKind::Get | PropertyKind::Set) {
                p.raise(&PATTERN_HAS_ACCESSOR, at, &[])?;
                return Ok(member);
            }
            if prop.method {
                p.raise(&PATTERN_HAS_METHOD, at, &[])?;
                return Ok(member);
            }
        }
        self.next.to_assignable_object_member(p, member, is_last, is_lhs)
    }

    fn finish_class_member(&self, p: &mut Parser<'_>, member: ClassMember) -> PResult<ClassMember> {
        let member = self.next.finish_class_member(p, member)?;
        let class_features = p.plugins.class_features;
        Ok(match member {
            ClassMember::ClassMethod(method) => ClassMember::MethodDefinition(method_definition(method, false)),
            ClassMember::ClassPrivateMethod(method) => ClassMember::MethodDefinition(method_definition(method, true)),
            ClassMember::ClassProperty(prop) if class_features => ClassMember::PropertyDefinition(prop),
            ClassMember::ClassPrivateProperty(mut prop) if class_features => {
                prop.computed = false;
                ClassMember::PropertyDefinition(prop)
            }
            other => other,
        })
    }

    fn finish_private_name(&self, p: &mut Parser<'_>, name: PrivateName) -> Expression {
        if !p.plugins.class_features {
            return self.next.finish_private_name(p, name);
        }
        Expression::PrivateIdentifier(PrivateIdentifier {
            span: name.span,
            name: name.id.name,
        })
    }

    fn finish_call_expression(&self, p: &mut Parser<'_>, call: CallExpression, optional: bool) -> PResult<Expression> {
        match self.next.finish_call_expression(p, call, optional)? {
            Expression::CallExpression(call) if matches!(*call.callee, Expression::Import(_)) && !call.arguments.is_empty() => {
                let mut arguments = call.arguments.into_iter();
                let source = arguments.next().map(Box::new);
                let options = arguments.next().map(Box::new);
                match source {
                    Some(source) => Ok(Expression::ImportExpression(ImportExpression {
                        span: call.span,
                        source,
                        options,
                    })),
                    None => Err(p.unexpected(None)),
                }
            }
            other => Ok(other),
        }
    }

    /// Optional chains become plain members and calls under one
    /// `ChainExpression`, and every other member or call gets
    /// `optional: false`.
    fn parse_subscript(
        &self,
        p: &mut Parser<'_>,
        base: Expression,
        start: Position,
        no_calls: bool,
        st: &mut SubscriptState,
    ) -> PResult<Expression> {
        let node = self.next.parse_subscript(p, base, start, no_calls, st)?;
        if st.optional_chain_member {
            let node = match node {
                Expression::OptionalMemberExpression(member) => Expression::MemberExpression(member),
                Expression::OptionalCallExpression(call) => Expression::CallExpression(call),
                other => other,
            };
            if st.stop && (node.is_member() || matches!(node, Expression::CallExpression(_))) {
                return Ok(Expression::ChainExpression(ChainExpression {
                    span: *node.span(),
                    expression: Box::new(node),
                }));
            }
            return Ok(node);
        }
        Ok(match node {
            Expression::MemberExpression(mut member) => {
                member.optional.get_or_insert(false);
                Expression::MemberExpression(member)
            }
            Expression::CallExpression(mut call) => {
                call.optional.get_or_insert(false);
                Expression::CallExpression(call)
            }
            other => other,
        })
    }

    /// `export * as ns from "m"` is an `ExportAllDeclaration` with
    /// `exported` set.
    fn parse_export(&self, p: &mut Parser<'_>, start: Position) -> PResult<Statement> {
        let statement = self.next.parse_export(p, start)?;
        let Statement::ExportNamedDeclaration(mut decl) = statement else {
            return Ok(statement);
        };
        let namespace_only = decl.specifiers.len() == 1
            && matches!(decl.specifiers[0], ExportSpecifier::ExportNamespaceSpecifier(_))
            && decl.source.is_some();
        if !namespace_only {
            return Ok(Statement::ExportNamedDeclaration(decl));
        }
        match (decl.specifiers.pop(), decl.source) {
            (Some(ExportSpecifier::ExportNamespaceSpecifier(spec)), Some(source)) => {
                Ok(Statement::ExportAllDeclaration(ExportAllDeclaration {
                    span: decl.span,
                    source,
                    exported: Some(spec.exported),
                    export_kind: decl.export_kind,
                }))
            }
            _ => Err(p.unexpected_at(start, None)),
        }
    }
}

fn directive_to_statement(directive: Directive) -> Statement {
    let literal = directive.value;
    let raw = literal.extra.raw;
    let text = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default().to_string();
    Statement::ExpressionStatement(ExpressionStatement {
        span: directive.span,
        expression: Box::new(Expression::Literal(Literal {
            span: literal.span,
            value: LiteralValue::String(literal.expression_value),
            raw,
            regex: None,
            bigint: None,
        })),
        directive: Some(text),
    })
}

/// The `value` of a method: a function expression spanning its signature
/// and body.
fn function_expression(function: FunctionParts, end: Position) -> Expression {
    let start = function.params_start;
    Expression::FunctionExpression(Function {
        span: if end.index < start.index { Span::empty(start) } else { Span::new(start, end) },
        id: None,
        function,
        declare: false,
    })
}

fn method_definition(method: ClassMethod, private: bool) -> MethodDefinition {
    MethodDefinition {
        span: method.span,
        kind: method.kind,
        key: method.key,
        computed: method.computed && !private,
        is_static: method.is_static,
        modifiers: method.modifiers,
        value: Box::new(function_expression(method.function, method.span.end)),
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::{parse, parse_expression};
    use crate::options::ParserOptions;
    use quarry_ast::node::*;

    fn estree() -> ParserOptions {
        ParserOptions::default().with_plugin("estree")
    }

    #[test]
    fn test_literals_carry_raw() {
        let output = parse_expression("[1.50, 'a', true, null, /x/g, 10n]", &estree()).unwrap();
        let Expression::ArrayExpression(array) = output.expression else { panic!() };
        let literals: Vec<&Literal> = array
            .elements
            .iter()
            .flatten()
            .map(|e| match e {
                Expression::Literal(lit) => lit,
                other => panic!("not a literal: {}", other.type_name()),
            })
            .collect();
        assert_eq!(literals[0].raw, "1.50");
        assert_eq!(literals[1].value, LiteralValue::String("a".into()));
        assert_eq!(literals[2].raw, "true");
        assert_eq!(literals[3].value, LiteralValue::Null);
        assert_eq!(literals[4].regex.as_ref().map(|r| r.flags.as_str()), Some("g"));
        assert_eq!(literals[5].bigint.as_deref(), Some("10"));
    }

    #[test]
    fn test_directives_become_statements() {
        let output = parse("'use strict'; a;", &estree()).unwrap();
        let program = &output.file.program;
        assert!(program.directives.is_none());
        let Statement::ExpressionStatement(stmt) = &program.body[0] else { panic!() };
        assert_eq!(stmt.directive.as_deref(), Some("use strict"));
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_object_members_are_properties() {
        let output = parse_expression("({ a: 1, b() {}, get c() { return 1 } })", &estree()).unwrap();
        let Expression::ObjectExpression(object) = output.expression else { panic!() };
        let kinds: Vec<(PropertyKind, bool)> = object
            .properties
            .iter()
            .map(|m| match m {
                ObjectMember::Property(p) => (p.kind, p.method),
                _ => panic!("not a property"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![(PropertyKind::Init, false), (PropertyKind::Init, true), (PropertyKind::Get, false)]
        );
    }

    #[test]
    fn test_import_call_and_chain() {
        let output = parse_expression("import('m')", &estree()).unwrap();
        assert!(matches!(output.expression, Expression::ImportExpression(_)));

        let output = parse_expression("a?.b.c", &estree()).unwrap();
        let Expression::ChainExpression(chain) = output.expression else { panic!() };
        let Expression::MemberExpression(outer) = *chain.expression else { panic!() };
        assert_eq!(outer.optional, Some(false));
        let Expression::MemberExpression(inner) = *outer.object else { panic!() };
        assert_eq!(inner.optional, Some(true));
    }

    #[test]
    fn test_class_members() {
        let options = ParserOptions::default().with_plugin_options("estree", serde_json::json!({ "classFeatures": true }));
        let output = parse("class A { #x = 1; m() {} }", &options).unwrap();
        let Statement::ClassDeclaration(class) = &output.file.program.body[0] else { panic!() };
        let ClassMember::PropertyDefinition(prop) = &class.body.body[0] else { panic!() };
        assert!(matches!(*prop.key, Expression::PrivateIdentifier(_)));
        assert!(matches!(class.body.body[1], ClassMember::MethodDefinition(_)));
    }

    #[test]
    fn test_export_namespace_is_export_all() {
        let output = parse("export * as ns from 'm';", &ParserOptions::module().with_plugin("estree")).unwrap();
        let Statement::ExportAllDeclaration(decl) = &output.file.program.body[0] else { panic!() };
        assert!(decl.exported.is_some());
    }
}
