//! Class headers and members: type parameters, `implements`, member
//! modifiers, index signatures and the rules tying them together.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;

use super::modifiers::{Modified, TsModifier};
use super::types::TypeParamModifiers;
use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::utilities::ClassState;
use crate::PResult;

const CLASS_MEMBER_MODIFIERS: TsModifier = TsModifier::DECLARE
    .union(TsModifier::ACCESSIBILITY)
    .union(TsModifier::OVERRIDE)
    .union(TsModifier::ABSTRACT)
    .union(TsModifier::READONLY)
    .union(TsModifier::STATIC);

fn member_modifiers(modified: &Modified) -> ClassMemberModifiers {
    ClassMemberModifiers {
        accessibility: modified.accessibility,
        is_abstract: modified.has(TsModifier::ABSTRACT),
        is_override: modified.has(TsModifier::OVERRIDE),
        readonly: modified.has(TsModifier::READONLY),
        declare: modified.has(TsModifier::DECLARE),
        ..ClassMemberModifiers::default()
    }
}

fn member_name(key: &Expression) -> String {
    match key {
        Expression::Identifier(id) => id.name.clone(),
        Expression::PrivateName(name) => format!("#{}", name.id.name),
        other => other.string_value().unwrap_or_default().to_string(),
    }
}

impl Parser<'_> {
    /// `class A<T>`. A class expression may go straight to `implements`.
    pub(super) fn ts_parse_class_id(
        &mut self,
        next: &'static dyn Grammar,
        class: &mut Class,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<()> {
        if (!is_statement || optional_id) && self.is_contextual("implements") {
            return Ok(());
        }
        next.parse_class_id(self, class, is_statement, optional_id)?;
        class.type_parameters = self.ts_try_parse_type_parameters(TypeParamModifiers::InOutConst)?;
        Ok(())
    }

    /// `extends B<T> implements I, J`.
    pub(super) fn ts_parse_class_super(&mut self, next: &'static dyn Grammar, class: &mut Class) -> PResult<()> {
        next.parse_class_super(self, class)?;
        if class.super_class.is_some() {
            if self.is(TokenKind::LessThanLessThanToken) {
                self.rescan_lt();
            }
            if self.is(TokenKind::LessThanToken) {
                class.super_type_parameters = Some(self.ts_parse_type_arguments()?);
            }
        }
        if self.eat_contextual("implements")? {
            class.implements = self.ts_parse_heritage_clause("implements")?;
        }
        Ok(())
    }

    /// Reads member modifiers, then the member. `declare` members are
    /// parsed as ambient.
    pub(super) fn ts_parse_class_member(&mut self, body: &mut Vec<ClassMember>, st: &mut ClassState) -> PResult<()> {
        let start = self.start_pos();
        let modified = self.ts_parse_modifiers(
            CLASS_MEMBER_MODIFIERS,
            TsModifier::IN | TsModifier::OUT,
            true,
            &TS_INVALID_MODIFIER_ON_TYPE_PARAMETER_POSITIONS,
        )?;
        if modified.has(TsModifier::DECLARE) {
            self.ts_in_ambient_context(|p| p.ts_parse_modified_class_member(body, st, start, &modified))
        } else {
            self.ts_parse_modified_class_member(body, st, start, &modified)
        }
    }

    fn ts_parse_modified_class_member(
        &mut self,
        body: &mut Vec<ClassMember>,
        st: &mut ClassState,
        start: Position,
        modified: &Modified,
    ) -> PResult<()> {
        if self.ts_is_start_of_static_block() {
            self.next()?;
            self.next()?;
            if !modified.is_empty() {
                self.raise(&TS_STATIC_BLOCK_CANNOT_HAVE_MODIFIER, start, &[])?;
            }
            return self.parse_class_static_block(body, start);
        }

        let modifiers = member_modifiers(modified);
        let is_static = modified.has(TsModifier::STATIC);
        if let Some(index) = self.ts_try_parse_index_signature(start, modifiers.readonly, is_static)? {
            if modifiers.is_abstract {
                self.raise(&TS_INDEX_SIGNATURE_HAS_ABSTRACT, start, &[])?;
            }
            if let Some(accessibility) = modifiers.accessibility {
                self.raise(&TS_INDEX_SIGNATURE_HAS_ACCESSIBILITY, start, &[accessibility.as_str()])?;
            }
            if modifiers.declare {
                self.raise(&TS_INDEX_SIGNATURE_HAS_DECLARE, start, &[])?;
            }
            if modifiers.is_override {
                self.raise(&TS_INDEX_SIGNATURE_HAS_OVERRIDE, start, &[])?;
            }
            body.push(ClassMember::TSIndexSignature(index));
            return Ok(());
        }

        if modifiers.is_abstract && !self.state.in_abstract_class {
            self.raise(&TS_NON_ABSTRACT_CLASS_HAS_ABSTRACT_METHOD, start, &[])?;
        }
        if modifiers.is_override && !st.had_super_class {
            self.raise(&TS_OVERRIDE_NOT_IN_SUBCLASS, start, &[])?;
        }
        self.parse_class_member_with_is_static(body, st, start, is_static, modifiers)
    }

    /// `?` after a member name, and modifiers that only fit fields.
    pub(super) fn ts_parse_post_member_name_modifiers(
        &mut self,
        modifiers: &mut ClassMemberModifiers,
        start: Position,
    ) -> PResult<()> {
        if self.eat(TokenKind::QuestionToken)? {
            modifiers.optional = true;
        }
        if self.is(TokenKind::OpenParenToken) {
            if modifiers.readonly {
                self.raise(&TS_CLASS_METHOD_HAS_READONLY, start, &[])?;
            }
            if modifiers.declare {
                self.raise(&TS_CLASS_METHOD_HAS_DECLARE, start, &[])?;
            }
        }
        Ok(())
    }

    /// Rules that need the whole member.
    pub(super) fn ts_check_class_member(&mut self, member: &ClassMember) -> PResult<()> {
        match member {
            ClassMember::ClassMethod(method)
            | ClassMember::ClassPrivateMethod(method)
            | ClassMember::TSDeclareMethod(method) => {
                let start = method.span.start;
                let mods = &method.modifiers;
                if mods.declare && matches!(method.kind, MethodKind::Get | MethodKind::Set) {
                    let kind = if method.kind == MethodKind::Get { "get" } else { "set" };
                    self.raise(&TS_DECLARE_ACCESSOR, start, &[kind])?;
                }
                if mods.is_abstract && method.function.body.is_some() {
                    self.raise(&TS_ABSTRACT_METHOD_HAS_IMPLEMENTATION, start, &[&member_name(&method.key)])?;
                }
                if matches!(*method.key, Expression::PrivateName(_)) {
                    self.ts_check_private_member(start, mods)?;
                }
            }
            ClassMember::ClassProperty(property) | ClassMember::ClassPrivateProperty(property) => {
                let mods = &property.modifiers;
                if let Some(value) = &property.value {
                    let at = value.span().start;
                    if self.state.is_ambient_context && !(mods.readonly && property.type_annotation.is_none()) {
                        self.raise(&TS_DECLARE_CLASS_FIELD_HAS_INITIALIZER, at, &[])?;
                    }
                    if mods.is_abstract {
                        self.raise(&TS_ABSTRACT_PROPERTY_HAS_INITIALIZER, at, &[&member_name(&property.key)])?;
                    }
                }
                if matches!(member, ClassMember::ClassPrivateProperty(_)) {
                    self.ts_check_private_member(property.span.start, mods)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn ts_check_private_member(&mut self, start: Position, mods: &ClassMemberModifiers) -> PResult<()> {
        if mods.is_abstract {
            self.raise(&TS_PRIVATE_ELEMENT_HAS_ABSTRACT, start, &[])?;
        }
        if let Some(accessibility) = mods.accessibility {
            self.raise(&TS_PRIVATE_ELEMENT_HAS_ACCESSIBILITY, start, &[accessibility.as_str()])?;
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
    use quarry_diagnostics::DiagnosticMessage;

    fn ts() -> ParserOptions {
        ParserOptions::module().with_plugin("typescript")
    }

    fn class(source: &str) -> Class {
        let output = parse(source, &ts()).unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        match output.file.program.body.into_iter().next() {
            Some(Statement::ClassDeclaration(class)) => class,
            other => panic!("expected a class, got {other:?}"),
        }
    }

    fn reports(source: &str, message: &DiagnosticMessage) -> bool {
        let output = parse(source, &ts().with_error_recovery()).unwrap();
        output.errors.iter().any(|e| e.is(message))
    }

    #[test]
    fn test_class_heritage() {
        let class = class("class A<T> extends B<T> implements I, J<T> {}");
        assert_eq!(class.type_parameters.map(|t| t.params.len()), Some(1));
        assert!(class.super_type_parameters.is_some());
        assert_eq!(class.implements.len(), 2);
    }

    #[test]
    fn test_class_expression_implements_without_name() {
        let output = parse("x = class implements I {};", &ts()).unwrap();
        assert!(output.errors.is_empty());
    }

    #[test]
    fn test_member_modifiers_and_markers() {
        let class = class("class A { private static readonly x?: number; y!: string; m?(): void; }");
        match &class.body.body[0] {
            ClassMember::ClassProperty(property) => {
                assert_eq!(property.modifiers.accessibility, Some(Accessibility::Private));
                assert!(property.is_static);
                assert!(property.modifiers.readonly);
                assert!(property.modifiers.optional);
            }
            other => panic!("expected property, got {other:?}"),
        }
        assert!(matches!(&class.body.body[1], ClassMember::ClassProperty(p) if p.modifiers.definite));
        assert!(matches!(&class.body.body[2], ClassMember::TSDeclareMethod(m) if m.modifiers.optional));
    }

    #[test]
    fn test_index_signatures() {
        let class = class("class A { [key: string]: number; static readonly [k: string]: any }");
        assert!(matches!(&class.body.body[1], ClassMember::TSIndexSignature(s) if s.is_static && s.readonly));
        assert!(reports("class A { public [k: string]: any }", &TS_INDEX_SIGNATURE_HAS_ACCESSIBILITY));
        assert!(reports("class A { declare [k: string]: any }", &TS_INDEX_SIGNATURE_HAS_DECLARE));
    }

    #[test]
    fn test_abstract_members() {
        class("abstract class A { abstract m(): void; abstract x: number; }");
        assert!(reports("class A { abstract m(): void }", &TS_NON_ABSTRACT_CLASS_HAS_ABSTRACT_METHOD));
        assert!(reports("abstract class A { abstract m() {} }", &TS_ABSTRACT_METHOD_HAS_IMPLEMENTATION));
        assert!(reports("abstract class A { abstract x = 1 }", &TS_ABSTRACT_PROPERTY_HAS_INITIALIZER));
    }

    #[test]
    fn test_override_needs_superclass() {
        class("class A extends B { override m() {} }");
        assert!(reports("class A { override m() {} }", &TS_OVERRIDE_NOT_IN_SUBCLASS));
    }

    #[test]
    fn test_static_block_modifiers() {
        class("class A { static { init(); } }");
        assert!(reports("class A { public static { } }", &TS_STATIC_BLOCK_CANNOT_HAVE_MODIFIER));
    }

    #[test]
    fn test_field_only_modifiers_on_methods() {
        assert!(reports("class A { readonly m() {} }", &TS_CLASS_METHOD_HAS_READONLY));
        assert!(reports("class A { declare m() }", &TS_CLASS_METHOD_HAS_DECLARE));
    }

    #[test]
    fn test_ambient_field_initializers() {
        assert!(reports("class A { declare x = 1 }", &TS_DECLARE_CLASS_FIELD_HAS_INITIALIZER));
        assert!(!reports("declare class A { readonly x = 1 }", &TS_DECLARE_CLASS_FIELD_HAS_INITIALIZER));
    }

    #[test]
    fn test_private_elements() {
        assert!(reports("class A { private #x = 1 }", &TS_PRIVATE_ELEMENT_HAS_ACCESSIBILITY));
    }

    #[test]
    fn test_constructor_overloads() {
        let class = class("class A { constructor(a: string); constructor(a: any) {} }");
        assert!(matches!(class.body.body[0], ClassMember::TSDeclareMethod(_)));
        assert!(matches!(class.body.body[1], ClassMember::ClassMethod(_)));
    }
}
