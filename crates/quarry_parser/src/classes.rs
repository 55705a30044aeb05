//! Class declarations, expressions and bodies.
//!
//! Class code is always strict. Members are parsed in two steps: the
//! element name with whatever modifiers precede it, then the tail that
//! decides between method, accessor and field. Layers add modifiers and
//! annotations through the member hooks without touching the dispatch.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::TSTypeAnnotation;
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::*;
use quarry_scope::{BindingFlags, ClassElementFlags, ParamFlags, ScopeFlags};

use crate::parser::Parser;
use crate::utilities::{ClassState, FunctionKind};
use crate::PResult;

/// Everything known about a member once its name has been read.
struct MemberHead {
    start: Position,
    key: Expression,
    computed: bool,
    is_static: bool,
    is_private: bool,
    modifiers: ClassMemberModifiers,
}

impl Parser<'_> {
    /// Parses a class starting at `class`.
    pub(crate) fn parse_class(&mut self, start: Position, is_statement: bool, optional_id: bool) -> PResult<Class> {
        self.parse_class_from(start, empty_class(), is_statement, optional_id)
    }

    /// Like [`Self::parse_class`], for a class whose leading modifiers
    /// (`declare`, `abstract`) were already read into `class`.
    pub(crate) fn parse_class_from(
        &mut self,
        start: Position,
        mut class: Class,
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<Class> {
        self.expect(TokenKind::ClassKeyword)?;
        let old_strict = self.state.strict;
        self.state.strict = true;
        let old_abstract = std::mem::replace(&mut self.state.in_abstract_class, class.is_abstract);

        let result = self.parse_class_parts(&mut class, is_statement, optional_id, old_strict);
        self.state.in_abstract_class = old_abstract;
        result?;
        class.span = self.span_from(start);
        Ok(class)
    }

    fn parse_class_parts(
        &mut self,
        class: &mut Class,
        is_statement: bool,
        optional_id: bool,
        old_strict: bool,
    ) -> PResult<()> {
        self.parse_class_id(class, is_statement, optional_id)?;
        self.parse_class_super(class)?;
        class.body = self.parse_class_body(class.super_class.is_some(), old_strict)?;
        Ok(())
    }

    pub(crate) fn base_parse_class_id(&mut self, class: &mut Class, is_statement: bool, optional_id: bool) -> PResult<()> {
        if self.is(TokenKind::Identifier) {
            let id = self.parse_identifier(false)?;
            if is_statement {
                let binding = if class.declare {
                    BindingFlags::TS_AMBIENT
                } else {
                    BindingFlags::CLASS
                };
                let errors = self.state.scope.declare_name(&id.name, binding, id.span.start);
                self.raise_all(errors)?;
            }
            class.id = Some(id);
            return Ok(());
        }
        if is_statement && !optional_id {
            return Err(MISSING_CLASS_NAME.at(self.start_pos(), &[]));
        }
        Ok(())
    }

    pub(crate) fn base_parse_class_super(&mut self, class: &mut Class) -> PResult<()> {
        if self.eat(TokenKind::ExtendsKeyword)? {
            class.super_class = Some(Box::new(self.parse_expr_subscripts(None)?));
        }
        Ok(())
    }

    fn parse_class_body(&mut self, had_super_class: bool, old_strict: bool) -> PResult<ClassBody> {
        self.state.class_scope.enter();
        let start = self.start_pos();
        self.expect(TokenKind::OpenBraceToken)?;

        let mut state = ClassState {
            had_constructor: false,
            had_super_class,
        };
        let mut members = Vec::new();
        while !self.is(TokenKind::CloseBraceToken) {
            if self.eat(TokenKind::SemicolonToken)? {
                continue;
            }
            if self.is(TokenKind::AtToken) {
                return Err(self.unexpected(None));
            }
            self.parse_class_member(&mut members, &mut state)?;
        }

        self.state.strict = old_strict;
        self.next()?;
        let errors = self.state.class_scope.exit();
        self.raise_all(errors)?;
        tracing::trace!(members = members.len(), "class body");

        Ok(ClassBody {
            span: self.span_from(start),
            body: members,
        })
    }

    pub(crate) fn base_parse_class_member(&mut self, body: &mut Vec<ClassMember>, st: &mut ClassState) -> PResult<()> {
        let start = self.start_pos();
        let mut is_static = false;
        if self.is_contextual("static") {
            if self.parse_class_member_from_modifier(body, start)? {
                return Ok(());
            }
            if self.eat(TokenKind::OpenBraceToken)? {
                return self.parse_class_static_block(body, start);
            }
            is_static = true;
        }
        self.parse_class_member_with_is_static(body, st, start, is_static, ClassMemberModifiers::default())
    }

    /// A modifier word used as the member name itself, as in `static() {}`
    /// or `static = 1`. Consumes the word either way.
    pub(crate) fn parse_class_member_from_modifier(
        &mut self,
        body: &mut Vec<ClassMember>,
        start: Position,
    ) -> PResult<bool> {
        let key = Expression::Identifier(self.parse_identifier(true)?);
        let head = MemberHead {
            start,
            key,
            computed: false,
            is_static: false,
            is_private: false,
            modifiers: ClassMemberModifiers::default(),
        };
        if self.is_class_method() {
            self.push_class_method(body, head, MethodKind::Method, false, false, false, false)?;
            Ok(true)
        } else if self.is_class_property() {
            self.push_class_property(body, head)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `static { ... }` after the opening brace.
    pub(crate) fn parse_class_static_block(&mut self, body: &mut Vec<ClassMember>, start: Position) -> PResult<()> {
        self.state.scope.enter(ScopeFlags::CLASS | ScopeFlags::STATIC_BLOCK | ScopeFlags::SUPER);
        let old_labels = std::mem::take(&mut self.state.labels);
        self.state.prod_param.enter(ParamFlags::empty());

        let mut statements = Vec::new();
        let mut directives = None;
        let result = self.parse_block_body(
            &mut statements,
            &mut directives,
            false,
            false,
            TokenKind::CloseBraceToken,
            |_, _| Ok(()),
        );

        self.state.prod_param.exit();
        self.state.scope.exit();
        self.state.labels = old_labels;
        result?;

        body.push(ClassMember::StaticBlock(StaticBlock {
            span: self.span_from(start),
            body: statements,
        }));
        Ok(())
    }

    /// The member after any modifiers: name, then method, accessor or
    /// field.
    pub(crate) fn parse_class_member_with_is_static(
        &mut self,
        body: &mut Vec<ClassMember>,
        st: &mut ClassState,
        start: Position,
        is_static: bool,
        modifiers: ClassMemberModifiers,
    ) -> PResult<()> {
        if self.eat(TokenKind::AsteriskToken)? {
            let head = self.parse_member_head(start, is_static, modifiers)?;
            if !head.is_private && is_nonstatic_constructor(&head) {
                self.raise(&CONSTRUCTOR_IS_GENERATOR, head.key.span().start, &[])?;
            }
            return self.push_class_method(body, head, MethodKind::Method, true, false, false, false);
        }

        let is_contextual = !self.state.tok.contains_esc && self.is(TokenKind::Identifier);
        let mut head = self.parse_member_head(start, is_static, modifiers)?;
        let contextual_word = match (&head.key, is_contextual) {
            (Expression::Identifier(id), true) => Some(id.name.clone()),
            _ => None,
        };
        let question_at = self.start_pos();
        self.parse_post_member_name_modifiers(&mut head.modifiers, question_at)?;

        if self.is_class_method() {
            if head.is_private {
                return self.push_class_method(body, head, MethodKind::Method, false, false, false, false);
            }
            let is_constructor = is_nonstatic_constructor(&head);
            let mut allow_direct_super = false;
            if is_constructor {
                if st.had_constructor && !self.is_typescript() {
                    self.raise(&DUPLICATE_CONSTRUCTOR, head.key.span().start, &[])?;
                }
                st.had_constructor = true;
                allow_direct_super = st.had_super_class;
            }
            let kind = if is_constructor { MethodKind::Constructor } else { MethodKind::Method };
            return self.push_class_method(body, head, kind, false, false, is_constructor, allow_direct_super);
        }

        if self.is_class_property() {
            return self.push_class_property(body, head);
        }

        match contextual_word.as_deref() {
            Some("async") if !self.can_insert_semicolon() => {
                let generator = self.eat(TokenKind::AsteriskToken)?;
                if head.modifiers.optional {
                    return Err(self.unexpected_at(question_at, None));
                }
                let mut head = self.parse_member_head(start, is_static, head.modifiers)?;
                let at = self.start_pos();
                self.parse_post_member_name_modifiers(&mut head.modifiers, at)?;
                if !head.is_private && is_nonstatic_constructor(&head) {
                    self.raise(&CONSTRUCTOR_IS_ASYNC, head.key.span().start, &[])?;
                }
                self.push_class_method(body, head, MethodKind::Method, generator, true, false, false)
            }
            Some(word @ ("get" | "set"))
                if !(self.is(TokenKind::AsteriskToken) && self.can_insert_semicolon()) =>
            {
                let kind = if word == "get" { MethodKind::Get } else { MethodKind::Set };
                let head = self.parse_member_head(start, is_static, head.modifiers)?;
                if !head.is_private && is_nonstatic_constructor(&head) {
                    self.raise(&CONSTRUCTOR_IS_ACCESSOR, head.key.span().start, &[])?;
                }
                if self.is(TokenKind::AsteriskToken) {
                    let at = self.start_pos();
                    self.raise(&ACCESSOR_IS_GENERATOR, at, &[word])?;
                    self.next()?;
                }
                self.push_class_method(body, head, kind, false, false, false, false)
            }
            Some("accessor") if !self.can_insert_semicolon() => {
                Err(self.missing_plugin(head.start, &["decoratorAutoAccessors"]))
            }
            _ if self.can_insert_semicolon() => self.push_class_property(body, head),
            _ => Err(self.unexpected(None)),
        }
    }

    /// Reads a member name. Private names are checked here since they
    /// bypass the property-name production.
    fn parse_member_head(
        &mut self,
        start: Position,
        is_static: bool,
        modifiers: ClassMemberModifiers,
    ) -> PResult<MemberHead> {
        let at = self.start_pos();
        let kind = self.cur();
        if matches!(kind, TokenKind::Identifier | TokenKind::StringLiteral) && is_static && self.cur_str() == "prototype" {
            self.raise(&STATIC_PROTOTYPE, at, &[])?;
        }
        if kind == TokenKind::PrivateName {
            if self.cur_str() == "constructor" {
                self.raise(&CONSTRUCTOR_CLASS_PRIVATE_FIELD, at, &[])?;
            }
            let key = self.parse_private_name()?;
            return Ok(MemberHead {
                start,
                key,
                computed: false,
                is_static,
                is_private: true,
                modifiers,
            });
        }
        let (key, computed) = self.parse_property_name(None)?;
        Ok(MemberHead {
            start,
            key,
            computed,
            is_static,
            is_private: false,
            modifiers,
        })
    }

    pub(crate) fn base_parse_post_member_name_modifiers(
        &mut self,
        _modifiers: &mut ClassMemberModifiers,
        _start: Position,
    ) -> PResult<()> {
        Ok(())
    }

    pub(crate) fn base_is_class_method(&mut self) -> bool {
        self.is(TokenKind::OpenParenToken)
    }

    pub(crate) fn base_is_class_property(&mut self) -> bool {
        matches!(
            self.cur(),
            TokenKind::EqualsToken | TokenKind::SemicolonToken | TokenKind::CloseBraceToken
        )
    }

    // ========================================================================
    // Methods
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn push_class_method(
        &mut self,
        body: &mut Vec<ClassMember>,
        head: MemberHead,
        kind: MethodKind,
        generator: bool,
        is_async: bool,
        is_constructor: bool,
        allow_direct_super: bool,
    ) -> PResult<()> {
        let type_parameters = self.parse_maybe_type_parameters(false)?;
        if let (true, Some(params)) = (is_constructor, &type_parameters) {
            self.raise(&TS_CONSTRUCTOR_HAS_TYPE_PARAMETERS, params.span.start, &[])?;
        }
        let function_kind = if head.is_private {
            FunctionKind::ClassPrivateMethod
        } else {
            FunctionKind::ClassMethod
        };
        let function = self.parse_method(
            generator,
            is_async,
            is_constructor,
            allow_direct_super,
            type_parameters,
            function_kind,
        )?;
        self.check_getter_setter_params(kind, &function, head.start)?;

        // Overload signatures share the name of the implementation.
        if head.is_private && function.body.is_some() {
            let element = match kind {
                MethodKind::Get => ClassElementFlags::GETTER,
                MethodKind::Set => ClassElementFlags::SETTER,
                _ => ClassElementFlags::OTHER,
            };
            let element = if head.is_static && element != ClassElementFlags::OTHER {
                element | ClassElementFlags::STATIC
            } else {
                element
            };
            self.declare_private_member(&head.key, element)?;
        }

        let bodiless = function.body.is_none();
        let method = ClassMethod {
            span: self.span_from(head.start),
            kind,
            key: Box::new(head.key),
            computed: head.computed,
            is_static: head.is_static,
            modifiers: head.modifiers,
            function,
        };
        let member = if bodiless {
            ClassMember::TSDeclareMethod(method)
        } else if head.is_private {
            ClassMember::ClassPrivateMethod(method)
        } else {
            ClassMember::ClassMethod(method)
        };
        let member = self.finish_class_member(member)?;
        body.push(member);
        Ok(())
    }

    // ========================================================================
    // Fields
    // ========================================================================

    fn push_class_property(&mut self, body: &mut Vec<ClassMember>, mut head: MemberHead) -> PResult<()> {
        if !head.computed && !head.is_private && is_constructor_key(&head.key) {
            self.raise(&CONSTRUCTOR_CLASS_FIELD, head.key.span().start, &[])?;
        }
        let type_annotation = self.parse_class_property_annotation(&mut head.modifiers)?;
        let value = self.parse_class_field_initializer()?;
        self.semicolon(true)?;

        if head.is_private {
            self.declare_private_member(&head.key, ClassElementFlags::OTHER)?;
        }

        let property = ClassProperty {
            span: self.span_from(head.start),
            key: Box::new(head.key),
            value,
            computed: head.computed,
            is_static: head.is_static,
            modifiers: head.modifiers,
            type_annotation,
        };
        let member = if head.is_private {
            ClassMember::ClassPrivateProperty(property)
        } else {
            ClassMember::ClassProperty(property)
        };
        let member = self.finish_class_member(member)?;
        body.push(member);
        Ok(())
    }

    pub(crate) fn base_parse_class_property_annotation(
        &mut self,
        _modifiers: &mut ClassMemberModifiers,
    ) -> PResult<Option<Box<TSTypeAnnotation>>> {
        Ok(None)
    }

    /// `= value` of a field. The initializer sees the class as its `this`
    /// and may use `super` property access but neither `await` nor `yield`.
    fn parse_class_field_initializer(&mut self) -> PResult<Option<Box<Expression>>> {
        if !self.eat(TokenKind::EqualsToken)? {
            return Ok(None);
        }
        self.state.scope.enter(ScopeFlags::CLASS | ScopeFlags::SUPER);
        self.state.prod_param.enter(ParamFlags::empty());
        let value = self.parse_maybe_assign_allow_in();
        self.state.prod_param.exit();
        self.state.scope.exit();
        Ok(Some(Box::new(value?)))
    }

    pub(crate) fn base_finish_class_member(&mut self, member: ClassMember) -> PResult<ClassMember> {
        Ok(member)
    }

    fn declare_private_member(&mut self, key: &Expression, element: ClassElementFlags) -> PResult<()> {
        let (name, at) = match key {
            Expression::PrivateName(name) => (name.id.name.as_str(), name.span.start),
            Expression::PrivateIdentifier(id) => (id.name.as_str(), id.span.start),
            _ => return Ok(()),
        };
        match self.state.class_scope.declare_private_name(name, element, at) {
            Some(error) => self.raise_all(vec![error]),
            None => Ok(()),
        }
    }
}

pub(crate) fn empty_class() -> Class {
    Class {
        span: Span::default(),
        id: None,
        super_class: None,
        body: ClassBody {
            span: Span::default(),
            body: Vec::new(),
        },
        type_parameters: None,
        super_type_parameters: None,
        implements: Vec::new(),
        is_abstract: false,
        declare: false,
    }
}

/// `constructor` or `"constructor"` as an uncomputed key.
fn is_constructor_key(key: &Expression) -> bool {
    match key {
        Expression::Identifier(id) => id.name == "constructor",
        other => other.string_value() == Some("constructor"),
    }
}

fn is_nonstatic_constructor(head: &MemberHead) -> bool {
    !head.computed && !head.is_static && is_constructor_key(&head.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use quarry_diagnostics::ParseError;

    fn class_body(source: &str) -> Result<(Vec<ClassMember>, Vec<ParseError>), ParseError> {
        let options = ParserOptions::default().with_error_recovery();
        let chars: Vec<char> = source.chars().collect();
        let plugins = options.plugin_set()?;
        let mut p = Parser::new(&chars, &options, plugins, false);
        let file = p.parse_top_level()?;
        let class = match file.program.body.into_iter().next() {
            Some(Statement::ClassDeclaration(class)) => class,
            other => panic!("expected a class, got {other:?}"),
        };
        Ok((class.body.body, p.state.errors.errors().to_vec()))
    }

    #[test]
    fn test_member_kinds() {
        let (members, errors) = class_body(
            "class A extends B { constructor() { super(); } static x = 1; #y; get z() { return 1 } \
             set z(v) {} async *gen() {} static { this.q = 1; } 'quoted'() {} [k] = 2 }",
        )
        .unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(members.len(), 9);
        let ClassMember::ClassMethod(ctor) = &members[0] else {
            panic!("expected constructor");
        };
        assert_eq!(ctor.kind, MethodKind::Constructor);
        assert!(matches!(members[2], ClassMember::ClassPrivateProperty(_)));
        assert!(matches!(members[6], ClassMember::StaticBlock(_)));
    }

    #[test]
    fn test_modifier_words_as_names() {
        let (members, errors) = class_body("class A { static() {} get = 1; async; static static() {} }").unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(members.len(), 4);
        let ClassMember::ClassMethod(last) = &members[3] else {
            panic!("expected method");
        };
        assert!(last.is_static);
    }

    #[test]
    fn test_constructor_rules() {
        let (_, errors) = class_body("class A { constructor() {} constructor() {} }").unwrap();
        assert!(errors[0].is(&DUPLICATE_CONSTRUCTOR));

        let (_, errors) = class_body("class A { get constructor() {} }").unwrap();
        assert!(errors[0].is(&CONSTRUCTOR_IS_ACCESSOR));

        let (_, errors) = class_body("class A { constructor = 1 }").unwrap();
        assert!(errors[0].is(&CONSTRUCTOR_CLASS_FIELD));

        let (_, errors) = class_body("class A { static prototype() {} }").unwrap();
        assert!(errors[0].is(&STATIC_PROTOTYPE));
    }

    #[test]
    fn test_super_call_needs_derived_constructor() {
        let (_, errors) = class_body("class A { constructor() { super(); } }").unwrap();
        assert!(errors[0].is(&SUPER_NOT_ALLOWED));
    }

    #[test]
    fn test_private_names() {
        let (_, errors) = class_body("class A { #a; #a; }").unwrap();
        assert!(errors[0].is(&PRIVATE_NAME_REDECLARATION));

        let (_, errors) = class_body("class A { get #a() {} set #a(v) {} m() { this.#b } }").unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is(&INVALID_PRIVATE_FIELD_RESOLUTION));
    }

    #[test]
    fn test_class_body_is_strict() {
        let (_, errors) = class_body("class A { m() { with (a) {} } }").unwrap();
        assert!(errors[0].is(&STRICT_WITH));
    }

    #[test]
    fn test_missing_class_name() {
        let err = class_body("class {}").unwrap_err();
        assert!(err.is(&MISSING_CLASS_NAME));
    }
}
