//! Type-level and ambient declarations: enums, interfaces, type aliases,
//! namespaces, `declare` forms and `abstract class`.
//!
//! Most of these start with a contextual word that the core grammar has
//! already read as an identifier expression by the time the layer sees
//! it, so they are recognised from the expression-statement hook.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::*;
use quarry_core::text::{Position, Span};
use quarry_diagnostics::messages::*;
use quarry_scope::{BindingFlags, ParamFlags, ScopeFlags};

use super::types::TypeParamModifiers;
use crate::classes::empty_class;
use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::utilities::StatementContext;
use crate::PResult;

/// Whether a declaration word is already consumed or still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Word {
    Consumed,
    Current,
}

impl Parser<'_> {
    pub(crate) fn ts_in_ambient_context<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let old = std::mem::replace(&mut self.state.is_ambient_context, true);
        let result = f(self);
        self.state.is_ambient_context = old;
        result
    }

    /// `const enum`, `enum` and `interface` at statement start.
    pub(super) fn ts_parse_statement_content(
        &mut self,
        next: &'static dyn Grammar,
        ctx: StatementContext,
        top_level: bool,
    ) -> PResult<Statement> {
        let start = self.start_pos();
        if self.is(TokenKind::ConstKeyword) && self.is_lookahead_contextual("enum") {
            self.next()?;
            return self.ts_parse_enum_declaration(start, true, false);
        }
        if self.is_contextual("enum") {
            return self.ts_parse_enum_declaration(start, false, false);
        }
        if self.is_contextual("interface") {
            if let Some(interface) = self.ts_parse_interface_declaration(start, false)? {
                return Ok(interface);
            }
        }
        next.parse_statement_content(self, ctx, top_level)
    }

    /// A lone identifier statement may really be a declaration keyword.
    pub(super) fn ts_parse_expression_statement(
        &mut self,
        next: &'static dyn Grammar,
        start: Position,
        expr: Expression,
    ) -> PResult<Statement> {
        if let Expression::Identifier(id) = &expr {
            let declaration = match id.name.as_str() {
                "declare" => self.ts_try_parse_declare(start)?,
                "global" if self.is(TokenKind::OpenBraceToken) => {
                    let body = self.ts_parse_module_block()?;
                    Some(Statement::TSModuleDeclaration(TSModuleDeclaration {
                        span: self.span_from(start),
                        id: Box::new(expr.clone()),
                        body: Some(TSModuleBody::TSModuleBlock(body)),
                        kind: TSModuleKind::Global,
                        declare: false,
                    }))
                }
                word => {
                    let word = word.to_string();
                    self.ts_parse_declaration(start, &word, Word::Consumed)?
                }
            };
            if let Some(declaration) = declaration {
                tracing::trace!(at = start.index, "declaration from identifier statement");
                return Ok(declaration);
            }
        }
        next.parse_expression_statement(self, start, expr)
    }

    /// Whether the current token can begin a TypeScript-only declaration.
    pub(super) fn ts_is_declaration_start(&self) -> bool {
        ["abstract", "declare", "enum", "interface", "module", "namespace", "type"]
            .iter()
            .any(|word| self.is_contextual(word))
    }

    /// The declaration after a contextual word. With [`Word::Current`]
    /// the word is still the current token and is consumed only if a
    /// declaration follows on the same line.
    pub(super) fn ts_parse_declaration(
        &mut self,
        start: Position,
        word: &str,
        position: Word,
    ) -> PResult<Option<Statement>> {
        if position == Word::Current {
            return self.try_parse_or_rewind(|p| {
                if p.has_following_line_break() {
                    return Ok(None);
                }
                p.next()?;
                p.ts_parse_declaration_after(start, word)
            });
        }
        if self.is(TokenKind::SemicolonToken) || self.can_insert_semicolon() {
            return Ok(None);
        }
        self.ts_parse_declaration_after(start, word)
    }

    fn ts_parse_declaration_after(&mut self, start: Position, word: &str) -> PResult<Option<Statement>> {
        let is_identifier = self.is(TokenKind::Identifier);
        match word {
            "abstract" if self.is(TokenKind::ClassKeyword) || is_identifier => {
                self.ts_parse_abstract_declaration(start).map(Some)
            }
            "module" if self.is(TokenKind::StringLiteral) => {
                self.ts_parse_ambient_external_module(start).map(Some)
            }
            "module" if is_identifier => self
                .ts_parse_namespace_declaration(start, TSModuleKind::Module, false)
                .map(|module| Some(Statement::TSModuleDeclaration(module))),
            "namespace" if is_identifier => self
                .ts_parse_namespace_declaration(start, TSModuleKind::Namespace, false)
                .map(|module| Some(Statement::TSModuleDeclaration(module))),
            "type" if is_identifier => self.ts_parse_type_alias(start, false).map(Some),
            _ => Ok(None),
        }
    }

    /// After `declare`. Everything in the declaration is ambient.
    fn ts_try_parse_declare(&mut self, start: Position) -> PResult<Option<Statement>> {
        if self.is(TokenKind::SemicolonToken) || self.can_insert_semicolon() {
            return Ok(None);
        }
        self.ts_in_ambient_context(|p| {
            let declaration = match p.cur() {
                TokenKind::FunctionKeyword => {
                    p.next()?;
                    let mut function = p.parse_function(start, true, false, false, false)?;
                    function.declare = true;
                    Some(crate::statement::function_statement(function))
                }
                TokenKind::ClassKeyword => {
                    let mut class = empty_class();
                    class.declare = true;
                    Some(Statement::ClassDeclaration(p.parse_class_from(start, class, true, false)?))
                }
                TokenKind::ConstKeyword if p.is_lookahead_contextual("enum") => {
                    p.next()?;
                    Some(p.ts_parse_enum_declaration(start, true, true)?)
                }
                TokenKind::ConstKeyword | TokenKind::VarKeyword => {
                    let kind = if p.is(TokenKind::ConstKeyword) {
                        VariableKind::Const
                    } else {
                        VariableKind::Var
                    };
                    Some(p.ts_parse_declared_var(start, kind)?)
                }
                TokenKind::Identifier if p.is_contextual("let") => Some(p.ts_parse_declared_var(start, VariableKind::Let)?),
                TokenKind::Identifier if p.is_contextual("enum") => Some(p.ts_parse_enum_declaration(start, false, true)?),
                TokenKind::Identifier if p.is_contextual("global") => Some(p.ts_parse_ambient_external_module(start)?),
                TokenKind::Identifier if p.is_contextual("interface") => p.ts_parse_interface_declaration(start, true)?,
                TokenKind::Identifier => {
                    let word = p.cur_str().to_string();
                    p.ts_parse_declaration(start, &word, Word::Current)?
                }
                _ => None,
            };
            Ok(declaration.map(|mut declaration| {
                set_declare(&mut declaration);
                declaration
            }))
        })
    }

    fn ts_parse_declared_var(&mut self, start: Position, kind: VariableKind) -> PResult<Statement> {
        let mut declaration = self.parse_var_statement(start, kind, true)?;
        declaration.declare = true;
        Ok(Statement::VariableDeclaration(declaration))
    }

    /// `abstract class` at the `class` keyword.
    fn ts_parse_abstract_declaration(&mut self, start: Position) -> PResult<Statement> {
        if self.is(TokenKind::ClassKeyword) {
            let mut class = empty_class();
            class.is_abstract = true;
            return Ok(Statement::ClassDeclaration(self.parse_class_from(start, class, true, false)?));
        }
        if self.is_contextual("interface") && !self.has_following_line_break() {
            self.raise(&TS_NON_CLASS_METHOD_PROPERTY_HAS_ABSTRACT_MODIFIER, start, &[])?;
            if let Some(interface) = self.ts_parse_interface_declaration(start, false)? {
                return Ok(interface);
            }
        }
        Err(self.unexpected(Some(TokenKind::ClassKeyword)))
    }

    // ========================================================================
    // Enums
    // ========================================================================

    /// `enum E { A, B = 1 }` at the `enum` word. Enums merge with enums of
    /// the same constness.
    pub(super) fn ts_parse_enum_declaration(
        &mut self,
        start: Position,
        is_const: bool,
        declare: bool,
    ) -> PResult<Statement> {
        self.expect_contextual("enum")?;
        let id = self.parse_identifier(false)?;
        let binding = if is_const {
            BindingFlags::TS_CONST_ENUM
        } else {
            BindingFlags::TS_ENUM
        };
        self.check_identifier(&id, binding, false)?;
        self.expect(TokenKind::OpenBraceToken)?;
        let (members, _) = self.ts_parse_delimited_list(TokenKind::CloseBraceToken, |p| p.ts_parse_enum_member())?;
        self.expect(TokenKind::CloseBraceToken)?;
        Ok(Statement::TSEnumDeclaration(TSEnumDeclaration {
            span: self.span_from(start),
            id,
            members,
            is_const,
            declare,
        }))
    }

    fn ts_parse_enum_member(&mut self) -> PResult<TSEnumMember> {
        let start = self.start_pos();
        let id = if self.is(TokenKind::StringLiteral) {
            self.parse_string_literal()?
        } else {
            Expression::Identifier(self.parse_identifier(true)?)
        };
        let initializer = if self.eat(TokenKind::EqualsToken)? {
            Some(Box::new(self.parse_maybe_assign_allow_in()?))
        } else {
            None
        };
        Ok(TSEnumMember {
            span: self.span_from(start),
            id: Box::new(id),
            initializer,
        })
    }

    // ========================================================================
    // Interfaces and type aliases
    // ========================================================================

    /// `interface I<T> extends A, B { ... }` at the `interface` word.
    /// Yields nothing when a line break follows the word, which leaves it
    /// an identifier.
    pub(super) fn ts_parse_interface_declaration(
        &mut self,
        start: Position,
        declare: bool,
    ) -> PResult<Option<Statement>> {
        if self.has_following_line_break() {
            return Ok(None);
        }
        self.expect_contextual("interface")?;
        let id = if self.is(TokenKind::Identifier) {
            let id = self.parse_identifier(false)?;
            self.check_identifier(&id, BindingFlags::TS_INTERFACE, false)?;
            id
        } else {
            let at = self.start_pos();
            self.raise(&TS_MISSING_INTERFACE_NAME, at, &[])?;
            Identifier::new(Span::new(at, at), "")
        };
        let type_parameters = self.ts_try_parse_type_parameters(TypeParamModifiers::InOutConst)?;
        let extends = if self.eat(TokenKind::ExtendsKeyword)? {
            self.ts_parse_heritage_clause("extends")?
        } else {
            Vec::new()
        };
        let body_start = self.start_pos();
        let members = self.ts_in_type(|p| p.ts_parse_object_type_members())?;
        Ok(Some(Statement::TSInterfaceDeclaration(TSInterfaceDeclaration {
            span: self.span_from(start),
            id,
            type_parameters,
            extends,
            body: TSInterfaceBody {
                span: self.span_from(body_start),
                body: members,
            },
            declare,
        })))
    }

    /// `type A<T> = ...` after the `type` word.
    pub(super) fn ts_parse_type_alias(&mut self, start: Position, declare: bool) -> PResult<Statement> {
        let id = self.parse_identifier(false)?;
        self.check_identifier(&id, BindingFlags::TS_TYPE, false)?;
        let (type_parameters, type_annotation) = self.ts_in_type(|p| {
            let type_parameters = p.ts_try_parse_type_parameters(TypeParamModifiers::InOut)?;
            p.expect(TokenKind::EqualsToken)?;
            let is_intrinsic = p.is_contextual("intrinsic") && p.lookahead()?.kind != TokenKind::DotToken;
            let type_annotation = if is_intrinsic {
                let start = p.start_pos();
                p.next()?;
                TSType::TSIntrinsicKeyword(TSKeyword {
                    span: p.span_from(start),
                })
            } else {
                p.ts_parse_type()?
            };
            Ok((type_parameters, type_annotation))
        })?;
        self.semicolon(true)?;
        Ok(Statement::TSTypeAliasDeclaration(TSTypeAliasDeclaration {
            span: self.span_from(start),
            id,
            type_parameters,
            type_annotation,
            declare,
        }))
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    /// `namespace A.B.C { ... }` after the keyword. Only the outermost name
    /// is bound.
    fn ts_parse_namespace_declaration(
        &mut self,
        start: Position,
        kind: TSModuleKind,
        nested: bool,
    ) -> PResult<TSModuleDeclaration> {
        let id = self.parse_identifier(false)?;
        if !nested {
            self.check_identifier(&id, BindingFlags::TS_NAMESPACE, false)?;
        }
        let body = if self.eat(TokenKind::DotToken)? {
            let inner_start = self.start_pos();
            let inner = self.ts_parse_namespace_declaration(inner_start, kind, true)?;
            TSModuleBody::TSModuleDeclaration(Box::new(inner))
        } else {
            TSModuleBody::TSModuleBlock(self.ts_parse_module_block()?)
        };
        Ok(TSModuleDeclaration {
            span: self.span_from(start),
            id: Box::new(Expression::Identifier(id)),
            body: Some(body),
            kind,
            declare: false,
        })
    }

    /// `module "name" { ... }`, `module "name";` or `global { ... }` at the
    /// name.
    fn ts_parse_ambient_external_module(&mut self, start: Position) -> PResult<Statement> {
        let (id, kind) = if self.is_contextual("global") {
            (Expression::Identifier(self.parse_identifier(false)?), TSModuleKind::Global)
        } else if self.is(TokenKind::StringLiteral) {
            (self.parse_string_literal()?, TSModuleKind::Module)
        } else {
            return Err(self.unexpected(None));
        };
        let body = if self.is(TokenKind::OpenBraceToken) {
            Some(TSModuleBody::TSModuleBlock(self.ts_parse_module_block()?))
        } else {
            self.semicolon(true)?;
            None
        };
        Ok(Statement::TSModuleDeclaration(TSModuleDeclaration {
            span: self.span_from(start),
            id: Box::new(id),
            body,
            kind,
            declare: false,
        }))
    }

    /// `{ ... }` of a namespace, in its own scope. Module items such as
    /// `export` are allowed at its top level.
    fn ts_parse_module_block(&mut self) -> PResult<TSModuleBlock> {
        let start = self.start_pos();
        self.expect(TokenKind::OpenBraceToken)?;
        self.state.scope.enter(ScopeFlags::TS_MODULE);
        self.state.prod_param.enter(ParamFlags::empty());
        let mut body = Vec::new();
        let mut directives = None;
        let result = self.parse_block_body(
            &mut body,
            &mut directives,
            false,
            true,
            TokenKind::CloseBraceToken,
            |_, _| Ok(()),
        );
        self.state.prod_param.exit();
        self.state.scope.exit();
        result?;
        Ok(TSModuleBlock {
            span: self.span_from(start),
            body,
        })
    }
}

/// Marks a declaration read after `declare`.
pub(super) fn set_declare(statement: &mut Statement) {
    match statement {
        Statement::FunctionDeclaration(function) | Statement::TSDeclareFunction(function) => function.declare = true,
        Statement::ClassDeclaration(class) => class.declare = true,
        Statement::VariableDeclaration(declaration) => declaration.declare = true,
        Statement::TSInterfaceDeclaration(declaration) => declaration.declare = true,
        Statement::TSTypeAliasDeclaration(declaration) => declaration.declare = true,
        Statement::TSEnumDeclaration(declaration) => declaration.declare = true,
        Statement::TSModuleDeclaration(declaration) => declaration.declare = true,
        _ => {}
    }
}

pub(super) fn is_declare(statement: &Statement) -> bool {
    match statement {
        Statement::FunctionDeclaration(function) | Statement::TSDeclareFunction(function) => function.declare,
        Statement::ClassDeclaration(class) => class.declare,
        Statement::VariableDeclaration(declaration) => declaration.declare,
        Statement::TSInterfaceDeclaration(declaration) => declaration.declare,
        Statement::TSTypeAliasDeclaration(declaration) => declaration.declare,
        Statement::TSEnumDeclaration(declaration) => declaration.declare,
        Statement::TSModuleDeclaration(declaration) => declaration.declare,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::parse;
    use crate::options::ParserOptions;
    use quarry_ast::node::*;
    use quarry_ast::ts::*;
    use quarry_diagnostics::messages::*;

    fn ts() -> ParserOptions {
        ParserOptions::module().with_plugin("typescript")
    }

    fn statements(source: &str) -> Vec<Statement> {
        let output = parse(source, &ts()).unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        output.file.program.body
    }

    #[test]
    fn test_enums() {
        let body = statements("enum Color { Red, 'Green' = 2, Blue = Red | 4 }");
        match &body[0] {
            Statement::TSEnumDeclaration(decl) => {
                assert_eq!(decl.id.name, "Color");
                assert_eq!(decl.members.len(), 3);
                assert!(decl.members[2].initializer.is_some());
                assert!(!decl.is_const);
            }
            other => panic!("expected enum, got {other:?}"),
        }
        assert!(matches!(&statements("const enum E {}")[0], Statement::TSEnumDeclaration(e) if e.is_const));
    }

    #[test]
    fn test_enum_conflicts_with_values() {
        assert!(parse("let E; enum E {}", &ts()).unwrap_err().is(&VAR_REDECLARATION));
        assert!(parse("enum E {} const enum E {}", &ts()).unwrap_err().is(&VAR_REDECLARATION));
    }

    #[test]
    fn test_interfaces() {
        let body = statements("interface A<T> extends B, C<T> { x: T; m(): void }");
        match &body[0] {
            Statement::TSInterfaceDeclaration(decl) => {
                assert_eq!(decl.extends.len(), 2);
                assert_eq!(decl.body.body.len(), 2);
                assert!(decl.type_parameters.is_some());
            }
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_interface_merges_with_class() {
        assert!(parse("interface A {} class A {}", &ts()).is_ok());
        assert!(parse("interface A {} interface A {}", &ts()).is_ok());
    }

    #[test]
    fn test_type_aliases() {
        let body = statements("type A<in out T> = T[]; type U = intrinsic; type V = intrinsic.X;");
        assert!(matches!(&body[0], Statement::TSTypeAliasDeclaration(a) if a.type_parameters.is_some()));
        assert!(matches!(
            &body[1],
            Statement::TSTypeAliasDeclaration(TSTypeAliasDeclaration {
                type_annotation: TSType::TSIntrinsicKeyword(_),
                ..
            })
        ));
        assert!(matches!(
            &body[2],
            Statement::TSTypeAliasDeclaration(TSTypeAliasDeclaration {
                type_annotation: TSType::TSTypeReference(_),
                ..
            })
        ));
    }

    #[test]
    fn test_type_as_identifier() {
        let body = statements("type = 1; type\nA = 2;");
        assert!(body.iter().all(|s| matches!(s, Statement::ExpressionStatement(_))));
    }

    #[test]
    fn test_namespaces() {
        let body = statements("namespace A.B { export const x = 1; } module M {}");
        match &body[0] {
            Statement::TSModuleDeclaration(decl) => {
                assert_eq!(decl.kind, TSModuleKind::Namespace);
                assert!(matches!(decl.body, Some(TSModuleBody::TSModuleDeclaration(_))));
            }
            other => panic!("expected namespace, got {other:?}"),
        }
        assert!(matches!(&body[1], Statement::TSModuleDeclaration(m) if m.kind == TSModuleKind::Module));
    }

    #[test]
    fn test_declare_forms() {
        let body = statements(
            "declare function f(): void;\n\
             declare class C {}\n\
             declare let x: number;\n\
             declare const enum E {}\n\
             declare module 'm';\n\
             declare global { interface Window {} }\n\
             declare namespace N {}\n\
             declare type T = string;",
        );
        assert_eq!(body.len(), 8);
        assert!(matches!(&body[0], Statement::TSDeclareFunction(f) if f.declare));
        assert!(matches!(&body[1], Statement::ClassDeclaration(c) if c.declare));
        assert!(matches!(&body[2], Statement::VariableDeclaration(v) if v.declare));
        assert!(matches!(&body[3], Statement::TSEnumDeclaration(e) if e.declare && e.is_const));
        assert!(matches!(&body[4], Statement::TSModuleDeclaration(m) if m.declare && m.body.is_none()));
        assert!(matches!(&body[5], Statement::TSModuleDeclaration(m) if m.kind == TSModuleKind::Global));
        assert!(matches!(&body[6], Statement::TSModuleDeclaration(m) if m.declare));
        assert!(matches!(&body[7], Statement::TSTypeAliasDeclaration(t) if t.declare));
    }

    #[test]
    fn test_declare_as_identifier() {
        let body = statements("declare;\ndeclare\nfunction f() {}");
        assert!(matches!(body[0], Statement::ExpressionStatement(_)));
        assert!(matches!(body[2], Statement::FunctionDeclaration(_)));
    }

    #[test]
    fn test_declared_function_body_is_rejected() {
        let output = parse("declare function f() {}", &ts().with_error_recovery()).unwrap();
        assert!(output.errors.iter().any(|e| e.is(&TS_DECLARE_FUNCTION_HAS_IMPLEMENTATION)));
    }

    #[test]
    fn test_abstract_class_and_interface() {
        let body = statements("abstract class A {}");
        assert!(matches!(&body[0], Statement::ClassDeclaration(c) if c.is_abstract));
        let output = parse("abstract interface I {}", &ts().with_error_recovery()).unwrap();
        assert!(output.errors[0].is(&TS_NON_CLASS_METHOD_PROPERTY_HAS_ABSTRACT_MODIFIER));
    }

    #[test]
    fn test_missing_interface_name() {
        let output = parse("interface {}", &ts().with_error_recovery()).unwrap();
        assert!(output.errors[0].is(&TS_MISSING_INTERFACE_NAME));
    }
}
