//! `import type`, `export type`, import-equals aliases, `export =` and
//! `export as namespace`.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::*;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scope::BindingFlags;

use super::declarations::{is_declare, set_declare, Word};
use crate::classes::empty_class;
use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::utilities::LvalAncestor;
use crate::PResult;

impl Parser<'_> {
    // ========================================================================
    // Imports
    // ========================================================================

    pub(super) fn ts_parse_import(&mut self, next: &'static dyn Grammar, start: Position) -> PResult<Statement> {
        if self.is(TokenKind::StringLiteral) {
            return next.parse_import(self, start).map(|s| with_import_kind(s, ImportOrExportKind::Value));
        }
        if self.is(TokenKind::Identifier) && self.lookahead_char() == Some('=') {
            return self.ts_parse_import_equals(start, ImportOrExportKind::Value, false);
        }

        let statement = if self.is_contextual("type") {
            let phase = self.parse_identifier(true)?;
            if self.is_type_import_phase() {
                if self.lookahead_char() == Some('=') {
                    return self.ts_parse_import_equals(start, ImportOrExportKind::Type, false);
                }
                let statement = self.parse_import_clause(start, BindingFlags::TS_TYPE_IMPORT, true, None)?;
                with_import_kind(statement, ImportOrExportKind::Type)
            } else {
                let statement = self.parse_import_clause(start, BindingFlags::LEXICAL, false, Some(phase))?;
                with_import_kind(statement, ImportOrExportKind::Value)
            }
        } else {
            with_import_kind(next.parse_import(self, start)?, ImportOrExportKind::Value)
        };

        if let Statement::ImportDeclaration(decl) = &statement {
            let mixes_default = decl.specifiers.len() > 1
                && matches!(decl.specifiers[0], ImportSpecifier::ImportDefaultSpecifier(_));
            if decl.import_kind == Some(ImportOrExportKind::Type) && mixes_default {
                self.raise(&TS_TYPE_IMPORT_CANNOT_SPECIFY_DEFAULT_AND_NAMED, start, &[])?;
            }
        }
        Ok(statement)
    }

    /// After `import type`: whether the word was a modifier rather than a
    /// default binding named `type`. `import type from 'x'` imports the
    /// default export; `import type from from 'x'` imports a type.
    fn is_type_import_phase(&self) -> bool {
        if self.is_name() {
            !self.is_contextual("from") || self.lookahead_char() == Some('f')
        } else {
            !self.is(TokenKind::CommaToken)
        }
    }

    /// `import A = B.C;` or `import A = require("m");` at `A`.
    fn ts_parse_import_equals(
        &mut self,
        start: Position,
        import_kind: ImportOrExportKind,
        is_export: bool,
    ) -> PResult<Statement> {
        let id = self.parse_identifier(false)?;
        self.check_identifier(&id, BindingFlags::FLAG_TS_IMPORT, false)?;
        self.expect(TokenKind::EqualsToken)?;
        let module_reference = self.ts_parse_module_reference()?;
        if import_kind == ImportOrExportKind::Type
            && !matches!(module_reference, TSModuleReference::TSExternalModuleReference(_))
        {
            self.raise(&TS_IMPORT_ALIAS_HAS_IMPORT_TYPE, start, &[])?;
        }
        self.semicolon(true)?;
        Ok(Statement::TSImportEqualsDeclaration(TSImportEqualsDeclaration {
            span: self.span_from(start),
            id,
            module_reference,
            is_export,
            import_kind,
        }))
    }

    fn ts_parse_module_reference(&mut self) -> PResult<TSModuleReference> {
        if self.is_contextual("require") && self.is_lookahead_char('(') {
            let start = self.start_pos();
            self.next()?;
            self.expect(TokenKind::OpenParenToken)?;
            if !self.is(TokenKind::StringLiteral) {
                return Err(self.unexpected(Some(TokenKind::StringLiteral)));
            }
            let expression = self.parse_literal()?;
            self.expect(TokenKind::CloseParenToken)?;
            self.saw_unambiguous_esm = true;
            return Ok(TSModuleReference::TSExternalModuleReference(TSExternalModuleReference {
                span: self.span_from(start),
                expression: Box::new(expression),
            }));
        }
        Ok(match self.ts_parse_entity_name(false)? {
            TSEntityName::Identifier(id) => TSModuleReference::Identifier(id),
            TSEntityName::TSQualifiedName(name) => TSModuleReference::TSQualifiedName(name),
        })
    }

    fn is_lookahead_char(&self, expected: char) -> bool {
        self.lookahead_char() == Some(expected)
    }

    pub(super) fn ts_parse_import_specifier(&mut self, type_only_import: bool) -> PResult<ImportSpecifier> {
        let start = self.start_pos();
        if self.is_contextual("type") {
            let parts = self.ts_parse_type_only_specifier(start, true, type_only_import)?;
            let local = match parts.right {
                Some(Expression::Identifier(local)) => local,
                _ => match &parts.left {
                    Expression::Identifier(id) => id.clone(),
                    _ => return Err(self.unexpected(None)),
                },
            };
            let binding = if parts.kind == ImportOrExportKind::Type {
                BindingFlags::TS_TYPE_IMPORT
            } else {
                BindingFlags::FLAG_TS_IMPORT
            };
            self.check_lval(&Expression::Identifier(local.clone()), LvalAncestor::ImportSpecifier, binding)?;
            return Ok(ImportSpecifier::ImportSpecifier(ImportNamedSpecifier {
                span: self.span_from(start),
                imported: Box::new(parts.left),
                local,
                import_kind: Some(parts.kind),
            }));
        }

        let imported = self.parse_module_export_name()?;
        let binding = if type_only_import {
            BindingFlags::TS_TYPE_IMPORT
        } else {
            BindingFlags::FLAG_TS_IMPORT
        };
        self.finish_import_specifier(start, imported, binding, Some(ImportOrExportKind::Value))
    }

    /// A specifier starting with the word `type`, which is either the
    /// name being imported or exported, or a modifier in front of it.
    ///
    /// `{ type }` and `{ type as as }` refer to the export named `type`, while
    /// `{ type as }`, `{ type x }` and `{ type as as x }` carry the modifier.
    fn ts_parse_type_only_specifier(
        &mut self,
        start: Position,
        is_import: bool,
        in_type_only_statement: bool,
    ) -> PResult<TypeOnlySpecifier> {
        let mut left = Expression::Identifier(self.parse_identifier(true)?);
        let mut right = None;
        let mut has_type_modifier = false;
        let mut can_parse_as = true;

        if self.is_contextual("as") {
            let first_as = self.parse_identifier(true)?;
            if self.is_contextual("as") {
                let second_as = self.parse_identifier(true)?;
                if self.is_name() {
                    has_type_modifier = true;
                    left = Expression::Identifier(first_as);
                    right = Some(self.parse_specifier_target(is_import)?);
                } else {
                    right = Some(Expression::Identifier(second_as));
                }
                can_parse_as = false;
            } else if self.is_name() {
                can_parse_as = false;
                right = Some(self.parse_specifier_target(is_import)?);
            } else {
                has_type_modifier = true;
                left = Expression::Identifier(first_as);
            }
        } else if self.is_name() || (!is_import && self.is(TokenKind::StringLiteral)) {
            has_type_modifier = true;
            if is_import {
                let imported = self.parse_identifier(true)?;
                if !self.is_contextual("as") {
                    self.check_reserved_word(&imported.name, imported.span.start, true, true)?;
                }
                left = Expression::Identifier(imported);
            } else {
                left = self.parse_module_export_name()?;
            }
        }

        if has_type_modifier && in_type_only_statement {
            let message = if is_import {
                &TS_TYPE_MODIFIER_IS_USED_IN_TYPE_IMPORTS
            } else {
                &TS_TYPE_MODIFIER_IS_USED_IN_TYPE_EXPORTS
            };
            self.raise(message, start, &[])?;
        }
        if can_parse_as && self.eat_contextual("as")? {
            right = Some(self.parse_specifier_target(is_import)?);
        }

        Ok(TypeOnlySpecifier {
            left,
            right,
            kind: if has_type_modifier {
                ImportOrExportKind::Type
            } else {
                ImportOrExportKind::Value
            },
        })
    }

    fn parse_specifier_target(&mut self, is_import: bool) -> PResult<Expression> {
        if is_import {
            Ok(Expression::Identifier(self.parse_identifier(false)?))
        } else {
            self.parse_module_export_name()
        }
    }

    // ========================================================================
    // Exports
    // ========================================================================

    pub(super) fn ts_parse_export(&mut self, next: &'static dyn Grammar, start: Position) -> PResult<Statement> {
        if self.eat(TokenKind::ImportKeyword)? {
            let kind = if self.is_contextual("type") && !self.is_lookahead_char('=') {
                self.next()?;
                ImportOrExportKind::Type
            } else {
                ImportOrExportKind::Value
            };
            return self.ts_parse_import_equals(start, kind, true);
        }

        if self.eat(TokenKind::EqualsToken)? {
            let expression = self.parse_expression()?;
            self.semicolon(true)?;
            self.saw_unambiguous_esm = true;
            return Ok(Statement::TSExportAssignment(TSExportAssignment {
                span: self.span_from(start),
                expression: Box::new(expression),
            }));
        }

        if self.eat_contextual("as")? {
            self.expect_contextual("namespace")?;
            let id = self.parse_identifier(false)?;
            self.semicolon(true)?;
            return Ok(Statement::TSNamespaceExportDeclaration(TSNamespaceExportDeclaration {
                span: self.span_from(start),
                id,
            }));
        }

        if self.is_contextual("type") && matches!(self.lookahead_char(), Some('{') | Some('*')) {
            self.next()?;
            if self.is(TokenKind::AsteriskToken) {
                return self.parse_export_star(start, Some(ImportOrExportKind::Type));
            }
            let specifiers = self.parse_export_specifiers(true)?;
            return self.finish_export_specifiers(start, specifiers, Some(ImportOrExportKind::Type));
        }

        let mut statement = next.parse_export(self, start)?;
        match &mut statement {
            Statement::ExportNamedDeclaration(export) => {
                let type_only = export.declaration.as_deref().is_some_and(|declaration| {
                    matches!(
                        declaration,
                        Statement::TSInterfaceDeclaration(_) | Statement::TSTypeAliasDeclaration(_)
                    ) || is_declare(declaration)
                });
                if type_only {
                    export.export_kind = Some(ImportOrExportKind::Type);
                } else if export.export_kind.is_none() {
                    export.export_kind = Some(ImportOrExportKind::Value);
                }
            }
            Statement::ExportAllDeclaration(export) if export.export_kind.is_none() => {
                export.export_kind = Some(ImportOrExportKind::Value);
            }
            _ => {}
        }
        Ok(statement)
    }

    /// The declaration after `export`, with an optional `declare` that
    /// makes the whole declaration ambient.
    pub(super) fn ts_parse_export_declaration(&mut self, next: &'static dyn Grammar) -> PResult<Option<Statement>> {
        if !self.state.is_ambient_context && self.is_contextual("declare") {
            return self.ts_in_ambient_context(|p| p.ts_parse_export_declaration(next));
        }

        let declare_start = self.start_pos();
        let is_declare = self.eat_contextual("declare")?;
        if is_declare && (self.is_contextual("declare") || !self.should_parse_export_declaration()) {
            return Err(TS_EXPECTED_AMBIENT_AFTER_EXPORT_DECLARE.at(self.start_pos(), &[]));
        }

        let mut declaration = None;
        if self.is(TokenKind::Identifier) {
            let start = self.start_pos();
            let word = self.cur_str().to_string();
            declaration = self.ts_parse_declaration(start, &word, Word::Current)?;
        }
        let declaration = match declaration {
            Some(declaration) => Some(declaration),
            None => next.parse_export_declaration(self)?,
        };

        Ok(declaration.map(|mut declaration| {
            if is_declare {
                set_declare(&mut declaration);
                declaration.span_mut().start = declare_start;
            }
            declaration
        }))
    }

    pub(super) fn ts_parse_export_default_expression(
        &mut self,
        next: &'static dyn Grammar,
    ) -> PResult<ExportDefaultKind> {
        let start = self.start_pos();
        if self.is_contextual("abstract") && self.is_lookahead_contextual("class") {
            self.next()?;
            let mut class = empty_class();
            class.is_abstract = true;
            return Ok(ExportDefaultKind::ClassDeclaration(self.parse_class_from(start, class, true, true)?));
        }
        if self.is_contextual("interface") {
            if let Some(Statement::TSInterfaceDeclaration(interface)) =
                self.ts_parse_interface_declaration(start, false)?
            {
                return Ok(ExportDefaultKind::TSInterfaceDeclaration(interface));
            }
        }
        next.parse_export_default_expression(self)
    }

    pub(super) fn ts_parse_export_specifier(&mut self, type_only_export: bool) -> PResult<ExportNamedSpecifier> {
        let start = self.start_pos();
        if self.is_contextual("type") {
            let parts = self.ts_parse_type_only_specifier(start, false, type_only_export)?;
            let exported = parts.right.unwrap_or_else(|| parts.left.clone());
            return Ok(ExportNamedSpecifier {
                span: self.span_from(start),
                local: Box::new(parts.left),
                exported: Box::new(exported),
                export_kind: Some(parts.kind),
            });
        }
        let local = self.parse_module_export_name()?;
        self.finish_export_specifier(start, local, Some(ImportOrExportKind::Value))
    }
}

/// The pieces of a specifier that began with `type`: the name on the
/// left of `as`, the one on its right if present, and the resulting kind.
struct TypeOnlySpecifier {
    left: Expression,
    right: Option<Expression>,
    kind: ImportOrExportKind,
}

fn with_import_kind(mut statement: Statement, kind: ImportOrExportKind) -> Statement {
    if let Statement::ImportDeclaration(decl) = &mut statement {
        decl.import_kind = Some(kind);
    }
    statement
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

    fn import(statement: &Statement) -> &ImportDeclaration {
        match statement {
            Statement::ImportDeclaration(decl) => decl,
            other => panic!("expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_import_kinds() {
        let body = statements(
            "import a from 'a'; import type B from 'b'; import type { C } from 'c'; \
             import type * as D from 'd'; import 'e';",
        );
        assert_eq!(import(&body[0]).import_kind, Some(ImportOrExportKind::Value));
        assert_eq!(import(&body[1]).import_kind, Some(ImportOrExportKind::Type));
        assert_eq!(import(&body[2]).import_kind, Some(ImportOrExportKind::Type));
        assert_eq!(import(&body[3]).import_kind, Some(ImportOrExportKind::Type));
        assert_eq!(import(&body[4]).import_kind, Some(ImportOrExportKind::Value));
    }

    #[test]
    fn test_type_as_default_binding() {
        let body = statements("import type from 'a'; import type2, { x } from 'b';");
        let decl = import(&body[0]);
        assert_eq!(decl.import_kind, Some(ImportOrExportKind::Value));
        assert_eq!(decl.specifiers[0].local().name, "type");

        let body = statements("import type from from 'a';");
        let decl = import(&body[0]);
        assert_eq!(decl.import_kind, Some(ImportOrExportKind::Type));
        assert_eq!(decl.specifiers[0].local().name, "from");
    }

    #[test]
    fn test_type_import_with_default_and_named() {
        let err = parse("import type A, { B } from 'x';", &ts()).unwrap_err();
        assert!(err.is(&TS_TYPE_IMPORT_CANNOT_SPECIFY_DEFAULT_AND_NAMED));
    }

    #[test]
    fn test_type_specifiers() {
        let body = statements("import { type A, B, type C as D, type as, type as as E } from 'x';");
        let kinds: Vec<_> = import(&body[0])
            .specifiers
            .iter()
            .map(|specifier| match specifier {
                ImportSpecifier::ImportSpecifier(named) => (named.local.name.clone(), named.import_kind),
                other => panic!("expected named specifier, got {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("A".to_string(), Some(ImportOrExportKind::Type)),
                ("B".to_string(), Some(ImportOrExportKind::Value)),
                ("D".to_string(), Some(ImportOrExportKind::Type)),
                ("as".to_string(), Some(ImportOrExportKind::Type)),
                ("E".to_string(), Some(ImportOrExportKind::Type)),
            ]
        );
    }

    #[test]
    fn test_binding_named_type() {
        let body = statements("import { type } from 'x'; import { type as t } from 'y';");
        assert_eq!(import(&body[0]).specifiers[0].local().name, "type");
        assert_eq!(import(&body[1]).specifiers[0].local().name, "t");
    }

    #[test]
    fn test_type_modifier_inside_type_import() {
        let err = parse("import type { type A } from 'x';", &ts()).unwrap_err();
        assert!(err.is(&TS_TYPE_MODIFIER_IS_USED_IN_TYPE_IMPORTS));
        let err = parse("type A = 1; export type { type A };", &ts()).unwrap_err();
        assert!(err.is(&TS_TYPE_MODIFIER_IS_USED_IN_TYPE_EXPORTS));
    }

    #[test]
    fn test_type_import_shares_name_with_value() {
        assert!(parse("import type { A } from 'x'; const A = 1;", &ts()).is_ok());
    }

    #[test]
    fn test_import_equals() {
        let output = parse("import fs = require('fs'); import N = A.B.C;", &ts()).unwrap();
        assert!(output.saw_unambiguous_esm);
        let body = output.file.program.body;
        match &body[0] {
            Statement::TSImportEqualsDeclaration(decl) => {
                assert_eq!(decl.id.name, "fs");
                assert!(!decl.is_export);
                assert!(matches!(decl.module_reference, TSModuleReference::TSExternalModuleReference(_)));
            }
            other => panic!("expected import equals, got {other:?}"),
        }
        assert!(matches!(
            &body[1],
            Statement::TSImportEqualsDeclaration(TSImportEqualsDeclaration {
                module_reference: TSModuleReference::TSQualifiedName(_),
                ..
            })
        ));
    }

    #[test]
    fn test_import_type_alias_needs_require() {
        assert!(parse("import type T = require('t');", &ts()).is_ok());
        let err = parse("import type T = A.B;", &ts()).unwrap_err();
        assert!(err.is(&TS_IMPORT_ALIAS_HAS_IMPORT_TYPE));
    }

    #[test]
    fn test_export_import_equals() {
        let body = statements("export import A = B.C; export import type D = require('d');");
        assert!(matches!(
            &body[0],
            Statement::TSImportEqualsDeclaration(TSImportEqualsDeclaration { is_export: true, .. })
        ));
        assert!(matches!(
            &body[1],
            Statement::TSImportEqualsDeclaration(TSImportEqualsDeclaration {
                import_kind: ImportOrExportKind::Type,
                ..
            })
        ));
    }

    #[test]
    fn test_export_assignment_and_namespace_export() {
        let output = parse("export = foo;", &ts()).unwrap();
        assert!(output.saw_unambiguous_esm);
        assert!(matches!(&output.file.program.body[0], Statement::TSExportAssignment(_)));

        let body = statements("export as namespace MyLib;");
        match &body[0] {
            Statement::TSNamespaceExportDeclaration(decl) => assert_eq!(decl.id.name, "MyLib"),
            other => panic!("expected namespace export, got {other:?}"),
        }
    }

    #[test]
    fn test_export_type_specifiers() {
        let body = statements("type A = 1; export type { A }; export type * from 'm'; export { type A as B };");
        match &body[1] {
            Statement::ExportNamedDeclaration(export) => {
                assert_eq!(export.export_kind, Some(ImportOrExportKind::Type));
            }
            other => panic!("expected named export, got {other:?}"),
        }
        assert!(matches!(
            &body[2],
            Statement::ExportAllDeclaration(ExportAllDeclaration {
                export_kind: Some(ImportOrExportKind::Type),
                ..
            })
        ));
        match &body[3] {
            Statement::ExportNamedDeclaration(export) => {
                assert_eq!(export.export_kind, Some(ImportOrExportKind::Value));
                let ExportSpecifier::ExportSpecifier(specifier) = &export.specifiers[0] else {
                    panic!("expected a named specifier");
                };
                assert_eq!(specifier.export_kind, Some(ImportOrExportKind::Type));
            }
            other => panic!("expected named export, got {other:?}"),
        }
    }

    #[test]
    fn test_export_declaration_kinds() {
        let body = statements(
            "export interface I {} export type T = I; export enum E {} export declare const x: number; \
             export const y = 1;",
        );
        let kinds: Vec<_> = body
            .iter()
            .map(|statement| match statement {
                Statement::ExportNamedDeclaration(export) => export.export_kind,
                other => panic!("expected named export, got {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(ImportOrExportKind::Type),
                Some(ImportOrExportKind::Type),
                Some(ImportOrExportKind::Value),
                Some(ImportOrExportKind::Type),
                Some(ImportOrExportKind::Value),
            ]
        );
    }

    #[test]
    fn test_export_declare() {
        let source = "export declare function f(): void; export declare namespace N {}";
        let body = statements(source);
        let Statement::ExportNamedDeclaration(export) = &body[0] else {
            panic!("expected named export");
        };
        let declaration = export.declaration.as_deref().unwrap();
        assert!(matches!(declaration, Statement::TSDeclareFunction(f) if f.declare));
        assert_eq!(declaration.span().start.index as usize, source.find("declare").unwrap());

        let Statement::ExportNamedDeclaration(export) = &body[1] else {
            panic!("expected named export");
        };
        assert!(matches!(export.declaration.as_deref(), Some(Statement::TSModuleDeclaration(m)) if m.declare));
    }

    #[test]
    fn test_export_declare_needs_declaration() {
        let err = parse("export declare declare const x: number;", &ts()).unwrap_err();
        assert!(err.is(&TS_EXPECTED_AMBIENT_AFTER_EXPORT_DECLARE));
        let err = parse("export declare x;", &ts()).unwrap_err();
        assert!(err.is(&TS_EXPECTED_AMBIENT_AFTER_EXPORT_DECLARE));
    }

    #[test]
    fn test_export_default_forms() {
        let body = statements("export default abstract class {}");
        assert!(matches!(
            &body[0],
            Statement::ExportDefaultDeclaration(ExportDefaultDeclaration {
                declaration: ExportDefaultKind::ClassDeclaration(Class { is_abstract: true, .. }),
                ..
            })
        ));
        let body = statements("export default interface Shape { area(): number }");
        assert!(matches!(
            &body[0],
            Statement::ExportDefaultDeclaration(ExportDefaultDeclaration {
                declaration: ExportDefaultKind::TSInterfaceDeclaration(_),
                ..
            })
        ));
    }

    #[test]
    fn test_function_overload_exports() {
        assert!(parse("export function f(a: string): void; export function f(a: any) {}", &ts()).is_ok());
    }
}
