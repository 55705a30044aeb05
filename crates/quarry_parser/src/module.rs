//! Import and export declarations.
//!
//! The statement dispatcher consumes the `import`/`export` keyword and
//! hands over to [`Parser::parse_import`] or [`Parser::parse_export`].
//! Exported names are tracked in the parse state so duplicates are caught
//! across the whole module; local export clauses are checked against the
//! top-level scope when the program ends.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::{TSTypeParameterDeclaration, TSTypeParameterInstantiation};
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scope::BindingFlags;

use crate::parser::Parser;
use crate::utilities::{LvalAncestor, StatementContext};
use crate::PResult;

impl Parser<'_> {
    // ========================================================================
    // Imports
    // ========================================================================

    pub(crate) fn base_parse_import(&mut self, start: Position) -> PResult<Statement> {
        self.parse_import_clause(start, BindingFlags::LEXICAL, false, None)
    }

    /// Specifiers, `from` and source of an import whose leading keywords
    /// are consumed. `default_binding` is a default specifier name the
    /// caller already read while telling it apart from a modifier.
    pub(crate) fn parse_import_clause(
        &mut self,
        start: Position,
        binding: BindingFlags,
        type_only: bool,
        default_binding: Option<Identifier>,
    ) -> PResult<Statement> {
        let mut specifiers = Vec::new();
        if let Some(local) = default_binding {
            let target = Expression::Identifier(local.clone());
            self.check_lval(&target, LvalAncestor::ImportDefaultSpecifier, binding)?;
            specifiers.push(ImportSpecifier::ImportDefaultSpecifier(ImportLocalSpecifier {
                span: local.span,
                local,
            }));
            let parse_after_default = self.eat(TokenKind::CommaToken)?;
            if parse_after_default && !self.maybe_parse_star_import_specifier(&mut specifiers, binding)? {
                self.parse_named_import_specifiers(&mut specifiers, type_only)?;
            }
            self.expect_contextual("from")?;
        } else if !self.is(TokenKind::StringLiteral) {
            let parse_after_default =
                !self.maybe_parse_default_import_specifier(&mut specifiers, binding)? || self.eat(TokenKind::CommaToken)?;
            if parse_after_default && !self.maybe_parse_star_import_specifier(&mut specifiers, binding)? {
                self.parse_named_import_specifiers(&mut specifiers, type_only)?;
            }
            self.expect_contextual("from")?;
        }
        let source = self.parse_module_source()?;
        self.semicolon(true)?;
        Ok(Statement::ImportDeclaration(ImportDeclaration {
            span: self.span_from(start),
            specifiers,
            source: Box::new(source),
            import_kind: None,
        }))
    }

    /// `import x` before an optional comma.
    pub(crate) fn maybe_parse_default_import_specifier(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
        binding: BindingFlags,
    ) -> PResult<bool> {
        if !self.is(TokenKind::Identifier) {
            return Ok(false);
        }
        let start = self.start_pos();
        let local = self.parse_import_binding(LvalAncestor::ImportDefaultSpecifier, binding)?;
        specifiers.push(ImportSpecifier::ImportDefaultSpecifier(ImportLocalSpecifier {
            span: self.span_from(start),
            local,
        }));
        Ok(true)
    }

    fn maybe_parse_star_import_specifier(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
        binding: BindingFlags,
    ) -> PResult<bool> {
        if !self.is(TokenKind::AsteriskToken) {
            return Ok(false);
        }
        let start = self.start_pos();
        self.next()?;
        self.expect_contextual("as")?;
        let local = self.parse_import_binding(LvalAncestor::ImportNamespaceSpecifier, binding)?;
        specifiers.push(ImportSpecifier::ImportNamespaceSpecifier(ImportLocalSpecifier {
            span: self.span_from(start),
            local,
        }));
        Ok(true)
    }

    /// `{ a, b as c }`. A default specifier, if any, is already in
    /// `specifiers`.
    pub(crate) fn parse_named_import_specifiers(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
        type_only_import: bool,
    ) -> PResult<()> {
        self.expect(TokenKind::OpenBraceToken)?;
        let mut first = true;
        while !self.eat(TokenKind::CloseBraceToken)? {
            if first {
                first = false;
            } else {
                if self.eat(TokenKind::ColonToken)? {
                    return Err(DESTRUCTURING_NAMED_IMPORT.at(self.state.tok.last_tok_start_loc, &[]));
                }
                self.expect(TokenKind::CommaToken)?;
                if self.eat(TokenKind::CloseBraceToken)? {
                    break;
                }
            }
            let specifier = self.parse_import_specifier(type_only_import)?;
            specifiers.push(specifier);
        }
        Ok(())
    }

    pub(crate) fn base_parse_import_specifier(&mut self, _type_only_import: bool) -> PResult<ImportSpecifier> {
        let start = self.start_pos();
        let imported = self.parse_module_export_name()?;
        self.finish_import_specifier(start, imported, BindingFlags::LEXICAL, None)
    }

    /// The rest of a named import specifier after its imported name.
    pub(crate) fn finish_import_specifier(
        &mut self,
        start: Position,
        imported: Expression,
        binding: BindingFlags,
        import_kind: Option<ImportOrExportKind>,
    ) -> PResult<ImportSpecifier> {
        let local = if self.eat_contextual("as")? {
            self.parse_identifier(false)?
        } else {
            match &imported {
                Expression::Identifier(id) => {
                    self.check_reserved_word(&id.name, id.span.start, true, true)?;
                    id.clone()
                }
                other => {
                    let name = other.string_value().unwrap_or_default().to_string();
                    return Err(IMPORT_BINDING_IS_STRING.at(start, &[&name]));
                }
            }
        };
        let target = Expression::Identifier(local.clone());
        self.check_lval(&target, LvalAncestor::ImportSpecifier, binding)?;
        Ok(ImportSpecifier::ImportSpecifier(ImportNamedSpecifier {
            span: self.span_from(start),
            imported: Box::new(imported),
            local,
            import_kind,
        }))
    }

    fn parse_import_binding(&mut self, ancestor: LvalAncestor, binding: BindingFlags) -> PResult<Identifier> {
        let local = self.parse_identifier(false)?;
        self.check_lval(&Expression::Identifier(local.clone()), ancestor, binding)?;
        Ok(local)
    }

    /// An identifier name or string literal naming a module binding.
    pub(crate) fn parse_module_export_name(&mut self) -> PResult<Expression> {
        if self.is(TokenKind::StringLiteral) {
            return self.parse_string_literal();
        }
        Ok(Expression::Identifier(self.parse_identifier(true)?))
    }

    pub(crate) fn parse_module_source(&mut self) -> PResult<Expression> {
        if !self.is(TokenKind::StringLiteral) {
            return Err(self.unexpected(None));
        }
        self.parse_literal()
    }

    // ========================================================================
    // Exports
    // ========================================================================

    pub(crate) fn base_parse_export(&mut self, start: Position) -> PResult<Statement> {
        if self.is(TokenKind::AsteriskToken) {
            return self.parse_export_star(start, None);
        }

        if self.eat(TokenKind::DefaultKeyword)? {
            let declaration = self.parse_export_default_expression()?;
            self.check_duplicate_export("default", start)?;
            return Ok(Statement::ExportDefaultDeclaration(ExportDefaultDeclaration {
                span: self.span_from(start),
                declaration,
            }));
        }

        if self.should_parse_export_declaration() {
            let Some(declaration) = self.parse_export_declaration()? else {
                return Err(self.unexpected(None));
            };
            self.check_declaration_exports(&declaration)?;
            return Ok(Statement::ExportNamedDeclaration(ExportNamedDeclaration {
                span: self.span_from(start),
                declaration: Some(Box::new(declaration)),
                specifiers: Vec::new(),
                source: None,
                export_kind: None,
            }));
        }

        if !self.is(TokenKind::OpenBraceToken) {
            return Err(self.unexpected(Some(TokenKind::OpenBraceToken)));
        }
        let specifiers = self.parse_export_specifiers(false)?;
        self.finish_export_specifiers(start, specifiers, None)
    }

    /// `export * from` and `export * as ns from`, at the `*`.
    pub(crate) fn parse_export_star(
        &mut self,
        start: Position,
        export_kind: Option<ImportOrExportKind>,
    ) -> PResult<Statement> {
        let star_start = self.start_pos();
        self.next()?;
        if self.eat_contextual("as")? {
            let exported = self.parse_module_export_name()?;
            if let Some(name) = module_export_name(&exported) {
                let name = name.to_string();
                self.check_duplicate_export(&name, exported.span().start)?;
            }
            let specifier = ExportSpecifier::ExportNamespaceSpecifier(ExportNamespaceSpecifier {
                span: self.span_from(star_start),
                exported: Box::new(exported),
            });
            self.expect_contextual("from")?;
            let source = self.parse_module_source()?;
            self.semicolon(true)?;
            return Ok(Statement::ExportNamedDeclaration(ExportNamedDeclaration {
                span: self.span_from(start),
                declaration: None,
                specifiers: vec![specifier],
                source: Some(Box::new(source)),
                export_kind,
            }));
        }
        self.expect_contextual("from")?;
        let source = self.parse_module_source()?;
        self.semicolon(true)?;
        Ok(Statement::ExportAllDeclaration(ExportAllDeclaration {
            span: self.span_from(start),
            source: Box::new(source),
            exported: None,
            export_kind,
        }))
    }

    /// Completes `export { ... }` with an optional `from` clause. Without
    /// one, each local name must be a binding of this module.
    pub(crate) fn finish_export_specifiers(
        &mut self,
        start: Position,
        specifiers: Vec<ExportNamedSpecifier>,
        export_kind: Option<ImportOrExportKind>,
    ) -> PResult<Statement> {
        let source = if self.eat_contextual("from")? {
            Some(Box::new(self.parse_module_source()?))
        } else {
            None
        };

        for specifier in &specifiers {
            if let Some(name) = module_export_name(&specifier.exported) {
                let name = name.to_string();
                self.check_duplicate_export(&name, specifier.span.start)?;
            }
            if source.is_some() {
                continue;
            }
            match specifier.local.as_ref() {
                Expression::Identifier(local) => {
                    self.check_reserved_word(&local.name, local.span.start, true, false)?;
                    if specifier.export_kind != Some(ImportOrExportKind::Type) {
                        self.state.scope.check_identifier_reference(&local.name, local.span.start);
                    }
                }
                other => {
                    let local = other.string_value().unwrap_or_default().to_string();
                    let exported = module_export_name(&specifier.exported).unwrap_or_default().to_string();
                    self.raise(&EXPORT_BINDING_IS_STRING, specifier.span.start, &[&local, &exported])?;
                }
            }
        }
        self.semicolon(true)?;

        Ok(Statement::ExportNamedDeclaration(ExportNamedDeclaration {
            span: self.span_from(start),
            declaration: None,
            specifiers: specifiers.into_iter().map(ExportSpecifier::ExportSpecifier).collect(),
            source,
            export_kind,
        }))
    }

    pub(crate) fn parse_export_specifiers(&mut self, type_only_export: bool) -> PResult<Vec<ExportNamedSpecifier>> {
        self.expect(TokenKind::OpenBraceToken)?;
        let mut specifiers = Vec::new();
        let mut first = true;
        while !self.eat(TokenKind::CloseBraceToken)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::CommaToken)?;
                if self.eat(TokenKind::CloseBraceToken)? {
                    break;
                }
            }
            specifiers.push(self.parse_export_specifier(type_only_export)?);
        }
        Ok(specifiers)
    }

    pub(crate) fn base_parse_export_specifier(&mut self, _type_only_export: bool) -> PResult<ExportNamedSpecifier> {
        let start = self.start_pos();
        let local = self.parse_module_export_name()?;
        self.finish_export_specifier(start, local, None)
    }

    /// The rest of an export specifier after its local name.
    pub(crate) fn finish_export_specifier(
        &mut self,
        start: Position,
        local: Expression,
        export_kind: Option<ImportOrExportKind>,
    ) -> PResult<ExportNamedSpecifier> {
        let exported = if self.eat_contextual("as")? {
            self.parse_module_export_name()?
        } else {
            local.clone()
        };
        Ok(ExportNamedSpecifier {
            span: self.span_from(start),
            local: Box::new(local),
            exported: Box::new(exported),
            export_kind,
        })
    }

    pub(crate) fn base_should_parse_export_declaration(&mut self) -> bool {
        match self.cur() {
            TokenKind::VarKeyword | TokenKind::ConstKeyword | TokenKind::FunctionKeyword | TokenKind::ClassKeyword => {
                true
            }
            TokenKind::AtToken => true,
            _ => self.is_contextual("let") || self.is_async_function(),
        }
    }

    pub(crate) fn base_parse_export_declaration(&mut self) -> PResult<Option<Statement>> {
        if self.is(TokenKind::AtToken) {
            return Err(self.unexpected(None));
        }
        let statement = self.parse_statement(StatementContext::Declaration, false)?;
        Ok(Some(statement))
    }

    pub(crate) fn base_parse_export_default_expression(&mut self) -> PResult<ExportDefaultKind> {
        let start = self.start_pos();
        if self.is(TokenKind::FunctionKeyword) {
            self.next()?;
            let function = self.parse_function(start, true, false, false, true)?;
            return Ok(default_function(function));
        }
        if self.is_async_function() {
            self.next()?;
            self.next()?;
            let function = self.parse_function(start, true, false, true, true)?;
            return Ok(default_function(function));
        }
        if self.is(TokenKind::ClassKeyword) {
            return Ok(ExportDefaultKind::ClassDeclaration(self.parse_class(start, true, true)?));
        }
        if self.is(TokenKind::AtToken) {
            return Err(self.unexpected(None));
        }
        if self.is(TokenKind::ConstKeyword) || self.is(TokenKind::VarKeyword) || self.is_let_start() {
            return Err(UNSUPPORTED_DEFAULT_EXPORT.at(self.start_pos(), &[]));
        }

        let expr = self.parse_maybe_assign_allow_in()?;
        self.semicolon(true)?;
        Ok(ExportDefaultKind::Expression(Box::new(expr)))
    }

    /// `let` followed by something that can only start a declaration.
    fn is_let_start(&self) -> bool {
        if !self.is_contextual("let") {
            return false;
        }
        let next = self.next_token_start();
        matches!(self.char_at(next), Some('[') | Some('{')) || self.starts_binding_identifier(next)
    }

    pub(crate) fn base_check_duplicate_export(&mut self, name: &str, at: Position) -> PResult<()> {
        if !self.state.exported_identifiers.insert(name.to_string()) {
            if name == "default" {
                self.raise(&DUPLICATE_DEFAULT_EXPORT, at, &[])?;
            } else {
                self.raise(&DUPLICATE_EXPORT, at, &[name])?;
            }
        }
        Ok(())
    }

    /// Registers the names an exported declaration binds.
    fn check_declaration_exports(&mut self, declaration: &Statement) -> PResult<()> {
        let mut names = Vec::new();
        match declaration {
            Statement::FunctionDeclaration(function) | Statement::TSDeclareFunction(function) => {
                if let Some(id) = &function.id {
                    names.push((id.name.clone(), id.span.start));
                }
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    names.push((id.name.clone(), id.span.start));
                }
            }
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    collect_bound_names(&declarator.id, &mut names);
                }
            }
            _ => {}
        }
        for (name, at) in names {
            self.check_duplicate_export(&name, at)?;
        }
        Ok(())
    }

    // ========================================================================
    // Type parameter hooks
    // ========================================================================

    pub(crate) fn base_parse_maybe_type_parameters(
        &mut self,
        _allow_in_out: bool,
    ) -> PResult<Option<TSTypeParameterDeclaration>> {
        Ok(None)
    }

    pub(crate) fn base_jsx_parse_type_arguments(&mut self) -> PResult<Option<TSTypeParameterInstantiation>> {
        Ok(None)
    }
}

fn default_function(function: Function) -> ExportDefaultKind {
    if function.function.body.is_none() {
        ExportDefaultKind::TSDeclareFunction(function)
    } else {
        ExportDefaultKind::FunctionDeclaration(function)
    }
}

/// The name an export specifier or namespace export introduces.
pub(crate) fn module_export_name(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Identifier(id) => Some(&id.name),
        other => other.string_value(),
    }
}

/// Identifiers bound by a declaration pattern, in source order.
fn collect_bound_names(pattern: &Expression, names: &mut Vec<(String, Position)>) {
    match pattern {
        Expression::Identifier(id) => names.push((id.name.clone(), id.span.start)),
        Expression::ObjectPattern(object) => {
            for member in &object.properties {
                match member {
                    ObjectMember::ObjectProperty(prop) => collect_bound_names(&prop.value, names),
                    ObjectMember::Property(prop) => collect_bound_names(&prop.value, names),
                    ObjectMember::RestElement(rest) => collect_bound_names(&rest.argument, names),
                    _ => {}
                }
            }
        }
        Expression::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                collect_bound_names(element, names);
            }
        }
        Expression::AssignmentPattern(assign) => collect_bound_names(&assign.left, names),
        Expression::RestElement(rest) => collect_bound_names(&rest.argument, names),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ParserOptions, SourceTypeOption};
    use quarry_diagnostics::ParseError;

    fn module(source: &str) -> Result<(Program, Vec<ParseError>), ParseError> {
        let mut options = ParserOptions::default().with_error_recovery();
        options.source_type = SourceTypeOption::Module;
        let chars: Vec<char> = source.chars().collect();
        let plugins = options.plugin_set()?;
        let mut p = Parser::new(&chars, &options, plugins, true);
        let file = p.parse_top_level()?;
        Ok((file.program, p.state.errors.errors().to_vec()))
    }

    #[test]
    fn test_import_forms() {
        let (program, errors) = module(
            "import 'side'; import a from 'a'; import * as ns from 'b'; \
             import c, { d, e as f, 'g h' as gh } from 'c'; import from from 'd';",
        )
        .unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(program.body.len(), 5);
        let Statement::ImportDeclaration(decl) = &program.body[3] else {
            panic!("expected an import");
        };
        assert_eq!(decl.specifiers.len(), 4);
        assert_eq!(decl.specifiers[2].local().name, "f");
        assert_eq!(decl.specifiers[3].local().name, "gh");
    }

    #[test]
    fn test_import_string_needs_alias() {
        let err = module("import { 'a b' } from 'x';").unwrap_err();
        assert!(err.is(&IMPORT_BINDING_IS_STRING));
    }

    #[test]
    fn test_import_bindings_are_lexical() {
        let (_, errors) = module("import a from 'a'; let a;").unwrap();
        assert!(errors[0].is(&VAR_REDECLARATION));
    }

    #[test]
    fn test_export_forms() {
        let (program, errors) = module(
            "export * from 'a'; export * as ns from 'b'; export { x as y, z } from 'c'; \
             export const [p, { q }] = o; export function f() {} export class C {} \
             export default async function () {} let m; export { m as 'a b' };",
        )
        .unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert!(matches!(program.body[0], Statement::ExportAllDeclaration(_)));
        let Statement::ExportNamedDeclaration(ns) = &program.body[1] else {
            panic!("expected a named export");
        };
        assert!(matches!(ns.specifiers[0], ExportSpecifier::ExportNamespaceSpecifier(_)));
    }

    #[test]
    fn test_duplicate_exports() {
        let (_, errors) = module("export const a = 1; export { a };").unwrap();
        assert!(errors[0].is(&DUPLICATE_EXPORT));

        let (_, errors) = module("export default 1; export { b as default }; var b;").unwrap();
        assert!(errors[0].is(&DUPLICATE_DEFAULT_EXPORT));
    }

    #[test]
    fn test_undeclared_local_export() {
        let (_, errors) = module("export { missing };").unwrap();
        assert!(errors[0].is(&MODULE_EXPORT_UNDEFINED));

        let (_, errors) = module("export { later }; function later() {}").unwrap();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_export_string_local_needs_from() {
        let (_, errors) = module("export { 'a' as b };").unwrap();
        assert!(errors[0].is(&EXPORT_BINDING_IS_STRING));
    }

    #[test]
    fn test_default_export_rejects_declarations() {
        let err = module("export default const a = 1;").unwrap_err();
        assert!(err.is(&UNSUPPORTED_DEFAULT_EXPORT));
    }

    #[test]
    fn test_export_keyword_local_is_reserved() {
        let (_, errors) = module("export { if };").unwrap();
        assert!(!errors.is_empty());
    }
}
