//! Statements, blocks and the program.

use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_core::text::Position;
use quarry_diagnostics::messages::*;
use quarry_scanner::char_codes::is_identifier_start;
use quarry_scope::{BindingFlags, ParamFlags, ScopeFlags};

use crate::parser::Parser;
use crate::state::{Label, LabelKind};
use crate::utilities::{ExpressionErrors, LvalAncestor, StatementContext};
use crate::PResult;

impl Parser<'_> {
    // ========================================================================
    // Program
    // ========================================================================

    /// Parses the whole input into a [`File`].
    pub(crate) fn parse_top_level(&mut self) -> PResult<File> {
        let start = self.state.tok.cur_position();
        self.enter_initial_scopes();
        self.next_token()?;
        let program = self.parse_program(start, TokenKind::EndOfFileToken)?;
        let comments = std::mem::take(&mut self.state.tok.comments);
        let tokens = self.options.tokens.then(|| std::mem::take(&mut self.state.tokens));
        tracing::debug!(
            statements = program.body.len(),
            errors = self.state.errors.len(),
            "parsed program"
        );
        Ok(File {
            span: program.span,
            program,
            comments,
            tokens,
        })
    }

    pub(crate) fn enter_initial_scopes(&mut self) {
        let mut flags = ParamFlags::empty();
        if self.in_module {
            flags |= ParamFlags::AWAIT;
        }
        self.state.scope.enter(ScopeFlags::PROGRAM);
        self.state.prod_param.enter(flags);
    }

    fn parse_program(&mut self, start: Position, end: TokenKind) -> PResult<Program> {
        let interpreter = self.parse_interpreter_directive()?;
        let mut body = Vec::new();
        let mut directives = None;
        self.parse_block_body(&mut body, &mut directives, true, true, end, |_, _| Ok(()))?;

        if self.in_module && !self.options.allow_undeclared_exports {
            let errors = self.state.scope.undefined_export_errors();
            self.raise_all(errors)?;
        }

        let source_type = if self.in_module { SourceType::Module } else { SourceType::Script };
        Ok(Program {
            span: self.span_from(start),
            source_type,
            interpreter,
            body,
            directives,
        })
    }

    fn parse_interpreter_directive(&mut self) -> PResult<Option<InterpreterDirective>> {
        if !self.is(TokenKind::InterpreterDirective) {
            return Ok(None);
        }
        let directive = InterpreterDirective {
            span: self.token_span(),
            value: self.cur_str().to_string(),
        };
        self.next()?;
        Ok(Some(directive))
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    pub(crate) fn parse_block(&mut self) -> PResult<BlockStatement> {
        self.parse_block_with(false, true, |_, _| Ok(()))
    }

    /// Parses `{ ... }`. `after` runs once the body is read, while any
    /// `"use strict"` directive is still in force, and learns whether one
    /// was present.
    pub(crate) fn parse_block_with(
        &mut self,
        allow_directives: bool,
        create_new_lexical_scope: bool,
        after: impl FnOnce(&mut Self, bool) -> PResult<()>,
    ) -> PResult<BlockStatement> {
        let start = self.start_pos();
        self.expect(TokenKind::OpenBraceToken)?;
        if create_new_lexical_scope {
            self.state.scope.enter(ScopeFlags::OTHER);
        }
        let mut body = Vec::new();
        let mut directives = None;
        self.parse_block_body(
            &mut body,
            &mut directives,
            allow_directives,
            false,
            TokenKind::CloseBraceToken,
            after,
        )?;
        if create_new_lexical_scope {
            self.state.scope.exit();
        }
        Ok(BlockStatement {
            span: self.span_from(start),
            body,
            directives,
        })
    }

    /// Reads statements up to and including `end`. Leading string
    /// statements become directives when `allow_directives` is set.
    pub(crate) fn parse_block_body(
        &mut self,
        body: &mut Vec<Statement>,
        directives: &mut Option<Vec<Directive>>,
        allow_directives: bool,
        top_level: bool,
        end: TokenKind,
        after: impl FnOnce(&mut Self, bool) -> PResult<()>,
    ) -> PResult<()> {
        let old_strict = self.state.strict;
        let mut prologue = Vec::new();
        let mut has_strict_directive = false;
        let mut parsed_non_directive = false;

        while !self.is(end) {
            let statement = if top_level {
                self.parse_module_item()?
            } else {
                self.parse_statement_list_item()?
            };

            if allow_directives && !parsed_non_directive {
                if let Some(directive) = self.statement_to_directive(&statement) {
                    if !has_strict_directive && directive.value.value == "use strict" {
                        has_strict_directive = true;
                        self.set_strict(true)?;
                    }
                    prologue.push(directive);
                    continue;
                }
                parsed_non_directive = true;
                // Octal escapes after the prologue are checked as they are read.
                self.state.tok.strict_errors.clear();
            }
            body.push(statement);
        }

        after(self, has_strict_directive)?;
        if !old_strict {
            self.set_strict(false)?;
        }
        self.next()?;
        *directives = Some(prologue);
        self.finish_block_body(body, directives);
        Ok(())
    }

    pub(crate) fn base_finish_block_body(
        &mut self,
        _body: &mut Vec<Statement>,
        _directives: &mut Option<Vec<Directive>>,
    ) {
    }

    /// A statement that consists of a bare string literal, as a directive.
    fn statement_to_directive(&self, statement: &Statement) -> Option<Directive> {
        let Statement::ExpressionStatement(stmt) = statement else {
            return None;
        };
        let (span, cooked) = match stmt.expression.as_ref() {
            Expression::StringLiteral(lit) => (lit.span, lit.value.clone()),
            Expression::Literal(Literal {
                span,
                value: LiteralValue::String(value),
                ..
            }) => (*span, value.clone()),
            _ => return None,
        };
        if self.state.is_parenthesized(&span) {
            return None;
        }
        let raw = self.source_slice(span.start.index, span.end.index);
        let value = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default().to_string();
        Some(Directive {
            span: stmt.span,
            value: DirectiveLiteral {
                span,
                value,
                extra: LiteralExtra { raw },
                expression_value: cooked,
            },
        })
    }

    // ========================================================================
    // Statement dispatch
    // ========================================================================

    pub(crate) fn parse_module_item(&mut self) -> PResult<Statement> {
        self.parse_statement(StatementContext::Declaration, true)
    }

    pub(crate) fn parse_statement_list_item(&mut self) -> PResult<Statement> {
        self.parse_statement(StatementContext::Declaration, false)
    }

    pub(crate) fn parse_statement(&mut self, ctx: StatementContext, top_level: bool) -> PResult<Statement> {
        if self.is(TokenKind::AtToken) {
            return Err(self.unexpected(None));
        }
        self.with_recursion_guard(|p| p.parse_statement_content(ctx, top_level))
    }

    pub(crate) fn base_parse_statement_content(
        &mut self,
        ctx: StatementContext,
        top_level: bool,
    ) -> PResult<Statement> {
        let start = self.start_pos();
        let allow_declaration = !ctx.is_single_statement();

        match self.cur() {
            TokenKind::BreakKeyword => return self.parse_break_continue(start, true),
            TokenKind::ContinueKeyword => return self.parse_break_continue(start, false),
            TokenKind::DebuggerKeyword => {
                self.next()?;
                self.semicolon(true)?;
                return Ok(Statement::DebuggerStatement(Keyword {
                    span: self.span_from(start),
                }));
            }
            TokenKind::DoKeyword => return self.parse_do_while(start),
            TokenKind::ForKeyword => return self.parse_for(start),
            TokenKind::FunctionKeyword if self.lookahead_char() != Some('.') => {
                self.check_function_statement_context(ctx, start)?;
                self.next()?;
                return self.parse_function_statement(start, false, !allow_declaration);
            }
            TokenKind::ClassKeyword => {
                if !allow_declaration {
                    return Err(self.unexpected(None));
                }
                let class = self.parse_class(start, true, false)?;
                return Ok(Statement::ClassDeclaration(class));
            }
            TokenKind::IfKeyword => return self.parse_if(start),
            TokenKind::ReturnKeyword => return self.parse_return(start),
            TokenKind::SwitchKeyword => return self.parse_switch(start),
            TokenKind::ThrowKeyword => return self.parse_throw(start),
            TokenKind::TryKeyword => return self.parse_try(start),
            TokenKind::ConstKeyword | TokenKind::VarKeyword => {
                let kind = if self.is(TokenKind::ConstKeyword) {
                    if !allow_declaration {
                        self.raise(&UNEXPECTED_LEXICAL_DECLARATION, start, &[])?;
                    }
                    VariableKind::Const
                } else {
                    VariableKind::Var
                };
                let declaration = self.parse_var_statement(start, kind, false)?;
                return Ok(Statement::VariableDeclaration(declaration));
            }
            TokenKind::WhileKeyword => return self.parse_while(start),
            TokenKind::WithKeyword => return self.parse_with(start),
            TokenKind::OpenBraceToken => return Ok(Statement::BlockStatement(self.parse_block()?)),
            TokenKind::SemicolonToken => {
                self.next()?;
                return Ok(Statement::EmptyStatement(Keyword {
                    span: self.span_from(start),
                }));
            }
            TokenKind::ImportKeyword if !matches!(self.lookahead_char(), Some('(') | Some('.')) => {
                return self.parse_module_declaration(start, top_level, true);
            }
            TokenKind::ExportKeyword => return self.parse_module_declaration(start, top_level, false),
            TokenKind::Identifier if self.is_let_declaration(allow_declaration) => {
                if !allow_declaration {
                    self.raise(&UNEXPECTED_LEXICAL_DECLARATION, start, &[])?;
                }
                let declaration = self.parse_var_statement(start, VariableKind::Let, false)?;
                return Ok(Statement::VariableDeclaration(declaration));
            }
            TokenKind::Identifier if self.is_async_function() => {
                if !allow_declaration {
                    self.raise(&ASYNC_FUNCTION_IN_SINGLE_STATEMENT_CONTEXT, start, &[])?;
                }
                self.next()?;
                self.next()?;
                return self.parse_function_statement(start, true, !allow_declaration);
            }
            _ => {}
        }

        let starts_with_identifier = self.is(TokenKind::Identifier);
        let expr = self.parse_expression()?;
        if starts_with_identifier {
            if let Expression::Identifier(label) = &expr {
                if self.eat(TokenKind::ColonToken)? {
                    let label = label.clone();
                    return self.parse_labeled_statement(start, label, ctx);
                }
            }
        }
        self.parse_expression_statement(start, expr)
    }

    pub(crate) fn base_parse_expression_statement(&mut self, start: Position, expr: Expression) -> PResult<Statement> {
        self.semicolon(true)?;
        Ok(Statement::ExpressionStatement(ExpressionStatement {
            span: self.span_from(start),
            expression: Box::new(expr),
            directive: None,
        }))
    }

    /// `import` or `export` at statement level. The keyword is consumed
    /// here; the hooks start after it.
    fn parse_module_declaration(&mut self, start: Position, top_level: bool, is_import: bool) -> PResult<Statement> {
        let everywhere = self.options.allow_import_export_everywhere;
        if !everywhere && !top_level {
            self.raise(&UNEXPECTED_IMPORT_EXPORT, start, &[])?;
        }
        self.next()?;
        let statement = if is_import {
            self.parse_import(start)?
        } else {
            self.parse_export(start)?
        };
        if !everywhere && !self.in_module {
            self.raise(&IMPORT_OUTSIDE_MODULE, start, &[])?;
        }
        if is_value_module_declaration(&statement) {
            self.saw_unambiguous_esm = true;
        }
        Ok(statement)
    }

    /// `let` starting a declaration rather than naming a variable.
    fn is_let_declaration(&self, allow_declaration: bool) -> bool {
        if !self.is_contextual("let") {
            return false;
        }
        let next = self.next_token_start();
        match self.char_at(next) {
            Some('[') => true,
            Some('{') => allow_declaration || !self.has_following_line_break(),
            _ => (allow_declaration || !self.has_following_line_break()) && self.starts_binding_identifier(next),
        }
    }

    /// Whether the unread source at `pos` begins a binding identifier.
    /// `in` and `instanceof` read as operators.
    pub(crate) fn starts_binding_identifier(&self, pos: usize) -> bool {
        match self.char_at(pos) {
            Some('\\') => true,
            Some(c) if is_identifier_start(c) => {
                !self.is_unparsed_contextual(pos, "in") && !self.is_unparsed_contextual(pos, "instanceof")
            }
            _ => false,
        }
    }

    fn has_following_binding_atom(&self) -> bool {
        let next = self.next_token_start();
        matches!(self.char_at(next), Some('[') | Some('{')) || self.starts_binding_identifier(next)
    }

    /// `async function` with no line break in between.
    pub(crate) fn is_async_function(&self) -> bool {
        if !self.is_contextual("async") {
            return false;
        }
        let next = self.next_token_in_line_start();
        self.is_unparsed_contextual(next, "function")
    }

    fn check_function_statement_context(&mut self, ctx: StatementContext, at: Position) -> PResult<()> {
        match ctx {
            StatementContext::Declaration => Ok(()),
            StatementContext::If | StatementContext::Label if !self.state.strict => Ok(()),
            _ if self.state.strict => self.raise(&STRICT_FUNCTION, at, &[]),
            _ => self.raise(&SLOPPY_FUNCTION, at, &[]),
        }
    }

    /// After `function`. Bodiless declarations become `TSDeclareFunction`.
    pub(crate) fn parse_function_statement(
        &mut self,
        start: Position,
        is_async: bool,
        hanging: bool,
    ) -> PResult<Statement> {
        let function = self.parse_function(start, true, hanging, is_async, false)?;
        Ok(function_statement(function))
    }

    // ========================================================================
    // Jumps and labels
    // ========================================================================

    fn parse_break_continue(&mut self, start: Position, is_break: bool) -> PResult<Statement> {
        self.next()?;
        let label = if self.is_line_terminator()? {
            None
        } else {
            let label = self.parse_identifier(false)?;
            self.semicolon(true)?;
            Some(label)
        };

        let name = label.as_ref().map(|l| l.name.as_str());
        let found = self.state.labels.iter().any(|l| {
            let matches_name = name.is_none() || l.name.as_deref() == name;
            matches_name && ((l.kind.is_some() && (is_break || l.kind == Some(LabelKind::Loop))) || (name.is_some() && is_break))
        });
        if !found {
            let keyword = if is_break { "break" } else { "continue" };
            self.raise(&ILLEGAL_BREAK_CONTINUE, start, &[keyword])?;
        }

        let node = JumpStatement {
            span: self.span_from(start),
            label,
        };
        Ok(if is_break {
            Statement::BreakStatement(node)
        } else {
            Statement::ContinueStatement(node)
        })
    }

    fn parse_labeled_statement(
        &mut self,
        start: Position,
        label: Identifier,
        ctx: StatementContext,
    ) -> PResult<Statement> {
        if self.state.labels.iter().any(|l| l.name.as_deref() == Some(label.name.as_str())) {
            self.raise(&LABEL_REDECLARATION, label.span.start, &[&label.name])?;
        }

        let kind = if self.cur().is_loop_keyword() {
            Some(LabelKind::Loop)
        } else if self.is(TokenKind::SwitchKeyword) {
            Some(LabelKind::Switch)
        } else {
            None
        };
        let statement_start = self.state.tok.start;
        // Labels stacked on the same statement all take its kind.
        for existing in self.state.labels.iter_mut().rev() {
            if existing.statement_start != start.index as usize {
                break;
            }
            existing.statement_start = statement_start;
            existing.kind = kind;
        }
        self.state.labels.push(Label {
            name: Some(label.name.clone()),
            kind,
            statement_start,
        });
        let body = self.parse_statement(ctx.labeled(), false);
        self.state.labels.pop();

        Ok(Statement::LabeledStatement(LabeledStatement {
            span: self.span_from(start),
            label,
            body: Box::new(body?),
        }))
    }

    fn push_loop_label(&mut self) {
        self.state.labels.push(Label {
            name: None,
            kind: Some(LabelKind::Loop),
            statement_start: self.state.tok.start,
        });
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `( Expression )`
    fn parse_header_expression(&mut self) -> PResult<Expression> {
        self.expect(TokenKind::OpenParenToken)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::CloseParenToken)?;
        Ok(expr)
    }

    fn parse_if(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        let test = self.parse_header_expression()?;
        let consequent = self.parse_statement(StatementContext::If, false)?;
        let alternate = if self.eat(TokenKind::ElseKeyword)? {
            Some(Box::new(self.parse_statement(StatementContext::If, false)?))
        } else {
            None
        };
        Ok(Statement::IfStatement(IfStatement {
            span: self.span_from(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate,
        }))
    }

    fn parse_return(&mut self, start: Position) -> PResult<Statement> {
        if !self.state.prod_param.has_return() && !self.options.allow_return_outside_function {
            self.raise(&ILLEGAL_RETURN, start, &[])?;
        }
        self.next()?;
        let argument = if self.is_line_terminator()? {
            None
        } else {
            let argument = self.parse_expression()?;
            self.semicolon(true)?;
            Some(Box::new(argument))
        };
        Ok(Statement::ReturnStatement(ReturnStatement {
            span: self.span_from(start),
            argument,
        }))
    }

    fn parse_switch(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        let discriminant = self.parse_header_expression()?;
        self.expect(TokenKind::OpenBraceToken)?;
        self.state.labels.push(Label {
            name: None,
            kind: Some(LabelKind::Switch),
            statement_start: start.index as usize,
        });
        self.state.scope.enter(ScopeFlags::OTHER);

        let mut cases: Vec<SwitchCase> = Vec::new();
        let mut saw_default = false;
        while !self.is(TokenKind::CloseBraceToken) {
            if self.is(TokenKind::CaseKeyword) || self.is(TokenKind::DefaultKeyword) {
                let case_start = self.start_pos();
                let is_case = self.is(TokenKind::CaseKeyword);
                self.next()?;
                let test = if is_case {
                    Some(self.parse_expression()?)
                } else {
                    if saw_default {
                        let at = self.state.tok.last_tok_start_loc;
                        self.raise(&MULTIPLE_DEFAULTS_IN_SWITCH, at, &[])?;
                    }
                    saw_default = true;
                    None
                };
                self.expect(TokenKind::ColonToken)?;
                cases.push(SwitchCase {
                    span: self.span_from(case_start),
                    test,
                    consequent: Vec::new(),
                });
            } else {
                let statement = self.parse_statement_list_item()?;
                let Some(case) = cases.last_mut() else {
                    return Err(self.unexpected(None));
                };
                case.consequent.push(statement);
                case.span.end = self.state.tok.last_tok_end_loc;
            }
        }
        self.next()?;
        self.state.scope.exit();
        self.state.labels.pop();

        Ok(Statement::SwitchStatement(SwitchStatement {
            span: self.span_from(start),
            discriminant: Box::new(discriminant),
            cases,
        }))
    }

    fn parse_throw(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        if self.has_preceding_line_break() {
            let at = self.last_end();
            self.raise(&NEWLINE_AFTER_THROW, at, &[])?;
        }
        let argument = self.parse_expression()?;
        self.semicolon(true)?;
        Ok(Statement::ThrowStatement(ThrowStatement {
            span: self.span_from(start),
            argument: Box::new(argument),
        }))
    }

    fn parse_try(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        let block = self.parse_block()?;

        let handler = if self.is(TokenKind::CatchKeyword) {
            let clause_start = self.start_pos();
            self.next()?;
            let param = if self.eat(TokenKind::OpenParenToken)? {
                let param = self.parse_catch_clause_param()?;
                self.expect(TokenKind::CloseParenToken)?;
                Some(Box::new(param))
            } else {
                self.state.scope.enter(ScopeFlags::OTHER);
                None
            };
            // The parameter scope doubles as the body's lexical scope.
            let body = self.parse_block_with(false, false, |_, _| Ok(()))?;
            self.state.scope.exit();
            Some(CatchClause {
                span: self.span_from(clause_start),
                param,
                body,
            })
        } else {
            None
        };

        let finalizer = if self.eat(TokenKind::FinallyKeyword)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            self.raise(&NO_CATCH_OR_FINALLY, start, &[])?;
        }

        Ok(Statement::TryStatement(TryStatement {
            span: self.span_from(start),
            block,
            handler,
            finalizer,
        }))
    }

    /// Parses the binding of `catch (...)` and enters the clause scope.
    pub(crate) fn base_parse_catch_clause_param(&mut self) -> PResult<Expression> {
        let param = self.parse_binding_atom()?;
        let flags = if matches!(param, Expression::Identifier(_)) {
            ScopeFlags::SIMPLE_CATCH
        } else {
            ScopeFlags::OTHER
        };
        self.state.scope.enter(flags);
        self.check_lval(&param, LvalAncestor::CatchClause, BindingFlags::CATCH_PARAM)?;
        Ok(param)
    }

    fn parse_with(&mut self, start: Position) -> PResult<Statement> {
        if self.state.strict {
            self.raise(&STRICT_WITH, start, &[])?;
        }
        self.next()?;
        let object = self.parse_header_expression()?;
        let body = self.parse_statement(StatementContext::Nested, false)?;
        Ok(Statement::WithStatement(WithStatement {
            span: self.span_from(start),
            object: Box::new(object),
            body: Box::new(body),
        }))
    }

    // ========================================================================
    // Loops
    // ========================================================================

    fn parse_while(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        let test = self.parse_header_expression()?;
        self.push_loop_label();
        let body = self.parse_statement(StatementContext::Nested, false);
        self.state.labels.pop();
        Ok(Statement::WhileStatement(WhileStatement {
            span: self.span_from(start),
            test: Box::new(test),
            body: Box::new(body?),
        }))
    }

    fn parse_do_while(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        self.push_loop_label();
        let body = self.parse_statement(StatementContext::Nested, false);
        self.state.labels.pop();
        let body = body?;
        self.expect(TokenKind::WhileKeyword)?;
        let test = self.parse_header_expression()?;
        self.eat(TokenKind::SemicolonToken)?;
        Ok(Statement::DoWhileStatement(WhileStatement {
            span: self.span_from(start),
            test: Box::new(test),
            body: Box::new(body),
        }))
    }

    /// `for (;;)`, `for (... in ...)`, `for (... of ...)` and
    /// `for await (... of ...)`.
    fn parse_for(&mut self, start: Position) -> PResult<Statement> {
        self.next()?;
        self.push_loop_label();

        let mut await_at = None;
        if self.is_contextual("await") && self.record_await_if_allowed() {
            await_at = Some(self.start_pos());
            self.next()?;
        }
        self.state.scope.enter(ScopeFlags::OTHER);
        self.expect(TokenKind::OpenParenToken)?;

        if self.is(TokenKind::SemicolonToken) {
            if let Some(at) = await_at {
                return Err(self.unexpected_at(at, None));
            }
            return self.parse_for_rest(start, None);
        }

        let starts_with_let = self.is_contextual("let");
        let is_let = starts_with_let && self.has_following_binding_atom();
        if self.is(TokenKind::VarKeyword) || self.is(TokenKind::ConstKeyword) || is_let {
            let init_start = self.start_pos();
            let kind = match self.cur() {
                TokenKind::VarKeyword => VariableKind::Var,
                TokenKind::ConstKeyword => VariableKind::Const,
                _ => VariableKind::Let,
            };
            self.next()?;
            let init = self.parse_var(init_start, true, kind, false)?;
            let is_for_in = self.is(TokenKind::InKeyword);
            if (is_for_in || self.is_contextual("of")) && init.declarations.len() == 1 {
                return self.parse_for_in(start, ForInit::VariableDeclaration(init), await_at);
            }
            if let Some(at) = await_at {
                return Err(self.unexpected_at(at, None));
            }
            return self.parse_for_rest(start, Some(ForInit::VariableDeclaration(init)));
        }

        let starts_with_async = self.is_contextual("async");
        let mut refs = ExpressionErrors::default();
        let init = self.disallow_in_and(|p| p.parse_expression_base(Some(&mut refs)))?;
        let is_for_of = self.is_contextual("of");
        if is_for_of {
            if starts_with_let {
                self.raise(&FOR_OF_LET, init.span().start, &[])?;
            }
            if await_at.is_none() && starts_with_async && matches!(init, Expression::Identifier(_)) {
                self.raise(&FOR_OF_ASYNC, init.span().start, &[])?;
            }
        }
        if is_for_of || self.is(TokenKind::InKeyword) {
            self.check_destructuring_private(&refs)?;
            let init = self.to_assignable(init, true)?;
            let ancestor = if is_for_of {
                LvalAncestor::ForOfStatement
            } else {
                LvalAncestor::ForInStatement
            };
            self.check_lval(&init, ancestor, BindingFlags::NONE)?;
            return self.parse_for_in(start, ForInit::Expression(Box::new(init)), await_at);
        }
        self.check_expression_errors(Some(&mut refs), true)?;
        if let Some(at) = await_at {
            return Err(self.unexpected_at(at, None));
        }
        self.parse_for_rest(start, Some(ForInit::Expression(Box::new(init))))
    }

    /// The rest of a classic `for` after its initializer.
    fn parse_for_rest(&mut self, start: Position, init: Option<ForInit>) -> PResult<Statement> {
        self.expect(TokenKind::SemicolonToken)?;
        let test = if self.is(TokenKind::SemicolonToken) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(TokenKind::SemicolonToken)?;
        let update = if self.is(TokenKind::CloseParenToken) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(TokenKind::CloseParenToken)?;
        let body = self.parse_statement(StatementContext::Nested, false)?;
        self.state.scope.exit();
        self.state.labels.pop();
        Ok(Statement::ForStatement(ForStatement {
            span: self.span_from(start),
            init,
            test,
            update,
            body: Box::new(body),
        }))
    }

    fn parse_for_in(&mut self, start: Position, left: ForInit, await_at: Option<Position>) -> PResult<Statement> {
        let is_for_in = self.is(TokenKind::InKeyword);
        self.next()?;
        if is_for_in {
            if let Some(at) = await_at {
                return Err(self.unexpected_at(at, None));
            }
        }

        match &left {
            ForInit::VariableDeclaration(decl) => {
                if let Some(first) = decl.declarations.first() {
                    // Annex B keeps `for (var x = 1 in y)` in sloppy mode.
                    let annex_b_exempt = is_for_in
                        && !self.state.strict
                        && decl.kind == VariableKind::Var
                        && matches!(first.id.as_ref(), Expression::Identifier(_));
                    if first.init.is_some() && !annex_b_exempt {
                        let kind = if is_for_in { "for-in" } else { "for-of" };
                        self.raise(&FOR_IN_OF_LOOP_INITIALIZER, decl.span.start, &[kind])?;
                    }
                }
            }
            ForInit::Expression(expr) => {
                if let Expression::AssignmentPattern(pattern) = expr.as_ref() {
                    self.raise(&INVALID_LHS, pattern.span.start, &["for-loop"])?;
                }
            }
        }

        let right = if is_for_in {
            self.parse_expression()?
        } else {
            self.parse_maybe_assign_allow_in()?
        };
        self.expect(TokenKind::CloseParenToken)?;
        let body = self.parse_statement(StatementContext::Nested, false)?;
        self.state.scope.exit();
        self.state.labels.pop();

        let node = ForInStatement {
            span: self.span_from(start),
            left,
            right: Box::new(right),
            body: Box::new(body),
            is_await: await_at.is_some(),
        };
        Ok(if is_for_in {
            Statement::ForInStatement(node)
        } else {
            Statement::ForOfStatement(node)
        })
    }

    // ========================================================================
    // Variable declarations
    // ========================================================================

    /// A `var`, `let` or `const` statement, starting at the keyword.
    pub(crate) fn base_parse_var_statement(
        &mut self,
        start: Position,
        kind: VariableKind,
        allow_missing_initializer: bool,
    ) -> PResult<VariableDeclaration> {
        self.next()?;
        let declaration = self.parse_var(start, false, kind, allow_missing_initializer)?;
        self.semicolon(true)?;
        Ok(VariableDeclaration {
            span: self.span_from(start),
            ..declaration
        })
    }

    /// The declarator list after the keyword. In a `for` head, `in` is
    /// left for the loop and a missing initializer may be supplied by it.
    pub(crate) fn parse_var(
        &mut self,
        start: Position,
        is_for: bool,
        kind: VariableKind,
        allow_missing_initializer: bool,
    ) -> PResult<VariableDeclaration> {
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start_pos();
            let (id, definite) = self.parse_var_id(kind)?;
            let init = if self.eat(TokenKind::EqualsToken)? {
                let init = if is_for {
                    self.parse_maybe_assign_disallow_in()?
                } else {
                    self.parse_maybe_assign_allow_in()?
                };
                Some(Box::new(init))
            } else {
                None
            };

            if init.is_none() && !allow_missing_initializer {
                let loop_supplies_value = is_for && (self.is(TokenKind::InKeyword) || self.is_contextual("of"));
                let at = self.last_end();
                if !matches!(id, Expression::Identifier(_)) && !loop_supplies_value {
                    self.raise(&DECLARATION_MISSING_INITIALIZER, at, &["destructuring"])?;
                } else if kind == VariableKind::Const && !(self.is(TokenKind::InKeyword) || self.is_contextual("of")) {
                    self.raise(&DECLARATION_MISSING_INITIALIZER, at, &["const"])?;
                }
            }

            declarations.push(VariableDeclarator {
                span: self.span_from(decl_start),
                id: Box::new(id),
                init,
                definite,
            });
            if !self.eat(TokenKind::CommaToken)? {
                break;
            }
        }
        Ok(VariableDeclaration {
            span: self.span_from(start),
            kind,
            declarations,
            declare: false,
        })
    }

    /// The binding of one declarator, declared in the current scope. The
    /// flag is the `!` definite assignment marker.
    pub(crate) fn base_parse_var_id(&mut self, kind: VariableKind) -> PResult<(Expression, bool)> {
        let id = self.parse_binding_atom()?;
        let binding = if kind == VariableKind::Var {
            BindingFlags::VAR
        } else {
            BindingFlags::LEXICAL
        };
        self.check_lval(&id, LvalAncestor::VariableDeclarator, binding)?;
        Ok((id, false))
    }
}

/// A parsed function declaration as a statement.
pub(crate) fn function_statement(function: Function) -> Statement {
    if function.function.body.is_none() {
        Statement::TSDeclareFunction(function)
    } else {
        Statement::FunctionDeclaration(function)
    }
}

/// Declarations that only a module can contain: value imports and exports.
fn is_value_module_declaration(statement: &Statement) -> bool {
    let is_value = |kind: Option<ImportOrExportKind>| kind.map_or(true, |k| k == ImportOrExportKind::Value);
    match statement {
        Statement::ImportDeclaration(decl) => is_value(decl.import_kind),
        Statement::ExportNamedDeclaration(decl) => is_value(decl.export_kind),
        Statement::ExportAllDeclaration(decl) => is_value(decl.export_kind),
        Statement::ExportDefaultDeclaration(_) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use quarry_diagnostics::ParseError;

    fn run(source: &str, options: &ParserOptions) -> Result<(Program, Vec<ParseError>), ParseError> {
        let chars: Vec<char> = source.chars().collect();
        let plugins = options.plugin_set()?;
        let module = options.source_type == crate::options::SourceTypeOption::Module;
        let mut p = Parser::new(&chars, options, plugins, module);
        let file = p.parse_top_level()?;
        Ok((file.program, p.state.errors.errors().to_vec()))
    }

    fn recovering() -> ParserOptions {
        ParserOptions::default().with_error_recovery()
    }

    #[test]
    fn test_directive_prologue() {
        let (program, errors) = run("'use strict'; \"other\"; x; 'late'", &recovering()).unwrap();
        assert!(errors.is_empty());
        let directives = program.directives.expect("directives");
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].value.value, "use strict");
        assert_eq!(directives[1].value.extra.raw, "\"other\"");
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_parenthesized_string_is_not_a_directive() {
        let (program, _) = run("('use strict'); with (a) {}", &recovering()).unwrap();
        assert!(program.directives.as_ref().is_some_and(Vec::is_empty));
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_use_strict_applies_to_earlier_octal_escape() {
        let (_, errors) = run("'\\01'; 'use strict';", &recovering()).unwrap();
        assert!(errors.iter().any(|e| e.is(&STRICT_NUMERIC_ESCAPE) || e.is(&STRICT_OCTAL_LITERAL)));
    }

    #[test]
    fn test_labels_and_jumps() {
        let (_, errors) = run("a: for (;;) { continue a; break a; }", &recovering()).unwrap();
        assert!(errors.is_empty());

        let (_, errors) = run("b: { continue b; }", &recovering()).unwrap();
        assert!(errors[0].is(&ILLEGAL_BREAK_CONTINUE));

        let (_, errors) = run("break;", &recovering()).unwrap();
        assert!(errors[0].is(&ILLEGAL_BREAK_CONTINUE));

        let (_, errors) = run("a: a: ;", &recovering()).unwrap();
        assert!(errors[0].is(&LABEL_REDECLARATION));
    }

    #[test]
    fn test_stacked_labels_share_loop_kind() {
        let (_, errors) = run("a: b: while (x) { continue a; }", &recovering()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_let_as_identifier() {
        let (program, errors) = run("let = 1; let\nin x; var let;", &recovering()).unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert!(matches!(program.body[0], Statement::ExpressionStatement(_)));
    }

    #[test]
    fn test_lexical_declaration_in_single_statement() {
        let (_, errors) = run("if (a) const b = 1;", &recovering()).unwrap();
        assert!(errors[0].is(&UNEXPECTED_LEXICAL_DECLARATION));
    }

    #[test]
    fn test_function_in_single_statement() {
        let (_, errors) = run("if (a) function f() {}", &recovering()).unwrap();
        assert!(errors.is_empty());

        let (_, errors) = run("while (a) function f() {}", &recovering()).unwrap();
        assert!(errors[0].is(&SLOPPY_FUNCTION));

        let (_, errors) = run("'use strict'; if (a) function f() {}", &recovering()).unwrap();
        assert!(errors[0].is(&STRICT_FUNCTION));
    }

    #[test]
    fn test_for_heads() {
        let (program, errors) = run(
            "for (var i = 0; i < n; i++); for (const k in o); for (x of y); for (let [a] of b);",
            &recovering(),
        )
        .unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert!(matches!(program.body[0], Statement::ForStatement(_)));
        assert!(matches!(program.body[1], Statement::ForInStatement(_)));
        assert!(matches!(program.body[2], Statement::ForOfStatement(_)));
        assert!(matches!(program.body[3], Statement::ForOfStatement(_)));
    }

    #[test]
    fn test_for_of_initializer_is_rejected() {
        let (_, errors) = run("for (let x = 1 of y);", &recovering()).unwrap();
        assert!(errors[0].is(&FOR_IN_OF_LOOP_INITIALIZER));

        let (_, errors) = run("for (var x = 1 in y);", &recovering()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_for_await_requires_async_context() {
        let options = ParserOptions::module();
        let (program, _) = run("for await (const x of xs);", &options).unwrap();
        let Statement::ForOfStatement(stmt) = &program.body[0] else {
            panic!("expected for-of");
        };
        assert!(stmt.is_await);
    }

    #[test]
    fn test_missing_initializers() {
        let (_, errors) = run("const a; let [b];", &recovering()).unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.is(&DECLARATION_MISSING_INITIALIZER)));
    }

    #[test]
    fn test_switch_cases() {
        let (program, errors) = run("switch (x) { case 1: a; b; default: c; default: }", &recovering()).unwrap();
        assert!(errors[0].is(&MULTIPLE_DEFAULTS_IN_SWITCH));
        let Statement::SwitchStatement(switch) = &program.body[0] else {
            panic!("expected switch");
        };
        assert_eq!(switch.cases.len(), 3);
        assert_eq!(switch.cases[0].consequent.len(), 2);
    }

    #[test]
    fn test_try_requires_handler() {
        let (_, errors) = run("try {} catch {} try {} finally {} try {}", &recovering()).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is(&NO_CATCH_OR_FINALLY));
    }

    #[test]
    fn test_catch_param_shadowing() {
        let (_, errors) = run("try {} catch (e) { var e; }", &recovering()).unwrap();
        assert!(errors.is_empty());

        let (_, errors) = run("try {} catch ([e]) { var e; }", &recovering()).unwrap();
        assert!(errors[0].is(&VAR_REDECLARATION));
    }

    #[test]
    fn test_return_outside_function() {
        let (_, errors) = run("return 1;", &recovering()).unwrap();
        assert!(errors[0].is(&ILLEGAL_RETURN));

        let options = ParserOptions {
            allow_return_outside_function: true,
            ..ParserOptions::default()
        };
        assert!(run("return 1;", &options).unwrap().1.is_empty());
    }

    #[test]
    fn test_throw_newline() {
        let (_, errors) = run("throw\nx;", &recovering()).unwrap();
        assert!(errors[0].is(&NEWLINE_AFTER_THROW));
    }

    #[test]
    fn test_with_in_strict_mode() {
        let (_, errors) = run("'use strict'; with (a) {}", &recovering()).unwrap();
        assert!(errors[0].is(&STRICT_WITH));
    }

    #[test]
    fn test_import_outside_module() {
        let (_, errors) = run("import a from 'a';", &recovering()).unwrap();
        assert!(errors[0].is(&IMPORT_OUTSIDE_MODULE));
    }

    #[test]
    fn test_interpreter_directive() {
        let (program, _) = run("#!/usr/bin/env node\nx;", &recovering()).unwrap();
        assert_eq!(program.interpreter.unwrap().value, "/usr/bin/env node");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_program_spans_whole_input() {
        let source = "  a;\n// trailing\n";
        let (program, _) = run(source, &recovering()).unwrap();
        assert_eq!(program.span.start.index, 0);
        assert_eq!(program.span.end.index as usize, source.len());
    }
}
