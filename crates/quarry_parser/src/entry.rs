//! Public entry points.

use quarry_ast::node::{Comment, Expression, File, SourceType};
use quarry_ast::token_kind::{Token, TokenKind};
use quarry_diagnostics::ParseError;

use crate::options::{ParserOptions, SourceTypeOption};
use crate::parser::Parser;
use crate::PResult;

/// A parsed program with everything learned while parsing it.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub file: File,
    /// Recoverable errors, in the order they were raised. Always empty
    /// unless `errorRecovery` is on.
    pub errors: Vec<ParseError>,
    pub saw_unambiguous_esm: bool,
    pub ambiguous_script_different_ast: bool,
}

/// A single parsed expression.
#[derive(Debug, Clone)]
pub struct ExpressionOutput {
    pub expression: Expression,
    pub comments: Vec<Comment>,
    pub tokens: Option<Vec<Token>>,
    pub errors: Vec<ParseError>,
}

/// Parses `source` as a program.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len(), source_type = ?options.source_type))]
pub fn parse(source: &str, options: &ParserOptions) -> PResult<ParseOutput> {
    let chars: Vec<char> = source.chars().collect();
    match options.source_type {
        SourceTypeOption::Unambiguous => parse_unambiguous(&chars, options),
        SourceTypeOption::Module => parse_program(&chars, options, true),
        SourceTypeOption::Script => parse_program(&chars, options, false),
    }
}

/// Parses `source` as one expression. No program scope checks run, and
/// the whole input must be consumed.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_expression(source: &str, options: &ParserOptions) -> PResult<ExpressionOutput> {
    let chars: Vec<char> = source.chars().collect();
    let plugins = options.plugin_set()?;
    let in_module = options.source_type == SourceTypeOption::Module;
    let mut parser = Parser::new(&chars, options, plugins, in_module);
    let expression = parser.parse_standalone_expression()?;
    let comments = std::mem::take(&mut parser.state.tok.comments);
    let tokens = options.tokens.then(|| std::mem::take(&mut parser.state.tokens));
    Ok(ExpressionOutput {
        expression,
        comments,
        tokens,
        errors: parser.state.errors.into_vec(),
    })
}

fn parse_program(chars: &[char], options: &ParserOptions, in_module: bool) -> PResult<ParseOutput> {
    let plugins = options.plugin_set()?;
    let mut parser = Parser::new(chars, options, plugins, in_module);
    let file = parser.parse_top_level()?;
    Ok(ParseOutput {
        file,
        errors: parser.state.errors.into_vec(),
        saw_unambiguous_esm: parser.saw_unambiguous_esm,
        ambiguous_script_different_ast: parser.ambiguous_script_different_ast,
    })
}

/// Module first. Input without any module syntax is a script: it keeps the
/// module tree when a script reading would give the same tree, and is
/// parsed again as a script when it would not.
fn parse_unambiguous(chars: &[char], options: &ParserOptions) -> PResult<ParseOutput> {
    let module_options = ParserOptions {
        source_type: SourceTypeOption::Module,
        ..options.clone()
    };
    let script_options = ParserOptions {
        source_type: SourceTypeOption::Script,
        ..options.clone()
    };

    match parse_program(chars, &module_options, true) {
        Ok(output) if output.saw_unambiguous_esm => {
            tracing::debug!("unambiguous input read as module");
            Ok(output)
        }
        Ok(output) if output.ambiguous_script_different_ast => {
            tracing::debug!("module reading differs from script, reparsing");
            match parse_program(chars, &script_options, false) {
                Ok(script) => Ok(script),
                Err(_) => Ok(output),
            }
        }
        Ok(mut output) => {
            output.file.program.source_type = SourceType::Script;
            Ok(output)
        }
        Err(module_error) => {
            tracing::debug!(error = %module_error, "module parse failed, trying script");
            parse_program(chars, &script_options, false).map_err(|_| module_error)
        }
    }
}

impl Parser<'_> {
    pub(crate) fn parse_standalone_expression(&mut self) -> PResult<Expression> {
        self.enter_initial_scopes();
        self.next_token()?;
        let expression = self.parse_expression()?;
        if !self.is(TokenKind::EndOfFileToken) {
            return Err(self.unexpected(None));
        }
        Ok(expression)
    }
}
