//! Grammar composition.
//!
//! A [`Grammar`] is one link in a chain of layers. Every overridable
//! production is a trait method whose default implementation forwards to
//! the next link, so a layer only implements the productions it changes.
//! The last link, `Core`, routes each production to the base grammar on
//! [`Parser`].
//!
//! Inside a layer, `self.next.foo(p, ..)` reaches the layer below and
//! `p.foo(..)` restarts dispatch from the top of the chain, which is how a
//! production recurses into itself with every layer applied.
//!
//! Chains are composed once per [`LayerSet`] and leaked; [`grammar_for`]
//! hands out the same `&'static` chain for the lifetime of the process.

use std::sync::OnceLock;

use dashmap::DashMap;
use quarry_ast::node::*;
use quarry_ast::token_kind::TokenKind;
use quarry_ast::ts::*;
use quarry_core::text::Position;
use quarry_scope::BindingFlags;

use crate::layers::{EstreeLayer, JsxLayer, TypeScriptLayer};
use crate::parser::Parser;
use crate::utilities::{
    ArrowHead, ClassState, ExpressionErrors, FunctionKind, LvalRule, StatementContext, SubscriptState,
};
use crate::PResult;

bitflags::bitflags! {
    /// The extension layers of one composed grammar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayerSet: u8 {
        const ESTREE     = 1 << 0;
        const JSX        = 1 << 1;
        const TYPESCRIPT = 1 << 2;
    }
}

macro_rules! grammar_hooks {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty => $base:ident;
    )*) => {
        /// One link of a composed grammar.
        pub trait Grammar: Send + Sync {
            fn name(&self) -> &'static str;

            /// The link below this one. `Core` never delegates.
            fn next(&self) -> &'static dyn Grammar;

            $(
                $(#[$meta])*
                fn $name(&self, p: &mut Parser<'_>, $($arg: $ty),*) -> $ret {
                    self.next().$name(p, $($arg),*)
                }
            )*
        }

        /// The base language: every production goes to the parser itself.
        struct Core;

        static CORE: Core = Core;

        impl Grammar for Core {
            fn name(&self) -> &'static str {
                "core"
            }

            fn next(&self) -> &'static dyn Grammar {
                &CORE
            }

            $(
                #[inline]
                fn $name(&self, p: &mut Parser<'_>, $($arg: $ty),*) -> $ret {
                    p.$base($($arg),*)
                }
            )*
        }

        impl Parser<'_> {
            $(
                $(#[$meta])*
                #[inline]
                pub(crate) fn $name(&mut self, $($arg: $ty),*) -> $ret {
                    let grammar = self.grammar;
                    grammar.$name(self, $($arg),*)
                }
            )*
        }
    };
}

grammar_hooks! {
    // ========================================================================
    // Tokenizer
    // ========================================================================

    /// Reads the token starting with `ch` at the cursor.
    fn get_token_from_code(ch: char) -> PResult<()> => base_get_token_from_code;
    /// Adjusts the context stack after a token was read.
    fn update_context(prev: TokenKind) -> () => base_update_context;

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement_content(ctx: StatementContext, top_level: bool) -> PResult<Statement> => base_parse_statement_content;
    fn parse_expression_statement(start: Position, expr: Expression) -> PResult<Statement> => base_parse_expression_statement;
    /// Post-processes a finished statement list and its directives.
    fn finish_block_body(body: &mut Vec<Statement>, directives: &mut Option<Vec<Directive>>) -> () => base_finish_block_body;
    fn parse_var_statement(start: Position, kind: VariableKind, allow_missing_initializer: bool) -> PResult<VariableDeclaration> => base_parse_var_statement;
    /// The binding of one declarator, and whether it carried a `!`.
    fn parse_var_id(kind: VariableKind) -> PResult<(Expression, bool)> => base_parse_var_id;
    fn parse_catch_clause_param() -> PResult<Expression> => base_parse_catch_clause_param;
    fn parse_import(start: Position) -> PResult<Statement> => base_parse_import;
    fn parse_import_specifier(type_only_import: bool) -> PResult<ImportSpecifier> => base_parse_import_specifier;
    fn parse_export(start: Position) -> PResult<Statement> => base_parse_export;
    fn should_parse_export_declaration() -> bool => base_should_parse_export_declaration;
    fn parse_export_declaration() -> PResult<Option<Statement>> => base_parse_export_declaration;
    fn parse_export_default_expression() -> PResult<ExportDefaultKind> => base_parse_export_default_expression;
    fn parse_export_specifier(type_only_export: bool) -> PResult<ExportNamedSpecifier> => base_parse_export_specifier;
    fn check_duplicate_export(name: &str, at: Position) -> PResult<()> => base_check_duplicate_export;

    // ========================================================================
    // Functions and parameters
    // ========================================================================

    fn parse_maybe_type_parameters(allow_in_out: bool) -> PResult<Option<TSTypeParameterDeclaration>> => base_parse_maybe_type_parameters;
    /// Parses the return type and body. Returns `true` when the function
    /// turned out to be a bodiless signature.
    fn parse_function_body_and_finish(parts: &mut FunctionParts, kind: FunctionKind) -> PResult<bool> => base_parse_function_body_and_finish;
    /// Declares the name of a finished function declaration.
    fn register_function_statement_id(function: &Function) -> PResult<()> => base_register_function_statement_id;
    /// Consumes `=>` after a parenthesized head, if this is an arrow.
    fn parse_arrow() -> PResult<Option<ArrowHead>> => base_parse_arrow;
    fn should_parse_arrow() -> bool => base_should_parse_arrow;
    fn should_parse_async_arrow() -> bool => base_should_parse_async_arrow;
    fn parse_async_arrow_return_type() -> PResult<Option<Box<TSTypeAnnotation>>> => base_parse_async_arrow_return_type;
    /// One parameter. `allow_modifiers` is `None` outside parameter lists
    /// that could hold parameter properties, and `Some(false)` where they
    /// are seen but rejected.
    fn parse_assignable_list_item(allow_modifiers: Option<bool>) -> PResult<Expression> => base_parse_assignable_list_item;
    fn parse_assignable_list_item_types(param: Expression) -> PResult<Expression> => base_parse_assignable_list_item_types;
    fn parse_binding_atom() -> PResult<Expression> => base_parse_binding_atom;

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_maybe_assign(refs: Option<&mut ExpressionErrors>, paren_item: bool) -> PResult<Expression> => base_parse_maybe_assign;
    fn parse_conditional(expr: Expression, start: Position, refs: Option<&mut ExpressionErrors>) -> PResult<Expression> => base_parse_conditional;
    /// An item of a parenthesized list, after its expression.
    fn parse_paren_item(expr: Expression, start: Position) -> PResult<Expression> => base_parse_paren_item;
    fn parse_expr_op(left: Expression, left_start: Position, min_prec: u8) -> PResult<Expression> => base_parse_expr_op;
    fn parse_maybe_unary(refs: Option<&mut ExpressionErrors>, saw_unary: bool) -> PResult<Expression> => base_parse_maybe_unary;
    fn parse_subscript(base: Expression, start: Position, no_calls: bool, st: &mut SubscriptState) -> PResult<Expression> => base_parse_subscript;
    fn finish_call_expression(call: CallExpression, optional: bool) -> PResult<Expression> => base_finish_call_expression;
    /// The callee of `new` and its type arguments.
    fn parse_new_callee() -> PResult<(Expression, Option<TSTypeParameterInstantiation>)> => base_parse_new_callee;
    fn parse_expr_atom(refs: Option<&mut ExpressionErrors>) -> PResult<Expression> => base_parse_expr_atom;
    /// Gives a freshly parsed literal its output shape.
    fn finish_literal(lit: Expression) -> Expression => base_finish_literal;
    fn finish_private_name(name: PrivateName) -> Expression => base_finish_private_name;
    fn finish_object_member(member: ObjectMember) -> ObjectMember => base_finish_object_member;
    fn to_referenced_list(exprs: Vec<&Expression>, is_paren: bool) -> PResult<()> => base_to_referenced_list;
    fn check_reserved_word(word: &str, start: Position, check_keywords: bool, is_binding: bool) -> PResult<()> => base_check_reserved_word;

    // ========================================================================
    // Assignment targets
    // ========================================================================

    fn to_assignable(expr: Expression, is_lhs: bool) -> PResult<Expression> => base_to_assignable;
    fn to_assignable_list(exprs: Vec<Option<Expression>>, trailing_comma: Option<Position>, is_lhs: bool) -> PResult<Vec<Option<Expression>>> => base_to_assignable_list;
    fn to_assignable_object_member(member: ObjectMember, is_last: bool, is_lhs: bool) -> PResult<ObjectMember> => base_to_assignable_object_member;
    fn is_valid_lval(expr: &Expression, unparenthesized_in_assign: bool, binding: BindingFlags) -> LvalRule => base_is_valid_lval;
    /// Reports a comma after a rest element. Returns whether one was found.
    fn check_comma_after_rest(close: TokenKind) -> PResult<bool> => base_check_comma_after_rest;

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_id(class: &mut Class, is_statement: bool, optional_id: bool) -> PResult<()> => base_parse_class_id;
    fn parse_class_super(class: &mut Class) -> PResult<()> => base_parse_class_super;
    fn parse_class_member(body: &mut Vec<ClassMember>, st: &mut ClassState) -> PResult<()> => base_parse_class_member;
    fn parse_post_member_name_modifiers(mods: &mut ClassMemberModifiers, start: Position) -> PResult<()> => base_parse_post_member_name_modifiers;
    fn parse_class_property_annotation(mods: &mut ClassMemberModifiers) -> PResult<Option<Box<TSTypeAnnotation>>> => base_parse_class_property_annotation;
    fn is_class_method() -> bool => base_is_class_method;
    fn is_class_property() -> bool => base_is_class_property;
    fn finish_class_member(member: ClassMember) -> PResult<ClassMember> => base_finish_class_member;

    // ========================================================================
    // JSX
    // ========================================================================

    /// Type arguments after a JSX tag name.
    fn jsx_parse_type_arguments() -> PResult<Option<TSTypeParameterInstantiation>> => base_jsx_parse_type_arguments;
}

/// Layers apply inside out: ESTree wraps the core, JSX wraps ESTree and
/// TypeScript wraps everything, so TypeScript sees `<` before JSX does.
fn compose(layers: LayerSet) -> &'static dyn Grammar {
    let mut grammar: &'static dyn Grammar = &CORE;
    if layers.contains(LayerSet::ESTREE) {
        grammar = Box::leak(Box::new(EstreeLayer::new(grammar)));
    }
    if layers.contains(LayerSet::JSX) {
        grammar = Box::leak(Box::new(JsxLayer::new(grammar)));
    }
    if layers.contains(LayerSet::TYPESCRIPT) {
        grammar = Box::leak(Box::new(TypeScriptLayer::new(grammar)));
    }
    tracing::debug!(?layers, chain = ?chain_of(grammar), "composed grammar");
    grammar
}

static GRAMMARS: OnceLock<DashMap<LayerSet, &'static dyn Grammar>> = OnceLock::new();

/// The composed grammar for `layers`, built on first use. Concurrent
/// callers asking for the same set get the same chain.
pub fn grammar_for(layers: LayerSet) -> &'static dyn Grammar {
    let cache = GRAMMARS.get_or_init(DashMap::new);
    if let Some(grammar) = cache.get(&layers) {
        return *grammar;
    }
    *cache.entry(layers).or_insert_with(|| compose(layers))
}

fn chain_of(mut grammar: &'static dyn Grammar) -> Vec<&'static str> {
    let mut names = vec![grammar.name()];
    while grammar.name() != "core" {
        grammar = grammar.next();
        names.push(grammar.name());
    }
    names
}

/// Names of the links of the grammar for `layers`, outermost first.
pub fn grammar_chain(layers: LayerSet) -> Vec<&'static str> {
    chain_of(grammar_for(layers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn data_ptr(grammar: &'static dyn Grammar) -> *const () {
        grammar as *const dyn Grammar as *const ()
    }

    #[test]
    fn test_chain_order() {
        assert_eq!(grammar_chain(LayerSet::empty()), vec!["core"]);
        assert_eq!(
            grammar_chain(LayerSet::all()),
            vec!["typescript", "jsx", "estree", "core"]
        );
        assert_eq!(
            grammar_chain(LayerSet::JSX | LayerSet::ESTREE),
            vec!["jsx", "estree", "core"]
        );
    }

    #[test]
    fn test_same_set_same_grammar() {
        let a = grammar_for(LayerSet::TYPESCRIPT | LayerSet::JSX);
        let b = grammar_for(LayerSet::JSX | LayerSet::TYPESCRIPT);
        assert!(std::ptr::eq(data_ptr(a), data_ptr(b)));
        let c = grammar_for(LayerSet::TYPESCRIPT);
        assert!(!std::ptr::eq(data_ptr(a), data_ptr(c)));
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let results = Arc::new(std::sync::Mutex::new(Vec::new()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let results = Arc::clone(&results);
                thread::spawn(move || {
                    let ptr = data_ptr(grammar_for(LayerSet::ESTREE | LayerSet::TYPESCRIPT)) as usize;
                    results.lock().unwrap().push(ptr);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let results = results.lock().unwrap();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
