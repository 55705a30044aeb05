//! quarry_parser: the grammar of the quarry ECMAScript parser.
//!
//! A parse runs one composed [`Grammar`]: the base productions plus the
//! extension layers (JSX, TypeScript, ESTree) selected by the plugin list.
//! Layers override individual productions and delegate to the layer below
//! for the shared work. Composed grammars are cached per layer set, so
//! every parse with the same plugins reuses one chain.
//!
//! ```ignore
//! let options = ParserOptions::module().with_plugin("typescript");
//! let output = quarry_parser::parse("let x: number = 1;", &options)?;
//! ```

pub mod entry;
pub mod grammar;
pub mod options;
pub mod state;
pub mod tracing_config;

mod classes;
mod expression;
mod function;
mod layers;
mod lval;
mod module;
mod parser;
mod precedence;
mod statement;
mod tokenizer;
mod try_parse;
mod utilities;

pub use entry::{parse, parse_expression, ParseOutput};
pub use grammar::{grammar_chain, grammar_for, Grammar, LayerSet};
pub use options::{ParserOptions, PluginEntry, PluginSet, SourceTypeOption};
pub use parser::Parser;
pub use state::State;
pub use try_parse::TryParse;

pub use quarry_ast as ast;
pub use quarry_diagnostics::{ErrorKind, ParseError};

/// Result of a production: the node, or the error that aborted it.
pub type PResult<T> = Result<T, ParseError>;
