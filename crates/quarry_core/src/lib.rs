//! quarry_core: Core utilities for the quarry ECMAScript parser.
//!
//! Provides source positions, spans, and collections used throughout the
//! tokenizer, scope handler and grammar.

pub mod collections;
pub mod text;

// Re-export commonly used types
pub use collections::OrderedMap;
pub use text::{Position, Span};
