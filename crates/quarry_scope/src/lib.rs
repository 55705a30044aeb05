//! quarry_scope: Lexical scope tracking for the parser.
//!
//! Three stacks run alongside the grammar:
//!
//! - [`ScopeHandler`]: declared names per scope and the redeclaration rules,
//!   including the type namespace (interfaces, type aliases, enums).
//! - [`ClassScopeHandler`]: private names per class body.
//! - [`ProductionParameterHandler`]: `yield`/`await`/`return`/`in`
//!   availability.
//!
//! All three are plain data so the parser can clone them into a snapshot
//! and restore them after a failed speculative parse.

pub mod class_scope;
pub mod flags;
pub mod handler;
pub mod params;

pub use class_scope::ClassScopeHandler;
pub use flags::{function_flags, BindingFlags, ClassElementFlags, ParamFlags, ScopeFlags};
pub use handler::{Scope, ScopeHandler};
pub use params::ProductionParameterHandler;
