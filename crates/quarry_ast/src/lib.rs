//! quarry_ast: syntax tree definitions for the quarry parser.
//!
//! Node types serialize to the Babel AST JSON shape: every node carries a
//! `type` tag, `start`/`end` offsets and a `loc` block. TypeScript and JSX
//! nodes live in their own modules; the ESTree variants share the core
//! enums so one tree type covers every plugin combination.

pub mod jsx;
pub mod node;
pub mod ops;
pub mod token_kind;
pub mod ts;
pub mod visitor;

pub use jsx::*;
pub use node::*;
pub use ops::*;
pub use token_kind::{Token, TokenKind, TokenValue};
pub use ts::*;
