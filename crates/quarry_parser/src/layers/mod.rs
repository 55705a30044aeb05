//! Extension layers composed over the core grammar.

mod estree;
mod jsx;
mod typescript;

pub(crate) use estree::EstreeLayer;
pub(crate) use jsx::JsxLayer;
pub(crate) use typescript::TypeScriptLayer;
