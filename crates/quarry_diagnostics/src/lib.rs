//! quarry_diagnostics: Error taxonomy and message catalogue.
//!
//! Every error the tokenizer, scope handler or grammar can produce is
//! described by a static [`DiagnosticMessage`]. Raising one realizes it into a
//! [`ParseError`] at a source position. Whether that error aborts the parse
//! or is recorded and skipped depends on its [`ErrorKind`] and on whether
//! error recovery is enabled.

use quarry_core::text::Position;
use std::fmt;

pub mod messages;

/// The four error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorKind {
    /// Malformed raw input. Always fatal.
    Lex,
    /// Grammar violation.
    Syntax,
    /// Illegal redeclaration, reference or assignment target.
    Binding,
    /// Extension syntax used without its layer, or bad layer options.
    /// Always fatal.
    PluginConfiguration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "LexError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Binding => write!(f, "BindingError"),
            ErrorKind::PluginConfiguration => write!(f, "PluginConfigurationError"),
        }
    }
}

/// A message template with a code, a reason and a kind.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    /// Numeric code, unique across the catalogue.
    pub code: u32,
    /// Stable machine-checkable reason, e.g. `VarRedeclaration`.
    pub reason: &'static str,
    pub kind: ErrorKind,
    /// Whether error-recovery mode may record this and keep going.
    pub recoverable: bool,
    /// The message template string. May contain `{0}`, `{1}` placeholders.
    pub message: &'static str,
}

impl DiagnosticMessage {
    /// Realize this message at a position.
    pub fn at(&self, loc: Position, args: &[&str]) -> ParseError {
        ParseError {
            kind: self.kind,
            code: self.code,
            reason: self.reason,
            recoverable: self.recoverable,
            message: format_message(self.message, args),
            loc,
            missing_plugins: Vec::new(),
        }
    }
}

/// A realized error with its location and resolved text.
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
#[error("{message} ({}:{})", .loc.line, .loc.column)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub code: u32,
    #[serde(rename = "reasonCode")]
    pub reason: &'static str,
    #[serde(skip)]
    pub recoverable: bool,
    pub message: String,
    pub loc: Position,
    /// Plugin names that would make the offending construct legal.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_plugins: Vec<&'static str>,
}

impl ParseError {
    /// The absolute character offset the error points at.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.loc.index
    }

    pub fn with_missing_plugins(mut self, plugins: &[&'static str]) -> Self {
        self.missing_plugins = plugins.to_vec();
        self
    }

    pub fn is(&self, message: &DiagnosticMessage) -> bool {
        self.code == message.code
    }
}

/// Offsets in labels are character offsets into the parsed text.
impl miette::Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("quarry::{}", self.reason)))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.missing_plugins.is_empty() {
            return None;
        }
        Some(Box::new(format!(
            "enable the parser plugin(s): {}",
            self.missing_plugins.join(", ")
        )))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let label = miette::LabeledSpan::at_offset(self.loc.index as usize, self.kind.to_string());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Recoverable errors accumulated during a parse, in the order raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList {
    errors: Vec<ParseError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Whether an error with this message was already recorded at `pos`.
    pub fn contains_at(&self, message: &DiagnosticMessage, pos: u32) -> bool {
        self.errors
            .iter()
            .any(|e| e.code == message.code && e.loc.index == pos)
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}
