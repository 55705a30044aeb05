//! Tracing setup for debugging parses.
//!
//! Output format is chosen with `QUARRY_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! QUARRY_LOG=debug QUARRY_LOG_FORMAT=tree cargo test -p quarry_parser
//! QUARRY_LOG="quarry_parser::try_parse=trace" cargo bench
//! ```
//!
//! Nothing is installed unless `QUARRY_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("QUARRY_LOG_FORMAT").unwrap_or_default())
    }
}

/// Installs the global subscriber when `QUARRY_LOG` is set. Output goes to
/// stderr. Calling this again, or after another subscriber was installed,
/// does nothing.
pub fn init_tracing() {
    let Ok(directives) = std::env::var("QUARRY_LOG") else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
