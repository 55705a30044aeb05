//! Parser options and plugin validation.
//!
//! `ParserOptions` deserializes from the camelCase JSON shape callers already
//! use for ECMAScript parsers. `plugin_set` normalizes the plugin list into
//! the layer set that selects a composed grammar, rejecting unknown plugins
//! and malformed plugin options up front.

use crate::grammar::LayerSet;
use crate::PResult;
use quarry_core::text::Position;
use quarry_diagnostics::messages::{
    INVALID_OPTIONS, INVALID_PLUGIN_OPTION, INVALID_PLUGIN_OPTIONS_VALUE, UNKNOWN_PLUGIN,
};
use serde::Deserialize;
use serde_json::Value;

/// The source type requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTypeOption {
    #[default]
    Script,
    Module,
    /// Try module first, then fall back to script.
    #[serde(alias = "ambiguous")]
    Unambiguous,
}

/// A plugin list entry: `"jsx"` or `["typescript", { "dts": true }]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PluginEntry {
    Name(String),
    WithOptions(String, Value),
}

impl PluginEntry {
    pub fn name(&self) -> &str {
        match self {
            PluginEntry::Name(name) | PluginEntry::WithOptions(name, _) => name,
        }
    }

    fn options(&self) -> Option<&Value> {
        match self {
            PluginEntry::Name(_) => None,
            PluginEntry::WithOptions(_, options) => Some(options),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    pub source_type: SourceTypeOption,
    pub source_filename: Option<String>,
    pub start_line: u32,
    pub start_column: u32,
    pub allow_await_outside_function: bool,
    pub allow_return_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_super_outside_method: bool,
    pub allow_undeclared_exports: bool,
    pub plugins: Vec<PluginEntry>,
    /// `None` means strict exactly when parsing a module.
    pub strict_mode: Option<bool>,
    pub tokens: bool,
    pub create_parenthesized_expressions: bool,
    pub error_recovery: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            source_type: SourceTypeOption::Script,
            source_filename: None,
            start_line: 1,
            start_column: 0,
            allow_await_outside_function: false,
            allow_return_outside_function: false,
            allow_import_export_everywhere: false,
            allow_super_outside_method: false,
            allow_undeclared_exports: false,
            plugins: Vec::new(),
            strict_mode: None,
            tokens: false,
            create_parenthesized_expressions: false,
            error_recovery: false,
        }
    }
}

impl ParserOptions {
    /// Reads options from their JSON form.
    pub fn from_json(json: &str) -> PResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| INVALID_OPTIONS.at(Position::new(1, 0, 0), &[&e.to_string()]))
    }

    pub fn module() -> Self {
        Self {
            source_type: SourceTypeOption::Module,
            ..Self::default()
        }
    }

    /// Appends a plugin given by name.
    pub fn with_plugin(mut self, name: &str) -> Self {
        self.plugins.push(PluginEntry::Name(name.to_string()));
        self
    }

    /// Appends a plugin with an options object.
    pub fn with_plugin_options(mut self, name: &str, options: Value) -> Self {
        self.plugins
            .push(PluginEntry::WithOptions(name.to_string(), options));
        self
    }

    pub fn with_error_recovery(mut self) -> Self {
        self.error_recovery = true;
        self
    }

    /// Whether the parse starts in strict mode.
    pub fn initial_strict(&self, in_module: bool) -> bool {
        self.strict_mode.unwrap_or(in_module)
    }

    fn origin(&self) -> Position {
        Position::new(self.start_line, self.start_column, 0)
    }

    /// Validates the plugin list and folds it into a [`PluginSet`].
    pub fn plugin_set(&self) -> PResult<PluginSet> {
        let mut set = PluginSet::default();
        for entry in &self.plugins {
            let name = entry.name();
            let flags = plugin_flags(entry, self.origin())?;
            match name {
                "jsx" => {
                    expect_known_keys(name, &flags, &[], self.origin())?;
                    set.layers |= LayerSet::JSX;
                }
                "typescript" => {
                    expect_known_keys(name, &flags, &["dts", "disallowAmbiguousJSXLike"], self.origin())?;
                    set.layers |= LayerSet::TYPESCRIPT;
                    set.dts |= flag(&flags, "dts");
                    set.disallow_ambiguous_jsx_like |= flag(&flags, "disallowAmbiguousJSXLike");
                }
                "estree" => {
                    expect_known_keys(name, &flags, &["classFeatures"], self.origin())?;
                    set.layers |= LayerSet::ESTREE;
                    set.class_features |= flag(&flags, "classFeatures");
                }
                other => return Err(UNKNOWN_PLUGIN.at(self.origin(), &[other])),
            }
        }
        Ok(set)
    }
}

/// Boolean sub-options of one plugin entry, in declaration order.
fn plugin_flags(entry: &PluginEntry, at: Position) -> PResult<Vec<(String, bool)>> {
    let Some(options) = entry.options() else {
        return Ok(Vec::new());
    };
    let Value::Object(map) = options else {
        return Err(INVALID_PLUGIN_OPTIONS_VALUE.at(at, &[entry.name()]));
    };
    map.iter()
        .map(|(key, value)| match value {
            Value::Bool(b) => Ok((key.clone(), *b)),
            _ => Err(INVALID_PLUGIN_OPTION.at(at, &[entry.name(), key])),
        })
        .collect()
}

fn expect_known_keys(plugin: &str, flags: &[(String, bool)], known: &[&str], at: Position) -> PResult<()> {
    match flags.iter().find(|(key, _)| !known.contains(&key.as_str())) {
        Some((key, _)) => Err(INVALID_PLUGIN_OPTION.at(at, &[plugin, key])),
        None => Ok(()),
    }
}

fn flag(flags: &[(String, bool)], key: &str) -> bool {
    flags.iter().any(|(k, v)| k == key && *v)
}

/// The validated, normalized plugin configuration of one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginSet {
    pub layers: LayerSet,
    /// Parse the whole file as a declaration file (ambient context).
    pub dts: bool,
    /// Reject `<T>x` assertions and unmarked `<T>() =>` arrows.
    pub disallow_ambiguous_jsx_like: bool,
    /// Emit `PropertyDefinition` and `PrivateIdentifier` in the ESTree shape.
    pub class_features: bool,
}

impl PluginSet {
    #[inline]
    pub fn has(&self, layer: LayerSet) -> bool {
        self.layers.contains(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_diagnostics::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_json() {
        let options = ParserOptions::from_json("{}").unwrap();
        assert_eq!(options, ParserOptions::default());
        assert_eq!(options.start_line, 1);
        assert!(!options.initial_strict(false));
        assert!(options.initial_strict(true));
    }

    #[test]
    fn test_ambiguous_alias() {
        let options = ParserOptions::from_json(r#"{"sourceType":"ambiguous"}"#).unwrap();
        assert_eq!(options.source_type, SourceTypeOption::Unambiguous);
    }

    #[test]
    fn test_plugin_entries() {
        let options = ParserOptions::from_json(
            r#"{"plugins":["jsx",["typescript",{"dts":true}],["estree",{"classFeatures":true}]]}"#,
        )
        .unwrap();
        let set = options.plugin_set().unwrap();
        assert!(set.has(LayerSet::JSX | LayerSet::TYPESCRIPT | LayerSet::ESTREE));
        assert!(set.dts);
        assert!(set.class_features);
        assert!(!set.disallow_ambiguous_jsx_like);
    }

    #[test]
    fn test_unknown_plugin_is_rejected() {
        let err = ParserOptions::default()
            .with_plugin("decorators")
            .plugin_set()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PluginConfiguration);
        assert!(err.message.contains("decorators"));
    }

    #[test]
    fn test_bad_plugin_options_are_rejected() {
        let non_object = ParserOptions::default().with_plugin_options("typescript", json!(true));
        assert!(non_object.plugin_set().unwrap_err().is(&INVALID_PLUGIN_OPTIONS_VALUE));

        let unknown_key = ParserOptions::default().with_plugin_options("jsx", json!({"throwIfNamespace": true}));
        assert!(unknown_key.plugin_set().unwrap_err().is(&INVALID_PLUGIN_OPTION));

        let non_bool = ParserOptions::default().with_plugin_options("typescript", json!({"dts": "yes"}));
        assert!(non_bool.plugin_set().unwrap_err().is(&INVALID_PLUGIN_OPTION));
    }

    #[test]
    fn test_malformed_json() {
        let err = ParserOptions::from_json(r#"{"sourceType":"esm"}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PluginConfiguration);
    }
}
