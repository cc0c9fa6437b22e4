//! Output formats for derivation tree snapshots
//!
//! Each format implements [`Formatter`] and is looked up by name through a
//! [`FormatRegistry`]. Built-in formats:
//!
//! - `treeviz`: one line per node, indented with box-drawing connectors
//! - `json`: the snapshot as pretty-printed JSON
//! - `yaml`: the snapshot as YAML

pub mod serialized;
pub mod treeviz;

pub use serialized::{JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};

use crate::snapshot::TreeSnapshot;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No formatter registered under this name
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The formatter could not encode the snapshot
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Turns a snapshot into text
pub trait Formatter: Send + Sync {
    /// Registry key, also what users pass to `--format`
    fn name(&self) -> &str;

    fn serialize(&self, snapshot: &TreeSnapshot) -> Result<String, FormatError>;

    /// One line for `list-formats`
    fn description(&self) -> &str {
        ""
    }
}

/// Formatters by name
///
/// Names iterate in sorted order, which is what `list-formats` prints.
#[derive(Default)]
pub struct FormatRegistry {
    by_name: BTreeMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// A registry with nothing in it; see [`FormatRegistry::with_defaults`]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in `treeviz`, `json` and `yaml` formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TreevizFormatter);
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry
    }

    /// Add a formatter; a later one with the same name replaces the earlier
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        let name = formatter.name().to_string();
        self.by_name.insert(name, Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.by_name.get(name).map(|formatter| &**formatter)
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn serialize(&self, snapshot: &TreeSnapshot, format: &str) -> Result<String, FormatError> {
        match self.get(format) {
            Some(formatter) => formatter.serialize(snapshot),
            None => Err(FormatError::FormatNotFound(format.to_string())),
        }
    }

    pub fn list_formats(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::build;
    use crate::grammar::AbstractGrammar;

    struct Upper;

    impl Formatter for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn serialize(&self, snapshot: &TreeSnapshot) -> Result<String, FormatError> {
            Ok(snapshot.display_name.to_uppercase())
        }
    }

    fn lone_category() -> TreeSnapshot {
        let grammar = AbstractGrammar::new("G", "S", vec![]);
        TreeSnapshot::from_tree(&build(&grammar, "S").tree)
    }

    #[test]
    fn test_custom_formatter_is_used_by_name() {
        let mut registry = FormatRegistry::new();
        registry.register(Upper);
        assert!(registry.has("upper"));
        assert_eq!(registry.serialize(&lone_category(), "upper").unwrap(), "S");
    }

    #[test]
    fn test_empty_registry_has_nothing() {
        let registry = FormatRegistry::new();
        assert!(registry.list_formats().is_empty());
        assert_eq!(
            registry.serialize(&lone_category(), "treeviz"),
            Err(FormatError::FormatNotFound("treeviz".into()))
        );
    }

    #[test]
    fn test_builtin_formats_are_sorted() {
        assert_eq!(
            FormatRegistry::with_defaults().list_formats(),
            vec!["json", "treeviz", "yaml"]
        );
    }
}
