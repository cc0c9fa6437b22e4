//! Structured serializations of a snapshot (JSON, YAML)

use super::{FormatError, Formatter};
use crate::snapshot::TreeSnapshot;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, snapshot: &TreeSnapshot) -> Result<String, FormatError> {
        serde_json::to_string_pretty(snapshot)
            .map(|mut out| {
                out.push('\n');
                out
            })
            .map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn description(&self) -> &str {
        "Snapshot as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, snapshot: &TreeSnapshot) -> Result<String, FormatError> {
        serde_yaml::to_string(snapshot).map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn description(&self) -> &str {
        "Snapshot as YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::build;
    use crate::grammar::{AbstractGrammar, Function};

    fn snapshot() -> TreeSnapshot {
        let grammar = AbstractGrammar::new("G", "S", vec![Function::new("Go", "S", vec![])]);
        TreeSnapshot::from_tree(&build(&grammar, "S").tree)
    }

    #[test]
    fn test_json_round_trips_through_value() {
        let out = JsonFormatter.serialize(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["display_name"], "S");
        assert_eq!(value["children"][0]["kind"], "Function");
    }

    #[test]
    fn test_yaml_mentions_labels() {
        let out = YamlFormatter.serialize(&snapshot()).unwrap();
        assert!(out.contains("display_name: S"));
        assert!(out.contains("display_name: Go"));
    }
}
