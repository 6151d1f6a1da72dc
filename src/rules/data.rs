use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::EXCEPTION_KEY;
use crate::error::{PslError, Result};
use crate::types::ListSection;

/// Structured rule data: a nested mapping keyed first by section
/// (`ICANN_DOMAINS`, `PRIVATE_DOMAINS`), then by label, with `*` and `!`
/// as the wildcard and exception markers.
///
/// ```json
/// {"ICANN_DOMAINS": {"ck": {"*": {}, "www": {"!": {}}}}}
/// ```
///
/// This is also the snapshot format handed to a [`crate::cache::ListCache`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleData(Map<String, Value>);

impl RuleData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON snapshot. The top level must be an object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| PslError::invalid_data(format!("Malformed rule snapshot: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PslError::invalid_data(format!(
                "Rule snapshot must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Raw data of one section, if present
    pub fn section(&self, section: ListSection) -> Option<&Value> {
        self.0.get(section.key())
    }

    /// All top-level entries, recognized or not
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert a rule given as left-to-right labels (`["!www", "ck"]`,
    /// `["*", "ck"]`, `["co", "uk"]`). A leading `!` on the leftmost label
    /// marks an exception.
    pub fn add_rule(&mut self, section: ListSection, labels: &[String]) {
        let root = self
            .0
            .entry(section.key().to_string())
            .or_insert_with(empty_node);
        if !root.is_object() {
            *root = empty_node();
        }
        if let Value::Object(map) = root {
            insert_labels(map, labels);
        }
    }
}

fn insert_labels(map: &mut Map<String, Value>, labels: &[String]) {
    let Some((last, rest)) = labels.split_last() else {
        return;
    };

    let (key, exception) = match last.strip_prefix(EXCEPTION_KEY) {
        Some(label) => (label, true),
        None => (last.as_str(), false),
    };

    let child = map.entry(key.to_string()).or_insert_with(empty_node);
    if !child.is_object() {
        *child = empty_node();
    }

    if let Value::Object(child) = child {
        if exception {
            child.insert(EXCEPTION_KEY.to_string(), empty_node());
        } else {
            insert_labels(child, rest);
        }
    }
}

fn empty_node() -> Value {
    Value::Object(Map::new())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
