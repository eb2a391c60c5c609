//! Index descriptor and details types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An index name plus optional creation-time settings and mappings.
///
/// Settings and mappings are opaque JSON objects interpreted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Value>,
}

impl IndexDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
            mappings: None,
        }
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_mappings(mut self, mappings: Value) -> Self {
        self.mappings = Some(mappings);
        self
    }
}

/// The engine's description of one index (settings, mappings, aliases),
/// already unwrapped from the response envelope keyed by index name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDetails(Value);

impl IndexDetails {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn settings(&self) -> Option<&Value> {
        self.0.get("settings")
    }

    pub fn mappings(&self) -> Option<&Value> {
        self.0.get("mappings")
    }

    /// Primary shard count.
    ///
    /// Engines report settings nested under `index` with string values
    /// (`{"index": {"number_of_shards": "1"}}`); flat and numeric forms are
    /// accepted too.
    pub fn number_of_shards(&self) -> Option<u64> {
        let settings = self.settings()?;
        let raw = settings
            .get("index")
            .and_then(|index| index.get("number_of_shards"))
            .or_else(|| settings.get("number_of_shards"))?;

        match raw {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
