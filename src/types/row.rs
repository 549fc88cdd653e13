use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single grid row: a unique `id` plus arbitrary keyed values.
///
/// Serializes as a flat JSON object (`{"id": "a", "name": "..."}`), which is
/// the shape embedding applications pass in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    pub id: String,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl RowData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Map::new(),
        }
    }

    /// Builder-style setter used when assembling rows in code.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Value stored under `field`. The `id` field resolves to the row id.
    pub fn get(&self, field: &str) -> Option<Value> {
        if field == "id" {
            return Some(Value::String(self.id.clone()));
        }
        self.values.get(field).cloned()
    }

    pub fn set(&mut self, field: &str, value: Value) {
        if field == "id" {
            if let Value::String(id) = value {
                self.id = id;
            }
            return;
        }
        self.values.insert(field.to_string(), value);
    }
}
