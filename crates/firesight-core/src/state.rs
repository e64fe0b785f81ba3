use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The shared record threaded through a pipeline execution.
///
/// Keys are field names; values are JSON for maximum flexibility. Each node
/// reads the fields it needs and contributes its output via a merged
/// `StateUpdate` — the record accretes, it never shrinks. One record is
/// exclusively owned by one execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateRecord {
    data: HashMap<String, serde_json::Value>,
}

impl StateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a StateRecord from initial data.
    pub fn from_map(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// Get a value by field name.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    /// Get a value as a string, if it's a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }

    /// Set a value.
    pub fn set(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.data.insert(field.into(), value);
    }

    /// Set a string value.
    pub fn set_str(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.data
            .insert(field.into(), serde_json::Value::String(value.into()));
    }

    /// Whether the record holds a value for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    /// Merge a partial update into this record.
    ///
    /// Every key in `update` overwrites (last-writer-wins per key); all
    /// other keys are preserved. Total: no value validation is performed —
    /// field-shape contracts belong to the producing capability.
    pub fn merge(&mut self, update: StateUpdate) {
        for (k, v) in update.into_map() {
            self.data.insert(k, v);
        }
    }

    /// Get the underlying data map.
    pub fn data(&self) -> &HashMap<String, serde_json::Value> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The partial mapping a node returns from one invocation.
///
/// Applied to a `StateRecord` via `merge`; applied atomically by the
/// execution driver — either the whole update lands or none of it does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateUpdate {
    data: HashMap<String, serde_json::Value>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a StateUpdate from a prepared map.
    pub fn from_map(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// Set a value.
    pub fn set(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.data.insert(field.into(), value);
    }

    /// Set a string value.
    pub fn set_str(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.data
            .insert(field.into(), serde_json::Value::String(value.into()));
    }

    /// Get a value by field name.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the update, yielding its map.
    pub fn into_map(self) -> HashMap<String, serde_json::Value> {
        self.data
    }
}
