use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FiresightError, Result};

/// Describes a processing capability: its field contracts and runtime config.
///
/// Immutable once registered. `required_inputs` is enforced against the live
/// state when the bound node runs; `outputs` documents which fields the
/// capability contributes. `config` is opaque to the engine (model ids,
/// thresholds, runtime parameters — whatever the bound logic needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Unique capability name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Fields that must be present in the state before this capability runs.
    #[serde(default)]
    pub required_inputs: Vec<String>,
    /// Fields this capability contributes to the state.
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Opaque configuration for the bound logic.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

impl CapabilityDescriptor {
    /// Create a descriptor with no field contracts.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required_inputs: vec![],
            outputs: vec![],
            config: serde_json::Value::Null,
        }
    }

    /// Set the required input fields.
    pub fn with_required_inputs(mut self, fields: Vec<String>) -> Self {
        self.required_inputs = fields;
        self
    }

    /// Set the produced output fields.
    pub fn with_outputs(mut self, fields: Vec<String>) -> Self {
        self.outputs = fields;
        self
    }

    /// Set the opaque configuration.
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }
}

/// Registry of available capabilities, keyed by name.
///
/// Process-wide configuration data: populated at startup (programmatically
/// or from `AppConfig`), read-only thereafter. Safe to share behind `Arc`
/// across concurrent executions.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: HashMap<String, CapabilityDescriptor>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability under its declared name.
    pub fn register(&mut self, descriptor: CapabilityDescriptor) -> Result<()> {
        if self.capabilities.contains_key(&descriptor.name) {
            return Err(FiresightError::DuplicateCapability(descriptor.name));
        }
        self.capabilities.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a capability by name.
    pub fn lookup(&self, name: &str) -> Result<&CapabilityDescriptor> {
        self.capabilities
            .get(name)
            .ok_or_else(|| FiresightError::UnknownCapability(name.to_string()))
    }

    /// Whether a capability is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// All registered capability names.
    pub fn names(&self) -> Vec<&str> {
        self.capabilities.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let cap = CapabilityDescriptor::new("risk_assessor", "Scores hazard risk")
            .with_required_inputs(vec!["sensor_data".into(), "vision_analysis".into()])
            .with_outputs(vec!["risk_assessment".into()])
            .with_config(serde_json::json!({"critical_threshold": 75}));

        assert_eq!(cap.name, "risk_assessor");
        assert_eq!(cap.required_inputs.len(), 2);
        assert_eq!(cap.outputs, vec!["risk_assessment"]);
        assert_eq!(cap.config["critical_threshold"], 75);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CapabilityRegistry::new();
        registry
            .register(CapabilityDescriptor::new("data_acquisition", "Reads sensors"))
            .unwrap();

        let cap = registry.lookup("data_acquisition").unwrap();
        assert_eq!(cap.description, "Reads sensors");
        assert!(registry.contains("data_acquisition"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = CapabilityRegistry::new();
        registry
            .register(CapabilityDescriptor::new("vision_analyzer", "first"))
            .unwrap();

        let err = registry
            .register(CapabilityDescriptor::new("vision_analyzer", "second"))
            .unwrap_err();
        assert!(matches!(err, FiresightError::DuplicateCapability(name) if name == "vision_analyzer"));
    }

    #[test]
    fn test_unknown_lookup() {
        let registry = CapabilityRegistry::new();
        let err = registry.lookup("navigation_planner").unwrap_err();
        assert!(matches!(err, FiresightError::UnknownCapability(name) if name == "navigation_planner"));
    }
}
