use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::{CapabilityDescriptor, CapabilityRegistry};
use crate::error::{FiresightError, Result};

/// Top-level FireSight configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Capability declarations, keyed by capability name.
    #[serde(default)]
    pub capabilities: BTreeMap<String, CapabilityDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Step limit override. When unset, the driver defaults to twice the
    /// compiled node count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

/// A capability as declared in config. The table key carries the name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityDecl {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Opaque model/runtime parameters, passed through to the descriptor.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

impl CapabilityDecl {
    /// Promote the declaration to a descriptor under `name`.
    pub fn into_descriptor(self, name: impl Into<String>) -> CapabilityDescriptor {
        CapabilityDescriptor {
            name: name.into(),
            description: self.description,
            required_inputs: self.required_inputs,
            outputs: self.outputs,
            config: self.config,
        }
    }
}

impl AppConfig {
    /// Load config from a TOML file, with env var expansion.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| FiresightError::ConfigNotFound(path.display().to_string()))?;

        // Expand ${ENV_VAR} references
        let expanded = expand_env_vars(&content);

        let config: Self =
            toml::from_str(&expanded).map_err(|e| FiresightError::Config(e.to_string()))?;
        debug!(
            path = %path.display(),
            capabilities = config.capabilities.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Build a populated registry from the `[capabilities.*]` declarations.
    pub fn capability_registry(&self) -> Result<CapabilityRegistry> {
        let mut registry = CapabilityRegistry::new();
        for (name, decl) in &self.capabilities {
            registry.register(decl.clone().into_descriptor(name.clone()))?;
        }
        Ok(registry)
    }
}

/// Expand `${ENV_VAR}` patterns in a string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            match std::env::var(&var_name) {
                Ok(value) => result.push_str(&value),
                Err(_) => {
                    // Leave unresolved references as-is
                    result.push_str("${");
                    result.push_str(&var_name);
                    result.push('}');
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.engine.max_steps.is_none());
        assert!(config.capabilities.is_empty());
    }

    #[test]
    fn test_parse_capabilities() {
        let toml_content = r#"
[engine]
max_steps = 12

[capabilities.data_acquisition]
description = "Processes raw sensor and vision data streams"
required_inputs = ["raw_sensor_data", "raw_vision_data"]
outputs = ["sensor_data"]

[capabilities.data_acquisition.config]
model = "gpt-4-vision-preview"
temperature = 0.2
"#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.engine.max_steps, Some(12));

        let decl = &config.capabilities["data_acquisition"];
        assert_eq!(decl.required_inputs.len(), 2);
        assert_eq!(decl.config["model"], "gpt-4-vision-preview");
    }

    #[test]
    fn test_capability_registry_from_config() {
        let toml_content = r#"
[capabilities.risk_assessor]
description = "Analyzes processed data for hazard identification"
required_inputs = ["sensor_data"]
outputs = ["risk_assessment"]
"#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        let registry = config.capability_registry().unwrap();

        let cap = registry.lookup("risk_assessor").unwrap();
        assert_eq!(cap.name, "risk_assessor");
        assert_eq!(cap.outputs, vec!["risk_assessment"]);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("FIRESIGHT_TEST_DESC", "expanded description");
        let expanded = expand_env_vars("description = \"${FIRESIGHT_TEST_DESC}\"");
        assert_eq!(expanded, "description = \"expanded description\"");

        let untouched = expand_env_vars("value = \"${FIRESIGHT_TEST_UNSET_VAR}\"");
        assert!(untouched.contains("${FIRESIGHT_TEST_UNSET_VAR}"));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load(Path::new("/nonexistent/firesight.toml")).unwrap_err();
        assert!(matches!(err, FiresightError::ConfigNotFound(_)));
    }
}
