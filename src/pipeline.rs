//! Wiring for the firefighter support pipeline.
//!
//! Topology: data_acquisition → vision_analyzer → risk_assessor →
//! navigation_planner → decision_maker, with a dynamic shortcut from the
//! risk assessor to the decision maker on critical risk.

use std::sync::Arc;

use firesight_core::capability::{CapabilityDescriptor, CapabilityRegistry};
use firesight_core::config::AppConfig;
use firesight_core::error::Result;
use firesight_graph::{CompiledGraph, GraphBuilder, Node};

use crate::capabilities;

/// Capability names, in static-edge order.
pub const CAPABILITY_NAMES: [&str; 5] = [
    "data_acquisition",
    "vision_analyzer",
    "risk_assessor",
    "navigation_planner",
    "decision_maker",
];

/// Built-in descriptors, used when a capability is not declared in config.
pub fn default_descriptor(name: &str) -> CapabilityDescriptor {
    match name {
        "data_acquisition" => {
            CapabilityDescriptor::new(name, "Processes raw sensor and vision data streams")
                .with_required_inputs(vec!["raw_sensor_data".into(), "raw_vision_data".into()])
                .with_outputs(vec!["sensor_data".into()])
        }
        "vision_analyzer" => {
            CapabilityDescriptor::new(name, "Analyzes visual data for hazards and structure")
                .with_required_inputs(vec!["raw_vision_data".into()])
                .with_outputs(vec!["vision_analysis".into()])
        }
        "risk_assessor" => {
            CapabilityDescriptor::new(name, "Folds alerts and hazards into a risk score")
                .with_required_inputs(vec!["sensor_data".into(), "vision_analysis".into()])
                .with_outputs(vec!["risk_assessment".into()])
        }
        "navigation_planner" => {
            CapabilityDescriptor::new(name, "Plans a retreat-or-proceed route")
                .with_required_inputs(vec!["risk_assessment".into()])
                .with_outputs(vec!["navigation_plan".into()])
        }
        "decision_maker" => {
            CapabilityDescriptor::new(name, "Issues the final operational decision")
                .with_required_inputs(vec!["risk_assessment".into()])
                .with_outputs(vec!["final_decision".into()])
        }
        other => CapabilityDescriptor::new(other, "Unknown capability"),
    }
}

fn bind(name: &str, descriptor: CapabilityDescriptor) -> Node {
    match name {
        "data_acquisition" => capabilities::data_acquisition(descriptor),
        "vision_analyzer" => capabilities::vision_analyzer(descriptor),
        "risk_assessor" => capabilities::risk_assessor(descriptor),
        "navigation_planner" => capabilities::navigation_planner(descriptor),
        _ => capabilities::decision_maker(descriptor),
    }
}

/// Compile the pipeline, preferring config-declared descriptors over the
/// built-in defaults.
pub fn build_graph(config: &AppConfig) -> Result<Arc<CompiledGraph>> {
    let registry: CapabilityRegistry = config.capability_registry()?;

    let mut builder = GraphBuilder::new();
    for name in CAPABILITY_NAMES {
        let descriptor = if registry.contains(name) {
            registry.lookup(name)?.clone()
        } else {
            default_descriptor(name)
        };
        builder.add_node(name, bind(name, descriptor))?;
    }

    for pair in CAPABILITY_NAMES.windows(2) {
        builder.add_edge(pair[0], pair[1])?;
    }
    builder.set_entry_point(CAPABILITY_NAMES[0])?;

    Ok(Arc::new(builder.compile()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use firesight_core::state::StateRecord;
    use firesight_graph::Executor;
    use serde_json::json;

    fn snapshot(temperature: f64, peak_celsius: f64) -> StateRecord {
        let mut state = StateRecord::new();
        state.set(
            "raw_sensor_data",
            json!({
                "temperature": temperature,
                "heart_rate": 92.0,
                "oxygen_level": 20.8,
                "location": {"x": 4.0, "y": 9.0},
            }),
        );
        state.set(
            "raw_vision_data",
            json!({
                "thermal_data": {"peak_celsius": peak_celsius},
                "depth_data": {"min_clearance_m": 2.0},
            }),
        );
        state
    }

    #[tokio::test]
    async fn test_nominal_snapshot_visits_all_capabilities() {
        let graph = build_graph(&AppConfig::default()).unwrap();
        let executor = Executor::new(graph);

        let report = executor.run(snapshot(36.5, 120.0)).await.unwrap();

        assert!(report.outcome.succeeded());
        assert_eq!(report.visited(), CAPABILITY_NAMES.to_vec());
        assert_eq!(
            report.state.get("final_decision").unwrap()["action"],
            "continue_operation"
        );
        assert!(report.state.contains("navigation_plan"));
    }

    #[tokio::test]
    async fn test_critical_snapshot_skips_navigation() {
        let graph = build_graph(&AppConfig::default()).unwrap();
        let executor = Executor::new(graph);

        // High body temperature plus an active fire pushes the score past
        // the critical threshold.
        let report = executor.run(snapshot(39.5, 650.0)).await.unwrap();

        assert!(report.outcome.succeeded());
        assert_eq!(
            report.visited(),
            vec![
                "data_acquisition",
                "vision_analyzer",
                "risk_assessor",
                "decision_maker"
            ]
        );
        assert!(!report.state.contains("navigation_plan"));
        assert_eq!(
            report.state.get("final_decision").unwrap()["action"],
            "evacuate_immediately"
        );
    }

    #[tokio::test]
    async fn test_config_descriptor_overrides_default() {
        let toml_content = r#"
[capabilities.data_acquisition]
description = "Custom acquisition"
required_inputs = ["raw_sensor_data", "raw_vision_data"]
outputs = ["sensor_data"]
"#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        let graph = build_graph(&config).unwrap();

        let node = graph.node("data_acquisition").unwrap();
        assert_eq!(node.descriptor().description, "Custom acquisition");
    }
}
