//! Rule-based capabilities for the firefighter support pipeline.
//!
//! Each builder binds a capability descriptor to deterministic logic over
//! the shared record: threshold alerts from vitals, hazard summaries from
//! vision frames, a folded risk score, and a retreat-or-proceed plan.
//! Model-backed capabilities would plug in the same way, via `NodeLogic`.

use serde_json::json;

use firesight_core::capability::CapabilityDescriptor;
use firesight_core::error::FiresightError;
use firesight_core::state::StateUpdate;
use firesight_graph::{Node, NodeOutput};

/// Body temperature above this is a critical alert (°C).
const HIGH_TEMPERATURE_C: f64 = 38.0;
/// Oxygen saturation below this is a warning (%).
const LOW_OXYGEN_PCT: f64 = 19.5;
/// Heart rate above this is a warning (bpm).
const HIGH_HEART_RATE_BPM: f64 = 150.0;
/// Risk scores at or above this level route straight to the decision maker.
const CRITICAL_RISK_SCORE: i64 = 75;

pub fn data_acquisition(descriptor: CapabilityDescriptor) -> Node {
    Node::from_fn(descriptor, |state| {
        let raw = state
            .get("raw_sensor_data")
            .ok_or_else(|| FiresightError::node_execution("data_acquisition", "empty sensor frame"))?;

        let temperature = raw["temperature"].as_f64().unwrap_or(0.0);
        let heart_rate = raw["heart_rate"].as_f64().unwrap_or(0.0);
        let oxygen_level = raw["oxygen_level"].as_f64().unwrap_or(0.0);

        let mut alerts = Vec::new();
        if temperature > HIGH_TEMPERATURE_C {
            alerts.push(json!({"type": "high_temperature", "severity": "critical"}));
        }
        if oxygen_level < LOW_OXYGEN_PCT {
            alerts.push(json!({"type": "low_oxygen", "severity": "warning"}));
        }
        if heart_rate > HIGH_HEART_RATE_BPM {
            alerts.push(json!({"type": "high_heart_rate", "severity": "warning"}));
        }

        let mut update = StateUpdate::new();
        update.set(
            "sensor_data",
            json!({
                "vital_signs": {
                    "heart_rate": heart_rate,
                    "temperature": temperature,
                    "oxygen_level": oxygen_level,
                },
                "location": raw.get("location").cloned().unwrap_or(json!({})),
                "alerts": alerts,
            }),
        );
        Ok(NodeOutput::new(update))
    })
}

pub fn vision_analyzer(descriptor: CapabilityDescriptor) -> Node {
    Node::from_fn(descriptor, |state| {
        let raw = state
            .get("raw_vision_data")
            .ok_or_else(|| FiresightError::node_execution("vision_analyzer", "empty vision frame"))?;

        let thermal = raw.get("thermal_data").cloned().unwrap_or(json!({}));
        let depth = raw.get("depth_data").cloned().unwrap_or(json!({}));

        let mut hazards = Vec::new();
        if let Some(peak) = thermal["peak_celsius"].as_f64() {
            if peak > 400.0 {
                hazards.push(json!({"type": "active_fire", "peak_celsius": peak}));
            }
        }
        if let Some(clearance) = depth["min_clearance_m"].as_f64() {
            if clearance < 0.8 {
                hazards.push(json!({"type": "blocked_passage", "clearance_m": clearance}));
            }
        }

        let mut update = StateUpdate::new();
        update.set(
            "vision_analysis",
            json!({
                "hazards_detected": hazards,
                "structural_analysis": raw.get("structural_data").cloned().unwrap_or(json!({})),
                "thermal_mapping": thermal,
                "depth_analysis": depth,
            }),
        );
        Ok(NodeOutput::new(update))
    })
}

pub fn risk_assessor(descriptor: CapabilityDescriptor) -> Node {
    Node::from_fn(descriptor, |state| {
        let sensor = state.get("sensor_data").cloned().unwrap_or(json!({}));
        let vision = state.get("vision_analysis").cloned().unwrap_or(json!({}));

        let mut score: i64 = 0;
        let mut factors = Vec::new();

        for alert in sensor["alerts"].as_array().into_iter().flatten() {
            let weight = match alert["severity"].as_str() {
                Some("critical") => 50,
                Some("warning") => 15,
                _ => 5,
            };
            score += weight;
            factors.push(json!({"source": "sensor", "alert": alert, "weight": weight}));
        }

        for hazard in vision["hazards_detected"].as_array().into_iter().flatten() {
            score += 30;
            factors.push(json!({"source": "vision", "hazard": hazard, "weight": 30}));
        }

        let score = score.min(100);
        let level = match score {
            s if s >= CRITICAL_RISK_SCORE => "critical",
            s if s >= 35 => "elevated",
            _ => "low",
        };

        let mut update = StateUpdate::new();
        update.set(
            "risk_assessment",
            json!({"score": score, "level": level, "factors": factors}),
        );

        // Critical risk preempts route planning.
        if level == "critical" {
            Ok(NodeOutput::goto(update, "decision_maker"))
        } else {
            Ok(NodeOutput::new(update))
        }
    })
}

pub fn navigation_planner(descriptor: CapabilityDescriptor) -> Node {
    Node::from_fn(descriptor, |state| {
        let risk = state.get("risk_assessment").cloned().unwrap_or(json!({}));
        let sensor = state.get("sensor_data").cloned().unwrap_or(json!({}));

        let action = match risk["level"].as_str() {
            Some("elevated") => "fall_back_to_staging",
            _ => "proceed_on_planned_route",
        };

        let mut update = StateUpdate::new();
        update.set(
            "navigation_plan",
            json!({
                "action": action,
                "from": sensor.get("location").cloned().unwrap_or(json!({})),
                "avoid_hazards": state
                    .get("vision_analysis")
                    .and_then(|v| v.get("hazards_detected"))
                    .cloned()
                    .unwrap_or(json!([])),
            }),
        );
        Ok(NodeOutput::new(update))
    })
}

pub fn decision_maker(descriptor: CapabilityDescriptor) -> Node {
    Node::from_fn(descriptor, |state| {
        let risk = state.get("risk_assessment").cloned().unwrap_or(json!({}));
        let plan = state.get("navigation_plan").cloned();

        let (action, rationale) = match risk["level"].as_str() {
            Some("critical") => (
                "evacuate_immediately",
                "risk score at or above the critical threshold",
            ),
            Some("elevated") => ("hold_and_reassess", "elevated risk; await next frame"),
            _ => ("continue_operation", "risk within tolerance"),
        };

        let mut update = StateUpdate::new();
        update.set(
            "final_decision",
            json!({
                "action": action,
                "rationale": rationale,
                "risk": risk,
                "navigation_plan": plan,
            }),
        );
        Ok(NodeOutput::end(update))
    })
}
