use futures::future::BoxFuture;

use firesight_core::capability::CapabilityDescriptor;
use firesight_core::error::{FiresightError, Result};
use firesight_core::state::{StateRecord, StateUpdate};

use crate::directive::Directive;

/// Result of one node invocation: a partial state update plus an optional
/// routing directive.
#[derive(Debug, Clone, Default)]
pub struct NodeOutput {
    /// Fields this invocation contributes, merged into the record on success.
    pub update: StateUpdate,
    /// Where to go next; `None` follows the static edge.
    pub directive: Option<Directive>,
}

impl NodeOutput {
    /// An update that follows the static edge.
    pub fn new(update: StateUpdate) -> Self {
        Self {
            update,
            directive: None,
        }
    }

    /// An update that jumps to the named node.
    pub fn goto(update: StateUpdate, node: impl Into<String>) -> Self {
        Self {
            update,
            directive: Some(Directive::Node(node.into())),
        }
    }

    /// An update that ends the execution.
    pub fn end(update: StateUpdate) -> Self {
        Self {
            update,
            directive: Some(Directive::End),
        }
    }

    /// Override the directive.
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }
}

/// Executable logic bound to a capability.
///
/// The engine treats an invocation as an opaque awaited operation; the body
/// may block, call models, or use internal concurrency. Implementations get
/// their collaborators at construction time, never from global state.
pub trait NodeLogic: Send + Sync + 'static {
    /// One step: read the current state, return a partial update and an
    /// optional routing directive.
    fn invoke<'a>(&'a self, state: &'a StateRecord) -> BoxFuture<'a, Result<NodeOutput>>;
}

/// A capability bound to executable logic within a specific graph.
///
/// Owned by the `GraphBuilder` once registered. `invoke` enforces the
/// descriptor's required-inputs contract against the live state before
/// delegating to the logic.
pub struct Node {
    descriptor: CapabilityDescriptor,
    logic: Box<dyn NodeLogic>,
}

impl Node {
    pub fn new(descriptor: CapabilityDescriptor, logic: impl NodeLogic) -> Self {
        Self {
            descriptor,
            logic: Box::new(logic),
        }
    }

    /// Bind a synchronous closure as the node logic.
    pub fn from_fn<F>(descriptor: CapabilityDescriptor, f: F) -> Self
    where
        F: Fn(&StateRecord) -> Result<NodeOutput> + Send + Sync + 'static,
    {
        Self::new(descriptor, FnLogic(f))
    }

    pub fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Invoke the bound logic with the current state.
    ///
    /// Required inputs are checked first; a missing field fails the
    /// invocation without running the logic.
    pub async fn invoke(&self, state: &StateRecord) -> Result<NodeOutput> {
        for field in &self.descriptor.required_inputs {
            if !state.contains(field) {
                return Err(FiresightError::MissingInput {
                    node: self.descriptor.name.clone(),
                    field: field.clone(),
                });
            }
        }
        self.logic.invoke(state).await
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}

struct FnLogic<F>(F);

impl<F> NodeLogic for FnLogic<F>
where
    F: Fn(&StateRecord) -> Result<NodeOutput> + Send + Sync + 'static,
{
    fn invoke<'a>(&'a self, state: &'a StateRecord) -> BoxFuture<'a, Result<NodeOutput>> {
        Box::pin(async move { (self.0)(state) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor::new("vision_analyzer", "Analyzes visual data")
            .with_required_inputs(vec!["sensor_data".into()])
            .with_outputs(vec!["vision_analysis".into()])
    }

    #[tokio::test]
    async fn test_from_fn_invoke() {
        let node = Node::from_fn(descriptor(), |state| {
            let mut update = StateUpdate::new();
            update.set(
                "vision_analysis",
                serde_json::json!({ "had_sensor_data": state.contains("sensor_data") }),
            );
            Ok(NodeOutput::new(update))
        });

        let mut state = StateRecord::new();
        state.set("sensor_data", serde_json::json!({"temp": 30.0}));

        let output = node.invoke(&state).await.unwrap();
        assert!(output.directive.is_none());
        assert_eq!(
            output.update.get("vision_analysis"),
            Some(&serde_json::json!({"had_sensor_data": true}))
        );
    }

    #[tokio::test]
    async fn test_missing_required_input() {
        let node = Node::from_fn(descriptor(), |_| Ok(NodeOutput::default()));

        let err = node.invoke(&StateRecord::new()).await.unwrap_err();
        assert!(matches!(
            err,
            FiresightError::MissingInput { node, field }
                if node == "vision_analyzer" && field == "sensor_data"
        ));
    }

    #[tokio::test]
    async fn test_output_constructors() {
        let end = NodeOutput::end(StateUpdate::new());
        assert_eq!(end.directive, Some(Directive::End));

        let jump = NodeOutput::goto(StateUpdate::new(), "decision_maker");
        assert_eq!(jump.directive, Some(Directive::node("decision_maker")));
    }
}
