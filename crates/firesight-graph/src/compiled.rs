use std::collections::HashMap;
use std::sync::Arc;

use crate::node::Node;

/// The validated, immutable result of graph construction.
///
/// Holds the node map, the static-successor adjacency, and the entry point.
/// Created by `GraphBuilder::compile`; never mutated afterwards. Safe to
/// share behind `Arc` across any number of concurrent executions.
#[derive(Debug)]
pub struct CompiledGraph {
    nodes: HashMap<String, Arc<Node>>,
    successors: HashMap<String, String>,
    entry: String,
}

impl CompiledGraph {
    pub(crate) fn new(
        nodes: HashMap<String, Arc<Node>>,
        successors: HashMap<String, String>,
        entry: String,
    ) -> Self {
        Self {
            nodes,
            successors,
            entry,
        }
    }

    /// The entry point node name.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Arc<Node>> {
        self.nodes.get(name)
    }

    /// Whether a node is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// The static successor of `name`, if one was declared.
    pub fn static_successor(&self, name: &str) -> Option<&str> {
        self.successors.get(name).map(String::as_str)
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All registered node names.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }
}
