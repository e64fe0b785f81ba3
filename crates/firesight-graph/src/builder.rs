use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use firesight_core::error::{FiresightError, Result};

use crate::compiled::CompiledGraph;
use crate::node::Node;

/// Accumulates nodes and static edges, then compiles a validated graph.
///
/// Each node has at most one static successor; richer branching is
/// expressed at runtime via routing directives. `compile()` consumes the
/// builder and fails fast on the first violation found.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: HashMap<String, Arc<Node>>,
    successors: HashMap<String, String>,
    entry: Option<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under a unique name.
    pub fn add_node(&mut self, name: impl Into<String>, node: Node) -> Result<&mut Self> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(FiresightError::DuplicateNode(name));
        }
        debug!(node = %name, capability = %node.name(), "Registering graph node");
        self.nodes.insert(name, Arc::new(node));
        Ok(self)
    }

    /// Register a static transition, taken when `from` emits no directive.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<&mut Self> {
        if !self.nodes.contains_key(from) {
            return Err(FiresightError::UnknownNode(from.to_string()));
        }
        if !self.nodes.contains_key(to) {
            return Err(FiresightError::UnknownNode(to.to_string()));
        }
        if let Some(existing) = self.successors.get(from) {
            return Err(FiresightError::AmbiguousEdge {
                from: from.to_string(),
                existing: existing.clone(),
            });
        }
        self.successors.insert(from.to_string(), to.to_string());
        Ok(self)
    }

    /// Fix the node execution starts from.
    pub fn set_entry_point(&mut self, name: &str) -> Result<&mut Self> {
        if !self.nodes.contains_key(name) {
            return Err(FiresightError::UnknownNode(name.to_string()));
        }
        self.entry = Some(name.to_string());
        Ok(self)
    }

    /// Validate and produce an immutable `CompiledGraph`.
    ///
    /// Checks, in order, failing on the first violation:
    /// 1. an entry point is set;
    /// 2. every edge endpoint is a registered node;
    /// 3. every node is reachable from the entry via static edges — nodes
    ///    that are not are only warned about, since dynamic-only
    ///    reachability cannot be statically proven;
    /// 4. no node is its own static successor (self-loops only via
    ///    dynamic routing, which is expected to re-check progress).
    pub fn compile(self) -> Result<CompiledGraph> {
        let entry = self
            .entry
            .clone()
            .ok_or_else(|| FiresightError::GraphValidation("no entry point set".into()))?;

        for (from, to) in &self.successors {
            if !self.nodes.contains_key(from) {
                return Err(FiresightError::UnknownNode(from.clone()));
            }
            if !self.nodes.contains_key(to) {
                return Err(FiresightError::UnknownNode(to.clone()));
            }
        }

        {
            let reachable = self.statically_reachable(&entry);
            for name in self.nodes.keys() {
                if !reachable.contains(name.as_str()) {
                    warn!(
                        node = %name,
                        "Node not reachable from entry via static edges; assuming dynamic routing"
                    );
                }
            }
        }

        for (from, to) in &self.successors {
            if from == to {
                return Err(FiresightError::GraphValidation(format!(
                    "node '{from}' is its own static successor"
                )));
            }
        }

        debug!(
            entry = %entry,
            nodes = self.nodes.len(),
            edges = self.successors.len(),
            "Graph compiled"
        );
        Ok(CompiledGraph::new(self.nodes, self.successors, entry))
    }

    fn statically_reachable<'a>(&'a self, entry: &'a str) -> HashSet<&'a str> {
        let mut reachable = HashSet::new();
        let mut current = entry;
        while reachable.insert(current) {
            match self.successors.get(current) {
                Some(next) => current = next.as_str(),
                None => break,
            }
        }
        reachable
    }
}
