use serde::{Deserialize, Serialize};

/// Routing directive returned by a node.
///
/// Control, not content: a directive is a distinct return value, never a
/// state field, so downstream merges cannot overwrite it.
///
/// - **Node(name)**: run the named node next, overriding any static edge.
/// - **End**: stop; the current record becomes the final result.
///
/// A node that returns no directive (`None`) follows its static edge, or
/// stops if it has none (implicit sink).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    /// Run the node with the given name next.
    Node(String),
    /// Stop and return the current state.
    End,
}

impl Directive {
    /// Convenience constructor for a dynamic jump.
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node(name.into())
    }
}
