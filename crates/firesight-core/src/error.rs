use thiserror::Error;

#[derive(Debug, Error)]
pub enum FiresightError {
    // Capability registry errors
    #[error("Capability already registered: {0}")]
    DuplicateCapability(String),

    #[error("Capability not found: {0}")]
    UnknownCapability(String),

    // Graph construction errors
    #[error("Node already registered: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    UnknownNode(String),

    #[error("Node '{from}' already has a static successor: {existing}")]
    AmbiguousEdge { from: String, existing: String },

    #[error("Graph validation failed: {0}")]
    GraphValidation(String),

    // Execution errors
    #[error("Execution exceeded step limit ({0})")]
    StepLimitExceeded(usize),

    #[error("Execution cancelled")]
    Cancelled,

    #[error("Node execution failed: {node}: {message}")]
    NodeExecution { node: String, message: String },

    #[error("Node '{node}' missing required input field: {field}")]
    MissingInput { node: String, field: String },

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FiresightError {
    /// Wrap an arbitrary node-body failure with the failing node's name.
    pub fn node_execution(node: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::NodeExecution {
            node: node.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FiresightError>;
