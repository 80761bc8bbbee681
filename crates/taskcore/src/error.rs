use crate::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure raised inside a task implementation.
///
/// The registry turns these into a failed `TaskOutput`; they never cross
/// the orchestrator boundary as Rust errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    #[error("{0} must not be empty")]
    MissingField(String),

    #[error("invalid type for '{field}': expected {expected}, got {actual}")]
    InvalidInputType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    ExecutionFailed(String),

    /// A failure that still reports data to the caller
    #[error("{message}")]
    Rejected { message: String, data: Value },

    #[error("timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("unknown task type: {0}")]
    UnknownTaskType(String),
}

impl TaskError {
    pub fn invalid_type(field: &str, expected: &str, actual: &Value) -> Self {
        TaskError::InvalidInputType {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Data attached to the failure, if any
    pub fn into_data(self) -> Option<Value> {
        match self {
            TaskError::Rejected { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Structural problems that make a workflow unexecutable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("edge {from} -> {to} references unknown node {missing}")]
    DanglingEdge {
        from: String,
        to: String,
        missing: String,
    },

    #[error("workflow contains a dependency cycle and cannot be executed")]
    CyclicDependency,

    /// Only raised by up-front validation; at run time an unknown type is
    /// an ordinary node failure.
    #[error("node {node} uses unknown task type: {task_type}")]
    UnknownTaskType { node: String, task_type: String },
}
