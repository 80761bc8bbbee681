//! Core abstractions for the task-flow engine
//!
//! This crate provides the data model shared by every other crate:
//! dynamic values, workflow definitions, task outputs, execution traces
//! and the `Task` trait. It performs no execution itself.

mod error;
mod execution;
mod output;
mod task;
mod value;
mod workflow;

pub use error::{FlowError, TaskError, WorkflowError};
pub use execution::{
    ExecutionId, NodeExecutionLog, NodeStatus, RunStatus, WorkflowExecutionResult,
};
pub use output::TaskOutput;
pub use task::{InputExt, ParamConfig, ParamOption, ParamType, Task, TaskConfig, PREVIOUS_KEY};
pub use value::{TaskInput, Value};
pub use workflow::{check_structure, NodeId, Position, Workflow, WorkflowEdge, WorkflowNode};

/// Result type for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;
