use crate::{NodeId, TaskInput, TaskOutput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ExecutionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Running,
    Success,
    Error,
}

/// One entry of the execution trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExecutionLog {
    pub node_id: NodeId,
    pub node_name: String,
    pub status: NodeStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<TaskInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TaskOutput>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl NodeExecutionLog {
    pub fn running(node_id: impl Into<NodeId>, label: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            node_id: node_id.into(),
            node_name: label.to_string(),
            status: NodeStatus::Running,
            message: format!("Starting task: {}", label),
            input: None,
            output: None,
            duration: None,
            timestamp,
        }
    }

    /// Terminal entry; status follows `output.is_success()`
    pub fn finished(
        node_id: impl Into<NodeId>,
        label: &str,
        input: TaskInput,
        output: TaskOutput,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (status, message) = if output.is_success() {
            (NodeStatus::Success, format!("Task succeeded: {}", label))
        } else {
            (NodeStatus::Error, format!("Task failed: {}", output.error))
        };

        Self {
            node_id: node_id.into(),
            node_name: label.to_string(),
            status,
            message,
            input: Some(input),
            output: Some(output),
            duration: Some(duration_ms),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// Outcome of one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionResult {
    pub execution_id: ExecutionId,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub logs: Vec<NodeExecutionLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<TaskOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowExecutionResult {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}
