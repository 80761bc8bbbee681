use crate::{TaskInput, Value, WorkflowError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub type NodeId = String;

/// Complete workflow definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: WorkflowNode) -> NodeId {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Declare that `target` depends on the output of `source`
    pub fn connect(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.edges.push(WorkflowEdge {
            source: source.into(),
            target: target.into(),
        });
    }

    /// Parse a workflow definition from JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON workflow file and check its structure
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let workflow = Self::from_json(&fs::read_to_string(path)?)?;
        workflow.validate()?;
        Ok(workflow)
    }

    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check node ids and edge endpoints.
    ///
    /// Cycles are not detected here; ordering is the sorter's job.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        check_structure(&self.nodes, &self.edges)
    }
}

/// Reject empty or duplicate node ids and edges to undeclared nodes
pub fn check_structure(
    nodes: &[WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<(), WorkflowError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if node.id.is_empty() {
            return Err(WorkflowError::EmptyNodeId);
        }
        if !seen.insert(node.id.as_str()) {
            return Err(WorkflowError::DuplicateNodeId(node.id.clone()));
        }
    }

    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !seen.contains(endpoint.as_str()) {
                return Err(WorkflowError::DanglingEdge {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
    }

    Ok(())
}

/// A single task instance within a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub config: TaskInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl WorkflowNode {
    pub fn new(id: impl Into<NodeId>, task_type: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            task_type: task_type.into(),
            config: TaskInput::new(),
            position: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    /// Label for logs and messages, the id when no label was given
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Directed dependency: `target` consumes the output of `source`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Node position in the visual editor; ignored by execution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}
