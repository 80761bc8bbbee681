use crate::{registry::TaskRegistry, sorter::topological_order, WorkflowExecutor};
use std::sync::Arc;
use taskcore::{
    NodeId, TaskConfig, TaskInput, TaskOutput, Workflow, WorkflowError, WorkflowExecutionResult,
};

/// Main entry point shared by the server and the CLI
pub struct TaskflowRuntime {
    registry: Arc<TaskRegistry>,
    executor: WorkflowExecutor,
}

impl TaskflowRuntime {
    /// Create a runtime with an empty registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(TaskRegistry::new()))
    }

    /// Create a runtime around a pre-populated registry
    pub fn with_registry(registry: Arc<TaskRegistry>) -> Self {
        Self {
            registry,
            executor: WorkflowExecutor::new(),
        }
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Execute a workflow definition
    pub async fn run_workflow(&self, workflow: &Workflow) -> WorkflowExecutionResult {
        self.executor.execute(workflow, &self.registry).await
    }

    /// Execute a single task, bypassing the orchestrator
    pub async fn execute_task(&self, task_type: &str, input: TaskInput) -> TaskOutput {
        self.registry.execute(task_type, input).await
    }

    pub fn task_config(&self, task_type: &str) -> Option<TaskConfig> {
        self.registry.get_config(task_type)
    }

    /// Check a workflow without running it.
    ///
    /// Stricter than execution: unknown task types are reported here,
    /// whereas a run would only fail once it reached that node.
    pub fn validate(&self, workflow: &Workflow) -> Result<Vec<NodeId>, WorkflowError> {
        workflow.validate()?;

        let order = topological_order(&workflow.nodes, &workflow.edges)?;
        if order.len() != workflow.nodes.len() {
            return Err(WorkflowError::CyclicDependency);
        }

        if let Some(node) = workflow
            .nodes
            .iter()
            .find(|n| !self.registry.contains(&n.task_type))
        {
            return Err(WorkflowError::UnknownTaskType {
                node: node.id.clone(),
                task_type: node.task_type.clone(),
            });
        }

        Ok(order)
    }
}

impl Default for TaskflowRuntime {
    fn default() -> Self {
        Self::new()
    }
}
