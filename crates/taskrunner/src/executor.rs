use crate::composer::compose_input;
use crate::registry::TaskRegistry;
use crate::sorter::topological_order;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Instant;
use taskcore::{
    ExecutionId, NodeExecutionLog, RunStatus, TaskOutput, Workflow, WorkflowError,
    WorkflowExecutionResult, WorkflowNode,
};
use tracing::Instrument;

/// Executes workflows one node at a time in dependency order
pub struct WorkflowExecutor;

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run a workflow to completion or first failure.
    ///
    /// Every outcome, structural problems included, is reported through the
    /// returned result; nothing is raised to the caller.
    pub async fn execute(
        &self,
        workflow: &Workflow,
        registry: &TaskRegistry,
    ) -> WorkflowExecutionResult {
        let execution_id = ExecutionId::new_v4();
        let span = tracing::info_span!("workflow", %execution_id);

        async move {
            tracing::info!(
                nodes = workflow.nodes.len(),
                edges = workflow.edges.len(),
                "Starting workflow execution"
            );

            let result = self.run(execution_id, workflow, registry).await;

            match &result.error {
                None => tracing::info!(logs = result.logs.len(), "Workflow completed"),
                Some(error) => {
                    tracing::error!(logs = result.logs.len(), "Workflow failed: {}", error)
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        execution_id: ExecutionId,
        workflow: &Workflow,
        registry: &TaskRegistry,
    ) -> WorkflowExecutionResult {
        let start_time = Utc::now();
        let mut logs = Vec::new();

        let order = match topological_order(&workflow.nodes, &workflow.edges) {
            Ok(order) if order.len() == workflow.nodes.len() => order,
            Ok(_) => {
                return structural_error(execution_id, start_time, WorkflowError::CyclicDependency)
            }
            Err(e) => return structural_error(execution_id, start_time, e),
        };

        let node_map: HashMap<&str, &WorkflowNode> =
            workflow.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut prior_outputs: HashMap<String, TaskOutput> = HashMap::new();
        let mut final_output: Option<TaskOutput> = None;

        for node_id in order {
            let Some(node) = node_map.get(node_id.as_str()) else {
                continue;
            };

            let label = node.display_label();
            let node_started = Instant::now();
            logs.push(NodeExecutionLog::running(node_id.as_str(), label, Utc::now()));

            let input = compose_input(&node_id, &node.config, &workflow.edges, &prior_outputs);

            tracing::debug!(node = %node_id, task_type = %node.task_type, "Executing node");
            let output = registry.execute(&node.task_type, input.clone()).await;

            // Recorded before the success check so a failing node's output
            // is still visible in the outputs map.
            prior_outputs.insert(node_id.clone(), output.clone());

            let duration_ms = node_started.elapsed().as_millis() as u64;
            let end_time = Utc::now();
            logs.push(NodeExecutionLog::finished(
                node_id.as_str(),
                label,
                input,
                output.clone(),
                duration_ms,
                end_time,
            ));

            if !output.is_success() {
                tracing::warn!(
                    node = %node_id,
                    "Node failed after {}ms: {}",
                    duration_ms,
                    output.error
                );
                let error = format!("Task \"{}\" failed: {}", label, output.error);
                return WorkflowExecutionResult {
                    execution_id,
                    status: RunStatus::Error,
                    start_time,
                    end_time,
                    logs,
                    final_output: Some(output),
                    error: Some(error),
                };
            }

            tracing::debug!(node = %node_id, "Node completed in {}ms", duration_ms);
            final_output = Some(output);
        }

        WorkflowExecutionResult {
            execution_id,
            status: RunStatus::Success,
            start_time,
            end_time: Utc::now(),
            logs,
            final_output,
            error: None,
        }
    }
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn structural_error(
    execution_id: ExecutionId,
    start_time: chrono::DateTime<Utc>,
    error: WorkflowError,
) -> WorkflowExecutionResult {
    WorkflowExecutionResult {
        execution_id,
        status: RunStatus::Error,
        start_time,
        end_time: Utc::now(),
        logs: Vec::new(),
        final_output: None,
        error: Some(error.to_string()),
    }
}
