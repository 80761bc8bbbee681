use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskcore::{
    object, InputExt, NodeStatus, RunStatus, Task, TaskConfig, TaskError, TaskInput, TaskOutput,
    Value, Workflow, WorkflowNode,
};
use taskrunner::{topological_order, TaskRegistry, TaskflowRuntime};

/// Returns its input, minus `$previous`, as data
struct EchoTask;

#[async_trait]
impl Task for EchoTask {
    fn task_type(&self) -> &str {
        "echo"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "echo".into(),
            name: "Echo".into(),
            category: "test".into(),
            description: "Echoes its input".into(),
            params: Vec::new(),
        }
    }

    async fn execute(&self, mut input: TaskInput) -> Result<Value, TaskError> {
        input.remove(taskcore::PREVIOUS_KEY);
        Ok(Value::Object(input))
    }
}

/// Fails when `fail` is true, counting every call
struct FlakyTask {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Task for FlakyTask {
    fn task_type(&self) -> &str {
        "flaky"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "flaky".into(),
            name: "Flaky".into(),
            category: "test".into(),
            description: "Fails on demand".into(),
            params: Vec::new(),
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input.bool_or("fail", false) {
            Err(TaskError::ExecutionFailed("asked to fail".into()))
        } else {
            Ok(object! { "ok" => true })
        }
    }
}

fn runtime() -> (TaskflowRuntime, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = TaskRegistry::new();
    registry.register(Arc::new(EchoTask));
    registry.register(Arc::new(FlakyTask { calls: calls.clone() }));
    (TaskflowRuntime::with_registry(Arc::new(registry)), calls)
}

fn chain(ids: &[(&str, &str)]) -> Workflow {
    let mut workflow = Workflow::new();
    for (id, task_type) in ids {
        workflow.add_node(WorkflowNode::new(*id, *task_type).with_label(id.to_uppercase()));
    }
    for pair in ids.windows(2) {
        workflow.connect(pair[0].0, pair[1].0);
    }
    workflow
}

#[tokio::test]
async fn successful_chain_logs_running_then_success_per_node() {
    let (runtime, _) = runtime();
    let mut workflow = chain(&[("a", "echo"), ("b", "echo")]);
    workflow.nodes[0].config.insert("x".into(), Value::Number(1.0));

    let result = runtime.run_workflow(&workflow).await;

    assert_eq!(result.status, RunStatus::Success);
    assert!(result.error.is_none());
    let statuses: Vec<(&str, NodeStatus)> = result
        .logs
        .iter()
        .map(|l| (l.node_id.as_str(), l.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a", NodeStatus::Running),
            ("a", NodeStatus::Success),
            ("b", NodeStatus::Running),
            ("b", NodeStatus::Success),
        ]
    );
    // b sees a's field through flattening and echoes it back
    assert_eq!(
        result.final_output,
        Some(TaskOutput::success(object! { "x" => 1.0 }))
    );
}

#[tokio::test]
async fn failure_aborts_before_downstream_nodes() {
    let (runtime, calls) = runtime();
    let mut workflow = chain(&[("a", "flaky"), ("b", "flaky"), ("c", "flaky")]);
    workflow.nodes[1].config.insert("fail".into(), Value::Bool(true));

    let result = runtime.run_workflow(&workflow).await;

    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.logs.len(), 4);
    assert!(result.logs.iter().all(|l| l.node_id != "c"));
    assert_eq!(result.logs[3].status, NodeStatus::Error);
    assert_eq!(result.final_output, Some(TaskOutput::failure("asked to fail")));
    assert_eq!(result.error.as_deref(), Some("Task \"B\" failed: asked to fail"));
}

#[tokio::test]
async fn cycle_is_rejected_without_running_anything() {
    let (runtime, calls) = runtime();
    let mut workflow = chain(&[("a", "flaky"), ("b", "flaky")]);
    workflow.connect("b", "a");

    let order = topological_order(&workflow.nodes, &workflow.edges).unwrap();
    assert!(order.len() < workflow.nodes.len());

    let result = runtime.run_workflow(&workflow).await;

    assert_eq!(result.status, RunStatus::Error);
    assert!(result.logs.is_empty());
    assert!(result.final_output.is_none());
    assert!(result.error.unwrap().contains("cycle"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dangling_edge_is_a_structural_error() {
    let (runtime, calls) = runtime();
    let mut workflow = chain(&[("a", "flaky")]);
    workflow.connect("a", "missing");

    let result = runtime.run_workflow(&workflow).await;

    assert_eq!(result.status, RunStatus::Error);
    assert!(result.logs.is_empty());
    assert!(result.error.unwrap().contains("missing"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_task_type_fails_like_any_node() {
    let (runtime, _) = runtime();
    let workflow = chain(&[("a", "echo"), ("b", "no-such-task")]);

    let result = runtime.run_workflow(&workflow).await;

    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.logs.len(), 4);
    assert_eq!(
        result.final_output,
        Some(TaskOutput::failure("unknown task type: no-such-task"))
    );
}

#[tokio::test]
async fn empty_workflow_succeeds_without_output() {
    let (runtime, _) = runtime();

    let result = runtime.run_workflow(&Workflow::new()).await;

    assert_eq!(result.status, RunStatus::Success);
    assert!(result.logs.is_empty());
    assert!(result.final_output.is_none());
}

#[tokio::test]
async fn final_output_is_last_executed_node() {
    let (runtime, _) = runtime();
    let mut workflow = Workflow::new();
    workflow.add_node(WorkflowNode::new("root", "echo").with_config("branch", "root"));
    workflow.add_node(WorkflowNode::new("left", "echo").with_config("branch", "left"));
    workflow.add_node(WorkflowNode::new("right", "echo").with_config("branch", "right"));
    workflow.connect("root", "left");
    workflow.connect("root", "right");

    let result = runtime.run_workflow(&workflow).await;

    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.logs.len(), 6);
    let data = result.final_output.and_then(|o| o.data).unwrap();
    assert_eq!(data.get_path("branch"), Some(&Value::from("right")));
}

#[tokio::test]
async fn reruns_produce_identical_logs_modulo_timing() {
    let (runtime, _) = runtime();
    let mut workflow = chain(&[("a", "echo"), ("b", "echo"), ("c", "echo")]);
    workflow.nodes[0].config.insert("seed".into(), Value::from("s"));

    let strip = |result: taskcore::WorkflowExecutionResult| {
        result
            .logs
            .into_iter()
            .map(|l| (l.node_id, l.status, l.message, l.input, l.output))
            .collect::<Vec<_>>()
    };

    let first = strip(runtime.run_workflow(&workflow).await);
    let second = strip(runtime.run_workflow(&workflow).await);

    assert_eq!(first, second);
}

#[tokio::test]
async fn validate_reports_unknown_task_types() {
    let (runtime, _) = runtime();
    let workflow = chain(&[("a", "echo"), ("b", "mystery")]);

    let err = runtime.validate(&workflow).unwrap_err();

    assert_eq!(
        err,
        taskcore::WorkflowError::UnknownTaskType {
            node: "b".into(),
            task_type: "mystery".into(),
        }
    );
}

#[tokio::test]
async fn validate_returns_execution_order() {
    let (runtime, _) = runtime();
    let workflow = chain(&[("a", "echo"), ("b", "flaky")]);

    assert_eq!(runtime.validate(&workflow).unwrap(), vec!["a", "b"]);
}
