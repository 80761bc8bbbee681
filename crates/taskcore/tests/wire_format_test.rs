use chrono::{TimeZone, Utc};
use serde_json::json;
use taskcore::{
    object, NodeExecutionLog, RunStatus, TaskInput, TaskOutput, Value, WorkflowExecutionResult,
};
use uuid::Uuid;

#[test]
fn running_entry_has_no_payload() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let entry = NodeExecutionLog::running("n1", "Fetch", ts);

    let json = serde_json::to_value(&entry).unwrap();

    assert_eq!(
        json,
        json!({
            "nodeId": "n1",
            "nodeName": "Fetch",
            "status": "running",
            "message": "Starting task: Fetch",
            "timestamp": "2024-05-01T12:00:00Z"
        })
    );
}

#[test]
fn failed_entry_carries_input_output_and_duration() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap();
    let mut input = TaskInput::new();
    input.insert("url".into(), Value::from(""));

    let entry = NodeExecutionLog::finished(
        "n1",
        "Fetch",
        input,
        TaskOutput::failure("URL must not be empty"),
        7,
        ts,
    );

    let json = serde_json::to_value(&entry).unwrap();

    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Task failed: URL must not be empty");
    assert_eq!(json["input"], json!({"url": ""}));
    assert_eq!(json["output"], json!({"error": "URL must not be empty"}));
    assert_eq!(json["duration"], 7);
}

#[test]
fn result_uses_camel_case_and_omits_empty_fields() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let result = WorkflowExecutionResult {
        execution_id: Uuid::nil(),
        status: RunStatus::Success,
        start_time: ts,
        end_time: ts,
        logs: Vec::new(),
        final_output: Some(TaskOutput::success(object! { "ok" => true })),
        error: None,
    };

    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["startTime"], "2024-05-01T12:00:00Z");
    assert_eq!(json["finalOutput"], json!({"error": "", "data": {"ok": true}}));
    assert!(json.get("error").is_none());
    assert!(json.get("executionId").is_some());
}
