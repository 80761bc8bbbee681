use async_trait::async_trait;
use chrono::Utc;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};

/// Emit a message through the tracing pipeline and echo it back
pub struct LogTask;

#[async_trait]
impl Task for LogTask {
    fn task_type(&self) -> &str {
        "log"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "log".to_string(),
            name: "Log".to_string(),
            category: "action".to_string(),
            description: "Write a log message".to_string(),
            params: vec![
                ParamConfig::new("level", ParamType::Select, "Level")
                    .required()
                    .with_default("info")
                    .with_labeled_options(&[
                        ("Debug", "debug"),
                        ("Info", "info"),
                        ("Warning", "warn"),
                        ("Error", "error"),
                    ]),
                ParamConfig::new("message", ParamType::String, "Message")
                    .required()
                    .with_description("Text to log"),
                ParamConfig::new("data", ParamType::Json, "Data")
                    .with_description("Extra JSON payload"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let level = input.str_or("level", "info");
        let message = input.str_or("message", "(empty message)");
        let data = input.get("data").cloned().unwrap_or(Value::Null);

        match level {
            "debug" => tracing::debug!(target: "taskflow::log", %data, "{}", message),
            "warn" => tracing::warn!(target: "taskflow::log", %data, "{}", message),
            "error" => tracing::error!(target: "taskflow::log", %data, "{}", message),
            _ => tracing::info!(target: "taskflow::log", %data, "{}", message),
        }

        Ok(object! {
            "logged" => true,
            "level" => level,
            "message" => message,
            "data" => data,
            "timestamp" => Utc::now().to_rfc3339(),
        })
    }
}
