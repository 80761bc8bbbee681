use async_trait::async_trait;
use chrono::Utc;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};
use tokio::time::{sleep, Duration};

const DEFAULT_SECONDS: f64 = 1.0;

/// Pause execution for a number of seconds
pub struct DelayTask;

#[async_trait]
impl Task for DelayTask {
    fn task_type(&self) -> &str {
        "delay"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "delay".to_string(),
            name: "Delay".to_string(),
            category: "action".to_string(),
            description: "Pause execution for the given time".to_string(),
            params: vec![ParamConfig::new("seconds", ParamType::Number, "Seconds")
                .required()
                .with_default(DEFAULT_SECONDS)
                .with_description("How long to pause; 0 continues immediately")],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        // Absent or non-numeric falls back to the default; explicit 0 is honored.
        let seconds = input.f64_field("seconds").unwrap_or(DEFAULT_SECONDS);
        let duration = Duration::try_from_secs_f64(seconds).map_err(|_| {
            TaskError::Configuration(format!(
                "seconds must be a non-negative number within range, got {}",
                seconds
            ))
        })?;

        let start_time = Utc::now();
        sleep(duration).await;
        let end_time = Utc::now();

        Ok(object! {
            "delayed" => true,
            "seconds" => seconds,
            "startTime" => start_time.to_rfc3339(),
            "endTime" => end_time.to_rfc3339(),
            "message" => format!("Delayed {:.1} seconds", seconds),
        })
    }
}
