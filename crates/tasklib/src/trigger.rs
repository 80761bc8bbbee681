use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};

const DEFAULT_INTERVAL_SECS: f64 = 60.0;

/// Describes when a workflow would fire.
///
/// Nothing is scheduled here; the task validates the schedule and reports it
/// so a run can start with a trigger node.
pub struct ScheduleTriggerTask;

#[async_trait]
impl Task for ScheduleTriggerTask {
    fn task_type(&self) -> &str {
        "schedule-trigger"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "schedule-trigger".to_string(),
            name: "Schedule Trigger".to_string(),
            category: "trigger".to_string(),
            description: "Trigger the workflow on a schedule".to_string(),
            params: vec![
                ParamConfig::new("scheduleType", ParamType::Select, "Schedule type")
                    .required()
                    .with_default("once")
                    .with_labeled_options(&[
                        ("Cron expression", "cron"),
                        ("Fixed interval", "interval"),
                        ("Run once", "once"),
                    ]),
                ParamConfig::new("cronExpression", ParamType::String, "Cron expression")
                    .with_description("Format: minute hour day month weekday"),
                ParamConfig::new("intervalSeconds", ParamType::Number, "Interval")
                    .with_default(DEFAULT_INTERVAL_SECS)
                    .with_description("Seconds between runs"),
                ParamConfig::new("executeAt", ParamType::String, "Execute at")
                    .with_description("ISO 8601 timestamp"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let now = Utc::now();

        match input.str_or("scheduleType", "once") {
            "cron" => {
                let expression = input.require_str("cronExpression", "cron expression")?;
                let schedule = parse_cron(expression)?;
                let next_fire = schedule.upcoming(Utc).next().map(|t| t.to_rfc3339());

                Ok(object! {
                    "triggered" => true,
                    "scheduleType" => "cron",
                    "cronExpression" => expression,
                    "nextFireAt" => next_fire,
                    "triggeredAt" => now.to_rfc3339(),
                    "message" => format!("cron schedule configured: {}", expression),
                })
            }
            "interval" => {
                let interval = match input.f64_field("intervalSeconds") {
                    Some(secs) if secs > 0.0 => secs,
                    _ => DEFAULT_INTERVAL_SECS,
                };

                Ok(object! {
                    "triggered" => true,
                    "scheduleType" => "interval",
                    "intervalSeconds" => interval,
                    "triggeredAt" => now.to_rfc3339(),
                    "message" => format!(
                        "interval schedule configured: every {:.0} seconds",
                        interval
                    ),
                })
            }
            "once" => match input.str_field("executeAt").filter(|s| !s.is_empty()) {
                Some(raw) => {
                    let at = parse_execute_at(raw)?;
                    Ok(object! {
                        "triggered" => true,
                        "scheduleType" => "once",
                        "executeAt" => at.to_rfc3339(),
                        "triggeredAt" => now.to_rfc3339(),
                        "message" => format!(
                            "one-off run configured: {}",
                            at.format("%Y-%m-%d %H:%M:%S")
                        ),
                    })
                }
                None => Ok(object! {
                    "triggered" => true,
                    "scheduleType" => "once",
                    "triggeredAt" => now.to_rfc3339(),
                    "message" => "running immediately",
                }),
            },
            other => Err(TaskError::Configuration(format!(
                "unknown schedule type: {}",
                other
            ))),
        }
    }
}

/// Accepts classic five-field expressions by prepending a seconds field.
fn parse_cron(expression: &str) -> Result<Schedule, TaskError> {
    let expression = expression.trim();
    let normalized = if expression.split_whitespace().count() == 5 {
        format!("0 {}", expression)
    } else {
        expression.to_string()
    };

    Schedule::from_str(&normalized).map_err(|e| {
        TaskError::Configuration(format!(
            "invalid cron expression '{}': {}",
            expression, e
        ))
    })
}

fn parse_execute_at(raw: &str) -> Result<DateTime<Utc>, TaskError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| TaskError::Configuration(format!("invalid executeAt time: {}", raw)))
}
