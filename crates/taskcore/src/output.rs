use crate::{TaskError, Value};
use serde::{Deserialize, Serialize};

/// Result of a single task execution.
///
/// An empty `error` means success; `data` is only meaningful on success,
/// though some failures carry diagnostic data (e.g. an HTTP 404 response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl TaskOutput {
    pub fn success(data: impl Into<Value>) -> Self {
        Self {
            error: String::new(),
            data: Some(data.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            data: None,
        }
    }

    pub fn failure_with_data(error: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            error: error.into(),
            data: Some(data.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// The `{error, data}` record exposed to successors under `$previous`
    pub fn to_record(&self) -> Value {
        crate::object! {
            "error" => self.error.clone(),
            "data" => self.data.clone(),
        }
    }
}

impl From<Result<Value, TaskError>> for TaskOutput {
    fn from(result: Result<Value, TaskError>) -> Self {
        match result {
            Ok(data) => TaskOutput::success(data),
            Err(e) => e.into(),
        }
    }
}

impl From<TaskError> for TaskOutput {
    fn from(e: TaskError) -> Self {
        let message = e.to_string();
        match e.into_data() {
            Some(data) => TaskOutput::failure_with_data(message, data),
            None => TaskOutput::failure(message),
        }
    }
}
