use crate::{TaskError, TaskInput, Value};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reserved input key holding predecessor outputs
pub const PREVIOUS_KEY: &str = "$previous";

/// Core trait that all executable task types implement
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique type identifier (e.g., "http-request", "delay")
    fn task_type(&self) -> &str;

    /// Declared parameter schema, used for form generation
    fn config(&self) -> TaskConfig;

    /// Run the task against a composed input
    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError>;
}

/// Describes a task type and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub params: Vec<ParamConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub label: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParamOption>,
}

impl ParamConfig {
    pub fn new(name: impl Into<String>, param_type: ParamType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            label: label.into(),
            required: false,
            default: None,
            description: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Options whose label equals their value
    pub fn with_options(mut self, values: &[&str]) -> Self {
        self.options = values
            .iter()
            .map(|v| ParamOption {
                label: v.to_string(),
                value: Value::from(*v),
            })
            .collect();
        self
    }

    pub fn with_labeled_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(label, value)| ParamOption {
                label: label.to_string(),
                value: Value::from(*value),
            })
            .collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Select,
    Json,
    Textarea,
    Password,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamOption {
    pub label: String,
    pub value: Value,
}

/// Typed lookups over a composed input
pub trait InputExt {
    /// String field, `None` when absent or not a string
    fn str_field(&self, key: &str) -> Option<&str>;

    /// String field, falling back to `default` when absent or empty
    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str;

    /// Non-empty string field or `TaskError::MissingField(label)`
    fn require_str(&self, key: &str, label: &str) -> Result<&str, TaskError>;

    fn f64_field(&self, key: &str) -> Option<f64>;

    fn bool_or(&self, key: &str, default: bool) -> bool;

    /// Present and not null
    fn value(&self, key: &str) -> Option<&Value>;

    /// Data of the first recorded predecessor under `$previous`
    fn previous_data(&self) -> Option<&Value>;

    /// `key` if set, else the first predecessor's data
    fn value_or_previous(&self, key: &str) -> Option<&Value> {
        self.value(key).or_else(|| self.previous_data())
    }
}

impl InputExt for TaskInput {
    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.str_field(key) {
            Some(s) if !s.is_empty() => s,
            _ => default,
        }
    }

    fn require_str(&self, key: &str, label: &str) -> Result<&str, TaskError> {
        match self.str_field(key) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(TaskError::MissingField(label.to_string())),
        }
    }

    fn f64_field(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    fn previous_data(&self) -> Option<&Value> {
        self.get(PREVIOUS_KEY)?
            .as_object()?
            .values()
            .find_map(|record| record.as_object().and_then(|r| r.get("data")))
            .filter(|data| !data.is_null())
    }
}
