use async_trait::async_trait;
use std::collections::BTreeMap;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};

/// Reshape an object: extract, rename, add, remove or merge fields
pub struct DataTransformTask;

#[async_trait]
impl Task for DataTransformTask {
    fn task_type(&self) -> &str {
        "data-transform"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "data-transform".to_string(),
            name: "Data Transform".to_string(),
            category: "transform".to_string(),
            description: "Transform object fields".to_string(),
            params: vec![
                ParamConfig::new("operation", ParamType::Select, "Operation")
                    .required()
                    .with_default("extract")
                    .with_labeled_options(&[
                        ("Extract fields", "extract"),
                        ("Rename fields", "rename"),
                        ("Add fields", "add"),
                        ("Remove fields", "remove"),
                        ("Merge object", "merge"),
                    ]),
                ParamConfig::new("sourceData", ParamType::Json, "Source data")
                    .with_description("Data to transform; defaults to the previous step's output"),
                ParamConfig::new("fields", ParamType::Json, "Fields")
                    .with_description("Field list or mapping"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let operation = input.str_or("operation", "extract");
        let source = input
            .value_or_previous("sourceData")
            .ok_or_else(|| TaskError::ExecutionFailed("no data to transform".to_string()))?;
        let fields = input.get("fields");

        let result = match operation {
            "extract" => {
                let names = string_list(fields, "provide the fields to extract")?;
                let source = require_object(source)?;
                names
                    .iter()
                    .filter_map(|name| source.get(*name).map(|v| (name.to_string(), v.clone())))
                    .collect()
            }
            "rename" => {
                let mapping = non_empty_object(fields, "provide a field rename mapping")?;
                require_object(source)?
                    .iter()
                    .map(|(key, value)| {
                        let new_key = mapping
                            .get(key)
                            .and_then(Value::as_str)
                            .unwrap_or(key.as_str());
                        (new_key.to_string(), value.clone())
                    })
                    .collect()
            }
            "add" => {
                let additions = non_empty_object(fields, "provide the fields to add")?;
                let mut result = source.as_object().cloned().unwrap_or_default();
                result.extend(additions.iter().map(|(k, v)| (k.clone(), v.clone())));
                result
            }
            "remove" => {
                let names = string_list(fields, "provide the fields to remove")?;
                let mut result = require_object(source)?.clone();
                for name in names {
                    result.remove(name);
                }
                result
            }
            "merge" => {
                let other = fields
                    .and_then(Value::as_object)
                    .ok_or_else(|| {
                        TaskError::Configuration("provide the data to merge".to_string())
                    })?;
                let mut result = source.as_object().cloned().unwrap_or_default();
                result.extend(other.iter().map(|(k, v)| (k.clone(), v.clone())));
                result
            }
            other => {
                return Err(TaskError::Configuration(format!(
                    "unknown transform operation: {}",
                    other
                )))
            }
        };

        Ok(Value::Object(result))
    }
}

/// Parse a JSON string, or render a value as JSON text
pub struct JsonParseTask;

#[async_trait]
impl Task for JsonParseTask {
    fn task_type(&self) -> &str {
        "json-parse"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "json-parse".to_string(),
            name: "JSON Parse".to_string(),
            category: "transform".to_string(),
            description: "Parse or serialize JSON data".to_string(),
            params: vec![
                ParamConfig::new("operation", ParamType::Select, "Operation")
                    .required()
                    .with_default("parse")
                    .with_labeled_options(&[
                        ("Parse JSON", "parse"),
                        ("Serialize to JSON", "stringify"),
                    ]),
                ParamConfig::new("data", ParamType::Json, "Data")
                    .with_description("Data to process; defaults to the previous step's output"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let data = input.value_or_previous("data").cloned().unwrap_or(Value::Null);

        match input.str_or("operation", "parse") {
            "parse" => match data {
                Value::String(text) => serde_json::from_str::<serde_json::Value>(&text)
                    .map(Value::from)
                    .map_err(|e| TaskError::ExecutionFailed(format!("JSON parse error: {}", e))),
                // Already structured
                other => Ok(other),
            },
            "stringify" => {
                let json = serde_json::to_string_pretty(&data).map_err(|e| {
                    TaskError::ExecutionFailed(format!("JSON stringify error: {}", e))
                })?;
                Ok(object! { "json" => json })
            }
            other => Err(TaskError::Configuration(format!("unknown JSON operation: {}", other))),
        }
    }
}

fn require_object(value: &Value) -> Result<&BTreeMap<String, Value>, TaskError> {
    value
        .as_object()
        .ok_or_else(|| TaskError::invalid_type("sourceData", "object", value))
}

fn non_empty_object<'a>(
    value: Option<&'a Value>,
    message: &str,
) -> Result<&'a BTreeMap<String, Value>, TaskError> {
    value
        .and_then(Value::as_object)
        .filter(|map| !map.is_empty())
        .ok_or_else(|| TaskError::Configuration(message.to_string()))
}

/// String entries of an array; non-strings are skipped
fn string_list<'a>(value: Option<&'a Value>, message: &str) -> Result<Vec<&'a str>, TaskError> {
    let names: Vec<&str> = value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if names.is_empty() {
        return Err(TaskError::Configuration(message.to_string()));
    }
    Ok(names)
}
