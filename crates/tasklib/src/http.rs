use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;
use taskcore::{
    object, InputExt, ParamConfig, ParamType, Task, TaskConfig, TaskError, TaskInput, Value,
};

const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// HTTP request task
pub struct HttpRequestTask {
    client: reqwest::Client,
}

impl HttpRequestTask {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpRequestTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for HttpRequestTask {
    fn task_type(&self) -> &str {
        "http-request"
    }

    fn config(&self) -> TaskConfig {
        TaskConfig {
            id: "http-request".to_string(),
            name: "HTTP Request".to_string(),
            category: "action".to_string(),
            description: "Send an HTTP request and capture the response".to_string(),
            params: vec![
                ParamConfig::new("url", ParamType::String, "URL")
                    .required()
                    .with_description("Full request URL"),
                ParamConfig::new("method", ParamType::Select, "Method")
                    .required()
                    .with_default("GET")
                    .with_options(&["GET", "POST", "PUT", "DELETE", "PATCH"]),
                ParamConfig::new("headers", ParamType::Json, "Headers")
                    .with_default(object! {})
                    .with_description("Request headers as a JSON object"),
                ParamConfig::new("body", ParamType::Json, "Body")
                    .with_description("Request body for POST/PUT/PATCH"),
                ParamConfig::new("timeout", ParamType::Number, "Timeout")
                    .with_default(DEFAULT_TIMEOUT_SECS)
                    .with_description("Request timeout in seconds"),
            ],
        }
    }

    async fn execute(&self, input: TaskInput) -> Result<Value, TaskError> {
        let url = input.require_str("url", "URL")?;
        let method = parse_method(input.str_or("method", "GET"))?;
        let timeout = match input.f64_field("timeout") {
            Some(t) if t.is_finite() && t > 0.0 => t,
            _ => DEFAULT_TIMEOUT_SECS,
        };
        let limit = Duration::try_from_secs_f64(timeout).map_err(|_| {
            TaskError::Configuration(format!("timeout out of range: {}", timeout))
        })?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(build_headers(input.get("headers"))?)
            .timeout(limit);

        match input.get("body") {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => request = request.body(text.clone()),
            Some(other) => {
                let json = serde_json::to_vec(other).map_err(|e| {
                    TaskError::ExecutionFailed(format!("failed to serialize body: {}", e))
                })?;
                request = request.body(json);
            }
        }

        tracing::debug!("{} {}", method, url);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TaskError::Timeout {
                    seconds: limit.as_secs_f64().ceil() as u64,
                }
            } else {
                TaskError::ExecutionFailed(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let status_text = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };

        let mut headers: BTreeMap<String, Value> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.to_string())
                .and_modify(|existing| {
                    if let Value::String(s) = existing {
                        s.push_str(", ");
                        s.push_str(&value);
                    }
                })
                .or_insert_with(|| Value::String(value.clone()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TaskError::ExecutionFailed(format!("failed to read response: {}", e)))?;
        let body = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(json) => Value::from(json),
            Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        };

        let data = object! {
            "statusCode" => status.as_u16() as i64,
            "status" => status_text.clone(),
            "body" => body,
            "headers" => headers,
        };

        if status.as_u16() >= 400 {
            return Err(TaskError::Rejected {
                message: format!("HTTP error: {}", status_text),
                data,
            });
        }

        Ok(data)
    }
}

fn parse_method(method: &str) -> Result<Method, TaskError> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        other => Err(TaskError::Configuration(format!("unsupported method: {}", other))),
    }
}

/// JSON content type first, then any string-valued user headers on top
fn build_headers(headers: Option<&Value>) -> Result<HeaderMap, TaskError> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let Some(Value::Object(entries)) = headers else {
        return Ok(map);
    };

    for (key, value) in entries {
        let Some(text) = value.as_str() else {
            continue;
        };
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| TaskError::Configuration(format!("invalid header name: {}", key)))?;
        let value = HeaderValue::from_str(text)
            .map_err(|_| TaskError::Configuration(format!("invalid value for header {}", key)))?;
        map.insert(name, value);
    }

    Ok(map)
}
