//! HTTP transport for the task runtime

pub mod config;

use actix_cors::Cors;
use actix_web::{error, get, post, web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskcore::{TaskInput, Workflow};
use taskrunner::TaskflowRuntime;
use tracing::{info, warn};

pub use config::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub runtime: Arc<TaskflowRuntime>,
}

impl AppState {
    pub fn new(runtime: Arc<TaskflowRuntime>) -> Self {
        Self { runtime }
    }
}

/// Request body for single task execution
#[derive(Debug, Deserialize)]
struct ExecuteTaskRequest {
    #[serde(default)]
    input: TaskInput,
}

/// Request body for workflow execution
#[derive(Debug, Deserialize)]
struct ExecuteWorkflowRequest {
    workflow: Workflow,
}

/// Error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Task types grouped by category
#[get("/api/tasks")]
async fn list_tasks(data: web::Data<AppState>) -> impl Responder {
    let tasks = data.runtime.registry().list_by_category();
    HttpResponse::Ok().json(serde_json::json!({ "tasks": tasks }))
}

#[get("/api/tasks/{task_type}/config")]
async fn task_config(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let task_type = path.into_inner();

    match data.runtime.task_config(&task_type) {
        Some(config) => HttpResponse::Ok().json(config),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("unknown task type: {}", task_type),
        }),
    }
}

/// Run one task directly; task failures are reported in the body, not the status
#[post("/api/tasks/{task_type}/execute")]
async fn execute_task(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ExecuteTaskRequest>,
) -> impl Responder {
    let task_type = path.into_inner();
    info!("Executing task: {}", task_type);

    let output = data
        .runtime
        .execute_task(&task_type, req.into_inner().input)
        .await;
    if !output.is_success() {
        warn!("Task {} failed: {}", task_type, output.error);
    }

    HttpResponse::Ok().json(output)
}

#[post("/api/workflow/execute")]
async fn execute_workflow(
    data: web::Data<AppState>,
    req: web::Json<ExecuteWorkflowRequest>,
) -> impl Responder {
    let workflow = req.into_inner().workflow;
    info!(
        "Executing workflow: {} nodes, {} edges",
        workflow.nodes.len(),
        workflow.edges.len()
    );

    let result = data.runtime.run_workflow(&workflow).await;
    HttpResponse::Ok().json(result)
}

/// Malformed JSON bodies become `400 {error}`
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!("Rejected request body: {}", message);
        let response = HttpResponse::BadRequest().json(ErrorResponse { error: message });
        error::InternalError::from_response(err, response).into()
    })
}

/// Register routes and shared state on an app or scope
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(json_config())
            .service(health_check)
            .service(list_tasks)
            .service(task_config)
            .service(execute_task)
            .service(execute_workflow);
    }
}

/// CORS policy for the configured front-end origins
pub fn cors(config: &ServerConfig) -> Cors {
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
