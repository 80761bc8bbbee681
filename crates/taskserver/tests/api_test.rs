use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value as Json};
use std::sync::Arc;
use taskrunner::TaskflowRuntime;
use taskserver::{configure, AppState};

fn state() -> web::Data<AppState> {
    let runtime = TaskflowRuntime::with_registry(Arc::new(tasklib::default_registry()));
    web::Data::new(AppState::new(Arc::new(runtime)))
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Json = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn lists_tasks_by_category() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let body: Json = test::call_and_read_body_json(&app, req).await;

    let actions = body["tasks"]["action"].as_array().unwrap();
    let ids: Vec<&str> = actions.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["delay", "http-request", "log"]);
    assert!(body["tasks"]["trigger"].is_array());
}

#[actix_web::test]
async fn task_config_and_unknown_type() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let req = test::TestRequest::get().uri("/api/tasks/delay/config").to_request();
    let body: Json = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], "delay");
    assert_eq!(body["params"][0]["name"], "seconds");
    assert_eq!(body["params"][0]["type"], "number");

    let req = test::TestRequest::get().uri("/api/tasks/nope/config").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Json = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown task type: nope");
}

#[actix_web::test]
async fn executes_single_task() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let req = test::TestRequest::post()
        .uri("/api/tasks/json-parse/execute")
        .set_json(json!({ "input": { "data": "{\"a\": 1}" } }))
        .to_request();
    let body: Json = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "error": "", "data": { "a": 1 } }));
}

#[actix_web::test]
async fn task_failure_is_still_ok_status() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let req = test::TestRequest::post()
        .uri("/api/tasks/http-request/execute")
        .set_json(json!({ "input": { "url": "" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Json = test::read_body_json(resp).await;
    assert_eq!(body["error"], "URL must not be empty");
}

#[actix_web::test]
async fn executes_workflow() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let workflow = json!({
        "workflow": {
            "nodes": [
                { "id": "a", "type": "delay", "label": "Wait", "config": { "seconds": 0 } },
                { "id": "b", "type": "log", "label": "Say", "config": { "message": "hi" } }
            ],
            "edges": [{ "source": "a", "target": "b" }]
        }
    });
    let req = test::TestRequest::post()
        .uri("/api/workflow/execute")
        .set_json(workflow)
        .to_request();
    let body: Json = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "success");
    assert_eq!(body["logs"].as_array().unwrap().len(), 4);
    assert_eq!(body["finalOutput"]["data"]["message"], "hi");
    assert!(body["executionId"].is_string());
}

#[actix_web::test]
async fn cyclic_workflow_reports_error() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let workflow = json!({
        "workflow": {
            "nodes": [
                { "id": "a", "type": "log" },
                { "id": "b", "type": "log" }
            ],
            "edges": [
                { "source": "a", "target": "b" },
                { "source": "b", "target": "a" }
            ]
        }
    });
    let req = test::TestRequest::post()
        .uri("/api/workflow/execute")
        .set_json(workflow)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Json = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["logs"], json!([]));
}

#[actix_web::test]
async fn malformed_body_is_bad_request() {
    let app = test::init_service(App::new().configure(configure(state()))).await;

    let req = test::TestRequest::post()
        .uri("/api/workflow/execute")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Json = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
