//! HTTP API tests, through the router and over a real socket.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use task_manager::config::AppConfig;
use task_manager::http::X_REQUEST_ID;
use task_manager::logger::Level;

mod common;

use common::{empty_request, json_request, send};

#[tokio::test]
async fn test_create_and_get_task() {
    let (router, logger, _sink) = common::test_router(Level::Info);

    let (res, created) = send(
        &router,
        json_request("POST", "/tasks", r#"{"title":"write docs","description":"api"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    assert_eq!(created["title"], "write docs");
    assert_eq!(created["description"], "api");
    assert_eq!(created["status"], "pending");

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 32);

    let (res, fetched) = send(&router, empty_request("GET", &format!("/tasks/{id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(fetched, created);

    logger.close().await;
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (router, logger, _sink) = common::test_router(Level::Info);

    let (res, body) = send(&router, json_request("POST", "/tasks", "{not json")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid request format"}));

    let (res, body) = send(&router, json_request("POST", "/tasks", r#"{"title":""}"#)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "title is required"}));

    let (res, body) = send(&router, json_request("POST", "/tasks", r#"{"description":"no title"}"#)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "title is required"}));

    logger.close().await;
}

#[tokio::test]
async fn test_unknown_task_is_404() {
    let (router, logger, _sink) = common::test_router(Level::Info);

    let (res, body) = send(&router, empty_request("GET", "/tasks/missing")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "task not found"}));

    let (res, _) = send(
        &router,
        json_request("PATCH", "/tasks/missing", r#"{"status":"completed"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (res, _) = send(&router, empty_request("DELETE", "/tasks/missing")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    logger.close().await;
}

#[tokio::test]
async fn test_list_filter_and_status_update() {
    let (router, logger, _sink) = common::test_router(Level::Info);

    let (_, a) = send(&router, json_request("POST", "/tasks", r#"{"title":"a"}"#)).await;
    let (_, _b) = send(&router, json_request("POST", "/tasks", r#"{"title":"b"}"#)).await;
    let a_id = a["id"].as_str().unwrap();

    let (res, updated) = send(
        &router,
        json_request("PATCH", &format!("/tasks/{a_id}"), r#"{"status":"completed"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(updated["status"], "completed");

    let (res, all) = send(&router, empty_request("GET", "/tasks")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, completed) = send(&router, empty_request("GET", "/tasks?status=completed")).await;
    let completed = completed.as_array().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["id"], a_id);

    let (_, empty_filter) = send(&router, empty_request("GET", "/tasks?status=")).await;
    assert_eq!(empty_filter.as_array().unwrap().len(), 2);

    let (res, body) = send(&router, empty_request("GET", "/tasks?status=done")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid status parameter"}));

    let (res, body) = send(
        &router,
        json_request("PATCH", &format!("/tasks/{a_id}"), r#"{"status":"archived"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid status parameter"}));

    logger.close().await;
}

#[tokio::test]
async fn test_delete_task() {
    let (router, logger, _sink) = common::test_router(Level::Info);

    let (_, task) = send(&router, json_request("POST", "/tasks", r#"{"title":"temp"}"#)).await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (res, body) = send(&router, empty_request("DELETE", &uri)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (res, _) = send(&router, empty_request("GET", &uri)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    logger.close().await;
}

#[tokio::test]
async fn test_health() {
    let (router, logger, _sink) = common::test_router(Level::Info);

    let (res, body) = send(&router, empty_request("GET", "/health")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    logger.close().await;
}

#[tokio::test]
async fn test_handler_logs_carry_request_id() {
    let (router, logger, sink) = common::test_router(Level::Info);

    let mut request = empty_request("GET", "/tasks/abc");
    request
        .headers_mut()
        .insert(X_REQUEST_ID, "req-42".parse().unwrap());
    let (res, _) = send(&router, request).await;
    assert_eq!(res.headers()[X_REQUEST_ID], "req-42");
    logger.close().await;

    let lines = common::json_lines(&sink);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["message"], "getting task by ID");
    assert_eq!(lines[1]["message"], "task not found");
    assert_eq!(lines[1]["level"], "WARN");
    for line in &lines {
        assert_eq!(line["request_id"], "req-42");
        assert_eq!(line["task_id"], "abc");
    }
}

#[tokio::test]
async fn test_unfiltered_listing_logs_empty_filter() {
    let (router, logger, sink) = common::test_router(Level::Info);

    let (res, _) = send(&router, empty_request("GET", "/tasks")).await;
    assert_eq!(res.status(), StatusCode::OK);
    logger.close().await;

    let lines = common::json_lines(&sink);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["message"], "getting tasks");
    assert_eq!(lines[0]["status_filter"], "");
}

#[tokio::test]
async fn test_full_app_lifecycle() {
    let mut config = AppConfig::default();
    config.logging.level = Level::Info;
    config.server.shutdown_timeout_secs = 5;
    let (addr, shutdown, sink, handle) = common::spawn_app(config).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .post(format!("http://{addr}/tasks"))
        .json(&json!({"title": "over the wire"}))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let task: serde_json::Value = res.json().await.unwrap();

    let res = client
        .get(format!("http://{addr}/tasks/{}", task["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("app should stop after shutdown")
        .unwrap()
        .unwrap();

    // Logger is closed by the app after the server stops, so everything is flushed.
    let messages: Vec<String> = common::json_lines(&sink)
        .iter()
        .map(|line| line["message"].as_str().unwrap().to_string())
        .collect();
    assert!(messages.contains(&"task created successfully".to_string()));
    assert!(messages.contains(&"getting task by ID".to_string()));
}
