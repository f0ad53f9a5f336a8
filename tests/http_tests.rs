use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pollq::{create_router, PollConfig, QueueManager};
use tower::ServiceExt;

fn create_test_app() -> (Router, Arc<QueueManager>) {
    let manager = Arc::new(QueueManager::new());
    let router = create_router(manager.clone(), PollConfig::default());
    (router, manager)
}

fn post(path: &str, body: &str, content_type: &str) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_post_returns_message_id() {
    let (app, manager) = create_test_app();

    let response = app
        .oneshot(post("/api/orders", r#"{"content":"Order #1"}"#, "application/json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let id = json["messageId"].as_str().unwrap().to_string();

    let stored = manager.dequeue("orders", Duration::ZERO).await.unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.content, "Order #1");
}

#[tokio::test]
async fn test_post_plain_text_body() {
    let (app, manager) = create_test_app();

    let response = app
        .oneshot(post("/api/notes", "just text", "text/plain"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = manager.dequeue("notes", Duration::ZERO).await.unwrap();
    assert_eq!(stored.content, "just text");
}

#[tokio::test]
async fn test_post_object_without_content_is_serialized() {
    let (app, manager) = create_test_app();

    app.oneshot(post("/api/orders", r#"{"sku": 7}"#, "application/json"))
        .await
        .unwrap();

    let stored = manager.dequeue("orders", Duration::ZERO).await.unwrap();
    assert_eq!(stored.content, r#"{"sku":7}"#);
}

#[tokio::test]
async fn test_get_returns_message_json() {
    let (app, manager) = create_test_app();
    let sent = manager.enqueue("orders", serde_json::json!("Order #1"));

    let response = app.oneshot(get("/api/orders?timeout=0")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], sent.id.as_str());
    assert_eq!(json["content"], "Order #1");
    assert_eq!(json["timestamp"], sent.timestamp);
}

#[tokio::test(start_paused = true)]
async fn test_get_empty_queue_returns_no_content() {
    let (app, _manager) = create_test_app();

    let response = app.oneshot(get("/api/orders?timeout=50")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_get_malformed_timeout_uses_default() {
    let (app, _manager) = create_test_app();

    let start = tokio::time::Instant::now();
    let response = app.oneshot(get("/api/orders?timeout=soon")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(start.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_long_poll_receives_later_post() {
    let (app, _manager) = create_test_app();

    let poll = {
        let app = app.clone();
        tokio::spawn(async move { app.oneshot(get("/api/jobs?timeout=5000")).await.unwrap() })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = app
        .oneshot(post("/api/jobs", r#"{"content":{"task":"resize"}}"#, "application/json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let polled = poll.await.unwrap();
    assert_eq!(polled.status(), StatusCode::OK);
    let json = body_json(polled).await;
    assert_eq!(json["content"]["task"], "resize");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _manager) = create_test_app();

    let response = app.oneshot(get("/api/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
