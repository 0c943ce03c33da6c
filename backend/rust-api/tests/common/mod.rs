#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use geometry_tutor_api::{
    config::Config,
    create_router,
    services::{progress_store::InMemoryProgressStore, AppState},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        redis_uri: None,
        session_ttl_seconds: 1800,
        csrf_enabled: false,
        cookie_secure: false,
        metrics_auth: "admin:changeme".to_string(),
        rng_seed: Some(42),
    }
}

pub fn create_test_app() -> Router {
    create_test_app_with(test_config())
}

pub fn create_test_app_with(config: Config) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(InMemoryProgressStore::new(config.session_ttl_seconds));
    let app_state = Arc::new(AppState::with_store(config, store));
    create_router(app_state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        json,
    }
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn submit(app: &Router, cookie: &str, user_answer: Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri("/api/submit-answer")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(
            serde_json::to_string(&json!({ "user_answer": user_answer })).unwrap(),
        ))
        .unwrap();
    send(app, request).await
}

/// `name=value` of a Set-Cookie header, if the response set that cookie.
pub fn set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

/// Visits `/` and returns the `visitor_id=...` cookie pair.
pub async fn new_visitor(app: &Router) -> String {
    let response = get(app, "/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    set_cookie(&response.headers, "visitor_id").expect("visitor cookie issued")
}

/// Computes the expected area from the `given` values of a practice question.
pub fn expected_area(question: &Value) -> f64 {
    let given = &question["given"];
    let value = |key: &str| given[key].as_f64().unwrap();

    match question["shape"].as_str().unwrap() {
        "square" => value("side").powi(2),
        "rectangle" => value("length") * value("width"),
        "triangle" => value("base") * value("height") / 2.0,
        "circle" => std::f64::consts::PI * value("radius").powi(2),
        other => panic!("unexpected shape {}", other),
    }
}

/// Requests a practice question and answers it correctly.
pub async fn answer_correctly(app: &Router, cookie: &str, shape: &str) -> TestResponse {
    let practice = get(app, &format!("/practice/{}", shape), Some(cookie)).await;
    assert_eq!(practice.status, StatusCode::OK);
    let answer = expected_area(&practice.json["question"]);
    submit(app, cookie, json!(answer)).await
}
