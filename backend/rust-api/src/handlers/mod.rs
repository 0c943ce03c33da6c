use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::errors::TutorError;
use crate::metrics::{self, VISITORS_CREATED_TOTAL};
use crate::models::{Shape, VisitorSession};
use crate::services::AppState;

pub mod answers;
pub mod progress;
pub mod tutor;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store_health = check_store(&state).await;
    let healthy = store_health.get("status").and_then(|v| v.as_str()) == Some("healthy");

    let (status_code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "geometry-tutor-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "progress_store": store_health }
        })),
    )
}

async fn check_store(state: &AppState) -> serde_json::Map<String, serde_json::Value> {
    let mut result = serde_json::Map::new();
    result.insert("backend".to_string(), json!(state.store.backend()));

    match state.store.ping().await {
        Ok(()) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Err(e) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(format!("{:#}", e)));
        }
    }

    result
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Protects /metrics with HTTP Basic auth against `metrics.auth` (`username:password`).
pub async fn metrics_auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    if credentials != state.config.metrics_auth {
        tracing::warn!("Rejected /metrics request with invalid credentials");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

/// Loads the visitor's session, starting a fresh one when it is missing or expired.
pub(crate) async fn load_or_init(
    state: &AppState,
    visitor_id: &str,
) -> Result<VisitorSession, TutorError> {
    match state.store.load(visitor_id).await? {
        Some(session) => Ok(session),
        None => {
            tracing::info!("Starting new progress record for visitor {}", visitor_id);
            VISITORS_CREATED_TOTAL.inc();
            Ok(VisitorSession::new(visitor_id))
        }
    }
}

pub(crate) fn parse_shape(name: &str) -> Result<Shape, TutorError> {
    name.parse::<Shape>()
        .map_err(|_| TutorError::unknown_shape(name.trim()))
}
