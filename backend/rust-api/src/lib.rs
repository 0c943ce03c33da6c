use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use errors::TutorError;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data: https:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(middlewares::csrf::CSRF_HEADER_NAME),
        ])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .merge(tutor_routes())
        .nest("/api", api_routes(app_state.clone()).layer(cors))
        .with_state(app_state)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn tutor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::tutor::index))
        .route("/start", get(handlers::tutor::start))
        .route("/learn/{shape}", get(handlers::tutor::learn))
        .route("/practice/{shape}", get(handlers::tutor::practice))
        .route("/results", get(handlers::tutor::results))
        .route("/reset", get(handlers::tutor::reset))
        .route("/reset-shape/{shape}", get(handlers::tutor::reset_shape))
}

fn api_routes(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    let answer_routes = Router::new()
        .route("/submit-answer", post(handlers::answers::submit_answer))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            middlewares::csrf::csrf_middleware,
        ));

    Router::new()
        .route("/progress", get(handlers::progress::get_progress))
        .route(
            "/shape-progress/{shape}",
            get(handlers::progress::get_shape_progress),
        )
        .route("/shapes/{shape}", get(handlers::progress::get_shape))
        .route("/levels", get(handlers::progress::get_levels))
        .merge(answer_routes)
}
