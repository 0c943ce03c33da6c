use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Route templates served by the router. `{shape}` matches any single segment.
const ROUTE_TEMPLATES: [&str; 14] = [
    "/",
    "/health",
    "/metrics",
    "/start",
    "/learn/{shape}",
    "/practice/{shape}",
    "/results",
    "/reset",
    "/reset-shape/{shape}",
    "/api/progress",
    "/api/shape-progress/{shape}",
    "/api/shapes/{shape}",
    "/api/levels",
    "/api/submit-answer",
];

const UNMATCHED_PATH: &str = "/unmatched";

/// Records request count and latency per method and normalized path.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), path, status.as_str()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method.as_str(), path])
        .observe(duration);

    response
}

/// Maps a request path to its route template so label cardinality stays bounded.
fn normalize_path(path: &str) -> &'static str {
    ROUTE_TEMPLATES
        .iter()
        .copied()
        .find(|template| matches_template(template, path))
        .unwrap_or(UNMATCHED_PATH)
}

fn matches_template(template: &str, path: &str) -> bool {
    let mut segments = path.split('/');
    let mut expected = template.split('/');

    loop {
        match (expected.next(), segments.next()) {
            (None, None) => return true,
            (Some("{shape}"), Some(segment)) if !segment.is_empty() => {}
            (Some(want), Some(segment)) if want == segment => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/practice/circle"), "/practice/{shape}");
        assert_eq!(normalize_path("/learn/hexagon"), "/learn/{shape}");
        assert_eq!(
            normalize_path("/api/shape-progress/square"),
            "/api/shape-progress/{shape}"
        );
        assert_eq!(normalize_path("/api/submit-answer"), "/api/submit-answer");
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_unknown_paths_share_one_label() {
        assert_eq!(normalize_path("/junk-1/x"), "/unmatched");
        assert_eq!(normalize_path("/favicon.ico"), "/unmatched");
        assert_eq!(normalize_path("/api/junk-42"), "/unmatched");
        assert_eq!(normalize_path("/learn/circle/extra"), "/unmatched");
        assert_eq!(normalize_path("/learn/"), "/unmatched");
    }
}
