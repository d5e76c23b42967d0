//! HTTP request metrics and the Prometheus scrape endpoint.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::state::AppState;

/// Total HTTP requests served.
pub const HTTP_SERVER_REQUESTS_TOTAL: &str = "http_server_requests_total";
/// HTTP request latency in seconds.
pub const HTTP_SERVER_DURATION_SECONDS: &str = "http_server_duration_seconds";

/// Create the metrics scrape route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(render))
}

/// Register metric descriptions with the installed recorder.
pub fn describe() {
    describe_counter!(HTTP_SERVER_REQUESTS_TOTAL, "HTTP requests");
    describe_histogram!(
        HTTP_SERVER_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "HTTP request duration"
    );
}

/// Middleware recording one counter sample and one latency sample per request.
pub async fn track(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let labels = [
        ("http_route", route),
        ("http_method", method),
        ("http_status_code", status.to_string()),
        ("http_status_class", status_class(status)),
    ];

    counter!(HTTP_SERVER_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(HTTP_SERVER_DURATION_SECONDS, &labels).record(start.elapsed().as_secs_f64());

    response
}

fn status_class(status: u16) -> String {
    format!("{}xx", status / 100)
}

/// GET /metrics
async fn render(State(state): State<AppState>) -> Response {
    match state.metrics() {
        Some(handle) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
