//! HTTP API handlers and routing.

pub mod error;
mod events;
mod health;
pub mod metrics;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, Method, StatusCode},
    middleware, BoxError, Router,
};
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::api::error::ApiError;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the main API router with all routes and middleware.
///
/// Requests still running after `request_timeout` get a 408 envelope and
/// their handler future, including any in-flight store call, is dropped.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // Health endpoints
        .merge(health::routes())
        // Prometheus scrape endpoint
        .merge(metrics::routes())
        // Event routes
        .merge(events::routes())
        // Per-route metrics need the matched path, so they run after routing
        .route_layer(middleware::from_fn(metrics::track))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    MakeRequestUuid,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(cors)
        // Application state
        .with_state(state)
}

/// Turn errors raised by the middleware stack into error envelopes.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        error!("request timed out");
        return ApiError::new(StatusCode::REQUEST_TIMEOUT, "request timed out");
    }

    error!(error = %err, "unhandled middleware error");
    ApiError::internal("unhandled middleware error").with_cause(err)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::db::PgEventRepository;

    fn app() -> Router {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/evtbook")
            .unwrap();
        let state = AppState::with_repository(Arc::new(PgEventRepository::new(pool)));
        create_router(state, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/livez")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_metrics_without_recorder_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
