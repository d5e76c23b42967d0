//! Event API endpoints.
//!
//! Events are created once and then only read:
//! - `POST /events` validates and stores a new event
//! - `GET /events/{id}` fetches one event

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use evtbook_events::{validate_event, Event, NewEvent};
use tracing::{error, info};

use crate::api::error::ApiError;
use crate::state::AppState;

/// Create event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/", get(missing_event_id))
        .route("/events/{id}", get(get_event))
}

/// Create a new event.
///
/// POST /events
async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let Json(event) = payload.map_err(|rejection| {
        error!(error = %rejection, "failed to bind JSON");
        ApiError::internal("failed to bind JSON").with_cause(rejection.body_text())
    })?;

    if let Err(err) = validate_event(&event) {
        error!(reason = err.reason(), "event validation failed");
        return Err(ApiError::bad_request("event validation failed").with_cause(err));
    }

    let saved = state
        .repository()
        .save_event(&event.normalized())
        .await
        .map_err(|err| {
            error!(error = %err, "saving event failed");
            ApiError::bad_request("saving event failed").with_cause(err)
        })?;

    info!(event_id = %saved.id, "event created");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Get an event by id.
///
/// GET /events/{id}
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Event>, ApiError> {
    let body = body.map_err(|rejection| {
        error!(error = %rejection, "failed to read request body");
        ApiError::bad_request("failed to read request body").with_cause(rejection.body_text())
    })?;

    if !body.is_empty() {
        error!(body_len = body.len(), "request body is not empty");
        return Err(ApiError::bad_request("request body is not empty"));
    }

    let id = id.trim();
    if id.is_empty() {
        return Err(missing_event_id().await);
    }

    match state.repository().get_event_by_id(id).await {
        Ok(event) => Ok(Json(event)),
        Err(err) if err.is_not_found() => {
            info!(event_id = %id, "event not found");
            Err(ApiError::not_found("event not found").with_cause(err))
        }
        Err(err) => {
            error!(event_id = %id, error = %err, "getting event failed");
            Err(ApiError::bad_request("getting event failed").with_cause(err))
        }
    }
}

/// GET /events/ with no id.
async fn missing_event_id() -> ApiError {
    error!("parameter 'id' is required");
    ApiError::bad_request("parameter 'id' is required")
}
