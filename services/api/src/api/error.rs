use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use evtbook_events::{BoxError, StructuredError};

/// An HTTP status paired with the error envelope sent as the body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: StructuredError,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: StructuredError::new(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.body = self.body.with_cause(cause);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
