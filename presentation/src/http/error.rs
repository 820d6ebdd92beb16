//! Error responses.
//!
//! Every failure leaves the service as `{"detail": "<message>"}` with a
//! status chosen by the error kind.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notion_agent_application::{AskError, ErrorKind};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

/// Status code for each failure category.
///
/// Only a rejected question is the caller's fault. Every failure inside the
/// request flow is reported as 500; the kind stays in the server log.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidQuestion => StatusCode::BAD_REQUEST,
        ErrorKind::Connection | ErrorKind::Protocol | ErrorKind::Agent | ErrorKind::Timeout => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<AskError> for ApiError {
    fn from(err: AskError) -> Self {
        let kind = err.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            error!("Request failed ({:?}): {}", kind, err);
        } else {
            warn!("Request rejected ({:?}): {}", kind, err);
        }
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Malformed request body: {}", rejection.body_text());
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
