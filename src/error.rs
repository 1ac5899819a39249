//! Service error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller sent a missing or unusable field. Maps to 400.
    #[error("{0}")]
    InvalidInput(String),

    /// The record store failed during create or query. Maps to 500.
    #[error("Database error: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

pub fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::InvalidInput(message) => json_error(StatusCode::BAD_REQUEST, message),
            ServiceError::Storage(err) => {
                error!(error = %err, "record store failure");
                let detail: String = self.to_string().chars().take(MAX_DETAIL_CHARS).collect();
                json_error(StatusCode::INTERNAL_SERVER_ERROR, &detail)
            }
        }
    }
}
