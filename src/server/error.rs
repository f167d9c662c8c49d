//! HTTP error responses
//!
//! Every error leaves the service as `{"error": "<message>"}`.

use crate::error::DjorderError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when an upload carries no files
pub const NO_FILES_MESSAGE: &str = "No files part";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload without any `files` parts (400)
    #[error("{NO_FILES_MESSAGE}")]
    NoFiles,

    /// Multipart stream broke off or exceeded the body limit
    #[error("Invalid upload: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// Sequencing or analysis failure (500)
    #[error("{0}")]
    Processing(#[from] DjorderError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFiles => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Processing(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
