use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Error codes returned in the `error` field of a failed response.
pub mod codes {
    pub const CODE_REQUIRED: &str = "CODE_REQUIRED";
    pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
}

/// Request-level failures. Entitlement denials are not errors and never
/// pass through here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Neither a code nor a token was provided")]
    CodeRequired,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unreadable request body: {0}")]
    InvalidBody(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    ok: bool,
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::CodeRequired => (StatusCode::BAD_REQUEST, codes::CODE_REQUIRED),
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, codes::METHOD_NOT_ALLOWED)
            }
            AppError::InvalidBody(msg) => {
                tracing::warn!("Rejected request body: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, codes::SERVER_ERROR)
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, codes::SERVER_ERROR)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, codes::SERVER_ERROR)
            }
        };

        (status, Json(ErrorResponse { ok: false, error })).into_response()
    }
}

/// Converts a handler panic into the generic server error response.
/// The panic message is logged, never returned.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

pub type Result<T> = std::result::Result<T, AppError>;
