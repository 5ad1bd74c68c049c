//! Error types for the Flowkey SDK

use thiserror::Error;

/// Broad category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowkeyErrorCode {
    /// Server unreachable, connection dropped, or unreadable response
    NetworkError,
    /// Input rejected before any request was sent
    ValidationError,
    /// Server answered 400 CODE_REQUIRED
    CodeRequired,
    /// Server answered 405
    MethodNotAllowed,
    /// Server answered 5xx
    ServerError,
    /// Any other non-success status
    Unknown,
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FlowkeyError {
    pub code: FlowkeyErrorCode,
    pub message: String,
    /// HTTP status when the server answered
    pub status: Option<u16>,
}

impl FlowkeyError {
    pub fn new(code: FlowkeyErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(code: FlowkeyErrorCode, message: impl Into<String>, status: u16) -> Self {
        Self {
            code,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FlowkeyErrorCode::NetworkError, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FlowkeyErrorCode::ValidationError, message)
    }
}

/// Map an HTTP status (and the server's `error` field) to an error code.
pub fn map_status_to_error_code(status: u16, error: Option<&str>) -> FlowkeyErrorCode {
    match (status, error) {
        (400, Some("CODE_REQUIRED")) => FlowkeyErrorCode::CodeRequired,
        (405, _) => FlowkeyErrorCode::MethodNotAllowed,
        (500..=599, _) => FlowkeyErrorCode::ServerError,
        _ => FlowkeyErrorCode::Unknown,
    }
}

pub type Result<T> = std::result::Result<T, FlowkeyError>;
