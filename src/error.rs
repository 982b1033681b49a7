//! Error taxonomy for registry operations and its HTTP mapping.
//!
//! Every registry operation returns [`AppError`]. Validation failures are raised
//! before the store is touched, store failures are translated at the repository
//! boundary, and [`IntoResponse`] turns each kind into a status code without
//! exposing store diagnostics to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Public part of an error, as serialized in response bodies.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Discriminant of [`AppError`], for callers that branch on the failure class only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    InvalidUrl,
    CodeTaken,
    NotFound,
    GenerationExhausted,
    StoreUnavailable,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller-supplied code fails the `[a-z0-9-]{1,32}` rule after normalization.
    #[error("invalid code format: {code:?}")]
    InvalidFormat { code: String },

    /// Target URL is missing, malformed, or not http(s).
    #[error("invalid url: {reason}")]
    InvalidUrl { reason: String },

    /// Another record already owns the normalized code.
    #[error("code already taken: {code}")]
    CodeTaken { code: String },

    #[error("no link for code {code:?}")]
    NotFound { code: String },

    /// Every generated candidate collided with an existing code.
    #[error("failed to generate a unique code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// The backing store failed for reasons unrelated to business rules.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A server-side failure outside the store, such as an unusable stored record.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            AppError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            AppError::CodeTaken { .. } => ErrorKind::CodeTaken,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
            AppError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable(reason.into())
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidFormat | ErrorKind::InvalidUrl => StatusCode::BAD_REQUEST,
            ErrorKind::CodeTaken => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::GenerationExhausted
            | ErrorKind::StoreUnavailable
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the client-facing view of this error.
    ///
    /// Server-side kinds get a fixed message so store internals never leak.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::InvalidFormat { code } => (
                "invalid_format",
                "Invalid code format".to_string(),
                json!({ "code": code }),
            ),
            AppError::InvalidUrl { .. } => ("invalid_url", "Invalid URL".to_string(), json!({})),
            AppError::CodeTaken { code } => (
                "code_taken",
                "Code already exists".to_string(),
                json!({ "code": code }),
            ),
            AppError::NotFound { code } => {
                ("not_found", "Not found".to_string(), json!({ "code": code }))
            }
            AppError::GenerationExhausted { .. } => (
                "generation_exhausted",
                "Server error".to_string(),
                json!({}),
            ),
            AppError::StoreUnavailable(_) => {
                ("store_unavailable", "Server error".to_string(), json!({}))
            }
            AppError::Internal(_) => ("internal_error", "Server error".to_string(), json!({})),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}
