//! Error handling for the HTTP API
//!
//! This module provides:
//! - Stable wire error codes with their HTTP status
//! - The JSON error body returned to callers
//! - `ApiError`, the handler-level error that renders itself as a response

use crate::client::QueryError;
use crate::sparql::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Error codes surfaced in the `error` member of a JSON error body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The body was not a JSON object carrying a non-empty `query`
    InvalidRequest,
    /// The query failed validation
    InvalidSparql,
    /// The upstream endpoint could not answer the query
    QueryFailed,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InvalidSparql => "invalid_sparql",
            ErrorCode::QueryFailed => "query_failed",
        }
    }

    /// HTTP status used when this code is returned
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidRequest | ErrorCode::InvalidSparql => StatusCode::BAD_REQUEST,
            ErrorCode::QueryFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error category for logs
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest | ErrorCode::InvalidSparql => "client_error",
            ErrorCode::QueryFailed => "upstream_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR BODY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

// =============================================================================
// API ERROR
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    /// Carries the decoder's explanation; callers only see a generic message.
    #[error("Query parameter is required")]
    InvalidRequest(String),

    #[error("Invalid SPARQL query: {0}")]
    InvalidSparql(#[from] ValidationError),

    #[error("{0}")]
    QueryFailed(#[from] QueryError),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            ApiError::InvalidSparql(_) => ErrorCode::InvalidSparql,
            ApiError::QueryFailed(_) => ErrorCode::QueryFailed,
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        match &self {
            ApiError::InvalidRequest(detail) => {
                tracing::debug!(error.code = %code, detail = %detail, "rejected request body");
            }
            ApiError::InvalidSparql(e) => {
                tracing::debug!(error.code = %code, reason = %e, "rejected query");
            }
            ApiError::QueryFailed(e) => {
                tracing::warn!(
                    error.code = %code,
                    error.category = code.category(),
                    timeout = e.is_timeout(),
                    error = %e,
                    "query execution failed"
                );
            }
        }
        (code.status_code(), Json(self.to_response_body())).into_response()
    }
}
