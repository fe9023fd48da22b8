//! Error Handling
//!
//! Storage failures are classified into a small, stable set of kinds and
//! translated into JSON HTTP responses at the route boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by a message store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The database could not be reached
    #[error("database unavailable: {0}")]
    Connectivity(String),

    /// The document did not satisfy its schema
    #[error("validation failed: {0}")]
    Validation(String),

    /// The supplied identifier is not a valid object id
    #[error("cast to ObjectId failed for value \"{0}\"")]
    InvalidId(String),

    /// Any other failure reported by the driver
    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Connectivity(_) => ErrorKind::ConnectivityError,
            StoreError::Validation(_) => ErrorKind::ValidationError,
            StoreError::InvalidId(_) => ErrorKind::CastError,
            StoreError::Query(_) => ErrorKind::QueryError,
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind as Driver;

        match &*err.kind {
            Driver::ServerSelection { .. }
            | Driver::Io(..)
            | Driver::DnsResolve { .. }
            | Driver::ConnectionPoolCleared { .. } => StoreError::Connectivity(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Stable error kind exposed to HTTP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConnectivityError,
    ValidationError,
    CastError,
    QueryError,
}

/// The route-level operation that failed; decides the `status` wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Retrieve,
    Save,
}

impl Operation {
    pub fn status(&self) -> &'static str {
        match self {
            Operation::Retrieve => "failed to retrieve messages from the database",
            Operation::Save => "failed to save the message to the database",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
    status: &'static str,
}

/// A store failure bound to the operation it interrupted
#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub source: StoreError,
    pub redact: bool,
}

impl ApiError {
    pub fn new(operation: Operation, source: StoreError, redact: bool) -> Self {
        Self {
            operation,
            source,
            redact,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                kind: self.source.kind(),
                message: (!self.redact).then(|| self.source.to_string()),
            },
            status: self.operation.status(),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
