//! Search error types.
//!
//! This module defines the errors returned by search service providers.

use thiserror::Error;

/// Errors that can occur while talking to the search service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The request never produced a response.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The index addressed by the request does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The service rejected the request.
    #[error("API error ({code}): {message}")]
    ApiError { code: String, message: String },

    /// An enqueued task was accepted but failed while being processed.
    #[error("Task {task_uid} failed ({code}): {message}")]
    TaskFailed {
        task_uid: u32,
        code: String,
        message: String,
    },

    /// Failed to parse a response from the search service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search service.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index not found error.
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound(index.into())
    }

    /// Create an API error.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a task failure error.
    pub fn task_failed(task_uid: u32, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskFailed {
            task_uid,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Machine-readable error code reported by the service, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ApiError { code, .. } | Self::TaskFailed { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether the error reports a missing index.
    pub fn is_index_not_found(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }
}
