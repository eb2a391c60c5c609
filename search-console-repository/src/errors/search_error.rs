//! Search error types.
//!
//! This module defines the failure reasons an engine operation can report.
//! The console's boundary turns these into neutral results, so they are mostly
//! seen in logs and in the views' messages.

use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The engine could not be reached or the request could not be built.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine answered with a non-success status code.
    #[error("Request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The requested index or document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response from search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Free-text document body is not valid JSON.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Validation error (e.g., missing required fields).
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a rejection error from a status code and response text.
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid document error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether the error was detected locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::InvalidDocument(_) | Self::ValidationError(_))
    }

    /// HTTP status reported by the engine, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}
