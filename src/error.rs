//! Error types for tutor-client.

use thiserror::Error;

use crate::practice::WorkflowState;
use crate::session::BootstrapState;

/// Main error type for tutor-client operations.
#[derive(Error, Debug)]
pub enum TutorError {
    /// The tutor API could not be reached or refused to establish a session.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Required input was missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The generation endpoint answered without a usable problem.
    #[error("no problems generated")]
    EmptyResult,

    /// Problem generation failed.
    #[error("problem generation failed: {0}")]
    Generation(String),

    /// Solution evaluation failed.
    #[error("solution evaluation failed: {0}")]
    Evaluation(String),

    /// An operation needed a session but none is active.
    #[error("no active session")]
    NoActiveSession,

    /// Invalid bootstrap state transition attempted.
    #[error("invalid bootstrap transition from {from:?} to {to:?}")]
    InvalidBootstrapTransition {
        from: BootstrapState,
        to: BootstrapState,
    },

    /// Invalid workflow state transition attempted.
    #[error("invalid workflow transition from {from:?} to {to:?}")]
    InvalidWorkflowTransition {
        from: WorkflowState,
        to: WorkflowState,
    },

    /// The API answered with a non-success status.
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

impl TutorError {
    /// Whether the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TutorError::Api { status: 404, .. })
    }
}

/// Convenience Result type for tutor-client operations.
pub type Result<T> = std::result::Result<T, TutorError>;
