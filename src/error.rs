//! Error kinds surfaced to the user.
//!
//! `FormError` never leaves the process (the request is rejected before it is
//! sent). `ClientError` is produced at the scoring-client boundary, where
//! transport failures and HTTP failures are told apart structurally.

use serde::Serialize;
use thiserror::Error;

pub const CONNECT_FAILED_MSG: &str = "Cannot connect to server. Please ensure the backend is running.";
pub const HEALTH_FAILED_MSG: &str = "Backend server is not responding";
pub const EVALUATION_FAILED_MSG: &str = "Evaluation failed";

/// Category used by alerts and API error bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Connection,
    Evaluation,
    Unexpected,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("at least one rubric required")]
    NoRubrics,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No response reached us: refused, unreachable, timed out.
    #[error("{0}")]
    Connection(String),
    /// The service answered with a non-success status.
    #[error("{0}")]
    Evaluation(String),
    /// Anything else. `detail` is for logs, never shown.
    #[error("An unexpected error occurred")]
    Unexpected { detail: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connection(_) => ErrorKind::Connection,
            ClientError::Evaluation(_) => ErrorKind::Evaluation,
            ClientError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection(_))
    }
}
