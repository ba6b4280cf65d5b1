//! Error type shared across the crate.

use thiserror::Error;

/// Broad classification of failures, used by callers that want to react
/// differently to bad input versus internal bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A bug in the renderer or a widget implementation.
    Internal,
    /// The caller handed us data we cannot work with.
    InvalidInput,
    /// The operation is not permitted in the current state.
    NotAllowed,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct PerseusError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PerseusError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAllowed, message)
    }
}
