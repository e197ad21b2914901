//! Error types for owlet

use thiserror::Error;

/// Core error type for owlet operations
///
/// The taxonomy deliberately distinguishes bad input (rejected
/// synchronously, nothing written) from storage trouble (the ledger is
/// safety-critical, so those failures propagate to the caller).
#[derive(Debug, Error)]
pub enum OwletError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OwletError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error was caused by caller input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type OwletResult<T> = std::result::Result<T, OwletError>;
