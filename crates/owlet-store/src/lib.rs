//! Persistence layer for owlet
//!
//! Provides:
//! - Watch ledger (append-only; the single source of truth for time accounting)
//! - Warning audit trail (write-only from the engine's perspective)
//!
//! Rows are never updated or deleted here; corrections are new rows or an
//! external administrative operation.

mod events;
mod sqlite;
mod traits;

pub use events::*;
pub use sqlite::*;
pub use traits::*;

use owlet_util::OwletError;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<StoreError> for OwletError {
    fn from(e: StoreError) -> Self {
        OwletError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
