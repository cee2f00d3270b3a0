//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for MedMatch
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MedMatchError {
    #[error("Database error: {0}")]
    Database(String),

    /// A write issued by the reconciliation engine failed. The profile or
    /// association state it was applied against must be rolled back by the
    /// enclosing transaction.
    #[error("Reconciliation failed: {source}")]
    Reconciliation {
        #[source]
        source: Box<MedMatchError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MedMatchError {
    /// Wrap a failure raised while applying reconciliation writes.
    pub fn reconciliation(source: MedMatchError) -> Self {
        Self::Reconciliation { source: Box::new(source) }
    }
}

/// Result type alias for MedMatch operations
pub type Result<T> = std::result::Result<T, MedMatchError>;
