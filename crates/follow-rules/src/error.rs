//! Error types for the follow-rules crate.

use follow_persist::PersistError;
use thiserror::Error;

/// Errors that can occur while loading or mutating the rule store.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Reading or writing a persisted document failed.
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// A value was empty after normalization.
    #[error("{field} cannot be empty")]
    EmptyValue {
        /// Which value was empty.
        field: &'static str,
    },
}

/// Result type for rule store operations.
pub type Result<T> = std::result::Result<T, RuleError>;
