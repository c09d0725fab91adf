//! Error types for the follow-persist crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing a persisted document.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The document does not exist yet.
    #[error("document not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The document exists but could not be parsed.
    #[error("document {} is corrupt: {reason}", path.display())]
    Corrupt {
        /// Path of the offending document.
        path: PathBuf,
        /// Parser error message.
        reason: String,
    },

    /// The document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Returns true if this error means the document is simply absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        let err = PersistError::NotFound {
            path: PathBuf::from("/state/alert_triggers.json"),
        };
        assert_eq!(
            err.to_string(),
            "document not found: /state/alert_triggers.json"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn error_display_corrupt() {
        let err = PersistError::Corrupt {
            path: PathBuf::from("a.json"),
            reason: "expected value".to_string(),
        };
        assert_eq!(err.to_string(), "document a.json is corrupt: expected value");
        assert!(!err.is_not_found());
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let err: PersistError = json_err.into();
        assert!(matches!(err, PersistError::Serialization(_)));
    }
}
