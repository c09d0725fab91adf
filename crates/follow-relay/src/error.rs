//! Error types for the follow-relay crate.

use follow_rules::RuleError;
use thiserror::Error;

/// A command argument failed validation. Nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A user ID was not made of digits only.
    #[error("user id must be numeric: {value}")]
    NotNumeric {
        /// The rejected value.
        value: String,
    },

    /// Fewer tokens than any sub-command needs.
    #[error("malformed command: expected follow <type> <param1> [param2]")]
    Malformed,

    /// A sub-command is missing a required parameter.
    #[error("missing parameter, usage: {usage}")]
    MissingParameter {
        /// Usage line of the sub-command.
        usage: &'static str,
    },

    /// A keyword follow was given an empty keyword.
    #[error("keyword required")]
    EmptyKeyword,
}

/// Errors raised while parsing or executing a `follow` command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Arguments were rejected before touching the rule store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The sub-command token is not one we know.
    #[error("unknown command type: {token}")]
    UnknownCommand {
        /// The unrecognized token.
        token: String,
    },

    /// The rule store failed while executing a valid command.
    #[error(transparent)]
    Execution(#[from] RuleError),
}

/// An outbound message could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to deliver to {target}: {reason}")]
pub struct DeliveryError {
    /// Destination, formatted as `<type>_<id>`.
    pub target: String,
    /// Adapter-supplied reason.
    pub reason: String,
}

impl DeliveryError {
    /// Creates a delivery error.
    #[must_use]
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while starting or stopping the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay configuration is invalid or unreadable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Loading or flushing the rule store failed.
    #[error("rule store error: {0}")]
    Rules(#[from] RuleError),
}

/// Result type for relay lifecycle operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_numeric() {
        let err = ValidationError::NotNumeric {
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "user id must be numeric: abc");
    }

    #[test]
    fn error_display_unknown_command() {
        let err = CommandError::UnknownCommand {
            token: "删除".to_string(),
        };
        assert_eq!(err.to_string(), "unknown command type: 删除");
    }

    #[test]
    fn error_validation_is_transparent() {
        let err: CommandError = ValidationError::EmptyKeyword.into();
        assert_eq!(err.to_string(), "keyword required");
    }

    #[test]
    fn error_display_delivery() {
        let err = DeliveryError::new("person_123", "adapter offline");
        assert_eq!(
            err.to_string(),
            "failed to deliver to person_123: adapter offline"
        );
    }

    #[test]
    fn error_from_rule_error() {
        let err: RelayError = RuleError::EmptyValue { field: "keyword" }.into();
        assert_eq!(err.to_string(), "rule store error: keyword cannot be empty");
    }
}
