//! Relay configuration.
//!
//! Loaded from TOML by the embedding host:
//!
//! ```toml
//! state_dir = "/var/lib/follow-relay"
//! triggers_document = "alert_triggers"
//! recipients_document = "alert_recipients"
//!
//! [access_control]
//! mode = "blacklist"
//! blacklist = ["group_123456"]
//! ```

use std::path::{Path, PathBuf};

use follow_rules::{RECIPIENTS_DOCUMENT, TRIGGERS_DOCUMENT};
use serde::{Deserialize, Serialize};

use crate::access::AccessControl;
use crate::error::{RelayError, Result};

fn default_triggers_document() -> String {
    TRIGGERS_DOCUMENT.to_string()
}

fn default_recipients_document() -> String {
    RECIPIENTS_DOCUMENT.to_string()
}

/// Settings for a [`FollowRelay`](crate::FollowRelay).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Directory holding the two JSON documents.
    pub state_dir: PathBuf,
    /// File stem of the trigger document.
    #[serde(default = "default_triggers_document")]
    pub triggers_document: String,
    /// File stem of the recipient document.
    #[serde(default = "default_recipients_document")]
    pub recipients_document: String,
    /// Conversation filter applied before anything else.
    #[serde(default, alias = "access-control")]
    pub access_control: AccessControl,
}

impl RelayConfig {
    /// Default document names inside `state_dir`, no filtering.
    #[must_use]
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            triggers_document: default_triggers_document(),
            recipients_document: default_recipients_document(),
            access_control: AccessControl::default(),
        }
    }

    /// Sets the access-control settings.
    #[must_use]
    pub fn with_access_control(mut self, access_control: AccessControl) -> Self {
        self.access_control = access_control;
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| RelayError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.state_dir.as_os_str().is_empty() {
            return Err(RelayError::Config("state_dir cannot be empty".to_string()));
        }

        for (field, name) in [
            ("triggers_document", &self.triggers_document),
            ("recipients_document", &self.recipients_document),
        ] {
            if name.is_empty() {
                return Err(RelayError::Config(format!("{field} cannot be empty")));
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(RelayError::Config(format!(
                    "{field} must contain only alphanumeric characters, hyphens, and underscores"
                )));
            }
        }

        if self.triggers_document == self.recipients_document {
            return Err(RelayError::Config(
                "triggers_document and recipients_document must differ".to_string(),
            ));
        }

        Ok(())
    }
}
