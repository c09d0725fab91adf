//! Storage backends for the trigger and recipient documents.
//!
//! [`ConfigRepository`] is the seam between the rule store and wherever
//! the two documents live. Loading a document that does not exist yet
//! yields its default value, which the repository persists immediately.

use std::path::Path;

use follow_persist::JsonStore;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::types::{RecipientConfig, TriggerConfig};

/// Default document name for the trigger configuration.
pub const TRIGGERS_DOCUMENT: &str = "alert_triggers";

/// Default document name for the recipient list.
pub const RECIPIENTS_DOCUMENT: &str = "alert_recipients";

/// Load and save access to the two relay documents.
pub trait ConfigRepository: Send + Sync {
    /// Load the trigger document, creating a default one if absent.
    fn load_triggers(&self) -> Result<TriggerConfig>;

    /// Overwrite the trigger document.
    fn save_triggers(&self, config: &TriggerConfig) -> Result<()>;

    /// Load the recipient document, creating a default one if absent.
    fn load_recipients(&self) -> Result<RecipientConfig>;

    /// Overwrite the recipient document.
    fn save_recipients(&self, config: &RecipientConfig) -> Result<()>;
}

/// Repository backed by two JSON files in a state directory.
#[derive(Debug, Clone)]
pub struct JsonRepository {
    triggers: JsonStore,
    recipients: JsonStore,
}

impl JsonRepository {
    /// Use the default document names inside `state_dir`.
    pub fn new(state_dir: &Path) -> Self {
        Self::with_names(state_dir, TRIGGERS_DOCUMENT, RECIPIENTS_DOCUMENT)
    }

    /// Use custom document names inside `state_dir`.
    pub fn with_names(state_dir: &Path, triggers: &str, recipients: &str) -> Self {
        Self {
            triggers: JsonStore::new(state_dir, triggers),
            recipients: JsonStore::new(state_dir, recipients),
        }
    }

    /// Backing store of the trigger document.
    #[must_use]
    pub const fn triggers_store(&self) -> &JsonStore {
        &self.triggers
    }

    /// Backing store of the recipient document.
    #[must_use]
    pub const fn recipients_store(&self) -> &JsonStore {
        &self.recipients
    }
}

impl ConfigRepository for JsonRepository {
    fn load_triggers(&self) -> Result<TriggerConfig> {
        Ok(self.triggers.load_or_init()?)
    }

    fn save_triggers(&self, config: &TriggerConfig) -> Result<()> {
        Ok(self.triggers.save(config)?)
    }

    fn load_recipients(&self) -> Result<RecipientConfig> {
        Ok(self.recipients.load_or_init()?)
    }

    fn save_recipients(&self, config: &RecipientConfig) -> Result<()> {
        Ok(self.recipients.save(config)?)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    triggers: Option<TriggerConfig>,
    recipients: Option<RecipientConfig>,
    trigger_saves: usize,
    recipient_saves: usize,
}

/// In-process repository that keeps documents in memory.
///
/// Counts every save so callers can observe persistence timing.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    /// Creates a repository with no stored documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds both documents.
    #[must_use]
    pub fn with_documents(triggers: TriggerConfig, recipients: RecipientConfig) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                triggers: Some(triggers),
                recipients: Some(recipients),
                ..MemoryState::default()
            }),
        }
    }

    /// The stored trigger document, if any.
    #[must_use]
    pub fn stored_triggers(&self) -> Option<TriggerConfig> {
        self.state.lock().triggers.clone()
    }

    /// The stored recipient document, if any.
    #[must_use]
    pub fn stored_recipients(&self) -> Option<RecipientConfig> {
        self.state.lock().recipients.clone()
    }

    /// Number of times the trigger document was written.
    #[must_use]
    pub fn trigger_saves(&self) -> usize {
        self.state.lock().trigger_saves
    }

    /// Number of times the recipient document was written.
    #[must_use]
    pub fn recipient_saves(&self) -> usize {
        self.state.lock().recipient_saves
    }
}

impl ConfigRepository for MemoryRepository {
    fn load_triggers(&self) -> Result<TriggerConfig> {
        let mut state = self.state.lock();
        if let Some(config) = &state.triggers {
            return Ok(config.clone());
        }
        debug!(document = TRIGGERS_DOCUMENT, "created default document in memory");
        let config = TriggerConfig::default();
        state.triggers = Some(config.clone());
        state.trigger_saves += 1;
        Ok(config)
    }

    fn save_triggers(&self, config: &TriggerConfig) -> Result<()> {
        let mut state = self.state.lock();
        state.triggers = Some(config.clone());
        state.trigger_saves += 1;
        Ok(())
    }

    fn load_recipients(&self) -> Result<RecipientConfig> {
        let mut state = self.state.lock();
        if let Some(config) = &state.recipients {
            return Ok(config.clone());
        }
        debug!(document = RECIPIENTS_DOCUMENT, "created default document in memory");
        let config = RecipientConfig::default();
        state.recipients = Some(config.clone());
        state.recipient_saves += 1;
        Ok(config)
    }

    fn save_recipients(&self, config: &RecipientConfig) -> Result<()> {
        let mut state = self.state.lock();
        state.recipients = Some(config.clone());
        state.recipient_saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Recipient;

    #[test]
    fn json_repository_creates_both_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonRepository::new(dir.path());

        assert_eq!(repo.load_triggers().expect("triggers"), TriggerConfig::default());
        assert_eq!(
            repo.load_recipients().expect("recipients"),
            RecipientConfig::default()
        );
        assert!(dir.path().join("alert_triggers.json").is_file());
        assert!(dir.path().join("alert_recipients.json").is_file());
    }

    #[test]
    fn json_repository_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonRepository::new(dir.path());

        let mut triggers = TriggerConfig::default();
        triggers.keywords.insert("重要通知");
        triggers.users.insert("10001");
        triggers.group_mut("42").keywords.insert("deploy");
        let recipients = RecipientConfig {
            recipients: vec![Recipient::new("123"), Recipient::new("456")],
        };

        repo.save_triggers(&triggers).expect("save triggers");
        repo.save_recipients(&recipients).expect("save recipients");

        let reopened = JsonRepository::new(dir.path());
        assert_eq!(reopened.load_triggers().expect("load"), triggers);
        assert_eq!(reopened.load_recipients().expect("load"), recipients);
    }

    #[test]
    fn json_repository_custom_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonRepository::with_names(dir.path(), "t", "r");
        repo.load_triggers().expect("triggers");
        assert!(repo.triggers_store().exists());
        assert!(!repo.recipients_store().exists());
        assert_eq!(repo.triggers_store().path(), dir.path().join("t.json"));
    }

    #[test]
    fn memory_repository_counts_default_creation() {
        let repo = MemoryRepository::new();
        repo.load_triggers().expect("load");
        repo.load_triggers().expect("load again");
        assert_eq!(repo.trigger_saves(), 1);
        assert_eq!(repo.recipient_saves(), 0);
        assert!(repo.stored_recipients().is_none());
    }

    #[test]
    fn memory_repository_preloaded() {
        let recipients = RecipientConfig {
            recipients: vec![Recipient::new("1")],
        };
        let repo = MemoryRepository::with_documents(TriggerConfig::default(), recipients.clone());
        assert_eq!(repo.load_recipients().expect("load"), recipients);
        assert_eq!(repo.recipient_saves(), 0);
    }
}
