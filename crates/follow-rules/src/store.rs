//! The rule store: owned trigger and recipient state plus persistence.

use tracing::{debug, info};

use crate::error::{Result, RuleError};
use crate::repository::ConfigRepository;
use crate::types::{normalize_id, Recipient, RecipientConfig, TriggerConfig};

/// Result of an idempotent add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The value was new and has been stored.
    Added,
    /// The value was already present; nothing changed.
    AlreadyPresent,
}

impl AddOutcome {
    /// Returns true if the value was newly stored.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }

    const fn from_inserted(inserted: bool) -> Self {
        if inserted {
            Self::Added
        } else {
            Self::AlreadyPresent
        }
    }
}

/// Owns both relay documents and persists every change through `R`.
///
/// Mutations are applied to a copy of the affected document, written, and
/// only then committed in memory, so a failed write leaves the in-memory
/// state matching what was last persisted.
#[derive(Debug)]
pub struct RuleStore<R> {
    repo: R,
    triggers: TriggerConfig,
    recipients: RecipientConfig,
}

impl<R: ConfigRepository> RuleStore<R> {
    /// Load both documents from `repo`, creating defaults where missing.
    pub fn open(repo: R) -> Result<Self> {
        let triggers = repo.load_triggers()?;
        let recipients = repo.load_recipients()?;
        debug!(
            keywords = triggers.keywords.len(),
            users = triggers.users.len(),
            groups = triggers.groups.len(),
            recipients = recipients.recipients.len(),
            "loaded rule store"
        );
        Ok(Self {
            repo,
            triggers,
            recipients,
        })
    }

    /// Current trigger configuration.
    #[must_use]
    pub const fn triggers(&self) -> &TriggerConfig {
        &self.triggers
    }

    /// Current recipient list.
    #[must_use]
    pub const fn recipients(&self) -> &RecipientConfig {
        &self.recipients
    }

    /// The backing repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repo
    }

    /// Apply `f` to the trigger document and persist it if `f` reports a change.
    ///
    /// Returns whether anything changed.
    pub fn mutate_triggers<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut TriggerConfig) -> bool,
    {
        let mut next = self.triggers.clone();
        if !f(&mut next) {
            return Ok(false);
        }
        self.repo.save_triggers(&next)?;
        self.triggers = next;
        Ok(true)
    }

    /// Apply `f` to the recipient document and persist it if `f` reports a change.
    pub fn mutate_recipients<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut RecipientConfig) -> bool,
    {
        let mut next = self.recipients.clone();
        if !f(&mut next) {
            return Ok(false);
        }
        self.repo.save_recipients(&next)?;
        self.recipients = next;
        Ok(true)
    }

    /// Add a private-message recipient for alerts.
    pub fn add_recipient(&mut self, user_id: &str) -> Result<AddOutcome> {
        let user_id = non_empty("user id", normalize_id(user_id))?;
        let added = self.mutate_recipients(|config| {
            if config.contains(&user_id) {
                return false;
            }
            config.recipients.push(Recipient::new(user_id.clone()));
            true
        })?;
        log_outcome("recipient", &user_id, None, added);
        Ok(AddOutcome::from_inserted(added))
    }

    /// Watch `user_id` in every group.
    pub fn add_global_user(&mut self, user_id: &str) -> Result<AddOutcome> {
        let user_id = non_empty("user id", normalize_id(user_id))?;
        let added = self.mutate_triggers(|config| config.users.insert(user_id.clone()))?;
        log_outcome("global user", &user_id, None, added);
        Ok(AddOutcome::from_inserted(added))
    }

    /// Watch `keyword` in every group.
    pub fn add_global_keyword(&mut self, keyword: &str) -> Result<AddOutcome> {
        let keyword = non_empty("keyword", keyword.to_string())?;
        let added = self.mutate_triggers(|config| config.keywords.insert(keyword.clone()))?;
        log_outcome("global keyword", &keyword, None, added);
        Ok(AddOutcome::from_inserted(added))
    }

    /// Watch `user_id` in `group_id` only. Creates the group rule if needed.
    pub fn add_group_user(&mut self, group_id: &str, user_id: &str) -> Result<AddOutcome> {
        let group_id = non_empty("group id", normalize_id(group_id))?;
        let user_id = non_empty("user id", normalize_id(user_id))?;
        let mut inserted = false;
        self.mutate_triggers(|config| {
            let created = !config.groups.contains_key(&group_id);
            inserted = config.group_mut(&group_id).users.insert(user_id.clone());
            created || inserted
        })?;
        log_outcome("group user", &user_id, Some(&group_id), inserted);
        Ok(AddOutcome::from_inserted(inserted))
    }

    /// Watch `keyword` in `group_id` only. Creates the group rule if needed.
    pub fn add_group_keyword(&mut self, group_id: &str, keyword: &str) -> Result<AddOutcome> {
        let group_id = non_empty("group id", normalize_id(group_id))?;
        let keyword = non_empty("keyword", keyword.to_string())?;
        let mut inserted = false;
        self.mutate_triggers(|config| {
            let created = !config.groups.contains_key(&group_id);
            inserted = config.group_mut(&group_id).keywords.insert(keyword.clone());
            created || inserted
        })?;
        log_outcome("group keyword", &keyword, Some(&group_id), inserted);
        Ok(AddOutcome::from_inserted(inserted))
    }

    /// Write both documents regardless of whether they changed.
    pub fn flush(&self) -> Result<()> {
        self.repo.save_triggers(&self.triggers)?;
        self.repo.save_recipients(&self.recipients)?;
        debug!("flushed rule store");
        Ok(())
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(RuleError::EmptyValue { field });
    }
    Ok(value)
}

fn log_outcome(kind: &str, value: &str, group_id: Option<&str>, added: bool) {
    let group_id = group_id.unwrap_or("-");
    if added {
        info!(kind, value, group_id, "added rule entry");
    } else {
        debug!(kind, value, group_id, "rule entry already present");
    }
}
