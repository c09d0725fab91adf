//! The event handler that ties filtering, commands, matching and alerts together.

use follow_rules::{ConfigRepository, JsonRepository, RuleStore};
use tracing::{debug, info, warn};

use crate::access::AccessControl;
use crate::alert::{dispatch_alert, Alert, DispatchReport};
use crate::command::{handle_command, strip_escapes};
use crate::config::RelayConfig;
use crate::error::Result;
use crate::event::MessageEvent;
use crate::matcher::{evaluate, TriggerMatch};
use crate::sender::MessageSender;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The conversation is excluded by access control.
    Filtered,
    /// The message was a `follow` command; `reply` was sent back.
    Command {
        /// Reply text.
        reply: String,
    },
    /// Triggers fired and the alert was dispatched.
    Alerted(DispatchReport),
    /// Triggers fired but there is nobody to notify.
    NoRecipients(Vec<TriggerMatch>),
    /// No trigger fired.
    NoMatch,
}

/// Follow-alert relay for one host.
///
/// Owns the rule store for its whole lifetime. Events are handled one at a
/// time through `&mut self`.
#[derive(Debug)]
pub struct FollowRelay<R> {
    store: RuleStore<R>,
    access: AccessControl,
}

impl FollowRelay<JsonRepository> {
    /// Open the relay on the JSON documents described by `config`.
    ///
    /// Missing documents are created with default contents.
    pub fn open(config: &RelayConfig) -> Result<Self> {
        config.validate()?;
        let repo = JsonRepository::with_names(
            &config.state_dir,
            &config.triggers_document,
            &config.recipients_document,
        );
        let relay = Self::with_repository(repo, config.access_control.clone())?;
        info!(state_dir = %config.state_dir.display(), "follow relay opened");
        Ok(relay)
    }
}

impl<R: ConfigRepository> FollowRelay<R> {
    /// Open the relay on an arbitrary repository.
    pub fn with_repository(repo: R, access: AccessControl) -> Result<Self> {
        let store = RuleStore::open(repo)?;
        Ok(Self { store, access })
    }

    /// The rule store.
    #[must_use]
    pub const fn store(&self) -> &RuleStore<R> {
        &self.store
    }

    /// Active access-control settings.
    #[must_use]
    pub const fn access_control(&self) -> &AccessControl {
        &self.access
    }

    /// Handle one group message.
    ///
    /// Commands are answered in the originating conversation; anything else
    /// is matched against the triggers and, on a hit, alerted to every
    /// recipient. Delivery failures are logged and never returned.
    pub async fn handle_group_message<S: MessageSender>(
        &mut self,
        event: &MessageEvent,
        sender: &S,
    ) -> HandleOutcome {
        let launcher = event.launcher();
        if !self.access.allows(&launcher) {
            debug!(launcher = %launcher, "message filtered by access control");
            return HandleOutcome::Filtered;
        }

        let text = strip_escapes(event.text.trim());

        if let Some(reply) = handle_command(&text, &mut self.store) {
            if let Err(e) = sender.reply(&launcher, &reply).await {
                warn!(launcher = %launcher, error = %e, "failed to send command reply");
            }
            return HandleOutcome::Command { reply };
        }

        let matches = evaluate(
            self.store.triggers(),
            &text,
            &event.sender_id,
            &event.launcher_id,
        );
        if matches.is_empty() {
            return HandleOutcome::NoMatch;
        }
        if self.store.recipients().is_empty() {
            debug!(matches = matches.len(), "triggers matched but no recipients configured");
            return HandleOutcome::NoRecipients(matches);
        }

        let alert = Alert::new(&event.launcher_id, &event.sender_id, text, matches);
        HandleOutcome::Alerted(dispatch_alert(sender, self.store.recipients(), &alert).await)
    }

    /// Persist both documents and release the relay.
    pub fn shutdown(self) -> Result<()> {
        self.store.flush()?;
        info!("follow relay stopped");
        Ok(())
    }
}
