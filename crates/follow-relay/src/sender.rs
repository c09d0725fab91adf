//! Outbound message seam.
//!
//! The relay never talks to a chat platform directly. Hosts implement
//! [`MessageSender`] on top of their platform adapter.

use std::future::Future;

use tracing::info;

use crate::error::DeliveryError;
use crate::event::Target;

/// Delivers text messages on behalf of the relay.
pub trait MessageSender: Send + Sync {
    /// Answer in the conversation a command came from.
    fn reply(
        &self,
        target: &Target,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Send an unsolicited message, used for alert delivery.
    fn send_active(
        &self,
        target: &Target,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// A sender that writes every message to the tracing log.
///
/// Useful while wiring up a host, or for a dry run.
#[derive(Debug, Clone)]
pub struct LogSender {
    name: String,
}

impl LogSender {
    /// Creates a log sender.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name shown in log lines.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for LogSender {
    fn default() -> Self {
        Self::new("log")
    }
}

impl MessageSender for LogSender {
    async fn reply(&self, target: &Target, text: &str) -> Result<(), DeliveryError> {
        info!(sender = %self.name, target = %target, text, "reply");
        Ok(())
    }

    async fn send_active(&self, target: &Target, text: &str) -> Result<(), DeliveryError> {
        info!(sender = %self.name, target = %target, text, "active message");
        Ok(())
    }
}
