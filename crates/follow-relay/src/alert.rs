//! Alert rendering and best-effort delivery to recipients.

use std::fmt;

use follow_rules::RecipientConfig;
use tracing::{info, warn};

use crate::error::DeliveryError;
use crate::event::Target;
use crate::matcher::TriggerMatch;
use crate::sender::MessageSender;

/// First line of every alert.
pub const ALERT_HEADER: &str = "⚠️ 有新的触发消息 ⚠️";

/// A group message that fired one or more triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Group the message was posted in.
    pub group_id: String,
    /// Author of the message.
    pub sender_id: String,
    /// Message text, with escape characters already removed.
    pub message: String,
    /// Every rule that fired, in evaluation order.
    pub matches: Vec<TriggerMatch>,
}

impl Alert {
    /// Creates an alert.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        sender_id: impl Into<String>,
        message: impl Into<String>,
        matches: Vec<TriggerMatch>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            sender_id: sender_id.into(),
            message: message.into(),
            matches,
        }
    }

    /// Text sent to each recipient.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{ALERT_HEADER}")?;
        writeln!(f, "群号: {}", self.group_id)?;
        writeln!(f, "发送者: {}", self.sender_id)?;
        writeln!(f, "消息内容: {}", self.message)?;
        writeln!(f, "触发条件:")?;
        for m in &self.matches {
            writeln!(f, "- {}: {}", m.kind, m.value)?;
        }
        Ok(())
    }
}

/// Outcome of delivering one alert to every recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Recipients the alert reached.
    pub sent: usize,
    /// Recipients the alert did not reach.
    pub failures: Vec<DeliveryError>,
}

impl DispatchReport {
    /// Number of delivery attempts.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.sent + self.failures.len()
    }

    /// Whether every attempt succeeded.
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Send `alert` privately to every recipient.
///
/// Each recipient is attempted once, in order. A failure is logged and
/// recorded but does not stop delivery to the remaining recipients.
pub async fn dispatch_alert<S: MessageSender>(
    sender: &S,
    recipients: &RecipientConfig,
    alert: &Alert,
) -> DispatchReport {
    let text = alert.render();
    let mut report = DispatchReport::default();

    for user_id in recipients.user_ids() {
        let target = Target::person(user_id);
        match sender.send_active(&target, &text).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(recipient = %user_id, error = %e, "alert delivery failed");
                report.failures.push(e);
            }
        }
    }

    info!(
        group_id = %alert.group_id,
        sender_id = %alert.sender_id,
        matches = alert.matches.len(),
        sent = report.sent,
        failed = report.failures.len(),
        "alert dispatched"
    );
    report
}
