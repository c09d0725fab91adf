//! Keyword and user follow alerts for group chats.
//!
//! `follow-relay` watches group messages, matches them against configured
//! triggers, and relays matching messages as private alerts to a list of
//! recipients. Triggers and recipients are managed in-chat with a small
//! command grammar:
//!
//! ```text
//! follow help
//! follow 私信 <QQ号>              add an alert recipient
//! follow 群号 <群号> <QQ号|关键词>  watch a user or keyword in one group
//! follow 用户 <QQ号>              watch a user in every group
//! follow 关键词 <关键词>           watch a keyword in every group
//! ```
//!
//! # Example
//!
//! ```rust
//! use follow_relay::{AccessControl, FollowRelay, HandleOutcome, LogSender, MessageEvent};
//! use follow_rules::MemoryRepository;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), follow_relay::RelayError> {
//! let mut relay = FollowRelay::with_repository(MemoryRepository::new(), AccessControl::default())?;
//! let sender = LogSender::default();
//!
//! relay.handle_group_message(&MessageEvent::group("42", "1", "follow 私信 10001"), &sender).await;
//! relay.handle_group_message(&MessageEvent::group("42", "1", "follow 关键词 urgent"), &sender).await;
//!
//! let outcome = relay
//!     .handle_group_message(&MessageEvent::group("42", "7", "URGENT: prod is down"), &sender)
//!     .await;
//! assert!(matches!(outcome, HandleOutcome::Alerted(ref r) if r.sent == 1));
//! # Ok(())
//! # }
//! ```
//!
//! The host supplies inbound [`MessageEvent`]s and an implementation of
//! [`MessageSender`]; everything else lives here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod access;
pub mod alert;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod matcher;
pub mod relay;
pub mod sender;

// Re-export main types at crate root
pub use access::{AccessControl, AccessMode};
pub use alert::{dispatch_alert, Alert, DispatchReport, ALERT_HEADER};
pub use command::{
    execute, handle_command, parse_command, strip_escapes, FollowCommand, GroupTarget, HELP_TEXT,
};
pub use config::RelayConfig;
pub use error::{CommandError, DeliveryError, RelayError, Result, ValidationError};
pub use event::{LauncherType, MessageEvent, Target};
pub use extract::{extract_identifier, is_numeric_id};
pub use matcher::{evaluate, TriggerKind, TriggerMatch};
pub use relay::{FollowRelay, HandleOutcome};
pub use sender::{LogSender, MessageSender};
