//! Trigger and recipient rule store for follow-relay.
//!
//! `follow-rules` owns the two documents the relay works from:
//!
//! - **Triggers** ([`TriggerConfig`]): global keywords, global users, and
//!   per-group keyword/user rules.
//! - **Recipients** ([`RecipientConfig`]): who receives private alerts.
//!
//! Every mutation goes through [`RuleStore`], which writes the affected
//! document in full through a [`ConfigRepository`] before committing it.
//!
//! # Example
//!
//! ```rust
//! use follow_rules::{AddOutcome, MemoryRepository, RuleStore};
//!
//! let mut store = RuleStore::open(MemoryRepository::new())?;
//! assert_eq!(store.add_global_keyword("urgent")?, AddOutcome::Added);
//! assert_eq!(store.add_global_keyword("urgent")?, AddOutcome::AlreadyPresent);
//! assert_eq!(store.add_group_user("987654321", "555555")?, AddOutcome::Added);
//! # Ok::<(), follow_rules::RuleError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod repository;
pub mod store;
pub mod types;

pub use error::{Result, RuleError};
pub use repository::{
    ConfigRepository, JsonRepository, MemoryRepository, RECIPIENTS_DOCUMENT, TRIGGERS_DOCUMENT,
};
pub use store::{AddOutcome, RuleStore};
pub use types::{normalize_id, GroupRule, OrderedSet, Recipient, RecipientConfig, TriggerConfig};
