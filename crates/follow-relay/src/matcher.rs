//! Trigger matching for ordinary (non-command) messages.

use std::fmt;

use follow_rules::{normalize_id, TriggerConfig};

/// Which rule produced a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerKind {
    /// A keyword watched in every group.
    GlobalKeyword,
    /// A user watched in every group.
    GlobalUser,
    /// A keyword watched in one group.
    GroupKeyword {
        /// The group the rule belongs to.
        group_id: String,
    },
    /// A user watched in one group.
    GroupUser {
        /// The group the rule belongs to.
        group_id: String,
    },
}

/// Scope label shown in alerts.
impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalKeyword => f.write_str("全局关键词"),
            Self::GlobalUser => f.write_str("全局用户"),
            Self::GroupKeyword { group_id } => write!(f, "群 {group_id} 关键词"),
            Self::GroupUser { group_id } => write!(f, "群 {group_id} 用户"),
        }
    }
}

/// One rule that fired for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Rule scope and type.
    pub kind: TriggerKind,
    /// The keyword or user ID that matched.
    pub value: String,
}

impl TriggerMatch {
    fn new(kind: TriggerKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Evaluate every trigger against a message.
///
/// Rules are checked in a fixed order (global keywords, global users,
/// group keywords, group users) and all hits are returned. Keywords match
/// as case-insensitive substrings; users match by normalized ID.
#[must_use]
pub fn evaluate(
    config: &TriggerConfig,
    text: &str,
    sender_id: &str,
    group_id: &str,
) -> Vec<TriggerMatch> {
    let text = text.to_lowercase();
    let sender_id = normalize_id(sender_id);
    let group_id = normalize_id(group_id);
    let mut matches = Vec::new();

    for keyword in &config.keywords {
        if contains_keyword(&text, keyword) {
            matches.push(TriggerMatch::new(TriggerKind::GlobalKeyword, keyword));
        }
    }

    for user_id in &config.users {
        if normalize_id(user_id) == sender_id {
            matches.push(TriggerMatch::new(TriggerKind::GlobalUser, user_id));
        }
    }

    if let Some(rule) = config.group(&group_id) {
        for keyword in &rule.keywords {
            if contains_keyword(&text, keyword) {
                matches.push(TriggerMatch::new(
                    TriggerKind::GroupKeyword {
                        group_id: group_id.clone(),
                    },
                    keyword,
                ));
            }
        }

        for user_id in &rule.users {
            if normalize_id(user_id) == sender_id {
                matches.push(TriggerMatch::new(
                    TriggerKind::GroupUser {
                        group_id: group_id.clone(),
                    },
                    user_id,
                ));
            }
        }
    }

    matches
}

// Empty keywords never match; `text` is already lowercased.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    !keyword.is_empty() && text.contains(&keyword.to_lowercase())
}
