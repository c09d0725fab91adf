//! Trigger and recipient documents.
//!
//! These are the two documents persisted by the relay. Their serialized
//! shape is the on-disk format, so field names and order matter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalize a user or group identifier.
///
/// Identifiers are compared as strings everywhere. Only surrounding
/// whitespace is removed; leading zeros are kept and no numeric conversion
/// happens.
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_string()
}

/// Insertion-ordered set of strings.
///
/// Serialized as a plain JSON array. Duplicates in a loaded document are
/// collapsed, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct OrderedSet(Vec<String>);

impl OrderedSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts `value` at the end. Returns `false` if it was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    /// Whether `value` is a member.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for OrderedSet {
    fn from(values: Vec<String>) -> Self {
        let mut set = Self::new();
        for value in values {
            set.insert(value);
        }
        set
    }
}

impl From<OrderedSet> for Vec<String> {
    fn from(set: OrderedSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Triggers scoped to a single group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Keywords watched in this group only.
    #[serde(default)]
    pub keywords: OrderedSet,
    /// Users watched in this group only.
    #[serde(default)]
    pub users: OrderedSet,
}

/// The `alert_triggers` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Keywords watched in every group.
    #[serde(default)]
    pub keywords: OrderedSet,
    /// Per-group rules keyed by group ID.
    #[serde(default)]
    pub groups: BTreeMap<String, GroupRule>,
    /// Users watched in every group.
    #[serde(default)]
    pub users: OrderedSet,
}

impl TriggerConfig {
    /// Rule for `group_id`, if one has been created.
    #[must_use]
    pub fn group(&self, group_id: &str) -> Option<&GroupRule> {
        self.groups.get(group_id)
    }

    /// Rule for `group_id`, created empty on first reference.
    pub fn group_mut(&mut self, group_id: &str) -> &mut GroupRule {
        self.groups.entry(group_id.to_string()).or_default()
    }

    /// Whether no trigger of any scope is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.users.is_empty()
            && self
                .groups
                .values()
                .all(|g| g.keywords.is_empty() && g.users.is_empty())
    }
}

/// A private-message destination for alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Platform user ID of the recipient.
    pub user_id: String,
}

impl Recipient {
    /// Creates a recipient.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// The `alert_recipients` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientConfig {
    /// Recipients in the order they were added.
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

impl RecipientConfig {
    /// Whether `user_id` is already a recipient.
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.recipients.iter().any(|r| r.user_id == user_id)
    }

    /// Whether there is nobody to notify.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Iterates recipient IDs in order.
    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.recipients.iter().map(|r| r.user_id.as_str())
    }
}
