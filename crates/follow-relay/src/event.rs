//! Inbound message events and conversation addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of conversation a message came from or is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherType {
    /// A group chat.
    Group,
    /// A one-to-one chat.
    Person,
}

impl LauncherType {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for LauncherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversation address: a group or a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Conversation kind.
    pub kind: LauncherType,
    /// Group or user ID.
    pub id: String,
}

impl Target {
    /// A group conversation.
    #[must_use]
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            kind: LauncherType::Group,
            id: id.into(),
        }
    }

    /// A private conversation with one user.
    #[must_use]
    pub fn person(id: impl Into<String>) -> Self {
        Self {
            kind: LauncherType::Person,
            id: id.into(),
        }
    }
}

/// Formats as `<type>_<id>`, the session notation used by access lists.
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}

/// A message delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Flattened message text.
    pub text: String,
    /// ID of the user who sent the message.
    pub sender_id: String,
    /// ID of the conversation the message was sent in.
    pub launcher_id: String,
    /// Kind of that conversation.
    pub launcher_type: LauncherType,
}

impl MessageEvent {
    /// A message posted in a group.
    #[must_use]
    pub fn group(
        group_id: impl Into<String>,
        sender_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            sender_id: sender_id.into(),
            launcher_id: group_id.into(),
            launcher_type: LauncherType::Group,
        }
    }

    /// Where replies to this message go.
    #[must_use]
    pub fn launcher(&self) -> Target {
        Target {
            kind: self.launcher_type,
            id: self.launcher_id.clone(),
        }
    }
}
