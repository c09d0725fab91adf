//! Whitelist/blacklist filtering of inbound conversations.

use serde::{Deserialize, Serialize};

use crate::event::Target;

/// Which list decides whether a conversation is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Only listed conversations are handled.
    Whitelist,
    /// Every conversation except listed ones is handled.
    #[default]
    Blacklist,
}

/// Access-control settings, usually mirrored from the host.
///
/// List entries are `<type>_<id>` (for example `group_123456`) or a
/// wildcard `group_*` / `person_*` covering every conversation of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    /// Active mode.
    #[serde(default)]
    pub mode: AccessMode,
    /// Entries consulted in whitelist mode.
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// Entries consulted in blacklist mode.
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl AccessControl {
    /// Allow only the given sessions.
    #[must_use]
    pub fn whitelist<I, S>(sessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: AccessMode::Whitelist,
            whitelist: sessions.into_iter().map(Into::into).collect(),
            blacklist: Vec::new(),
        }
    }

    /// Allow everything except the given sessions.
    #[must_use]
    pub fn blacklist<I, S>(sessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: AccessMode::Blacklist,
            whitelist: Vec::new(),
            blacklist: sessions.into_iter().map(Into::into).collect(),
        }
    }

    /// The list for the active mode.
    #[must_use]
    pub fn active_list(&self) -> &[String] {
        match self.mode {
            AccessMode::Whitelist => &self.whitelist,
            AccessMode::Blacklist => &self.blacklist,
        }
    }

    /// Whether `launcher` appears in the active list, directly or by wildcard.
    #[must_use]
    pub fn is_listed(&self, launcher: &Target) -> bool {
        let wildcard = format!("{}_*", launcher.kind);
        let exact = launcher.to_string();
        self.active_list()
            .iter()
            .any(|entry| *entry == wildcard || *entry == exact)
    }

    /// Whether messages from `launcher` should be handled.
    #[must_use]
    pub fn allows(&self, launcher: &Target) -> bool {
        let listed = self.is_listed(launcher);
        match self.mode {
            AccessMode::Whitelist => listed,
            AccessMode::Blacklist => !listed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn default_allows_everything() {
        let access = AccessControl::default();
        assert!(access.allows(&Target::group("1")));
        assert!(access.allows(&Target::person("2")));
    }

    #[test_case(AccessMode::Whitelist, "group_42", "42", true ; "whitelist exact member")]
    #[test_case(AccessMode::Whitelist, "group_42", "43", false ; "whitelist non member")]
    #[test_case(AccessMode::Whitelist, "group_*", "43", true ; "whitelist wildcard")]
    #[test_case(AccessMode::Whitelist, "person_*", "43", false ; "whitelist other wildcard")]
    #[test_case(AccessMode::Blacklist, "group_42", "42", false ; "blacklist exact member")]
    #[test_case(AccessMode::Blacklist, "group_42", "43", true ; "blacklist non member")]
    #[test_case(AccessMode::Blacklist, "group_*", "43", false ; "blacklist wildcard")]
    fn group_access(mode: AccessMode, entry: &str, group_id: &str, allowed: bool) {
        let access = match mode {
            AccessMode::Whitelist => AccessControl::whitelist([entry]),
            AccessMode::Blacklist => AccessControl::blacklist([entry]),
        };
        assert_eq!(access.allows(&Target::group(group_id)), allowed);
    }

    #[test]
    fn only_active_list_is_consulted() {
        let access = AccessControl {
            mode: AccessMode::Blacklist,
            whitelist: vec!["group_1".to_string()],
            blacklist: Vec::new(),
        };
        assert!(access.allows(&Target::group("1")));
        assert!(access.allows(&Target::group("2")));
    }

    #[test]
    fn person_sessions() {
        let access = AccessControl::whitelist(["person_7"]);
        assert!(access.allows(&Target::person("7")));
        assert!(!access.allows(&Target::group("7")));
    }
}
