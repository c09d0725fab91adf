//! QQ-number extraction from free-form tokens.

use once_cell::sync::Lazy;
use regex::Regex;

/// Optional `qq` / `qq:` / `qq：` or `at` prefix, case-insensitive.
static ID_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(qq[:：]?|at)").unwrap_or_else(|_| unreachable!()));

/// Extract a digit-only identifier from `token`.
///
/// One leading `qq`, `qq:`, `qq：` or `at` prefix (any letter case) is
/// removed, then every character that is not an ASCII digit is dropped.
/// The result may be empty, which means `token` carries no identifier.
///
/// ```
/// use follow_relay::extract_identifier;
///
/// assert_eq!(extract_identifier("QQ:123456"), "123456");
/// assert_eq!(extract_identifier("at987"), "987");
/// assert_eq!(extract_identifier("重要通知"), "");
/// ```
#[must_use]
pub fn extract_identifier(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let rest = ID_PREFIX_REGEX.replace(token, "");
    rest.chars().filter(char::is_ascii_digit).collect()
}

/// Whether `value` is a non-empty run of ASCII digits.
#[must_use]
pub fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
