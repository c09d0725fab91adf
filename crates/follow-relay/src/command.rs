//! The `follow` administrative command grammar.
//!
//! ```text
//! follow help
//! follow 私信 <userId>
//! follow 群号 <groupId> <userId|keyword>
//! follow 用户 <userId>
//! follow 关键词 <keyword>
//! ```
//!
//! Text is split on whitespace after every `/` has been removed. Commands
//! are parsed into a [`FollowCommand`], validated, and then executed
//! against a [`RuleStore`]. [`handle_command`] is the single boundary that
//! turns every outcome, including errors, into a reply.

use follow_rules::{AddOutcome, ConfigRepository, RuleStore};
use tracing::{debug, warn};

use crate::error::{CommandError, ValidationError};
use crate::extract::{extract_identifier, is_numeric_id};

/// First token of every command.
pub const COMMAND_KEYWORD: &str = "follow";

/// Character removed from message text before any processing.
pub const ESCAPE_CHAR: char = '/';

const GROUP_USAGE: &str = "follow 群号 <群号> <消息或QQ号>";

/// Reply for `follow help` and a bare `follow`.
pub const HELP_TEXT: &str = "\
📢 关注提醒 使用帮助 📢

1. 添加接收者:
   follow 私信 <QQ号> - 添加接收提醒的私聊用户

2. 设置群组关注规则:
   follow 群号 <群号> <QQ号> - 监控指定群中的特定用户
   follow 群号 <群号> <关键词> - 监控指定群中的关键字

3. 设置全局关注规则:
   follow 用户 <QQ号> - 监控该用户在所有群的消息
   follow 关键词 <关键词> - 监控所有群中的关键词

4. 其他命令:
   follow help - 显示本帮助信息

示例:
   follow 私信 123456789 - 设置123456789为接收者
   follow 群号 987654321 QQ555555 - 监控群987654321中的用户555555
   follow 群号 987654321 重要通知 - 监控群987654321中的'重要通知'关键词";

/// Remove every escape character from `text`.
#[must_use]
pub fn strip_escapes(text: &str) -> String {
    text.replace(ESCAPE_CHAR, "")
}

/// Whether `text` is addressed to the command engine.
#[must_use]
pub fn is_command(text: &str) -> bool {
    text.split_whitespace().next() == Some(COMMAND_KEYWORD)
}

/// How the last parameter of `follow 群号` was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTarget {
    /// The token contained a QQ number.
    User(String),
    /// The token is a keyword, kept verbatim.
    Keyword(String),
}

/// A validated `follow` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowCommand {
    /// Show usage.
    Help,
    /// Add an alert recipient.
    AddRecipient {
        /// Numeric user ID.
        user_id: String,
    },
    /// Watch a user or keyword in one group.
    FollowInGroup {
        /// Group the rule applies to.
        group_id: String,
        /// What to watch.
        target: GroupTarget,
    },
    /// Watch a user in every group.
    FollowUser {
        /// Numeric user ID.
        user_id: String,
    },
    /// Watch a keyword in every group.
    FollowKeyword {
        /// The keyword.
        keyword: String,
    },
}

/// Parse `text` into a command.
///
/// Returns `Ok(None)` when the first token is not [`COMMAND_KEYWORD`], in
/// which case the text is an ordinary message.
pub fn parse_command(text: &str) -> Result<Option<FollowCommand>, CommandError> {
    let mut tokens = text.split_whitespace();
    if tokens.next() != Some(COMMAND_KEYWORD) {
        return Ok(None);
    }

    let Some(kind) = tokens.next() else {
        return Ok(Some(FollowCommand::Help));
    };
    let kind = kind.to_lowercase();
    if kind == "help" {
        return Ok(Some(FollowCommand::Help));
    }

    let Some(param1) = tokens.next() else {
        return Err(ValidationError::Malformed.into());
    };
    let param2 = tokens.next();

    let command = match kind.as_str() {
        "私信" => FollowCommand::AddRecipient {
            user_id: numeric_id(param1)?,
        },
        "群号" => {
            let Some(token) = param2 else {
                return Err(ValidationError::MissingParameter { usage: GROUP_USAGE }.into());
            };
            let extracted = extract_identifier(token);
            let target = if extracted.is_empty() {
                GroupTarget::Keyword(token.to_string())
            } else {
                GroupTarget::User(extracted)
            };
            FollowCommand::FollowInGroup {
                group_id: param1.to_string(),
                target,
            }
        }
        "用户" => FollowCommand::FollowUser {
            user_id: numeric_id(param1)?,
        },
        "关键词" => {
            if param1.is_empty() {
                return Err(ValidationError::EmptyKeyword.into());
            }
            FollowCommand::FollowKeyword {
                keyword: param1.to_string(),
            }
        }
        _ => return Err(CommandError::UnknownCommand { token: kind }),
    };
    Ok(Some(command))
}

fn numeric_id(value: &str) -> Result<String, ValidationError> {
    if is_numeric_id(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::NotNumeric {
            value: value.to_string(),
        })
    }
}

/// Apply `command` to `store` and return the confirmation text.
pub fn execute<R: ConfigRepository>(
    command: &FollowCommand,
    store: &mut RuleStore<R>,
) -> Result<String, CommandError> {
    let reply = match command {
        FollowCommand::Help => HELP_TEXT.to_string(),
        FollowCommand::AddRecipient { user_id } => match store.add_recipient(user_id)? {
            AddOutcome::Added => format!("已添加接收者 {user_id}，当触发条件满足时会收到私聊提醒"),
            AddOutcome::AlreadyPresent => format!("{user_id} 已是接收者"),
        },
        FollowCommand::FollowInGroup { group_id, target } => match target {
            GroupTarget::User(user_id) => {
                store.add_group_user(group_id, user_id)?;
                format!("已设置关注群 {group_id} 的用户 {user_id}")
            }
            GroupTarget::Keyword(keyword) => {
                store.add_group_keyword(group_id, keyword)?;
                format!("已设置关注群 {group_id} 的关键词 '{keyword}'")
            }
        },
        FollowCommand::FollowUser { user_id } => match store.add_global_user(user_id)? {
            AddOutcome::Added => format!("已全局关注用户 {user_id} 的所有群消息"),
            AddOutcome::AlreadyPresent => format!("已在全局关注用户 {user_id}"),
        },
        FollowCommand::FollowKeyword { keyword } => match store.add_global_keyword(keyword)? {
            AddOutcome::Added => format!("已全局关注关键词 '{keyword}'"),
            AddOutcome::AlreadyPresent => format!("已在全局关注关键词 '{keyword}'"),
        },
    };
    Ok(reply)
}

/// User-facing text for a failed command.
#[must_use]
pub fn error_reply(err: &CommandError) -> String {
    match err {
        CommandError::Validation(ValidationError::NotNumeric { .. }) => "QQ号必须是数字".to_string(),
        CommandError::Validation(ValidationError::Malformed) => {
            "命令格式错误，正确格式: follow <类型> <参数1> [参数2]".to_string()
        }
        CommandError::Validation(ValidationError::MissingParameter { usage }) => {
            format!("缺少参数，使用方式: {usage}")
        }
        CommandError::Validation(ValidationError::EmptyKeyword) => "请输入关键词".to_string(),
        CommandError::UnknownCommand { .. } => "未知命令类型，可用: 私信, 群号, 用户, 关键词".to_string(),
        CommandError::Execution(e) => format!("命令处理错误: {e}"),
    }
}

/// Run `text` through the command engine.
///
/// Returns `None` if `text` is not a command. Otherwise always returns a
/// reply: a confirmation, help, or the text of whatever went wrong.
pub fn handle_command<R: ConfigRepository>(text: &str, store: &mut RuleStore<R>) -> Option<String> {
    let result = match parse_command(text) {
        Ok(None) => return None,
        Ok(Some(command)) => {
            debug!(?command, "executing follow command");
            execute(&command, store)
        }
        Err(e) => Err(e),
    };

    Some(match result {
        Ok(reply) => reply,
        Err(e) => {
            match &e {
                CommandError::Execution(_) => warn!(error = %e, "follow command failed"),
                _ => debug!(error = %e, "follow command rejected"),
            }
            error_reply(&e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use follow_rules::MemoryRepository;
    use test_case::test_case;

    fn store() -> RuleStore<MemoryRepository> {
        RuleStore::open(MemoryRepository::new()).expect("open")
    }

    #[test_case("follow" ; "bare keyword")]
    #[test_case("follow help" ; "help")]
    #[test_case("follow HELP" ; "help any case")]
    #[test_case("follow help extra" ; "trailing tokens")]
    fn parses_help(text: &str) {
        assert_eq!(parse_command(text).expect("parse"), Some(FollowCommand::Help));
    }

    #[test_case("" ; "empty")]
    #[test_case("hello follow help" ; "keyword not first")]
    #[test_case("Follow help" ; "keyword is case sensitive")]
    #[test_case("followers are here" ; "prefix of a word")]
    fn non_commands(text: &str) {
        assert_eq!(parse_command(text).expect("parse"), None);
        assert!(!is_command(text));
    }

    #[test]
    fn parses_every_sub_command() {
        assert_eq!(
            parse_command("follow 私信 123").expect("parse"),
            Some(FollowCommand::AddRecipient {
                user_id: "123".to_string()
            })
        );
        assert_eq!(
            parse_command("follow 用户 456").expect("parse"),
            Some(FollowCommand::FollowUser {
                user_id: "456".to_string()
            })
        );
        assert_eq!(
            parse_command("follow 关键词 urgent").expect("parse"),
            Some(FollowCommand::FollowKeyword {
                keyword: "urgent".to_string()
            })
        );
    }

    #[test_case("follow 群号 G QQ555", GroupTarget::User("555".to_string()) ; "qq number")]
    #[test_case("follow 群号 G at987", GroupTarget::User("987".to_string()) ; "at mention")]
    #[test_case("follow 群号 G 重要通知", GroupTarget::Keyword("重要通知".to_string()) ; "keyword")]
    fn group_target_disambiguation(text: &str, expected: GroupTarget) {
        assert_eq!(
            parse_command(text).expect("parse"),
            Some(FollowCommand::FollowInGroup {
                group_id: "G".to_string(),
                target: expected,
            })
        );
    }

    #[test]
    fn validation_errors() {
        assert!(matches!(
            parse_command("follow 私信 abc"),
            Err(CommandError::Validation(ValidationError::NotNumeric { .. }))
        ));
        assert!(matches!(
            parse_command("follow 用户 12x"),
            Err(CommandError::Validation(ValidationError::NotNumeric { .. }))
        ));
        assert!(matches!(
            parse_command("follow 私信"),
            Err(CommandError::Validation(ValidationError::Malformed))
        ));
        assert!(matches!(
            parse_command("follow 删除 x"),
            Err(CommandError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn unknown_command_without_params_is_a_format_error() {
        assert!(matches!(
            parse_command("follow 删除"),
            Err(CommandError::Validation(ValidationError::Malformed))
        ));
    }

    #[test]
    fn missing_group_token_is_a_usage_error() {
        let err = parse_command("follow 群号 G").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Validation(ValidationError::MissingParameter { usage: GROUP_USAGE })
        ));
        assert_eq!(
            error_reply(&err),
            "缺少参数，使用方式: follow 群号 <群号> <消息或QQ号>"
        );
    }

    #[test]
    fn handle_command_replies() {
        let mut store = store();
        assert_eq!(handle_command("just chatting", &mut store), None);
        assert_eq!(handle_command("follow", &mut store).as_deref(), Some(HELP_TEXT));
        assert_eq!(
            handle_command("follow 私信 123", &mut store).as_deref(),
            Some("已添加接收者 123，当触发条件满足时会收到私聊提醒")
        );
        assert_eq!(
            handle_command("follow 私信 123", &mut store).as_deref(),
            Some("123 已是接收者")
        );
        assert_eq!(
            handle_command("follow 用户 456", &mut store).as_deref(),
            Some("已全局关注用户 456 的所有群消息")
        );
        assert_eq!(
            handle_command("follow 用户 456", &mut store).as_deref(),
            Some("已在全局关注用户 456")
        );
        assert_eq!(
            handle_command("follow 关键词 urgent", &mut store).as_deref(),
            Some("已全局关注关键词 'urgent'")
        );
        assert_eq!(
            handle_command("follow 关键词 urgent", &mut store).as_deref(),
            Some("已在全局关注关键词 'urgent'")
        );
        assert_eq!(
            handle_command("follow 群号 42 QQ555", &mut store).as_deref(),
            Some("已设置关注群 42 的用户 555")
        );
        assert_eq!(
            handle_command("follow 群号 42 重要通知", &mut store).as_deref(),
            Some("已设置关注群 42 的关键词 '重要通知'")
        );

        let rule = store.triggers().group("42").expect("group");
        assert!(rule.users.contains("555"));
        assert!(rule.keywords.contains("重要通知"));
    }

    #[test]
    fn handle_command_error_replies_do_not_mutate() {
        let mut store = store();
        assert_eq!(
            handle_command("follow 私信 abc", &mut store).as_deref(),
            Some("QQ号必须是数字")
        );
        assert_eq!(
            handle_command("follow 群号 G", &mut store).as_deref(),
            Some("缺少参数，使用方式: follow 群号 <群号> <消息或QQ号>")
        );
        assert_eq!(
            handle_command("follow 群号", &mut store).as_deref(),
            Some("命令格式错误，正确格式: follow <类型> <参数1> [参数2]")
        );
        assert_eq!(
            handle_command("follow 删除 x", &mut store).as_deref(),
            Some("未知命令类型，可用: 私信, 群号, 用户, 关键词")
        );
        assert!(store.triggers().is_empty());
        assert!(store.triggers().group("G").is_none());
        assert!(store.recipients().is_empty());
    }

    #[test]
    fn execution_error_is_reported() {
        let err = CommandError::Execution(follow_rules::RuleError::EmptyValue { field: "keyword" });
        assert_eq!(error_reply(&err), "命令处理错误: keyword cannot be empty");
    }

    #[test]
    fn escapes_are_stripped() {
        assert_eq!(strip_escapes("fo/llow help"), "follow help");
        assert_eq!(strip_escapes("/follow/ 私信 1/2"), "follow 私信 12");
        assert!(is_command(&strip_escapes("fo/llow help")));
    }
}
