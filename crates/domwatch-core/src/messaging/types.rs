use crate::domain::{ChatId, UserId};

/// An inbound chat command, already split into name and argument text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub name: String,
    pub args: String,
}

impl Command {
    /// Parse `/cmd@botname arg1 ...`.
    ///
    /// Returns `None` for text that is not a command, and for commands addressed to a
    /// bot other than `bot_username` (compared case-insensitively). With no known bot
    /// username every mention is accepted.
    pub fn parse(
        chat_id: ChatId,
        user_id: UserId,
        username: Option<String>,
        text: &str,
        bot_username: Option<&str>,
    ) -> Option<Self> {
        let text = text.trim_start();
        if !text.starts_with('/') {
            return None;
        }

        let (first, rest) = match text.find(char::is_whitespace) {
            Some(idx) => (&text[..idx], &text[idx..]),
            None => (text, ""),
        };

        let (name, mention) = match first.trim_start_matches('/').split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (first.trim_start_matches('/'), None),
        };
        if let (Some(mention), Some(me)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(me.trim_start_matches('@')) {
                return None;
            }
        }
        let name = name.to_lowercase();

        Some(Self {
            chat_id,
            user_id,
            username,
            name,
            args: rest.trim().to_string(),
        })
    }
}
