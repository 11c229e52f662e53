//! Messaging credentials, read from the environment at startup

use crate::config::MAX_TELEGRAM_ACCOUNTS;

/// One Telegram bot/chat pair. `id` matches `ChannelConfig::id`.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramAccount {
    pub id: u32,
    pub token: String,
    pub chat_id: String,
    pub name: String,
}

impl TelegramAccount {
    pub fn new(id: u32, token: &str, chat_id: &str, name: &str) -> Self {
        Self {
            id,
            token: token.to_string(),
            chat_id: chat_id.to_string(),
            name: name.to_string(),
        }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for TelegramAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramAccount")
            .field("id", &self.id)
            .field("chat_id", &self.chat_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Accounts 1..=4 from `TELEGRAM_TOKEN_<i>`, `TELEGRAM_CHAT_ID_<i>` and optional `TELEGRAM_NAME_<i>`.
/// An index only counts when both token and chat id are present.
pub fn load_telegram_accounts() -> Vec<TelegramAccount> {
    accounts_from(|key| std::env::var(key).ok())
}

pub(crate) fn accounts_from(lookup: impl Fn(&str) -> Option<String>) -> Vec<TelegramAccount> {
    (1..=MAX_TELEGRAM_ACCOUNTS)
        .filter_map(|i| {
            let token = lookup(&format!("TELEGRAM_TOKEN_{}", i)).filter(|v| !v.is_empty())?;
            let chat_id = lookup(&format!("TELEGRAM_CHAT_ID_{}", i)).filter(|v| !v.is_empty())?;
            let name =
                lookup(&format!("TELEGRAM_NAME_{}", i)).unwrap_or_else(|| format!("Account {}", i));
            Some(TelegramAccount {
                id: i,
                token,
                chat_id,
                name,
            })
        })
        .collect()
}
