use {
    crate::config::TelegramAccount,
    anyhow::{Context, Result, bail},
    async_trait::async_trait,
    serde_json::{Value, json},
    std::time::Duration,
};

/// Delivers one formatted message to one channel.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, account: &TelegramAccount, text: &str) -> Result<()>;
}

const TELEGRAM_API: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramTransport {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramTransport {
    pub fn new() -> Result<Self> {
        Self::with_api_base(TELEGRAM_API)
    }

    pub fn with_api_base(api_base: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("Failed to build Telegram HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send(&self, account: &TelegramAccount, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, account.token);
        let body = json!({
            "chat_id": account.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        // The URL carries the token; keep it out of error chains.
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("request to chat {} failed: {}", account.chat_id, e.without_url()))?;

        let status = response.status();
        let reply: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() || reply["ok"] != Value::Bool(true) {
            let description = reply["description"].as_str().unwrap_or("no description");
            bail!("chat {} rejected message (HTTP {}): {}", account.chat_id, status, description);
        }
        Ok(())
    }
}
