//! Telegram Bot API notifier.
//!
//! Delivers messages via the `sendMessage` endpoint using the legacy
//! `Markdown` parse mode. Failed deliveries are reported, never retried.

use std::time::Duration;

use crate::traits::{Notifier, NotifyError};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const PARSE_MODE: &str = "Markdown";

/// Sends messages to one Telegram chat.
#[derive(Debug)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id`.
    ///
    /// Returns [`NotifyError::Config`] if the token or chat id is empty.
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, NotifyError> {
        if bot_token.trim().is_empty() {
            return Err(NotifyError::Config(
                "Telegram bot token must not be empty".to_string(),
            ));
        }
        if chat_id.trim().is_empty() {
            return Err(NotifyError::Config(
                "Telegram chat id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            bot_token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Point the notifier at a different Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a request timeout to every delivery.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, NotifyError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<u16, NotifyError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });

        tracing::debug!(
            chat_id = %self.chat_id,
            chars = text.chars().count(),
            "Sending Telegram notification"
        );

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!(chat_id = %self.chat_id, status = status.as_u16(), "Telegram notification sent");
            return Ok(status.as_u16());
        }

        // Error bodies are JSON on the real API; tolerate anything else.
        let resp_body: serde_json::Value = response.json().await.unwrap_or_default();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp_body
                .get("parameters")
                .and_then(|p| p.get("retry_after"))
                .and_then(|v| v.as_u64())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let description = resp_body
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown Telegram API error")
            .to_string();

        Err(NotifyError::Rejected {
            status: status.as_u16(),
            description,
        })
    }

    fn channel_name(&self) -> &str {
        "telegram"
    }
}
