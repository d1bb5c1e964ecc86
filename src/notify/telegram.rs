//! Telegram notification channel.
//!
//! Sends HTML-formatted messages to a single fixed chat via the Bot API.
//! The bot token is held as a secret and only interpolated into the
//! request URL at send time.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::Notifier;

const API_BASE: &str = "https://api.telegram.org";
const CHANNEL_NAME: &str = "telegram";

/// Bot API response envelope. Only the fields needed for error reporting.
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client bound to one chat.
pub struct TelegramNotifier {
    http: Client,
    bot_token: Secret<String>,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("SURGE/0.1.0 (momentum-scanner)")
            .build()
            .context("Failed to build HTTP client for Telegram")?;

        Ok(Self {
            http,
            bot_token: Secret::new(bot_token),
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let url = format!(
            "{API_BASE}/bot{}/sendMessage",
            self.bot_token.expose_secret(),
        );

        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        let status = resp.status();
        let reply: SendMessageResponse = resp
            .json()
            .await
            .context("Failed to parse Telegram response")?;

        if !reply.ok {
            anyhow::bail!(
                "Telegram rejected message ({status}): {}",
                reply.description.unwrap_or_else(|| "no description".to_string()),
            );
        }

        debug!(chat_id = %self.chat_id, "Telegram message delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        CHANNEL_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
