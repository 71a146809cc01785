//! # Telegram notifier
//!
//! Turns a validated mood submission into a Markdown message and posts it to
//! the Bot API `sendMessage` method. One request per call, no retries.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

/// Bot API credentials and transport settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Telegram credentials not configured")]
    NotConfigured,

    #[error("Telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram responded with {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Sends one message for the submission.
    ///
    /// Fails without touching the network when the token or chat id is missing.
    /// Transport errors, timeouts and non-2xx responses all map to a failure.
    pub async fn deliver(
        &self,
        name: &str,
        moods: &[String],
        date: &str,
    ) -> Result<(), DeliveryError> {
        let (Some(token), Some(chat_id)) = (
            self.config.bot_token.as_deref(),
            self.config.chat_id.as_deref(),
        ) else {
            tracing::error!("Telegram credentials not configured (BOT_TOKEN or CHAT_ID missing)");
            return Err(DeliveryError::NotConfigured);
        };

        let text = build_message(name, moods, date);
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            token
        );

        // The request URL embeds the bot token, keep it out of error messages.
        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id,
                text: &text,
                parse_mode: "Markdown",
            })
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::warn!(
                    name = %name,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Failed to send to Telegram"
                );
                DeliveryError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                name = %name,
                status = status.as_u16(),
                body = %body,
                "Telegram rejected message"
            );
            return Err(DeliveryError::Rejected { status, body });
        }

        tracing::info!(name = %name, mood_count = moods.len(), "Message sent to Telegram");
        Ok(())
    }
}

/// `YYYY-MM-DD` becomes `MM/DD/YYYY`; anything else is returned as given.
pub fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn build_message(name: &str, moods: &[String], date: &str) -> String {
    let mut message = format!("*{} Mood Today ({})*\n\n", name, display_date(date));
    for mood in moods {
        message.push_str("• ");
        message.push_str(mood);
        message.push('\n');
    }
    message
}
