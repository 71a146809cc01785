use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::services::notifier::TelegramConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// Comma-separated `CORS_ALLOWED_ORIGINS`. `None` means any origin.
    pub cors_allowed_origins: Option<Vec<String>>,

    pub telegram: TelegramConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8000".into())
            .parse()
            .context("PORT must be a number")?;

        let timeout_secs: u64 = lookup("TELEGRAM_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".into())
            .parse()
            .context("TELEGRAM_TIMEOUT_SECS must be a number")?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|o| !o.is_empty());

        // Credentials pasted into .env often carry stray whitespace.
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            cors_allowed_origins,
            telegram: TelegramConfig {
                bot_token: non_empty("BOT_TOKEN"),
                chat_id: non_empty("CHAT_ID"),
                api_base: lookup("TELEGRAM_API_BASE")
                    .unwrap_or_else(|| "https://api.telegram.org".into()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
