//! Server configuration parsed from environment variables.
//!
//! Secrets are optional at startup. A proxy whose secret is missing answers
//! `500` per request instead of keeping the whole server down, so the static
//! site keeps working on a half-configured deployment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBSITE_DIR: &str = "./website";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-4-scout:free";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_RECAPTCHA_MIN_SCORE: f64 = 0.5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl UpstreamTimeouts {
    /// A `reqwest` builder with both timeouts applied.
    #[must_use]
    pub fn client_builder(self) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_secs))
            .connect_timeout(Duration::from_secs(self.connect_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecaptchaConfig {
    /// `None` disables verification entirely.
    pub secret_key: Option<String>,
    pub verify_url: String,
    pub min_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub website_dir: PathBuf,
    pub chat: ChatConfig,
    pub telegram: TelegramConfig,
    pub recaptcha: RecaptchaConfig,
    pub timeouts: UpstreamTimeouts,
}

impl ServerConfig {
    /// Build typed server config from the process environment.
    ///
    /// Optional (all of them):
    /// - `PORT`: default 3000
    /// - `ALLOWED_ORIGINS`: comma-separated; empty allows any origin
    /// - `WEBSITE_DIR`: default `./website`
    /// - `OPENROUTER_API_KEY`, `OPENROUTER_BASE_URL`, `OPENROUTER_MODEL`
    /// - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, `TELEGRAM_API_BASE`
    /// - `RECAPTCHA_SECRET_KEY`, `RECAPTCHA_VERIFY_URL`, `RECAPTCHA_MIN_SCORE`
    /// - `UPSTREAM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let parse_or = |key: &str, default: u64| get(key).and_then(|v| v.parse().ok()).unwrap_or(default);

        let port = get("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        let website_dir = PathBuf::from(get("WEBSITE_DIR").unwrap_or_else(|| DEFAULT_WEBSITE_DIR.to_string()));

        let chat = ChatConfig {
            api_key: get("OPENROUTER_API_KEY"),
            base_url: trim_base(get("OPENROUTER_BASE_URL").as_deref().unwrap_or(DEFAULT_OPENROUTER_BASE_URL)),
            model: get("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
        };
        let telegram = TelegramConfig {
            bot_token: get("TELEGRAM_BOT_TOKEN"),
            chat_id: get("TELEGRAM_CHAT_ID"),
            api_base: trim_base(get("TELEGRAM_API_BASE").as_deref().unwrap_or(DEFAULT_TELEGRAM_API_BASE)),
        };
        let recaptcha = RecaptchaConfig {
            secret_key: get("RECAPTCHA_SECRET_KEY"),
            verify_url: get("RECAPTCHA_VERIFY_URL").unwrap_or_else(|| DEFAULT_RECAPTCHA_VERIFY_URL.to_string()),
            min_score: get("RECAPTCHA_MIN_SCORE")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|s| (0.0..=1.0).contains(s))
                .unwrap_or(DEFAULT_RECAPTCHA_MIN_SCORE),
        };
        let timeouts = UpstreamTimeouts {
            request_secs: parse_or("UPSTREAM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or("UPSTREAM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { port, allowed_origins, website_dir, chat, telegram, recaptcha, timeouts }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect()
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
