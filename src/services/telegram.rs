//! Telegram Bot API relay for contact submissions.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamTimeouts;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("telegram request failed: {0}")]
    Request(String),

    #[error("telegram responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx status but `"ok": false` in the body.
    #[error("telegram rejected message: {0}")]
    Rejected(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Delivers a formatted text message to the site owner.
#[async_trait::async_trait]
pub trait MessageRelay: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`RelayError`] when the message could not be delivered.
    async fn send(&self, text: &str) -> Result<(), RelayError>;
}

pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

impl TelegramClient {
    /// # Errors
    ///
    /// Returns [`RelayError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(api_base: &str, bot_token: String, chat_id: String, timeouts: UpstreamTimeouts) -> Result<Self, RelayError> {
        let http = timeouts
            .client_builder()
            .build()
            .map_err(|e| RelayError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_base: api_base.trim_end_matches('/').to_owned(), bot_token, chat_id })
    }
}

#[async_trait::async_trait]
impl MessageRelay for TelegramClient {
    async fn send(&self, text: &str) -> Result<(), RelayError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let body = SendMessageBody { chat_id: &self.chat_id, text, parse_mode: "Markdown" };
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Request(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| RelayError::Request(e.without_url().to_string()))?;
        if !(200..300).contains(&status) {
            return Err(RelayError::Status { status, body: raw });
        }

        let parsed: Option<Value> = serde_json::from_str(&raw).ok();
        if parsed
            .as_ref()
            .and_then(|v| v.get("ok"))
            .and_then(Value::as_bool)
            == Some(false)
        {
            let description = parsed
                .as_ref()
                .and_then(|v| v.get("description"))
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_owned();
            return Err(RelayError::Rejected(description));
        }

        debug!(status, "telegram message delivered");
        Ok(())
    }
}

#[cfg(test)]
#[path = "telegram_test.rs"]
mod tests;
