//! Transport from the widgets to the proxy server.
//!
//! [`ProxyClient`] is the seam the widgets call through; [`HttpProxyClient`]
//! is the real implementation over `reqwest`. No client-side timeout is
//! imposed: a request runs until the transport itself gives up.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{ChatReply, ChatRequest, ContactForm, ErrorBody, SuccessBody};

pub const CHAT_PATH: &str = "/api/chat";
pub const CONTACT_PATH: &str = "/api/contact";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// No response was received (DNS, connect, reset, unreadable body).
    #[error("transport failed: {0}")]
    Transport(String),
    /// The proxy answered with a non-2xx status, or with a 2xx body that
    /// does not decode.
    #[error("proxy returned status {status}")]
    Upstream { status: u16, error: Option<String> },
}

/// Async calls to the chat and contact proxies. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ProxyClient: Send + Sync {
    /// Forward a chat request and return the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns a [`ProxyError`] on transport failure or a non-2xx status.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProxyError>;

    /// Forward a contact submission.
    ///
    /// # Errors
    ///
    /// Returns a [`ProxyError`] on transport failure or a non-2xx status.
    async fn submit_contact(&self, form: &ContactForm) -> Result<SuccessBody, ProxyError>;
}

pub struct HttpProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProxyClient {
    /// Build a client rooted at `base_url` (e.g. `https://example.com`).
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProxyError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ProxyError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        if !status.is_success() {
            let error = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .map(|b| b.error);
            return Err(ProxyError::Upstream { status: status.as_u16(), error });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(status = status.as_u16(), error = %e, "undecodable proxy response");
            ProxyError::Upstream { status: status.as_u16(), error: None }
        })
    }
}

#[async_trait::async_trait]
impl ProxyClient for HttpProxyClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ProxyError> {
        self.post_json(CHAT_PATH, request).await
    }

    async fn submit_contact(&self, form: &ContactForm) -> Result<SuccessBody, ProxyError> {
        self.post_json(CONTACT_PATH, form).await
    }
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
