//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! immutable after startup: each upstream client sits behind an `Arc<dyn _>`
//! so handlers can run in parallel and tests can swap in mocks. A `None`
//! client means its secret was not configured and the route answers `500`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{DEFAULT_RECAPTCHA_MIN_SCORE, ServerConfig};
use crate::llm::{LlmChat, OpenRouterClient};
use crate::services::recaptcha::{CaptchaVerifier, RecaptchaClient};
use crate::services::telegram::{MessageRelay, TelegramClient};

/// Shared application state. Clone is required by Axum; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Chat upstream. `None` if `OPENROUTER_API_KEY` is not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// Contact upstream. `None` if the Telegram token or chat id is missing.
    pub relay: Option<Arc<dyn MessageRelay>>,
    /// CAPTCHA verifier. Only consulted when `captcha_required` is set.
    pub captcha: Option<Arc<dyn CaptchaVerifier>>,
    /// Set whenever a reCAPTCHA secret is configured, even if the client
    /// failed to build, so a broken verifier never silently disables the gate.
    pub captcha_required: bool,
    pub captcha_min_score: f64,
    /// Empty means any origin.
    pub allowed_origins: Arc<Vec<String>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State with no upstreams configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            llm: None,
            relay: None,
            captcha: None,
            captcha_required: false,
            captcha_min_score: DEFAULT_RECAPTCHA_MIN_SCORE,
            allowed_origins: Arc::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn LlmChat>) -> Self {
        self.llm = Some(llm);
        self
    }

    #[must_use]
    pub fn with_relay(mut self, relay: Arc<dyn MessageRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    #[must_use]
    pub fn with_captcha(mut self, captcha: Arc<dyn CaptchaVerifier>, min_score: f64) -> Self {
        self.captcha = Some(captcha);
        self.captcha_required = true;
        self.captcha_min_score = min_score;
        self
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = Arc::new(origins);
        self
    }

    /// Build state from parsed config. Missing secrets and client build
    /// failures are logged and leave the matching upstream unset.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut state = Self::new().with_allowed_origins(config.allowed_origins.clone());

        match config.chat.api_key.clone() {
            Some(key) => match OpenRouterClient::new(key, &config.chat, config.timeouts) {
                Ok(client) => {
                    info!(model = client.model(), "chat proxy configured");
                    state = state.with_llm(Arc::new(client));
                }
                Err(e) => warn!(error = %e, "chat client build failed; chat proxy disabled"),
            },
            None => warn!("OPENROUTER_API_KEY not set; chat proxy will answer 500"),
        }

        match (config.telegram.bot_token.clone(), config.telegram.chat_id.clone()) {
            (Some(token), Some(chat_id)) => {
                match TelegramClient::new(&config.telegram.api_base, token, chat_id, config.timeouts) {
                    Ok(client) => {
                        info!("contact relay configured");
                        state = state.with_relay(Arc::new(client));
                    }
                    Err(e) => warn!(error = %e, "telegram client build failed; contact proxy disabled"),
                }
            }
            _ => warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set; contact proxy will answer 500"),
        }

        if let Some(secret) = config.recaptcha.secret_key.clone() {
            match RecaptchaClient::new(secret, config.recaptcha.verify_url.clone(), config.timeouts) {
                Ok(client) => {
                    info!(min_score = config.recaptcha.min_score, "reCAPTCHA verification enabled");
                    state = state.with_captcha(Arc::new(client), config.recaptcha.min_score);
                }
                Err(e) => {
                    warn!(error = %e, "reCAPTCHA client build failed; contact proxy will answer 500");
                    state.captcha_required = true;
                }
            }
        }

        state
    }

    /// `true` when no allow-list is configured, the request carries no
    /// `Origin`, or the origin is listed.
    #[must_use]
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        if self.allowed_origins.is_empty() {
            return true;
        }
        let Some(origin) = origin else {
            return true;
        };
        let origin = origin.trim().trim_end_matches('/');
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
