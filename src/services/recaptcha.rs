//! reCAPTCHA v3 token verification.

use serde::Deserialize;

use crate::config::UpstreamTimeouts;

#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    #[error("verification request failed: {0}")]
    Request(String),

    #[error("verification response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Decoded `siteverify` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Verification {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl Verification {
    /// A missing score (v2-style response) passes on `success` alone.
    #[must_use]
    pub fn passes(&self, min_score: f64) -> bool {
        self.success && self.score.is_none_or(|s| s >= min_score)
    }
}

#[async_trait::async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`CaptchaError`] if the provider could not be reached or
    /// answered with something unreadable. A failed check is an `Ok` with
    /// `success == false`.
    async fn verify(&self, token: &str) -> Result<Verification, CaptchaError>;
}

pub struct RecaptchaClient {
    http: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl RecaptchaClient {
    /// # Errors
    ///
    /// Returns [`CaptchaError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(secret: String, verify_url: String, timeouts: UpstreamTimeouts) -> Result<Self, CaptchaError> {
        let http = timeouts
            .client_builder()
            .build()
            .map_err(|e| CaptchaError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, secret, verify_url })
    }
}

#[async_trait::async_trait]
impl CaptchaVerifier for RecaptchaClient {
    async fn verify(&self, token: &str) -> Result<Verification, CaptchaError> {
        let params = [("secret", self.secret.as_str()), ("response", token)];
        let response = self
            .http
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| CaptchaError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CaptchaError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(CaptchaError::Request(format!("status {status}")));
        }
        serde_json::from_str(&text).map_err(|e| CaptchaError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[path = "recaptcha_test.rs"]
mod tests;
