//! Contact form orchestration.
//!
//! DESIGN
//! ======
//! `Idle -> Verifying -> Submitting -> Idle`, where `Verifying` only happens
//! when a CAPTCHA provider is configured. Validation collects every problem
//! at once; the form rate limiter is consulted only for valid submissions so
//! typos never cost the visitor a slot.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::WidgetError;
use crate::messages::{Messages, Surface};
use crate::proxy::ProxyClient;
use crate::rate_limit::{DEFAULT_IDENTITY, RateLimiter};
use crate::types::ContactForm;
use crate::validation::validate_form_data;

/// reCAPTCHA action name sent with every token request.
pub const CAPTCHA_ACTION: &str = "contact";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Pending,
    Success,
    Error,
}

/// Rendering surface for the contact form.
pub trait ContactView {
    fn set_submit_enabled(&mut self, enabled: bool);
    fn show_status(&mut self, message: &str, kind: StatusKind);
    fn reset_form(&mut self);
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct CaptchaError(pub String);

/// Source of CAPTCHA tokens (reCAPTCHA v3 `execute` in a browser).
#[async_trait::async_trait]
pub trait CaptchaProvider: Send + Sync {
    /// Obtain a fresh token for `action`.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptchaError`] if no token can be produced.
    async fn token(&self, action: &str) -> Result<String, CaptchaError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactState {
    Idle,
    Verifying,
    Submitting,
}

pub struct ContactWidget {
    proxy: Arc<dyn ProxyClient>,
    limiter: RateLimiter,
    messages: Messages,
    captcha: Option<Arc<dyn CaptchaProvider>>,
    identity: String,
    state: ContactState,
}

impl ContactWidget {
    #[must_use]
    pub fn new(proxy: Arc<dyn ProxyClient>, limiter: RateLimiter, messages: Messages) -> Self {
        Self {
            proxy,
            limiter,
            messages,
            captcha: None,
            identity: DEFAULT_IDENTITY.to_owned(),
            state: ContactState::Idle,
        }
    }

    /// Require a CAPTCHA token with every submission.
    #[must_use]
    pub fn with_captcha(mut self, captcha: Arc<dyn CaptchaProvider>) -> Self {
        self.captcha = Some(captcha);
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    #[must_use]
    pub fn state(&self) -> ContactState {
        self.state
    }

    /// Validate, rate-limit, optionally verify, and submit the form.
    ///
    /// # Errors
    ///
    /// Returns every validation issue at once, a rate-limit error with the
    /// remaining wait, a CAPTCHA error, or a transport/upstream error.
    pub async fn on_submit_form(&mut self, form: &ContactForm, view: &mut impl ContactView) -> Result<(), WidgetError> {
        let mut form = form.trimmed();

        let issues = validate_form_data(&form);
        if !issues.is_empty() {
            return Err(self.fail(WidgetError::Validation(issues), view));
        }
        if let Err(e) = self.limiter.check(&self.identity) {
            return Err(self.fail(e.into(), view));
        }

        view.set_submit_enabled(false);
        view.show_status(self.messages.sending(), StatusKind::Pending);

        let result = self.submit(&mut form).await;

        self.state = ContactState::Idle;
        view.set_submit_enabled(true);

        match result {
            Ok(()) => {
                info!("contact form submitted");
                view.show_status(self.messages.form_success(), StatusKind::Success);
                view.reset_form();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "contact form submission failed");
                Err(self.fail(e, view))
            }
        }
    }

    async fn submit(&mut self, form: &mut ContactForm) -> Result<(), WidgetError> {
        if let Some(captcha) = &self.captcha {
            self.state = ContactState::Verifying;
            let token = captcha
                .token(CAPTCHA_ACTION)
                .await
                .map_err(|e| WidgetError::Captcha(e.to_string()))?;
            form.captcha_token = Some(token);
        }

        self.state = ContactState::Submitting;
        self.proxy.submit_contact(form).await?;
        Ok(())
    }

    fn fail(&self, err: WidgetError, view: &mut impl ContactView) -> WidgetError {
        debug!(error = %err, "contact form not delivered");
        view.show_status(&self.messages.for_error(&err, Surface::Contact), StatusKind::Error);
        err
    }
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
