//! Contact relay: validation, CAPTCHA check, Telegram delivery.

use tracing::{error, info, warn};
use widget::{ContactForm, ValidationIssue, validate_form_data};

use super::recaptcha::CaptchaVerifier;
use super::sanitize::escape_markdown;
use super::telegram::MessageRelay;
use crate::error::ApiError;

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

const FIELDS_REQUIRED: &str = "Name and message are required.";
const CAPTCHA_FAILED: &str = "reCAPTCHA verification failed.";
const SEND_FAILED: &str = "Failed to send message.";
const NOT_PROVIDED: &str = "មិនបានផ្តល់ឱ្យ";

/// CAPTCHA gate for one request.
pub struct CaptchaGate<'a> {
    /// `None` while `required` means the verifier is misconfigured.
    pub verifier: Option<&'a dyn CaptchaVerifier>,
    pub required: bool,
    pub min_score: f64,
}

impl CaptchaGate<'_> {
    #[must_use]
    pub fn disabled() -> Self {
        Self { verifier: None, required: false, min_score: 0.0 }
    }
}

/// Markdown body sent to the site owner. User fields are escaped.
#[must_use]
pub fn format_contact_message(form: &ContactForm) -> String {
    let optional = |value: &str| {
        if value.is_empty() { NOT_PROVIDED.to_owned() } else { escape_markdown(value) }
    };
    format!(
        "*📩 សារថ្មីពី Portfolio Website*\n\n\
         *👤 ឈ្មោះ:* {name}\n\
         *📧 អ៊ីមែល:* {email}\n\
         *☎️ លេខទូរស័ព្ទ:* {phone}\n\n\
         *📝 សារ:*\n{message}",
        name = escape_markdown(&form.name),
        email = optional(&form.email),
        phone = optional(&form.phonenumber),
        message = escape_markdown(&form.message),
    )
}

fn check_form(form: &ContactForm) -> Result<(), ApiError> {
    if form.name.is_empty() || form.message.is_empty() {
        return Err(ApiError::bad_request(FIELDS_REQUIRED));
    }
    let issues: Vec<ValidationIssue> = validate_form_data(form);
    match issues.first() {
        None => Ok(()),
        Some(issue) => Err(ApiError::bad_request(format!("Invalid submission: {issue}."))),
    }
}

async fn check_captcha(gate: &CaptchaGate<'_>, token: Option<&str>) -> Result<(), ApiError> {
    if !gate.required {
        return Ok(());
    }
    let Some(verifier) = gate.verifier else {
        error!("reCAPTCHA secret configured but verifier unavailable");
        return Err(ApiError::NotConfigured);
    };
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return Err(ApiError::bad_request(CAPTCHA_FAILED));
    };

    let verification = verifier.verify(token).await.map_err(|e| {
        error!(error = %e, "reCAPTCHA verification failed");
        ApiError::Upstream(SEND_FAILED)
    })?;
    if !verification.passes(gate.min_score) {
        warn!(
            success = verification.success,
            score = ?verification.score,
            action = ?verification.action,
            error_codes = ?verification.error_codes,
            "reCAPTCHA rejected submission"
        );
        return Err(ApiError::bad_request(CAPTCHA_FAILED));
    }
    Ok(())
}

/// Validate and relay one submission, returning the public success text.
///
/// # Errors
///
/// [`ApiError::BadRequest`] for invalid input or a failed CAPTCHA,
/// [`ApiError::NotConfigured`] for a missing relay or verifier, and
/// [`ApiError::Upstream`] when an upstream call fails.
pub async fn relay_contact(
    relay: Option<&dyn MessageRelay>,
    gate: &CaptchaGate<'_>,
    form: &ContactForm,
) -> Result<&'static str, ApiError> {
    let form = form.trimmed();
    check_form(&form)?;
    check_captcha(gate, form.captcha_token.as_deref()).await?;

    let Some(relay) = relay else {
        error!("telegram relay not configured");
        return Err(ApiError::NotConfigured);
    };

    relay
        .send(&format_contact_message(&form))
        .await
        .map_err(|e| {
            error!(error = %e, "contact relay failed");
            ApiError::Upstream(SEND_FAILED)
        })?;

    info!(has_email = !form.email.is_empty(), has_phone = !form.phonenumber.is_empty(), "contact message relayed");
    Ok(SUCCESS_MESSAGE)
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
