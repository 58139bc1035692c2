//! Input validation for chat messages and contact submissions.
//!
//! These checks gate the client before anything touches the network. The
//! proxy server runs the same rules again as the authoritative check, so
//! the client never needs to be trusted.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::ContactForm;

pub const CHAT_MAX_CHARS: usize = 500;
pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// One rule violation. `Display` gives the English text; see
/// [`crate::Messages::issue`] for localized rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("message must not be empty")]
    ChatEmpty,
    #[error("message must be at most 500 characters")]
    ChatTooLong,
    #[error("message contains disallowed markup")]
    ChatMarkup,
    #[error("name must be at least 2 characters")]
    NameTooShort,
    #[error("name must be at most 50 characters")]
    NameTooLong,
    #[error("message must be at least 10 characters")]
    MessageTooShort,
    #[error("message must be at most 1000 characters")]
    MessageTooLong,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("phone number is not valid")]
    InvalidPhone,
}

impl ValidationIssue {
    /// Form field the issue belongs to.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::ChatEmpty | Self::ChatTooLong | Self::ChatMarkup => "chat",
            Self::NameTooShort | Self::NameTooLong => "name",
            Self::MessageTooShort | Self::MessageTooLong => "message",
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phonenumber",
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9+\-\s()]{8,15}$").expect("valid phone regex"))
}

/// First problem with a chat message, if any.
#[must_use]
pub fn chat_message_issue(text: &str) -> Option<ValidationIssue> {
    let text = text.trim();
    if text.is_empty() {
        return Some(ValidationIssue::ChatEmpty);
    }
    if text.chars().count() > CHAT_MAX_CHARS {
        return Some(ValidationIssue::ChatTooLong);
    }
    if text.to_lowercase().contains("<script") {
        return Some(ValidationIssue::ChatMarkup);
    }
    None
}

/// Coarse client-side gate for chat input.
#[must_use]
pub fn validate_chat_message(text: &str) -> bool {
    chat_message_issue(text).is_none()
}

/// Check every field of a contact submission and collect all violations.
///
/// Fields are trimmed first. `email` and `phonenumber` are optional and only
/// checked when non-empty.
#[must_use]
pub fn validate_form_data(form: &ContactForm) -> Vec<ValidationIssue> {
    let form = form.trimmed();
    let mut issues = Vec::new();

    let name_len = form.name.chars().count();
    if name_len < NAME_MIN_CHARS {
        issues.push(ValidationIssue::NameTooShort);
    } else if name_len > NAME_MAX_CHARS {
        issues.push(ValidationIssue::NameTooLong);
    }

    if !form.email.is_empty() && !email_pattern().is_match(&form.email) {
        issues.push(ValidationIssue::InvalidEmail);
    }

    if !form.phonenumber.is_empty() && !phone_pattern().is_match(&form.phonenumber) {
        issues.push(ValidationIssue::InvalidPhone);
    }

    let message_len = form.message.chars().count();
    if message_len < MESSAGE_MIN_CHARS {
        issues.push(ValidationIssue::MessageTooShort);
    } else if message_len > MESSAGE_MAX_CHARS {
        issues.push(ValidationIssue::MessageTooLong);
    }

    issues
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
