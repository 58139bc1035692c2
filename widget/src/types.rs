//! Wire types shared by the widgets and the proxy server.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of a chat proxy request.
///
/// Older clients send a single `message`; current ones send the trailing
/// conversation as `messages`. The proxy prefers `messages` when both exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Turn>>,
}

/// Successful chat proxy response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Contact form record, as posted to the contact proxy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phonenumber: String,
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "g-recaptcha-response",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub captcha_token: Option<String>,
}

impl ContactForm {
    /// Copy of the form with every text field trimmed.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phonenumber: self.phonenumber.trim().to_owned(),
            message: self.message.trim().to_owned(),
            captcha_token: self.captcha_token.clone(),
        }
    }
}

/// `{"error": ...}` envelope returned by both proxies on failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"message": ...}` envelope returned by the contact proxy on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn chat_request_omits_absent_fields() {
        let req = ChatRequest { message: Some("hello".into()), messages: None };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"hello"}"#);
    }

    #[test]
    fn contact_form_uses_recaptcha_field_name() {
        let form: ContactForm = serde_json::from_str(
            r#"{"name":"Ann","message":"Hello there friend","g-recaptcha-response":"tok"}"#,
        )
        .unwrap();
        assert_eq!(form.captcha_token.as_deref(), Some("tok"));
        assert!(form.email.is_empty());
        assert!(form.phonenumber.is_empty());
    }

    #[test]
    fn trimmed_strips_whitespace() {
        let form = ContactForm { name: "  Ann ".into(), message: "\thello\n".into(), ..ContactForm::default() };
        let t = form.trimmed();
        assert_eq!(t.name, "Ann");
        assert_eq!(t.message, "hello");
    }
}
