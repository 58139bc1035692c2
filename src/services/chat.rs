//! Chat relay. Turns a widget request into one LLM call.
//!
//! DESIGN
//! ======
//! The widget sends either a bare `message` or its trailing conversation as
//! `messages`. Only the last [`CONTEXT_TURNS`] turns reach the model and the
//! newest one must be a user turn. Clients control every turn, so each user
//! turn in the window must pass the chat rules, assistant turns are cut to
//! the chat length limit, and all of them are HTML-escaped.
//!
//! TRADE-OFFS
//! ==========
//! Sampling parameters and the persona are fixed here instead of being
//! request fields, so a visitor cannot repurpose the key.

use tracing::{error, info};
use widget::validation::CHAT_MAX_CHARS;
use widget::{ChatRequest, Role, Turn, ValidationIssue, chat_message_issue};

use super::sanitize::escape_html;
use crate::error::ApiError;
use crate::llm::{ChatOptions, LlmChat, Message};

pub const SYSTEM_PROMPT: &str =
    "You are SrengBot, a friendly and helpful assistant on Sreng's portfolio website. You respond in Khmer.";
pub const MAX_TOKENS: u32 = 150;
pub const TEMPERATURE: f64 = 0.7;
pub const CONTEXT_TURNS: usize = 10;
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response.";

const MESSAGE_REQUIRED: &str = "Message is required.";
const CHAT_FAILED: &str = "Failed to process chat message.";

/// Build the model-facing conversation from a proxy request.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when there is no usable user message.
pub fn conversation_from_request(request: &ChatRequest) -> Result<Vec<Message>, ApiError> {
    let turns = request.messages.as_deref().filter(|turns| !turns.is_empty());

    if let Some(turns) = turns {
        let start = turns.len().saturating_sub(CONTEXT_TURNS);
        let window = &turns[start..];
        if window.last().is_none_or(|t| t.role != Role::User) {
            return Err(ApiError::bad_request(MESSAGE_REQUIRED));
        }
        for turn in window.iter().filter(|t| t.role == Role::User) {
            check_message(&turn.content)?;
        }
        return Ok(window.iter().map(forwarded_turn).collect());
    }

    let Some(text) = request.message.as_deref() else {
        return Err(ApiError::bad_request(MESSAGE_REQUIRED));
    };
    check_message(text)?;
    Ok(vec![Message::new(Role::User.as_str(), escape_html(text.trim()))])
}

/// Assistant turns come from the client too, so they are capped at the chat
/// length limit instead of validated.
fn forwarded_turn(turn: &Turn) -> Message {
    let content = turn.content.trim();
    let content = match turn.role {
        Role::User => content,
        Role::Assistant => content
            .char_indices()
            .nth(CHAT_MAX_CHARS)
            .map_or(content, |(end, _)| &content[..end]),
    };
    Message::new(turn.role.as_str(), escape_html(content))
}

fn check_message(text: &str) -> Result<(), ApiError> {
    match chat_message_issue(text) {
        None => Ok(()),
        Some(ValidationIssue::ChatEmpty) => Err(ApiError::bad_request(MESSAGE_REQUIRED)),
        Some(issue) => Err(ApiError::bad_request(format!("Invalid message: {issue}."))),
    }
}

/// Ask the model for a reply to a conversation built by
/// [`conversation_from_request`]. An empty completion becomes
/// [`FALLBACK_REPLY`].
///
/// # Errors
///
/// Returns [`ApiError::Upstream`] when the LLM call fails.
pub async fn reply(llm: &dyn LlmChat, conversation: &[Message]) -> Result<String, ApiError> {
    let options = ChatOptions { max_tokens: MAX_TOKENS, temperature: TEMPERATURE };

    let response = llm
        .chat(options, SYSTEM_PROMPT, conversation)
        .await
        .map_err(|e| {
            error!(error = %e, "chat upstream failed");
            ApiError::Upstream(CHAT_FAILED)
        })?;

    info!(
        turns = conversation.len(),
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "chat reply generated"
    );

    let text = response.content.trim();
    if text.is_empty() {
        return Ok(FALLBACK_REPLY.to_owned());
    }
    Ok(text.to_owned())
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
