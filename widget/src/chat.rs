//! Chat widget orchestration.
//!
//! DESIGN
//! ======
//! `Idle -> AwaitingResponse -> Idle`. A message must pass validation and
//! the chat rate limiter before the widget enters `AwaitingResponse`; while
//! there, the view's input is disabled. Handlers take `&mut self`, so at
//! most one request per widget is ever in flight.
//!
//! The user turn is recorded before the request goes out and stays in the
//! history even if the request fails, matching what the visitor saw.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::WidgetError;
use crate::history::ConversationHistory;
use crate::messages::{Messages, Surface};
use crate::proxy::ProxyClient;
use crate::rate_limit::{DEFAULT_IDENTITY, RateLimiter};
use crate::store::SessionStore;
use crate::types::{ChatRequest, Turn};
use crate::validation::chat_message_issue;

/// Trailing turns forwarded to the proxy as conversation context.
pub const CONTEXT_TURNS: usize = 10;

/// Rendering surface for the chat widget.
pub trait ChatView {
    fn render_turn(&mut self, turn: &Turn);
    fn set_typing(&mut self, visible: bool);
    fn set_input_enabled(&mut self, enabled: bool);
    fn show_error(&mut self, message: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

pub struct ChatWidget<S> {
    history: ConversationHistory<S>,
    proxy: Arc<dyn ProxyClient>,
    limiter: RateLimiter,
    messages: Messages,
    identity: String,
    state: ChatState,
}

impl<S: SessionStore> ChatWidget<S> {
    /// Build the widget, restoring (or seeding) the conversation from `store`.
    pub fn new(store: S, proxy: Arc<dyn ProxyClient>, limiter: RateLimiter, messages: Messages) -> Self {
        let history = ConversationHistory::load(store, messages.welcome());
        Self { history, proxy, limiter, messages, identity: DEFAULT_IDENTITY.to_owned(), state: ChatState::Idle }
    }

    /// Scope the rate limiter to a different identity.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    #[must_use]
    pub fn state(&self) -> ChatState {
        self.state
    }

    #[must_use]
    pub fn history(&self) -> &ConversationHistory<S> {
        &self.history
    }

    #[must_use]
    pub fn messages(&self) -> Messages {
        self.messages
    }

    /// Widget opened: replay the stored conversation into `view`.
    pub fn on_open(&mut self, view: &mut impl ChatView) {
        self.history.replay(|turn| view.render_turn(turn));
        view.set_input_enabled(self.state == ChatState::Idle);
    }

    /// Start a new conversation from the welcome turn.
    pub fn on_reset(&mut self, view: &mut impl ChatView) {
        if let Err(e) = self.history.clear() {
            warn!(error = %e, "failed to persist cleared chat history");
        }
        self.on_open(view);
    }

    /// Send a chat message and render the reply.
    ///
    /// Every failure is also rendered into `view` as a translated message.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Validation`] or [`WidgetError::RateLimited`]
    /// without touching the network, or a transport/upstream error if the
    /// proxy call fails.
    pub async fn on_send_chat(&mut self, text: &str, view: &mut impl ChatView) -> Result<String, WidgetError> {
        let text = text.trim();
        if let Some(issue) = chat_message_issue(text) {
            return Err(self.fail(WidgetError::Validation(vec![issue]), view));
        }
        if let Err(e) = self.limiter.check(&self.identity) {
            return Err(self.fail(e.into(), view));
        }

        let turn = Turn::user(text);
        view.render_turn(&turn);
        self.record(turn);

        self.state = ChatState::AwaitingResponse;
        view.set_input_enabled(false);
        view.set_typing(true);

        let request = ChatRequest { message: None, messages: Some(self.history.recent(CONTEXT_TURNS).to_vec()) };
        let result = self.proxy.send_chat(&request).await;

        view.set_typing(false);
        self.state = ChatState::Idle;
        view.set_input_enabled(true);

        match result {
            Ok(reply) => {
                let content = if reply.reply.trim().is_empty() {
                    self.messages.fallback_reply().to_owned()
                } else {
                    reply.reply
                };
                let turn = Turn::assistant(content.clone());
                view.render_turn(&turn);
                self.record(turn);
                Ok(content)
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                Err(self.fail(e.into(), view))
            }
        }
    }

    fn record(&mut self, turn: Turn) {
        if let Err(e) = self.history.append(turn) {
            warn!(error = %e, "failed to persist chat history");
        }
    }

    fn fail(&self, err: WidgetError, view: &mut impl ChatView) -> WidgetError {
        debug!(error = %err, "chat message not delivered");
        view.show_error(&self.messages.for_error(&err, Surface::Chat));
        err
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
