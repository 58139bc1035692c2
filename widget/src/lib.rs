//! Client-side core of the portfolio chat widget and contact form.
//!
//! This crate owns the pieces shared by the proxy `server` and any UI layer
//! (the `cli` today): wire types, validation rules, the sliding-window rate
//! limiter, and the session-scoped conversation history. The widget
//! orchestrators in [`chat`] and [`contact`] tie them together behind
//! explicit command handlers so no particular UI toolkit is assumed.

pub mod chat;
pub mod contact;
pub mod error;
pub mod history;
pub mod messages;
pub mod proxy;
pub mod rate_limit;
pub mod store;
pub mod types;
pub mod validation;

pub use chat::{ChatState, ChatView, ChatWidget};
pub use contact::{CaptchaError, CaptchaProvider, ContactState, ContactView, ContactWidget, StatusKind};
pub use error::WidgetError;
pub use history::{ConversationHistory, HISTORY_KEY};
pub use messages::{Lang, Messages, Surface};
pub use proxy::{HttpProxyClient, ProxyClient, ProxyError};
pub use rate_limit::{DEFAULT_IDENTITY, RateLimitConfig, RateLimitError, RateLimiter};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use types::{ChatReply, ChatRequest, ContactForm, ErrorBody, Role, SuccessBody, Turn};
pub use validation::{ValidationIssue, chat_message_issue, validate_chat_message, validate_form_data};
