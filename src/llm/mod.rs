//! LLM: the upstream behind the chat proxy.
//!
//! DESIGN
//! ======
//! Handlers only see the [`LlmChat`] trait, so tests swap in a mock and the
//! provider stays a deployment detail. The one real provider is OpenRouter.

pub mod openrouter;
pub mod types;

pub use openrouter::OpenRouterClient;
pub use types::{ChatOptions, ChatResponse, LlmChat, LlmError, Message};
