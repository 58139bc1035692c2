//! Services: proxy logic behind the HTTP routes.
//!
//! Each service takes its upstream as a trait object so route handlers stay
//! thin and tests can run without network access.

pub mod chat;
pub mod contact;
pub mod recaptcha;
pub mod sanitize;
pub mod telegram;
