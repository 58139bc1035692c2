//! In-memory rate limiting for chat messages and contact submissions.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`.
//! Two independent limiters are built at widget initialization:
//! - Chat: 10 messages/min
//! - Contact form: 3 submissions/5 min
//!
//! Stale timestamps are pruned lazily on every query; nothing runs in the
//! background. A denied check records nothing, so hammering the send button
//! does not extend the cooldown.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Identity used when no per-user scoping exists.
pub const DEFAULT_IDENTITY: &str = "anonymous";

const DEFAULT_CHAT_LIMIT: usize = 10;
const DEFAULT_CHAT_WINDOW_SECS: u64 = 60;

const DEFAULT_FORM_LIMIT: usize = 3;
const DEFAULT_FORM_WINDOW_SECS: u64 = 300;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl RateLimitConfig {
    #[must_use]
    pub const fn new(max_requests: usize, window: Duration) -> Self {
        Self { max_requests, window }
    }

    /// Chat limits: `CHAT_RATE_LIMIT` / `CHAT_RATE_WINDOW_SECS`, default 10 per 60s.
    #[must_use]
    pub fn chat_from_env() -> Self {
        Self {
            max_requests: env_positive("CHAT_RATE_LIMIT", DEFAULT_CHAT_LIMIT),
            window: Duration::from_secs(env_positive("CHAT_RATE_WINDOW_SECS", DEFAULT_CHAT_WINDOW_SECS)),
        }
    }

    /// Form limits: `FORM_RATE_LIMIT` / `FORM_RATE_WINDOW_SECS`, default 3 per 300s.
    #[must_use]
    pub fn form_from_env() -> Self {
        Self {
            max_requests: env_positive("FORM_RATE_LIMIT", DEFAULT_FORM_LIMIT),
            window: Duration::from_secs(env_positive("FORM_RATE_WINDOW_SECS", DEFAULT_FORM_WINDOW_SECS)),
        }
    }

    #[must_use]
    pub const fn chat() -> Self {
        Self::new(DEFAULT_CHAT_LIMIT, Duration::from_secs(DEFAULT_CHAT_WINDOW_SECS))
    }

    #[must_use]
    pub const fn form() -> Self {
        Self::new(DEFAULT_FORM_LIMIT, Duration::from_secs(DEFAULT_FORM_WINDOW_SECS))
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Like [`env_parse`], but zero also means "use the default": a zero limit
/// would deny forever with no cooldown to wait out.
fn env_positive<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + Default + PartialEq,
{
    let value = env_parse(key, default);
    if value == T::default() { default } else { value }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded, retry in {}s", wait.as_secs())]
    Exceeded { wait: Duration },
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    log: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self { log: Arc::new(Mutex::new(HashMap::new())), config }
    }

    #[must_use]
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Check the identity's window and record the event if there is room.
    pub fn is_allowed(&self, identity: &str) -> bool {
        self.is_allowed_at(identity, Instant::now())
    }

    /// Time until the oldest counted event leaves the window. Zero when a
    /// slot is already free.
    #[must_use]
    pub fn remaining_cooldown(&self, identity: &str) -> Duration {
        self.remaining_cooldown_at(identity, Instant::now())
    }

    /// [`Self::is_allowed`] with the cooldown attached to a denial.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::Exceeded`] when the window is full.
    pub fn check(&self, identity: &str) -> Result<(), RateLimitError> {
        self.check_at(identity, Instant::now())
    }

    pub(crate) fn check_at(&self, identity: &str, now: Instant) -> Result<(), RateLimitError> {
        if self.is_allowed_at(identity, now) {
            Ok(())
        } else {
            Err(RateLimitError::Exceeded { wait: self.remaining_cooldown_at(identity, now) })
        }
    }

    pub(crate) fn is_allowed_at(&self, identity: &str, now: Instant) -> bool {
        let mut log = self
            .log
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let deque = log.entry(identity.to_owned()).or_default();
        prune_window(deque, now, self.config.window);
        if deque.len() >= self.config.max_requests {
            return false;
        }
        deque.push_back(now);
        true
    }

    pub(crate) fn remaining_cooldown_at(&self, identity: &str, now: Instant) -> Duration {
        let mut log = self
            .log
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(deque) = log.get_mut(identity) else {
            return Duration::ZERO;
        };
        prune_window(deque, now, self.config.window);
        if deque.len() < self.config.max_requests {
            return Duration::ZERO;
        }
        let Some(&oldest) = deque.front() else {
            return Duration::ZERO;
        };
        self.config
            .window
            .saturating_sub(now.saturating_duration_since(oldest))
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::chat())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Drop timestamps that are `window` or more behind `now`.
fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.saturating_duration_since(front) >= window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
