//! Widget error taxonomy.
//!
//! Validation and rate-limit errors are raised before any network call.
//! Transport and upstream errors come back from the proxy and are shown to
//! the user only through [`crate::Messages`], never verbatim.

use std::time::Duration;

use crate::proxy::ProxyError;
use crate::rate_limit::RateLimitError;
use crate::validation::ValidationIssue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("invalid input ({} issue(s))", .0.len())]
    Validation(Vec<ValidationIssue>),
    #[error("rate limited, retry in {}s", wait.as_secs())]
    RateLimited { wait: Duration },
    #[error("captcha unavailable: {0}")]
    Captcha(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream error: status {status}")]
    Upstream { status: u16 },
}

impl WidgetError {
    /// `true` for errors raised locally, before the network was touched.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RateLimited { .. })
    }
}

impl From<RateLimitError> for WidgetError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::Exceeded { wait } => Self::RateLimited { wait },
        }
    }
}

impl From<ProxyError> for WidgetError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Transport(msg) => Self::Transport(msg),
            ProxyError::Upstream { status, .. } => Self::Upstream { status },
        }
    }
}
