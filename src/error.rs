//! Proxy error envelope.
//!
//! Every failure leaves the server as `{ "error": "<fixed public text>" }`.
//! Upstream detail is logged where it happens and never copied into the
//! response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use widget::ErrorBody;

pub const MALFORMED_BODY: &str = "Request body must be valid JSON.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Origin not allowed.")]
    Forbidden,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Server configuration error. Please contact the administrator.")]
    NotConfigured,

    /// Carries the route's public failure text.
    #[error("{0}")]
    Upstream(&'static str),
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotConfigured | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
