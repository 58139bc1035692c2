//! Contact proxy route.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::warn;
use widget::{ContactForm, SuccessBody};

use crate::error::{ApiError, MALFORMED_BODY};
use crate::services::contact::{CaptchaGate, relay_contact};
use crate::state::AppState;

/// `POST /api/contact`: verify and relay a contact form submission.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<SuccessBody>, ApiError> {
    let Json(form) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed contact body");
        ApiError::bad_request(MALFORMED_BODY)
    })?;

    let gate = CaptchaGate {
        verifier: state.captcha.as_deref(),
        required: state.captcha_required,
        min_score: state.captcha_min_score,
    };
    let message = relay_contact(state.relay.as_deref(), &gate, &form).await?;
    Ok(Json(SuccessBody { message: message.to_owned() }))
}
