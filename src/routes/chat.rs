//! Chat proxy route.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{error, warn};
use widget::{ChatReply, ChatRequest};

use crate::error::{ApiError, MALFORMED_BODY};
use crate::services;
use crate::state::AppState;

/// `POST /api/chat`: forward the visitor's conversation to the LLM.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed chat body");
        ApiError::bad_request(MALFORMED_BODY)
    })?;

    let conversation = services::chat::conversation_from_request(&request)?;

    let Some(llm) = state.llm.as_deref() else {
        error!("OpenRouter API key is not configured");
        return Err(ApiError::NotConfigured);
    };

    let reply = services::chat::reply(llm, &conversation).await?;
    Ok(Json(ChatReply { reply }))
}
