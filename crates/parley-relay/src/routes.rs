//! The `/api/gemini` endpoint: envelope validation and provider forwarding.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use parley_gemini::{GeminiClient, Turn};
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;

/// Shared, read-only state: the provider client (absent when no credential
/// is configured) plus forwarding limits.
pub struct AppState {
    pub client: Option<GeminiClient>,
    pub model: String,
    pub max_history_turns: usize,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            GeminiClient::new(key.clone()).with_base_url(config.gemini_base_url.clone())
        });
        Self {
            client,
            model: config.model.clone(),
            max_history_turns: config.max_history_turns,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

/// The fixed-shape body returned on every path, success or failure
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

fn envelope(status: StatusCode, reply: impl Into<String>) -> Response {
    (
        status,
        Json(ChatReply {
            reply: reply.into(),
        }),
    )
        .into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/gemini", post(chat).fallback(method_not_allowed))
        .with_state(state)
}

async fn method_not_allowed() -> Response {
    envelope(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => return envelope(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    if request.message.is_empty() {
        return envelope(StatusCode::BAD_REQUEST, "No message received");
    }

    let Some(client) = state.client.as_ref() else {
        return envelope(StatusCode::INTERNAL_SERVER_ERROR, "Missing API key");
    };

    let contents = build_contents(&request, state.max_history_turns);

    match client.generate(&state.model, &contents).await {
        Ok(response) => {
            let reply = response
                .first_text()
                .unwrap_or("No response from Gemini")
                .to_string();
            tracing::info!(
                history_turns = request.history.len(),
                forwarded_turns = contents.len(),
                "exchange completed"
            );
            envelope(StatusCode::OK, reply)
        }
        Err(err) => {
            tracing::warn!("exchange failed: {err}");
            envelope(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Conversation payload for the provider: the history verbatim when
/// present (capped to the most recent turns), otherwise a single user
/// turn carrying the new message. The new message is never appended to a
/// non-empty history here; callers reflect it in the history themselves.
fn build_contents(request: &ChatRequest, max_history_turns: usize) -> Vec<Turn> {
    if request.history.is_empty() {
        vec![Turn::user(request.message.clone())]
    } else {
        let skip = request.history.len().saturating_sub(max_history_turns);
        request.history[skip..].to_vec()
    }
}
