#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod service;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use bytes::Bytes;
use easel_core::UpstreamClient;

pub use error::{ChatError, Result};
pub use service::ChatService;
pub use types::{ChatMessage, ChatRequest, ChatResponse};

/// Build the chat pass-through from configuration
pub fn build_service(config: &easel_config::Config, upstream: Arc<UpstreamClient>) -> Arc<ChatService> {
    tracing::debug!(model = %config.chat.model, "chat pass-through initialized");
    Arc::new(ChatService::new(upstream, config.chat.model.clone()))
}

pub fn endpoint_router() -> Router<Arc<ChatService>> {
    Router::new().route("/api/chat", post(chat))
}

/// Handle chat completion requests
///
/// An empty body counts as `{}` and gets the default greeting.
async fn chat(State(service): State<Arc<ChatService>>, body: Bytes) -> Result<Json<ChatResponse>> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ChatRequest::default()
    } else {
        serde_json::from_slice::<ChatRequest>(&body).map_err(|e| ChatError::InvalidRequest(e.to_string()))?
    };

    let message = service.complete(&request.into_messages()).await?;

    Ok(Json(ChatResponse { ok: true, message }))
}
