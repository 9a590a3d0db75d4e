use std::sync::Arc;

use axum::http::StatusCode;
use easel_core::{HttpError, UpstreamClient};
use easel_telemetry::ChatMetrics;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ChatError, Result},
    types::ChatMessage,
};

const COMPLETIONS_PATH: &str = "chat/completions";

/// Forwards chat completions to the upstream with a fixed model
pub struct ChatService {
    upstream: Arc<UpstreamClient>,
    model: String,
    metrics: ChatMetrics,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body).map_or_else(
        |_| format!("{status} {}", body.trim()).trim_end().to_owned(),
        |parsed| parsed.error.message,
    )
}

/// Status the handler answers with for this outcome
fn response_status(result: &Result<ChatMessage>) -> u16 {
    result
        .as_ref()
        .map_or_else(|e| e.status_code(), |_| StatusCode::OK)
        .as_u16()
}

impl ChatService {
    pub fn new(upstream: Arc<UpstreamClient>, model: String) -> Self {
        Self {
            upstream,
            model,
            metrics: ChatMetrics::new(&easel_telemetry::metrics::meter()),
        }
    }

    /// Send the conversation upstream and return the first choice's message
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatMessage> {
        let started = std::time::Instant::now();
        let result = self.send(messages).await;

        self.metrics.record_request(started, response_status(&result));

        result
    }

    async fn send(&self, messages: &[ChatMessage]) -> Result<ChatMessage> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat completion request");

        let response = self
            .upstream
            .post(COMPLETIONS_PATH)?
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Connection(format!("Failed to reach chat API: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(format!("Failed to parse chat API response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| ChatError::InvalidResponse("Chat API returned no choices".to_owned()))
    }
}
