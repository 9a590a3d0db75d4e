use std::sync::Arc;

use async_trait::async_trait;
use easel_core::{UpstreamClient, UpstreamError};
use serde::{Deserialize, Serialize};

use super::{ImageGenerator, RemoteError};
use crate::types::{GenerationRequest, ImagePayload};

const GENERATIONS_PATH: &str = "images/generations";

/// `OpenAI` images API backend
pub(crate) struct OpenAiImageGenerator {
    upstream: Arc<UpstreamClient>,
    model: String,
    b64_response_format: bool,
}

impl OpenAiImageGenerator {
    pub fn new(upstream: Arc<UpstreamClient>, model: String, b64_response_format: bool) -> Self {
        Self {
            upstream,
            model,
            b64_response_format,
        }
    }
}

/// Wire format for the `OpenAI` image generation API request
#[derive(Serialize)]
struct OpenAiImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'static str,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'static str>,
}

/// Wire format for the `OpenAI` image generation API response
#[derive(Deserialize)]
struct OpenAiImageResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

/// Prefer the structured `error.message`, else the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<OpenAiErrorBody>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown error".to_owned()
            } else {
                trimmed.to_owned()
            }
        },
        |parsed| parsed.error.message,
    )
}

fn first_payload(response: OpenAiImageResponse) -> Result<ImagePayload, RemoteError> {
    response
        .data
        .into_iter()
        .next()
        .and_then(|data| data.b64_json)
        .filter(|b64| !b64.is_empty())
        .map(|b64| ImagePayload { b64 })
        .ok_or(RemoteError::NoPayload)
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagePayload, RemoteError> {
        let wire_request = OpenAiImageRequest {
            model: &self.model,
            prompt: &request.prompt,
            size: request.size.as_str(),
            n: 1,
            response_format: self.b64_response_format.then_some("b64_json"),
        };

        tracing::debug!(model = %self.model, size = %request.size, "sending image generation request");

        let builder = self.upstream.post(GENERATIONS_PATH).map_err(|e| match e {
            UpstreamError::MissingCredentials => RemoteError::MissingCredentials,
            UpstreamError::Client(message) => RemoteError::Connection(message),
        })?;

        let response = builder.json(&wire_request).send().await.map_err(|e| {
            tracing::warn!(error = %e, "image generation request failed");
            if e.is_timeout() {
                RemoteError::TimedOut
            } else {
                RemoteError::Connection(format!("Failed to reach image API: {e}"))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);

            tracing::warn!(status = %status, message = %message, "image API returned an error");

            return Err(RemoteError::classify(Some(status.as_u16()), message));
        }

        let wire_response: OpenAiImageResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to parse image API response");
            if e.is_timeout() {
                RemoteError::TimedOut
            } else {
                RemoteError::classify(None, format!("Failed to parse image API response: {e}"))
            }
        })?;

        first_payload(wire_response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
