use std::sync::Arc;

use axum::http::StatusCode;
use easel_config::ImageConfig;
use easel_core::HttpError;
use easel_telemetry::ImageMetrics;
use serde_json::Value;
use tokio::time::Instant;

use crate::{
    attempt::{AttemptOutcome, GenerationAttempt},
    error::Result,
    prompt::{apply_style, validate_prompt},
    provider::{ImageGenerator, RemoteError},
    retry::RetryPolicy,
    size::{SizePolicy, SizePolicyError},
    types::{GenerationRequest, ImageResponse},
};

/// Validates image requests and drives them through the retry loop
pub struct Gateway {
    generator: Arc<dyn ImageGenerator>,
    sizes: SizePolicy,
    prompt_max_chars: usize,
    style: Option<String>,
    retry: RetryPolicy,
    metrics: ImageMetrics,
}

impl Gateway {
    pub fn from_config(config: &ImageConfig, generator: Arc<dyn ImageGenerator>) -> std::result::Result<Self, SizePolicyError> {
        Ok(Self {
            generator,
            sizes: SizePolicy::from_config(&config.sizes)?,
            prompt_max_chars: config.prompt_max_chars,
            style: config.style.clone(),
            retry: RetryPolicy::from_config(config),
            metrics: ImageMetrics::new(&easel_telemetry::metrics::meter()),
        })
    }

    pub fn sizes(&self) -> &SizePolicy {
        &self.sizes
    }

    /// Plain-text hint returned for `GET`
    pub fn usage_hint(&self) -> String {
        self.sizes.usage_hint()
    }

    /// Turn a raw JSON body into a dispatchable request
    ///
    /// The length cap applies to the caller's prompt; the house style is
    /// appended afterwards.
    pub fn prepare(&self, body: &Value) -> Result<GenerationRequest> {
        let prompt = validate_prompt(body, self.prompt_max_chars)?;
        let size = self.sizes.normalize(body.get("size").and_then(Value::as_str));

        Ok(GenerationRequest {
            prompt: apply_style(prompt, self.style.as_deref()),
            size,
        })
    }

    /// Validate, dispatch and retry within the configured budget
    pub async fn generate(&self, body: &Value) -> Result<ImageResponse> {
        let started = std::time::Instant::now();

        let result = match self.prepare(body) {
            Ok(request) => self.dispatch(&request).await,
            Err(e) => Err(e),
        };

        let status = result.as_ref().map_or_else(|e| e.status_code(), |_| StatusCode::OK);
        self.metrics.record_request(started, status.as_u16());

        result
    }

    async fn dispatch(&self, request: &GenerationRequest) -> Result<ImageResponse> {
        let budget_deadline = Instant::now() + self.retry.budget;
        let mut number = 1;

        loop {
            let deadline = self.retry.attempt_deadline(Instant::now(), budget_deadline);
            let attempt = GenerationAttempt::run(self.generator.as_ref(), request, number, deadline).await;

            self.metrics.record_attempt(attempt.outcome.label());

            let error = match attempt.outcome {
                AttemptOutcome::Success(payload) => {
                    tracing::info!(
                        generator = self.generator.name(),
                        size = %attempt.size_used,
                        attempt = attempt.number,
                        "image generated"
                    );
                    return Ok(ImageResponse::new(payload, attempt.size_used, attempt.number - 1));
                }
                AttemptOutcome::Timeout => RemoteError::TimedOut,
                AttemptOutcome::RemoteError(error) => error,
            };

            let Some(delay) = self.retry.next_delay(&error, number, Instant::now(), budget_deadline) else {
                tracing::warn!(
                    generator = self.generator.name(),
                    attempt = attempt.number,
                    elapsed_ms = attempt.started_at.elapsed().as_millis(),
                    error = %error,
                    "image generation failed"
                );
                return Err(error.into());
            };

            tracing::info!(
                attempt = attempt.number,
                delay_ms = delay.as_millis(),
                error = %error,
                "retrying image generation"
            );

            tokio::time::sleep(delay).await;
            number += 1;
        }
    }
}
