#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod attempt;
mod error;
mod gateway;
mod prompt;
mod provider;
mod retry;
mod size;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use bytes::Bytes;
use easel_core::UpstreamClient;
use serde_json::Value;

pub use attempt::{AttemptOutcome, GenerationAttempt};
pub use error::{ImageGenError, Result};
pub use gateway::Gateway;
pub use prompt::{apply_style, validate_prompt};
pub use provider::{ImageGenerator, RemoteError};
pub use retry::RetryPolicy;
pub use size::{SizePolicy, SizePolicyError};
pub use types::{GenerationRequest, ImagePayload, ImageResponse};

use provider::openai::OpenAiImageGenerator;

/// Build the image gateway backed by the `OpenAI` images API
///
/// # Errors
///
/// Returns an error if the size policy overrides are inconsistent
pub fn build_gateway(config: &easel_config::Config, upstream: Arc<UpstreamClient>) -> anyhow::Result<Arc<Gateway>> {
    let image = &config.image;

    let generator = Arc::new(OpenAiImageGenerator::new(
        upstream,
        image.model.clone(),
        image.b64_response_format,
    ));

    let gateway = Gateway::from_config(image, generator)
        .map_err(|e| anyhow::anyhow!("Failed to initialize image gateway: {e}"))?;

    tracing::debug!(
        model = %image.model,
        sizes = ?gateway.sizes().accepted(),
        "image gateway initialized"
    );

    Ok(Arc::new(gateway))
}

/// Routes for image generation, including the short `/image` alias
pub fn endpoint_router() -> Router<Arc<Gateway>> {
    Router::new()
        .route("/api/image", post(generate).get(usage))
        .route("/image", post(generate).get(usage))
}

/// Handle image generation requests
///
/// The body is parsed leniently: anything that is not a JSON object with a
/// string prompt becomes a `400 Missing prompt text.`
async fn generate(State(gateway): State<Arc<Gateway>>, body: Bytes) -> Result<Json<ImageResponse>> {
    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);

    let response = gateway.generate(&body).await?;

    Ok(Json(response))
}

async fn usage(State(gateway): State<Arc<Gateway>>) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        gateway.usage_hint(),
    )
}
