use easel_config::ImageSize;
use tokio::time::Instant;

use crate::provider::{ImageGenerator, RemoteError};
use crate::types::{GenerationRequest, ImagePayload};

/// How a single upstream call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(ImagePayload),
    /// The local deadline fired first; the call was dropped
    Timeout,
    RemoteError(RemoteError),
}

impl AttemptOutcome {
    /// Metric label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Timeout => "timeout",
            Self::RemoteError(_) => "error",
        }
    }
}

/// One upstream call within a request
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    /// 1-based
    pub number: u32,
    pub size_used: ImageSize,
    pub started_at: Instant,
    pub deadline: Instant,
    pub outcome: AttemptOutcome,
}

impl GenerationAttempt {
    /// Run the generator until it answers or `deadline` passes
    ///
    /// On expiry the in-flight future is dropped, which aborts the HTTP call,
    /// so a late result can never be observed.
    pub async fn run(
        generator: &dyn ImageGenerator,
        request: &GenerationRequest,
        number: u32,
        deadline: Instant,
    ) -> Self {
        let started_at = Instant::now();

        let outcome = match tokio::time::timeout_at(deadline, generator.generate(request)).await {
            Ok(Ok(payload)) if payload.b64.is_empty() => AttemptOutcome::RemoteError(RemoteError::NoPayload),
            Ok(Ok(payload)) => AttemptOutcome::Success(payload),
            Ok(Err(error)) => AttemptOutcome::RemoteError(error),
            Err(_elapsed) => AttemptOutcome::Timeout,
        };

        Self {
            number,
            size_used: request.size,
            started_at,
            deadline,
            outcome,
        }
    }
}
