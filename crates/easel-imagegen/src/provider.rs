pub(crate) mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{GenerationRequest, ImagePayload};

/// Message fragments the remote uses when the account is not yet verified
const VERIFICATION_MARKERS: [&str; 3] = ["verified", "verify", "verification"];

/// Classified failure of a single remote call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote call timed out")]
    TimedOut,

    #[error("{0}")]
    VerificationRequired(String),

    #[error("{0}")]
    NotFound(String),

    /// Success status but no image data in the body
    #[error("no image data in response")]
    NoPayload,

    /// Transport failure before a response arrived
    #[error("{0}")]
    Connection(String),

    #[error("{message}")]
    Other { status: Option<u16>, message: String },

    #[error("missing upstream API key")]
    MissingCredentials,
}

impl RemoteError {
    /// Classify an error response by status and message text
    ///
    /// Verification wording wins over the status code, so a `400` that asks
    /// the caller to verify their organization still maps to a `403`.
    pub fn classify(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();

        if VERIFICATION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            Self::VerificationRequired(message)
        } else if status == Some(404) {
            Self::NotFound(message)
        } else if lowered.contains("timed out") {
            Self::TimedOut
        } else {
            Self::Other { status, message }
        }
    }

    /// Whether a fresh attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::TimedOut | Self::Connection(_) => true,
            Self::Other { status: Some(status), .. } => matches!(*status, 408 | 409 | 429) || *status >= 500,
            Self::Other { status: None, .. }
            | Self::VerificationRequired(_)
            | Self::NotFound(_)
            | Self::NoPayload
            | Self::MissingCredentials => false,
        }
    }
}

/// A backend able to turn a prompt into an image
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Run one generation call; no retries, no deadline handling
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagePayload, RemoteError>;

    fn name(&self) -> &str;
}
