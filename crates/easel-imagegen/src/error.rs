use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use easel_core::{ErrorEnvelope, HttpError};
use thiserror::Error;

use crate::provider::RemoteError;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Failures surfaced by the image gateway, each with a fixed HTTP status
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// Prompt absent, not a string, or blank after trimming
    #[error("Missing prompt text.")]
    MissingPrompt,

    /// The remote account must be verified before it may generate images
    #[error("{0}")]
    VerificationRequired(String),

    /// The remote endpoint or model does not exist
    #[error("{0}")]
    NotFound(String),

    /// The remote call succeeded but carried no image data
    #[error("No image returned")]
    NoPayloadReturned,

    /// The request budget ran out before any attempt succeeded
    #[error("Image generation timed out")]
    Timeout,

    /// The remote call failed; `status` is the remote HTTP status when known
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    /// No API key configured for the remote service
    #[error("Missing upstream API key")]
    MissingCredentials,
}

impl From<RemoteError> for ImageGenError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::TimedOut => Self::Timeout,
            RemoteError::VerificationRequired(message) => Self::VerificationRequired(message),
            RemoteError::NotFound(message) => Self::NotFound(message),
            RemoteError::NoPayload => Self::NoPayloadReturned,
            RemoteError::Connection(message) => Self::Upstream {
                status: Some(StatusCode::BAD_GATEWAY.as_u16()),
                message,
            },
            RemoteError::Other { status, message } => Self::Upstream { status, message },
            RemoteError::MissingCredentials => Self::MissingCredentials,
        }
    }
}

impl HttpError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingPrompt => StatusCode::BAD_REQUEST,
            Self::VerificationRequired(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NoPayloadReturned => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            // Only error statuses are forwarded; anything else is our failure
            Self::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::MissingCredentials => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::MissingPrompt => "invalid_request_error",
            Self::VerificationRequired(_) => "verification_required",
            Self::NotFound(_) => "not_found_error",
            Self::NoPayloadReturned => "no_payload_error",
            Self::Timeout => "timeout_error",
            Self::Upstream { .. } => "upstream_error",
            Self::MissingCredentials => "configuration_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn needs_verification(&self) -> bool {
        matches!(self, Self::VerificationRequired(_))
    }
}

impl IntoResponse for ImageGenError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorEnvelope::from_error(&self))).into_response()
    }
}
