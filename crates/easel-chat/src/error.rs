use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use easel_core::{ErrorEnvelope, HttpError, UpstreamError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

/// Chat pass-through failures; every one surfaces as a `500`
#[derive(Debug, Error)]
pub enum ChatError {
    /// Body was not valid JSON or `messages` had the wrong shape
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Missing upstream API key")]
    MissingCredentials,

    #[error("{0}")]
    Connection(String),

    /// Remote returned an error status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Remote answered but without a usable message
    #[error("{0}")]
    InvalidResponse(String),
}

impl From<UpstreamError> for ChatError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::MissingCredentials => Self::MissingCredentials,
            UpstreamError::Client(message) => Self::Connection(message),
        }
    }
}

impl HttpError for ChatError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::MissingCredentials => "configuration_error",
            Self::Connection(_) => "connection_error",
            Self::Upstream { .. } => "upstream_error",
            Self::InvalidResponse(_) => "invalid_response_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        tracing::warn!(error_type = self.error_type(), error = %self, "chat request failed");
        (self.status_code(), Json(ErrorEnvelope::from_error(&self))).into_response()
    }
}
