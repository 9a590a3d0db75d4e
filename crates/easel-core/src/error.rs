use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. Feature crates render
/// [`ErrorEnvelope`] bodies from it, keeping this crate free of axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Whether the remote account needs manual verification before retrying
    fn needs_verification(&self) -> bool {
        false
    }
}

/// JSON body of every failed response: `{ ok: false, error, needsVerification? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_verification: Option<bool>,
}

impl ErrorEnvelope {
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            ok: false,
            error: error.client_message(),
            needs_verification: error.needs_verification().then_some(true),
        }
    }
}
