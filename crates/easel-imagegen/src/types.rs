use easel_config::ImageSize;
use serde::{Deserialize, Serialize};

/// Validated request, ready to dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Trimmed, collapsed, capped prompt with the house style appended
    pub prompt: String,
    /// Always a member of the active size policy
    pub size: ImageSize,
}

/// Image bytes as the remote encoded them (base64 PNG)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub b64: String,
}

/// Successful response body: `{ ok: true, b64, size, retries? }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageResponse {
    pub ok: bool,
    pub b64: String,
    /// Size that was actually dispatched
    pub size: ImageSize,
    /// Number of extra attempts needed, omitted when the first one succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl ImageResponse {
    pub fn new(payload: ImagePayload, size: ImageSize, retries: u32) -> Self {
        Self {
            ok: true,
            b64: payload.b64,
            size,
            retries: (retries > 0).then_some(retries),
        }
    }
}
