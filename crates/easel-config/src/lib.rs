#![allow(clippy::must_use_candidate)]

pub mod chat;
pub mod cors;
mod de;
mod env;
pub mod image;
mod loader;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use chat::*;
pub use cors::*;
pub use env::ExpandError;
pub use image::*;
pub use loader::{MAX_IMAGE_WAIT, MIN_ATTEMPT_WINDOW};
pub use server::*;
pub use telemetry::TelemetryConfig;
pub use upstream::*;

/// Top-level Easel configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Credentials and endpoint of the remote generative API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Image gateway configuration
    #[serde(default)]
    pub image: ImageConfig,
    /// Chat pass-through configuration
    #[serde(default)]
    pub chat: ChatConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
