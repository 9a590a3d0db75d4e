use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::cors::CorsConfig;

/// Default JSON body limit (2 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Wall-clock limit the hosting platform puts on a single request
    ///
    /// When set, the image request budget must finish strictly before it.
    #[serde(default, deserialize_with = "crate::de::optional_duration")]
    pub request_lifetime: Option<Duration>,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            request_lifetime: None,
            body_limit: DEFAULT_BODY_LIMIT,
            health: HealthConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

const fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

/// Liveness endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_health_path")]
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_health_path(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_health_path() -> String {
    "/health".to_owned()
}
