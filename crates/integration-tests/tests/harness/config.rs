//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use easel_config::{Config, CorsConfig, ImageSize, ServerConfig, SizePreset, UpstreamConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config with short deadlines suited to real-time tests
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                ..ServerConfig::default()
            },
            upstream: UpstreamConfig {
                api_key: Some(SecretString::from("test-key")),
                ..UpstreamConfig::default()
            },
            ..Config::default()
        };

        config.image.timeout.attempt = Duration::from_millis(400);
        config.image.timeout.budget = Duration::from_secs(1);
        config.image.retry.backoff = Duration::from_millis(100);

        Self { config }
    }

    /// Point the upstream at a mock backend
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.upstream.base_url = Some(base_url.parse().expect("valid URL"));
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.config.upstream.api_key = None;
        self
    }

    pub fn with_organization(mut self, organization: &str) -> Self {
        self.config.upstream.organization = Some(organization.to_owned());
        self
    }

    pub fn with_size_preset(mut self, preset: SizePreset) -> Self {
        self.config.image.sizes.preset = preset;
        self
    }

    pub fn with_default_size(mut self, size: ImageSize) -> Self {
        self.config.image.sizes.default = Some(size);
        self
    }

    pub fn with_timeouts(mut self, attempt: Duration, budget: Duration) -> Self {
        self.config.image.timeout.attempt = attempt;
        self.config.image.timeout.budget = budget;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.image.retry.max_attempts = max_attempts;
        self
    }

    pub fn with_style(mut self, style: &str) -> Self {
        self.config.image.style = Some(style.to_owned());
        self
    }

    pub fn with_prompt_max_chars(mut self, max_chars: usize) -> Self {
        self.config.image.prompt_max_chars = max_chars;
        self
    }

    pub fn with_b64_response_format(mut self) -> Self {
        self.config.image.b64_response_format = true;
        self
    }

    pub fn with_chat_model(mut self, model: &str) -> Self {
        self.config.chat.model = model.to_owned();
        self
    }

    pub fn without_chat(mut self) -> Self {
        self.config.chat.enabled = false;
        self
    }

    pub fn without_image(mut self) -> Self {
        self.config.image.enabled = false;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.config.server.body_limit = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
