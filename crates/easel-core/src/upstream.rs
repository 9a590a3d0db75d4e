use std::time::Duration;

use easel_config::UpstreamConfig;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No API key configured
    #[error("Missing upstream API key")]
    MissingCredentials,

    /// HTTP client construction failed
    #[error("failed to build upstream client: {0}")]
    Client(String),
}

/// Handle to the remote generative API
///
/// Built once at startup and shared by reference. Cloning the inner
/// `reqwest::Client` is cheap, so feature crates hold it behind an `Arc`
/// alongside their own settings.
#[derive(Debug)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    organization: Option<String>,
}

impl UpstreamClient {
    /// Build the handle from configuration
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| UpstreamError::Client(e.to_string()))?,
        };

        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("easel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        tracing::debug!(
            base_url = %base_url,
            has_api_key = config.api_key.is_some(),
            has_organization = config.organization.is_some(),
            "upstream client initialized"
        );

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            organization: config.organization.clone(),
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for an API path such as `images/generations`
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }

    /// Start an authenticated `POST` to the given API path
    pub fn post(&self, path: &str) -> Result<RequestBuilder, UpstreamError> {
        let api_key = self.api_key.as_ref().ok_or(UpstreamError::MissingCredentials)?;

        let mut builder = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(api_key.expose_secret());

        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }

        Ok(builder)
    }
}
