use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Remote generative API shared by the image gateway and chat
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Bearer credential; requests fail with a typed error when absent
    #[serde(default, deserialize_with = "crate::de::non_empty_secret")]
    pub api_key: Option<SecretString>,
    /// Sent as the `OpenAI-Organization` header when present
    #[serde(default, deserialize_with = "crate::de::non_empty_string")]
    pub organization: Option<String>,
    /// Base URL override, e.g. a compatible proxy or a test mock
    #[serde(default)]
    pub base_url: Option<Url>,
}
