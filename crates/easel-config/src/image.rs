use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image gateway configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Image model identifier sent upstream
    #[serde(default = "default_image_model")]
    pub model: String,
    /// Prompts longer than this many characters are truncated
    #[serde(default = "default_prompt_max_chars")]
    pub prompt_max_chars: usize,
    /// House style appended to every prompt as `"<prompt>, <style>"`
    #[serde(default, deserialize_with = "crate::de::non_empty_string")]
    pub style: Option<String>,
    /// Ask the upstream for `b64_json` explicitly (needed by DALL·E models)
    #[serde(default)]
    pub b64_response_format: bool,
    #[serde(default)]
    pub sizes: SizesConfig,
    #[serde(default)]
    pub timeout: TimeoutConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_image_model(),
            prompt_max_chars: default_prompt_max_chars(),
            style: None,
            b64_response_format: false,
            sizes: SizesConfig::default(),
            timeout: TimeoutConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_image_model() -> String {
    "gpt-image-1".to_owned()
}

const fn default_prompt_max_chars() -> usize {
    500
}

/// Every size token the upstream has ever accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ImageSize {
    Square256,
    Square512,
    Square1024,
    Portrait,
    Landscape,
    Auto,
}

impl ImageSize {
    pub const ALL: [Self; 6] = [
        Self::Square256,
        Self::Square512,
        Self::Square1024,
        Self::Portrait,
        Self::Landscape,
        Self::Auto,
    ];

    /// Wire token, e.g. `"1024x1536"`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square256 => "256x256",
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
            Self::Portrait => "1024x1536",
            Self::Landscape => "1536x1024",
            Self::Auto => "auto",
        }
    }

    /// Case-insensitive lookup after trimming; `None` for unknown tokens
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|size| size.as_str() == token)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown image size `{0}`")]
pub struct UnknownSize(pub String);

impl FromStr for ImageSize {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownSize(s.to_owned()))
    }
}

impl TryFrom<String> for ImageSize {
    type Error = UnknownSize;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageSize> for &'static str {
    fn from(size: ImageSize) -> Self {
        size.as_str()
    }
}

/// Named size policies seen in deployments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePreset {
    /// `gpt-image-1` sizes; small squares are legacy and map to `1024x1024`
    #[default]
    GptImage,
    /// Square DALL·E sizes with `1024x1024` as the default
    Classic,
}

impl SizePreset {
    pub fn accepted(self) -> Vec<ImageSize> {
        match self {
            Self::GptImage => vec![
                ImageSize::Square1024,
                ImageSize::Portrait,
                ImageSize::Landscape,
                ImageSize::Auto,
            ],
            Self::Classic => vec![ImageSize::Square256, ImageSize::Square512, ImageSize::Square1024],
        }
    }

    /// Size used when the request carries none
    pub const fn default_size(self) -> ImageSize {
        match self {
            Self::GptImage => ImageSize::Auto,
            Self::Classic => ImageSize::Square1024,
        }
    }

    /// Size used for unrecognized tokens
    pub const fn fallback(self) -> ImageSize {
        self.default_size()
    }

    pub fn legacy(self) -> Vec<ImageSize> {
        match self {
            Self::GptImage => vec![ImageSize::Square256, ImageSize::Square512],
            Self::Classic => Vec::new(),
        }
    }

    /// Size used for legacy tokens the policy has dropped
    pub const fn legacy_fallback(self) -> ImageSize {
        match self {
            Self::GptImage | Self::Classic => ImageSize::Square1024,
        }
    }
}

/// Size policy: a preset with optional per-field overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizesConfig {
    #[serde(default)]
    pub preset: SizePreset,
    #[serde(default)]
    pub accepted: Option<Vec<ImageSize>>,
    #[serde(default)]
    pub default: Option<ImageSize>,
    #[serde(default)]
    pub fallback: Option<ImageSize>,
    #[serde(default)]
    pub legacy: Option<Vec<ImageSize>>,
    /// Target for legacy tokens; the plain fallback when unset and overridden
    #[serde(default)]
    pub legacy_fallback: Option<ImageSize>,
}

/// Per-attempt deadline and overall request budget
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Upper bound for a single upstream call
    #[serde(default = "default_attempt_timeout", deserialize_with = "crate::de::duration")]
    pub attempt: Duration,
    /// Upper bound for all attempts and backoff delays together
    #[serde(default = "default_budget", deserialize_with = "crate::de::duration")]
    pub budget: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            attempt: default_attempt_timeout(),
            budget: default_budget(),
        }
    }
}

const fn default_attempt_timeout() -> Duration {
    Duration::from_secs(25)
}

const fn default_budget() -> Duration {
    Duration::from_secs(28)
}

/// Fixed-backoff retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total tries including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff", deserialize_with = "crate::de::duration")]
    pub backoff: Duration,
    /// Double the delay after every retry
    #[serde(default)]
    pub exponential: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: default_backoff(),
            exponential: false,
        }
    }
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff() -> Duration {
    Duration::from_millis(600)
}
