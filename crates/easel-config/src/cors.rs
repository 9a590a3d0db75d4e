use std::time::Duration;

use serde::Deserialize;

/// CORS configuration applied to every route
///
/// Defaults allow the browser chat UI from anywhere:
/// any origin, `GET, POST, OPTIONS`, and `Content-Type, Authorization`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Allowed origins, `"*"` for any
    #[serde(default)]
    pub origins: AnyOrList,
    /// Allowed methods, `"*"` for any
    #[serde(default = "default_methods")]
    pub methods: AnyOrList,
    /// Allowed request headers, `"*"` for any
    #[serde(default = "default_headers")]
    pub headers: AnyOrList,
    /// Preflight cache lifetime in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: AnyOrList::Any,
            methods: default_methods(),
            headers: default_headers(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Wildcard or an explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAnyOrList")]
pub enum AnyOrList {
    #[default]
    Any,
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnyOrList {
    One(String),
    Many(Vec<String>),
}

impl From<RawAnyOrList> for AnyOrList {
    fn from(raw: RawAnyOrList) -> Self {
        let values = match raw {
            RawAnyOrList::One(value) => vec![value],
            RawAnyOrList::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Self::Any
        } else {
            Self::List(values)
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_methods() -> AnyOrList {
    AnyOrList::List(vec!["GET".to_owned(), "POST".to_owned(), "OPTIONS".to_owned()])
}

fn default_headers() -> AnyOrList {
    AnyOrList::List(vec!["Content-Type".to_owned(), "Authorization".to_owned()])
}
