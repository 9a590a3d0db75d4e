//! Serde helpers shared by the config sections

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, de};

/// Parse a human duration string such as `"25s"` or `"600ms"`
pub fn duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(raw.trim()).map_err(|e| de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

/// Optional variant of [`duration`]; an empty string means unset
pub fn optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    duration_str::parse(raw.trim())
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

/// Treat empty or whitespace-only strings as absent
///
/// Env expansion with `default("")` produces empty strings for unset
/// optional variables.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()))
}

/// Secret variant of [`non_empty_string`]
pub fn non_empty_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_string(deserializer)?.map(SecretString::from))
}
