use easel_config::{ImageSize, SizePreset, SizesConfig};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizePolicyError {
    #[error("image.sizes.accepted must not be empty")]
    EmptyAccepted,

    #[error("image.sizes.{field} = `{size}` is not in the accepted set")]
    NotAccepted { field: &'static str, size: ImageSize },
}

/// The active set of size tokens and how everything else maps onto it
///
/// Construction guarantees `default`, `fallback` and `legacy_fallback` are
/// accepted, which makes [`SizePolicy::normalize`] total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizePolicy {
    accepted: Vec<ImageSize>,
    default: ImageSize,
    fallback: ImageSize,
    legacy: Vec<ImageSize>,
    legacy_fallback: ImageSize,
}

impl SizePolicy {
    /// Build from a preset plus explicit overrides
    ///
    /// Preset values that fall outside an overridden accepted set degrade to
    /// its first member, except `legacy_fallback` which degrades to the
    /// resolved fallback. Explicit overrides must be accepted.
    pub fn from_config(config: &SizesConfig) -> Result<Self, SizePolicyError> {
        let preset = config.preset;
        let accepted = config.accepted.clone().unwrap_or_else(|| preset.accepted());

        let Some(&first) = accepted.first() else {
            return Err(SizePolicyError::EmptyAccepted);
        };

        let pick = |field: &'static str, explicit: Option<ImageSize>, preset_value: ImageSize| match explicit {
            Some(size) if accepted.contains(&size) => Ok(size),
            Some(size) => Err(SizePolicyError::NotAccepted { field, size }),
            None if accepted.contains(&preset_value) => Ok(preset_value),
            None => Ok(first),
        };

        let default = pick("default", config.default, preset.default_size())?;
        let fallback = pick("fallback", config.fallback, preset.fallback())?;
        let legacy_fallback = match config.legacy_fallback {
            None if !accepted.contains(&preset.legacy_fallback()) => fallback,
            explicit => pick("legacy_fallback", explicit, preset.legacy_fallback())?,
        };

        let legacy = config
            .legacy
            .clone()
            .unwrap_or_else(|| preset.legacy())
            .into_iter()
            .filter(|size| !accepted.contains(size))
            .collect();

        Ok(Self {
            accepted,
            default,
            fallback,
            legacy,
            legacy_fallback,
        })
    }

    pub fn from_preset(preset: SizePreset) -> Self {
        Self {
            accepted: preset.accepted(),
            default: preset.default_size(),
            fallback: preset.fallback(),
            legacy: preset.legacy(),
            legacy_fallback: preset.legacy_fallback(),
        }
    }

    /// `gpt-image-1` sizes with small squares mapped to `1024x1024`
    pub fn gpt_image() -> Self {
        Self::from_preset(SizePreset::GptImage)
    }

    /// Square DALL·E sizes
    pub fn classic() -> Self {
        Self::from_preset(SizePreset::Classic)
    }

    pub fn accepted(&self) -> &[ImageSize] {
        &self.accepted
    }

    /// Map any requested token onto the accepted set
    pub fn normalize(&self, requested: Option<&str>) -> ImageSize {
        let Some(token) = requested.map(str::trim).filter(|t| !t.is_empty()) else {
            return self.default;
        };

        match ImageSize::parse(token) {
            Some(size) if self.legacy.contains(&size) => self.legacy_fallback,
            Some(size) if self.accepted.contains(&size) => size,
            _ => self.fallback,
        }
    }

    /// Accepted tokens formatted for the `GET` usage hint
    pub fn usage_hint(&self) -> String {
        let sizes = self
            .accepted
            .iter()
            .map(|size| format!("'{size}'"))
            .collect::<Vec<_>>()
            .join("|");

        format!("POST JSON: {{ prompt: string, size?: {sizes} }}")
    }
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self::gpt_image()
    }
}
