use std::path::Path;
use std::time::Duration;

use crate::Config;

/// Shortest per-attempt window worth starting an upstream call for
pub const MIN_ATTEMPT_WINDOW: Duration = Duration::from_millis(250);

/// Longest image timeout or backoff the gateway accepts
pub const MAX_IMAGE_WAIT: Duration = Duration::from_secs(600);

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] minus the file access
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        if config.upstream.api_key.is_none() {
            tracing::warn!("no upstream api_key configured; generation requests will fail");
        }

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_has_endpoints()?;
        self.validate_image_config()?;
        self.validate_server_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_has_endpoints(&self) -> anyhow::Result<()> {
        if !self.image.enabled && !self.chat.enabled {
            anyhow::bail!("at least one of image or chat must be enabled");
        }
        Ok(())
    }

    fn validate_image_config(&self) -> anyhow::Result<()> {
        let image = &self.image;

        if image.model.trim().is_empty() {
            anyhow::bail!("image.model must not be empty");
        }

        if image.prompt_max_chars == 0 {
            anyhow::bail!("image.prompt_max_chars must be greater than 0");
        }

        if !(1..=3).contains(&image.retry.max_attempts) {
            anyhow::bail!(
                "image.retry.max_attempts must be between 1 and 3, got {}",
                image.retry.max_attempts
            );
        }

        if image.timeout.attempt < MIN_ATTEMPT_WINDOW {
            anyhow::bail!("image.timeout.attempt must be at least {MIN_ATTEMPT_WINDOW:?}");
        }

        if image.timeout.budget < MIN_ATTEMPT_WINDOW {
            anyhow::bail!("image.timeout.budget must be at least {MIN_ATTEMPT_WINDOW:?}");
        }

        for (name, value) in [
            ("image.timeout.attempt", image.timeout.attempt),
            ("image.timeout.budget", image.timeout.budget),
            ("image.retry.backoff", image.retry.backoff),
        ] {
            if value > MAX_IMAGE_WAIT {
                anyhow::bail!("{name} must be at most {MAX_IMAGE_WAIT:?}, got {value:?}");
            }
        }

        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.server.body_limit == 0 {
            anyhow::bail!("server.body_limit must be greater than 0");
        }

        // The gateway has to answer before the platform kills the request
        if let Some(lifetime) = self.server.request_lifetime
            && self.image.enabled
            && self.image.timeout.budget >= lifetime
        {
            anyhow::bail!(
                "image.timeout.budget ({:?}) must be shorter than server.request_lifetime ({lifetime:?})",
                self.image.timeout.budget
            );
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        let rate = telemetry.sampling_rate();
        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0, got {rate}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn empty_file_is_a_valid_config() {
        let config = Config::from_toml("").unwrap();
        assert!(config.image.enabled);
        assert!(config.chat.enabled);
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn load_expands_env_placeholders() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[upstream]
api_key = "{{{{ env.EASEL_LOADER_KEY }}}}"
organization = "{{{{ env.EASEL_LOADER_ORG | default("") }}}}"

[image]
style = "{{{{ env.EASEL_LOADER_STYLE | default("") }}}}"
"#
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("EASEL_LOADER_KEY", Some("sk-loaded")),
                ("EASEL_LOADER_ORG", None),
                ("EASEL_LOADER_STYLE", Some("pixel art")),
            ],
            || {
                let config = Config::load(file.path()).unwrap();
                assert_eq!(config.upstream.api_key.unwrap().expose_secret(), "sk-loaded");
                assert!(config.upstream.organization.is_none());
                assert_eq!(config.image.style.as_deref(), Some("pixel art"));
            },
        );
    }

    #[test]
    fn sample_config_parses() {
        let raw = include_str!("../../../easel.toml");

        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-sample")),
                ("OPENAI_ORG_ID", None),
                ("OPENAI_IMAGE_MODEL", None),
                ("EASEL_IMAGE_STYLE", None),
            ],
            || {
                let config = Config::from_toml(raw).unwrap();
                assert_eq!(config.image.model, "gpt-image-1");
                assert!(config.upstream.organization.is_none());
                assert!(config.image.style.is_none());
                assert_eq!(config.server.request_lifetime, Some(Duration::from_secs(30)));
            },
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Config::load(Path::new("/nonexistent/easel.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml("[image]\nquality = \"hd\"").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn budget_must_fit_inside_request_lifetime() {
        let toml = r#"
            [server]
            request_lifetime = "10s"

            [image.timeout]
            attempt = "8500ms"
            budget = "10s"
        "#;

        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("must be shorter than server.request_lifetime"));
    }

    #[test]
    fn budget_inside_request_lifetime_is_accepted() {
        let toml = r#"
            [server]
            request_lifetime = "10s"

            [image.timeout]
            attempt = "8500ms"
            budget = "9500ms"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.image.timeout.budget, Duration::from_millis(9500));
    }

    #[test]
    fn retry_attempts_are_bounded() {
        let err = Config::from_toml("[image.retry]\nmax_attempts = 5").unwrap_err();
        assert!(err.to_string().contains("between 1 and 3"));

        let err = Config::from_toml("[image.retry]\nmax_attempts = 0").unwrap_err();
        assert!(err.to_string().contains("between 1 and 3"));
    }

    #[test]
    fn oversized_waits_are_rejected() {
        let err = Config::from_toml("[image.timeout]\nbudget = \"11m\"").unwrap_err();
        assert!(err.to_string().contains("image.timeout.budget must be at most"), "{err}");

        let err = Config::from_toml("[image.timeout]\nattempt = \"2h\"").unwrap_err();
        assert!(err.to_string().contains("image.timeout.attempt must be at most"), "{err}");

        let err = Config::from_toml("[image.retry]\nbackoff = \"1h\"").unwrap_err();
        assert!(err.to_string().contains("image.retry.backoff must be at most"), "{err}");
    }

    #[test]
    fn everything_disabled_is_rejected() {
        let toml = r#"
            [image]
            enabled = false

            [chat]
            enabled = false
        "#;

        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("at least one of image or chat"));
    }

    #[test]
    fn sampling_rate_out_of_range() {
        let toml = r#"
            [telemetry.tracing]
            sampling_rate = 1.5
        "#;

        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("sampling_rate"));
    }
}
