pub mod exporters;

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use self::exporters::ExporterConfig;

/// Telemetry configuration
///
/// Without any exporter only console logging is set up.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name reported in resource metadata
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Extra resource attributes
    #[serde(default)]
    pub resource_attributes: HashMap<String, String>,
    /// Log output format for the console layer
    #[serde(default)]
    pub log_format: LogFormat,
    /// Exporter shared by traces and metrics
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
    #[serde(default)]
    pub tracing: Option<TracingConfig>,
    #[serde(default)]
    pub metrics: Option<MetricsConfig>,
}

fn default_service_name() -> String {
    "easel".to_owned()
}

/// Console log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Trace export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracingConfig {
    /// Fraction of root spans sampled (0.0 to 1.0)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
    /// Override the shared exporter for traces
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

/// Metric export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// How often metrics are pushed
    #[serde(default = "default_export_interval", deserialize_with = "crate::de::duration")]
    pub interval: Duration,
    /// Override the shared exporter for metrics
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
}

const fn default_export_interval() -> Duration {
    Duration::from_secs(30)
}

impl TelemetryConfig {
    /// Exporter for traces, falling back to the shared one
    pub fn trace_exporter(&self) -> Option<&ExporterConfig> {
        self.tracing
            .as_ref()
            .and_then(|t| t.exporter.as_ref())
            .or(self.exporter.as_ref())
    }

    /// Exporter for metrics, falling back to the shared one
    pub fn metrics_exporter(&self) -> Option<&ExporterConfig> {
        self.metrics
            .as_ref()
            .and_then(|m| m.exporter.as_ref())
            .or(self.exporter.as_ref())
    }

    pub fn sampling_rate(&self) -> f64 {
        self.tracing.as_ref().map_or(1.0, |t| t.sampling_rate)
    }

    pub fn metrics_interval(&self) -> Duration {
        self.metrics.as_ref().map_or(default_export_interval(), |m| m.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_specific_exporter_wins() {
        let toml = r#"
            service_name = "easel-test"

            [exporter]
            endpoint = "http://collector:4317"

            [metrics]
            interval = "10s"

            [metrics.exporter]
            endpoint = "http://metrics:4318"
            protocol = "http_proto"
        "#;

        let config: TelemetryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.service_name, "easel-test");
        assert_eq!(config.trace_exporter().unwrap().endpoint.as_str(), "http://collector:4317/");
        assert_eq!(config.metrics_exporter().unwrap().endpoint.as_str(), "http://metrics:4318/");
        assert_eq!(config.metrics_interval(), Duration::from_secs(10));
        assert!((config.sampling_rate() - 1.0).abs() < f64::EPSILON);
    }
}
