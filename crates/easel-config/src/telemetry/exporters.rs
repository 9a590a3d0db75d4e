use serde::Deserialize;
use url::Url;

/// OTLP exporter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// Collector endpoint
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
}

/// OTLP wire protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}
