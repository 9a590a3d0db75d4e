//! Telemetry for Easel
//!
//! Console logging through `tracing-subscriber`, plus optional OTLP export of
//! traces and metrics when an exporter is configured.

mod metadata;
pub mod metrics;

use easel_config::TelemetryConfig;
use easel_config::telemetry::LogFormat;
use easel_config::telemetry::exporters::{ExportProtocol, ExporterConfig};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

pub use metrics::{ChatMetrics, ImageMetrics};

/// Keeps exporters alive; flushes and shuts them down on drop
pub struct TelemetryGuard {
    meter_provider: Option<SdkMeterProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Force flush all pending metrics immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the meter provider fails to flush
    pub fn force_flush(&self) -> anyhow::Result<()> {
        if let Some(ref provider) = self.meter_provider {
            provider
                .force_flush()
                .map_err(|e| anyhow::anyhow!("failed to flush metrics: {e}"))?;
        }
        Ok(())
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.meter_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown meter provider: {e}");
        }
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Install the global subscriber and, if configured, OTLP exporters
///
/// `log_filter` uses `EnvFilter` syntax (e.g. `"info,easel_imagegen=debug"`).
/// The returned guard must be held for the lifetime of the process.
///
/// # Errors
///
/// Returns an error if an exporter cannot be built or a global subscriber is
/// already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut guard = TelemetryGuard {
        meter_provider: None,
        tracer_provider: None,
    };

    let format = config.map_or(LogFormat::Text, |c| c.log_format);

    let mut tracer = None;

    if let Some(telemetry_config) = config {
        let resource = metadata::build_resource(telemetry_config);

        if let Some(exporter) = telemetry_config.metrics_exporter() {
            let meter_provider = init_metrics(telemetry_config, exporter, resource.clone())?;
            global::set_meter_provider(meter_provider.clone());
            guard.meter_provider = Some(meter_provider);
        }

        if let Some(exporter) = telemetry_config.trace_exporter() {
            let tracer_provider = init_tracer(telemetry_config, exporter, resource)?;
            tracer = Some(tracer_provider.tracer("easel"));
            global::set_tracer_provider(tracer_provider.clone());
            guard.tracer_provider = Some(tracer_provider);
        }
    }

    let text_layer = (format == LogFormat::Text).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
    });

    let json_layer = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t)))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn init_metrics(
    config: &TelemetryConfig,
    exporter_config: &ExporterConfig,
    resource: opentelemetry_sdk::Resource,
) -> anyhow::Result<SdkMeterProvider> {
    use opentelemetry_otlp::MetricExporter;
    use opentelemetry_sdk::metrics::PeriodicReader;

    let exporter = match exporter_config.protocol {
        ExportProtocol::Grpc => MetricExporter::builder()
            .with_tonic()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
        ExportProtocol::HttpProto => MetricExporter::builder()
            .with_http()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build metrics exporter: {e}"))?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(config.metrics_interval())
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}

fn init_tracer(
    config: &TelemetryConfig,
    exporter_config: &ExporterConfig,
    resource: opentelemetry_sdk::Resource,
) -> anyhow::Result<SdkTracerProvider> {
    use opentelemetry_otlp::SpanExporter;
    use opentelemetry_sdk::trace::Sampler;

    let exporter = match exporter_config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build span exporter: {e}"))?;

    let rate = config.sampling_rate();
    let sampler = if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    };

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::ParentBased(Box::new(sampler)))
        .with_batch_exporter(exporter)
        .build())
}
