//! Metric names and recording helpers

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Wall time of a whole `/api/image` request, retries included
pub const IMAGE_REQUEST_DURATION: &str = "image.request.duration";
/// Upstream image attempts, tagged with their outcome
pub const IMAGE_ATTEMPT_COUNT: &str = "image.attempt.count";
/// Wall time of a `/api/chat` request
pub const CHAT_REQUEST_DURATION: &str = "chat.request.duration";

/// Meter for all Easel instruments
///
/// A no-op meter until [`crate::init`] installs an exporting provider.
pub fn meter() -> Meter {
    opentelemetry::global::meter("easel")
}

/// Record seconds elapsed since `start`
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

/// Instruments used by the image gateway
#[derive(Clone)]
pub struct ImageMetrics {
    pub request_duration: Histogram<f64>,
    pub attempts: Counter<u64>,
}

impl ImageMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            request_duration: meter
                .f64_histogram(IMAGE_REQUEST_DURATION)
                .with_unit("s")
                .with_description("Image generation request duration")
                .build(),
            attempts: meter
                .u64_counter(IMAGE_ATTEMPT_COUNT)
                .with_description("Upstream image generation attempts")
                .build(),
        }
    }

    pub fn record_attempt(&self, outcome: &'static str) {
        self.attempts.add(1, &[KeyValue::new("outcome", outcome)]);
    }

    pub fn record_request(&self, start: Instant, status: u16) {
        record_duration(
            &self.request_duration,
            start,
            &[KeyValue::new("http.response.status_code", i64::from(status))],
        );
    }
}

/// Instruments used by the chat pass-through
#[derive(Clone)]
pub struct ChatMetrics {
    pub request_duration: Histogram<f64>,
}

impl ChatMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            request_duration: meter
                .f64_histogram(CHAT_REQUEST_DURATION)
                .with_unit("s")
                .with_description("Chat completion request duration")
                .build(),
        }
    }

    pub fn record_request(&self, start: Instant, status: u16) {
        record_duration(
            &self.request_duration,
            start,
            &[KeyValue::new("http.response.status_code", i64::from(status))],
        );
    }
}
