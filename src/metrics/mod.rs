// Metrics module - Prometheus metrics for the edit endpoint
//
// Provides:
// - Request counters by endpoint and outcome
// - Edit failure counters by error kind
// - Edit duration histogram
// - Downloaded asset byte counter

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Global metrics registry for the editor service
pub struct EditorMetrics {
    /// Requests by endpoint ("root", "edit_image", "metrics", "other") and
    /// outcome ("success", "error")
    pub requests: IntCounterVec,

    /// Failed edits by `EditorError::kind`
    pub edit_errors: IntCounterVec,

    /// Wall time of a full edit, fetch to encode (in seconds)
    pub edit_duration: Histogram,

    /// Total bytes downloaded for source images and logos
    pub fetched_bytes: IntCounter,
}

/// Global singleton instance of metrics
static METRICS: OnceLock<EditorMetrics> = OnceLock::new();

impl EditorMetrics {
    /// Initialize and return the global metrics instance
    ///
    /// Subsequent calls return the same instance.
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let requests = register_int_counter_vec!(
                "imprint_requests_total",
                "Total number of HTTP requests by endpoint and outcome",
                &["endpoint", "outcome"]
            )
            .expect("Failed to register imprint_requests_total metric");

            let edit_errors = register_int_counter_vec!(
                "imprint_edit_errors_total",
                "Total number of failed edits by error kind",
                &["kind"] // network, decode, font_load, encoding, ...
            )
            .expect("Failed to register imprint_edit_errors_total metric");

            let edit_duration = register_histogram!(
                "imprint_edit_duration_seconds",
                "Duration of image edits in seconds",
                vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
            )
            .expect("Failed to register imprint_edit_duration_seconds metric");

            let fetched_bytes = register_int_counter!(
                "imprint_fetched_bytes_total",
                "Total bytes downloaded for images and logos"
            )
            .expect("Failed to register imprint_fetched_bytes_total metric");

            EditorMetrics {
                requests,
                edit_errors,
                edit_duration,
                fetched_bytes,
            }
        })
    }

    pub fn record_request(&self, endpoint: &str, success: bool) {
        let outcome = if success { "success" } else { "error" };
        self.requests.with_label_values(&[endpoint, outcome]).inc();
    }

    pub fn record_edit_error(&self, kind: &str) {
        self.edit_errors.with_label_values(&[kind]).inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
