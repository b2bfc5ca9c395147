//! Metrics collection and exposition.
//!
//! # Metrics
//! - `preview_requests_total` (counter): requests by outcome, status
//! - `preview_request_duration_seconds` (histogram): resolution latency by outcome
//! - `preview_content_store_entries` (gauge): files in the warm snapshot
//! - `preview_content_store_failed_entries` (gauge): files the scan could not read

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one resolved request.
pub fn record_request(outcome: &'static str, status: u16, start_time: Instant) {
    counter!(
        "preview_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("preview_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record the size of the warm content snapshot.
pub fn record_content_store(entries: usize, failed: usize) {
    gauge!("preview_content_store_entries").set(entries as f64);
    gauge!("preview_content_store_failed_entries").set(failed as f64);
}
