//! Metrics collection and exposition.
//!
//! # Metrics
//! - `csp_reports_total` (counter): accepted reports by disposition
//! - `csp_report_rejections_total` (counter): rejected requests by status

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_report(disposition: &'static str) {
    ::metrics::counter!("csp_reports_total", "disposition" => disposition).increment(1);
}

pub fn record_rejection(status: u16) {
    ::metrics::counter!("csp_report_rejections_total", "status" => status.to_string()).increment(1);
}
