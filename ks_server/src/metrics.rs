//! Prometheus metrics for monitoring the authentication service.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener,
//! enabled through the `METRICS_BIND` configuration.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Sets up a Prometheus scrape endpoint on the specified address.
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request with method, path, and status labels.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment registrations counter.
pub fn registrations_total(success: bool) {
    metrics::counter!("registrations_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment token refresh counter.
pub fn token_refreshes_total(success: bool) {
    metrics::counter!("token_refreshes_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment counter of refresh attempts with a rotated-out token.
pub fn refresh_replays_total() {
    metrics::counter!("refresh_replays_total").increment(1);
}
