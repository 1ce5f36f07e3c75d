//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_requests_total` (counter): handled requests by service, status
//! - `cep_request_duration_seconds` (histogram): handler latency by service
//! - `cep_lookup_total` (counter): collaborator calls by name, outcome
//! - `cep_lookup_duration_seconds` (histogram): collaborator latency
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! metrics-disabled deployments pay nothing.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "cep_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cep_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record one call to an external collaborator.
pub fn record_lookup(collaborator: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "cep_lookup_total",
        "collaborator" => collaborator,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("cep_lookup_duration_seconds", "collaborator" => collaborator)
        .record(start.elapsed().as_secs_f64());
}
