//! Prometheus metrics for payload binding and shutdown.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::api::handlers::Resource;
use crate::error::Result;

// === Metric Name Constants ===

/// Accepted POST payloads counter metric name.
pub const METRIC_PAYLOADS_ACCEPTED: &str = "payloads_accepted_total";
/// Rejected POST payloads counter metric name.
pub const METRIC_PAYLOADS_REJECTED: &str = "payloads_rejected_total";
/// Shutdown drain duration metric name.
pub const METRIC_SHUTDOWN_DRAIN_LATENCY: &str = "shutdown_drain_latency_ms";

/// Install the Prometheus recorder and describe all metrics.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Register metric descriptions with the installed recorder.
pub fn init_metrics() {
    describe_counter!(
        METRIC_PAYLOADS_ACCEPTED,
        "Total number of POST payloads that passed validation"
    );
    describe_counter!(
        METRIC_PAYLOADS_REJECTED,
        "Total number of POST payloads rejected by validation"
    );
    describe_histogram!(
        METRIC_SHUTDOWN_DRAIN_LATENCY,
        "Time spent draining in-flight requests at shutdown in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment the accepted counter for a resource.
pub fn record_accepted(resource: Resource) {
    let label: &'static str = resource.into();
    counter!(METRIC_PAYLOADS_ACCEPTED, "resource" => label).increment(1);
}

/// Increment the rejected counter for a resource.
pub fn record_rejected(resource: Resource) {
    let label: &'static str = resource.into();
    counter!(METRIC_PAYLOADS_REJECTED, "resource" => label).increment(1);
}

/// Record how long the shutdown drain took.
pub fn record_drain_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SHUTDOWN_DRAIN_LATENCY).record(latency_ms);
}
