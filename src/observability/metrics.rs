//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): by method, endpoint, status code
//! - `http_request_duration_seconds` (histogram): by method, endpoint
//! - `gateway_rpc_calls_total` (counter): by operation, outcome class
//! - `gateway_rpc_call_duration_seconds` (histogram): by operation
//!
//! # Design Decisions
//! - Prometheus exposition is served from the gateway's own `/metrics`
//!   route rather than a second listener
//! - The recorder is installed once per process; repeated `install()`
//!   calls return the same handle

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder and return a render handle.
pub fn install() -> PrometheusHandle {
    RECORDER
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install metrics recorder");

            describe_counter!("http_requests_total", "Total HTTP requests");
            describe_histogram!("http_request_duration_seconds", "Request latency");
            describe_counter!(
                "gateway_rpc_calls_total",
                "Completed RPC operations by outcome class"
            );
            describe_histogram!(
                "gateway_rpc_call_duration_seconds",
                "RPC operation latency including retries"
            );

            handle
        })
        .clone()
}

/// Record one completed inbound HTTP request.
pub fn record_http_request(method: &str, endpoint: &str, status: u16, latency: Duration) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status_code" => status.to_string(),
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
    )
    .record(latency.as_secs_f64());
}

/// Record one completed gateway operation (after its retry loop concludes).
pub fn record_rpc_operation(operation: &'static str, outcome: &'static str, latency: Duration) {
    counter!(
        "gateway_rpc_calls_total",
        "operation" => operation,
        "outcome" => outcome,
    )
    .increment(1);
    histogram!(
        "gateway_rpc_call_duration_seconds",
        "operation" => operation,
    )
    .record(latency.as_secs_f64());
}
