//! Prometheus metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return the render handle
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Count one inbound request per delivery channel
pub fn record_request(channel: &'static str) {
    metrics::counter!("advisor_requests_total", "channel" => channel).increment(1);
}

/// Count one failed request per pipeline stage
pub fn record_error(stage: &'static str) {
    metrics::counter!("advisor_errors_total", "stage" => stage).increment(1);
}

/// Record end-to-end exchange latency
pub fn record_exchange_latency(channel: &'static str, seconds: f64) {
    metrics::histogram!("advisor_exchange_seconds", "channel" => channel).record(seconds);
}
