use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

use crate::errors::ServiceError;

// Prometheus metrics (default registry), labelled by collection kind
pub static STORE_READS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tweet_api_store_reads_total",
        "Total collection loads for list/get",
        &["collection"]
    )
    .expect("register store_reads_total")
});

pub static STORE_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tweet_api_store_writes_total",
        "Total successful collection rewrites",
        &["collection"]
    )
    .expect("register store_writes_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tweet_api_store_errors_total",
        "Total failed store operations by error kind",
        &["collection", "error"]
    )
    .expect("register store_errors_total")
});

pub static STORE_WRITE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "tweet_api_store_write_duration_seconds",
        "Duration of a locked read-mutate-write cycle in seconds",
        &["collection"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("register store_write_duration")
});

/// Render every registered metric in the Prometheus text format.
pub fn encode_metrics() -> Result<String, ServiceError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ServiceError::Internal(format!("metrics encode error: {e}")))?;
    String::from_utf8(buffer).map_err(|e| ServiceError::Internal(format!("metrics encode error: {e}")))
}
