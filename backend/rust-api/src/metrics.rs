use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Business metrics
    pub static ref TASKS_STARTED_TOTAL: IntCounter = register_int_counter!(
        "tasks_started_total",
        "Total number of customer tasks created"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of submitted answers",
        &["correct"]
    )
    .unwrap();

    pub static ref SUGGESTIONS_USED_TOTAL: IntCounter = register_int_counter!(
        "suggestions_used_total",
        "Total number of suggestions revealed"
    )
    .unwrap();

    // External dependency metrics
    pub static ref ORACLE_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "oracle_requests_total",
        "Total number of distance oracle lookups",
        &["status"]
    )
    .unwrap();
}

pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
