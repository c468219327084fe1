//! Prometheus metrics for ask-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};

static INIT: Once = Once::new();

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static ASK_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static ASK_SUMMARY_FALLBACKS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

pub static GENAI_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static GENAI_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Later calls are no-ops.
pub fn init_metrics() {
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    let registry = Registry::new();

    let ask_requests = IntCounterVec::new(
        Opts::new("ask_requests_total", "Total /ask requests by outcome"),
        &["status"],
    )
    .expect("Failed to create ask_requests_total metric");

    let summary_fallbacks = IntCounter::new(
        "ask_summary_fallbacks_total",
        "Answers returned with the previous summary because the refresh failed",
    )
    .expect("Failed to create ask_summary_fallbacks_total metric");

    // Token counter (input/output by model)
    let genai_tokens = IntCounterVec::new(
        Opts::new("genai_tokens_total", "Total tokens processed"),
        &["model", "type"], // type: input, output
    )
    .expect("Failed to create genai_tokens_total metric");

    // call: answer, summary
    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "genai_provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model", "call"],
    )
    .expect("Failed to create genai_provider_latency_seconds metric");

    let provider_errors = IntCounterVec::new(
        Opts::new("genai_provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    )
    .expect("Failed to create genai_provider_errors_total metric");

    registry
        .register(Box::new(ask_requests.clone()))
        .expect("Failed to register ask_requests_total");
    registry
        .register(Box::new(summary_fallbacks.clone()))
        .expect("Failed to register ask_summary_fallbacks_total");
    registry
        .register(Box::new(genai_tokens.clone()))
        .expect("Failed to register genai_tokens_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register genai_provider_latency_seconds");
    registry
        .register(Box::new(provider_errors.clone()))
        .expect("Failed to register genai_provider_errors_total");

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = ASK_REQUESTS_TOTAL.set(ask_requests);
    let _ = ASK_SUMMARY_FALLBACKS_TOTAL.set(summary_fallbacks);
    let _ = GENAI_TOKENS_TOTAL.set(genai_tokens);
    let _ = GENAI_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = GENAI_PROVIDER_ERRORS_TOTAL.set(provider_errors);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record the outcome of an /ask request ("ok" or the HTTP status code).
pub fn record_ask_request(status: &str) {
    if let Some(counter) = ASK_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
}

pub fn record_summary_fallback() {
    if let Some(counter) = ASK_SUMMARY_FALLBACKS_TOTAL.get() {
        counter.inc();
    }
}

pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    if let Some(counter) = GENAI_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens.max(0) as u64);
        counter
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens.max(0) as u64);
    }
}

pub fn record_provider_latency(provider: &str, model: &str, call: &str, duration_secs: f64) {
    if let Some(histogram) = GENAI_PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model, call])
            .observe(duration_secs);
    }
}

pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = GENAI_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}
