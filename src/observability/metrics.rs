//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define the events the resilience guard reports
//! - Map them onto Prometheus metrics
//! - Expose a Prometheus scrape endpoint
//!
//! # Metrics
//! - `predictions_total` (counter): successful predictions by model version
//! - `prediction_duration_seconds` (histogram): guarded call latency
//! - `feature_drift_score` (gauge): drift of the latest input from baseline
//! - `circuit_breaker_open` (gauge): 1=open, 0=closed
//! - `rate_limited_total` (counter): rejected requests by endpoint

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

pub const PREDICTIONS_TOTAL: &str = "predictions_total";
pub const PREDICTION_DURATION: &str = "prediction_duration_seconds";
pub const DRIFT_SCORE: &str = "feature_drift_score";
pub const CIRCUIT_BREAKER_OPEN: &str = "circuit_breaker_open";
pub const RATE_LIMITED_TOTAL: &str = "rate_limited_total";

const LATENCY_BUCKETS: &[f64] = &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0];

/// An observation forwarded by the resilience guard.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    /// Drift of the current input from the baseline.
    DriftScore(f64),
    /// Breaker status changed or was re-asserted.
    BreakerOpen(bool),
    /// Number of labels produced by a successful call.
    Predictions { count: u64 },
    /// Wall time of a successful guarded call.
    Latency(Duration),
}

/// Fire-and-forget destination for guard observations.
pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricEvent);
}

/// Sink backed by the global `metrics` recorder.
///
/// Events are dropped silently when no recorder is installed.
#[derive(Debug, Clone)]
pub struct PrometheusSink {
    model_version: String,
}

impl PrometheusSink {
    pub fn new(model_version: impl Into<String>) -> Self {
        Self {
            model_version: model_version.into(),
        }
    }
}

impl MetricsSink for PrometheusSink {
    fn record(&self, event: MetricEvent) {
        match event {
            MetricEvent::DriftScore(score) => {
                metrics::gauge!(DRIFT_SCORE).set(score);
            }
            MetricEvent::BreakerOpen(open) => {
                metrics::gauge!(CIRCUIT_BREAKER_OPEN).set(if open { 1.0 } else { 0.0 });
            }
            MetricEvent::Predictions { count } => {
                metrics::counter!(PREDICTIONS_TOTAL, "model_version" => self.model_version.clone())
                    .increment(count);
            }
            MetricEvent::Latency(elapsed) => {
                metrics::histogram!(PREDICTION_DURATION).record(elapsed.as_secs_f64());
            }
        }
    }
}

/// Count a request rejected by the rate limiter.
pub fn record_rate_limited(endpoint: &'static str) {
    metrics::counter!(RATE_LIMITED_TOTAL, "endpoint" => endpoint).increment(1);
}

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Full(PREDICTION_DURATION.to_string()), LATENCY_BUCKETS)?
        .install()?;

    metrics::describe_counter!(PREDICTIONS_TOTAL, "Total predictions made");
    metrics::describe_histogram!(
        PREDICTION_DURATION,
        metrics::Unit::Seconds,
        "Prediction latency"
    );
    metrics::describe_gauge!(DRIFT_SCORE, "Feature drift detection score");
    metrics::describe_gauge!(CIRCUIT_BREAKER_OPEN, "Circuit breaker status");
    metrics::describe_counter!(RATE_LIMITED_TOTAL, "Requests rejected by the rate limiter");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}
