//! Resilience guard around prediction calls.
//!
//! # Call Protocol
//! ```text
//! breaker open?   → yes: GuardError::Unavailable (predictor not called)
//!                 → no:  drift score → sink
//! predictor call  → Ok:  record_success, count + latency → sink
//!                 → Err: record_failure, GuardError::Prediction
//! ```
//!
//! Batches run every item through the same sequence in order. The first
//! item that is refused or fails aborts the batch; labels already produced
//! are discarded.

use std::sync::Arc;
use std::time::Instant;

use crate::model::{IrisFeatures, PredictError, Predictor};
use crate::observability::drift;
use crate::observability::metrics::{MetricEvent, MetricsSink};
use crate::resilience::circuit_breaker::CircuitBreaker;

/// Plain-text reply while the breaker is open.
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Plain-text reply for a failed single prediction.
pub const FAILED_MESSAGE: &str = "Prediction failed";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GuardError {
    /// Breaker open; the predictor was not called.
    #[error("Service temporarily unavailable")]
    Unavailable,
    /// The predictor failed and the failure was recorded against the breaker.
    #[error(transparent)]
    Prediction(#[from] PredictError),
}

/// Circuit breaker and drift monitoring wrapped around a [`Predictor`].
pub struct ResilienceGuard {
    breaker: CircuitBreaker,
    predictor: Arc<dyn Predictor>,
    sink: Arc<dyn MetricsSink>,
}

impl ResilienceGuard {
    pub fn new(
        breaker: CircuitBreaker,
        predictor: Arc<dyn Predictor>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            breaker,
            predictor,
            sink,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn model_version(&self) -> &str {
        self.predictor.version()
    }

    /// Guarded single prediction.
    pub fn predict(&self, features: &IrisFeatures) -> Result<String, GuardError> {
        let start = Instant::now();
        let label = self.call(features)?;

        self.sink.record(MetricEvent::Predictions { count: 1 });
        self.sink.record(MetricEvent::Latency(start.elapsed()));
        Ok(label)
    }

    /// Guarded batch prediction, all-or-nothing.
    pub fn predict_batch(&self, batch: &[IrisFeatures]) -> Result<Vec<String>, GuardError> {
        let start = Instant::now();
        self.check()?;

        let labels = batch
            .iter()
            .map(|features| self.call(features))
            .collect::<Result<Vec<_>, _>>()?;

        self.sink.record(MetricEvent::Predictions {
            count: labels.len() as u64,
        });
        self.sink.record(MetricEvent::Latency(start.elapsed()));
        Ok(labels)
    }

    fn check(&self) -> Result<(), GuardError> {
        if self.breaker.is_open() {
            tracing::debug!("Circuit breaker open, short-circuiting prediction");
            self.sink.record(MetricEvent::BreakerOpen(true));
            return Err(GuardError::Unavailable);
        }
        Ok(())
    }

    fn call(&self, features: &IrisFeatures) -> Result<String, GuardError> {
        self.check()?;
        self.sink
            .record(MetricEvent::DriftScore(drift::estimate(features)));

        match self.predictor.predict(features) {
            Ok(label) => {
                self.breaker.record_success();
                self.sink.record(MetricEvent::BreakerOpen(false));
                Ok(label)
            }
            Err(e) => {
                let opened = self.breaker.record_failure();
                if opened {
                    self.sink.record(MetricEvent::BreakerOpen(true));
                }
                tracing::error!(
                    error = %e,
                    failures = self.breaker.failure_count(),
                    "Prediction failed"
                );
                Err(e.into())
            }
        }
    }
}
