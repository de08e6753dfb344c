//! Prediction capability.
//!
//! # Data Flow
//! ```text
//! IrisFeatures (deserialized per request)
//!     → resilience::guard (breaker check, drift)
//!     → Predictor::predict
//!     → species label
//! ```
//!
//! The guard only depends on the [`Predictor`] trait. The bundled
//! [`CentroidClassifier`] lets the service run without an external model
//! artifact.

pub mod centroid;
pub mod types;

pub use centroid::CentroidClassifier;
pub use types::{BatchResponse, IrisBatch, IrisFeatures};

/// Error raised by a prediction backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("input contains non-finite feature values")]
    InvalidInput,
    #[error("model has no classes loaded")]
    NoClasses,
    #[error("model backend error: {0}")]
    Backend(String),
}

/// A model that maps one feature vector to a species label.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &IrisFeatures) -> Result<String, PredictError>;

    /// Version label attached to prediction metrics.
    fn version(&self) -> &str;
}

/// Adapts a closure into a [`Predictor`].
pub struct PredictFn<F> {
    version: String,
    f: F,
}

impl<F> PredictFn<F>
where
    F: Fn(&IrisFeatures) -> Result<String, PredictError> + Send + Sync,
{
    pub fn new(version: impl Into<String>, f: F) -> Self {
        Self {
            version: version.into(),
            f,
        }
    }
}

impl<F> Predictor for PredictFn<F>
where
    F: Fn(&IrisFeatures) -> Result<String, PredictError> + Send + Sync,
{
    fn predict(&self, features: &IrisFeatures) -> Result<String, PredictError> {
        (self.f)(features)
    }

    fn version(&self) -> &str {
        &self.version
    }
}
