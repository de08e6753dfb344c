//! Request and response types for the prediction API.

use serde::{Deserialize, Serialize};

/// The four Iris measurements, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct IrisFeatures {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl IrisFeatures {
    /// Number of feature dimensions.
    pub const DIMENSIONS: usize = 4;

    /// Build from `[sepal_length, sepal_width, petal_length, petal_width]`.
    pub const fn from_array(values: [f64; 4]) -> Self {
        Self {
            sepal_length: values[0],
            sepal_width: values[1],
            petal_length: values[2],
            petal_width: values[3],
        }
    }

    /// Features in column order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// True if every measurement is a finite number.
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

/// Batch prediction request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IrisBatch {
    pub features: Vec<IrisFeatures>,
}

/// Batch prediction response body.
///
/// Serializes untagged so callers see either
/// `{"predictions": [...], "count": n}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Predictions { predictions: Vec<String>, count: usize },
    Error { error: String },
}

impl BatchResponse {
    pub fn predictions(predictions: Vec<String>) -> Self {
        let count = predictions.len();
        BatchResponse::Predictions { predictions, count }
    }

    pub fn error(message: impl Into<String>) -> Self {
        BatchResponse::Error {
            error: message.into(),
        }
    }
}
