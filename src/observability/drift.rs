//! Feature drift estimation.
//!
//! Scores how far an incoming feature vector sits from a fixed baseline
//! sample. The score is an early-warning signal exported as a gauge; it never
//! influences whether a prediction is served.

use crate::model::IrisFeatures;

/// Reference sample representing typical input.
pub const BASELINE: IrisFeatures = IrisFeatures {
    sepal_length: 5.8,
    sepal_width: 3.0,
    petal_length: 3.7,
    petal_width: 1.2,
};

/// Mean absolute deviation of `features` from [`BASELINE`].
///
/// Out-of-range input is accepted and simply yields a larger score.
pub fn estimate(features: &IrisFeatures) -> f64 {
    estimate_from(features, &BASELINE)
}

/// Mean absolute deviation of `features` from an arbitrary baseline.
pub fn estimate_from(features: &IrisFeatures, baseline: &IrisFeatures) -> f64 {
    let total: f64 = features
        .as_array()
        .iter()
        .zip(baseline.as_array())
        .map(|(value, reference)| (value - reference).abs())
        .sum();

    total / IrisFeatures::DIMENSIONS as f64
}
