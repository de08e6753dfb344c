//! Nearest-centroid classifier.

use crate::config::{CentroidConfig, ModelConfig};
use crate::model::{IrisFeatures, PredictError, Predictor};

/// Predicts the species whose centroid is closest in Euclidean distance.
#[derive(Debug, Clone)]
pub struct CentroidClassifier {
    version: String,
    centroids: Vec<(String, IrisFeatures)>,
}

impl CentroidClassifier {
    pub fn new(version: impl Into<String>, centroids: Vec<(String, IrisFeatures)>) -> Self {
        Self {
            version: version.into(),
            centroids,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        let centroids = config
            .centroids
            .iter()
            .map(|CentroidConfig { label, features }| {
                (label.clone(), IrisFeatures::from_array(*features))
            })
            .collect();

        Self::new(config.version.clone(), centroids)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.centroids.iter().map(|(label, _)| label.as_str())
    }
}

impl Default for CentroidClassifier {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}

fn squared_distance(a: &IrisFeatures, b: &IrisFeatures) -> f64 {
    a.as_array()
        .iter()
        .zip(b.as_array())
        .map(|(x, y)| (x - y).powi(2))
        .sum()
}

impl Predictor for CentroidClassifier {
    fn predict(&self, features: &IrisFeatures) -> Result<String, PredictError> {
        if !features.is_finite() {
            return Err(PredictError::InvalidInput);
        }

        self.centroids
            .iter()
            .map(|(label, centroid)| (label, squared_distance(features, centroid)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(label, _)| label.clone())
            .ok_or(PredictError::NoClasses)
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicts_each_species() {
        let model = CentroidClassifier::default();

        let setosa = IrisFeatures::from_array([5.1, 3.5, 1.4, 0.2]);
        let versicolor = IrisFeatures::from_array([6.2, 2.9, 4.3, 1.3]);
        let virginica = IrisFeatures::from_array([7.7, 3.0, 6.1, 2.3]);

        assert_eq!(model.predict(&setosa).unwrap(), "setosa");
        assert_eq!(model.predict(&versicolor).unwrap(), "versicolor");
        assert_eq!(model.predict(&virginica).unwrap(), "virginica");
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let model = CentroidClassifier::default();
        let bad = IrisFeatures::from_array([f64::NAN, 3.0, 3.7, 1.2]);
        assert_eq!(model.predict(&bad), Err(PredictError::InvalidInput));
    }

    #[test]
    fn test_empty_model_fails() {
        let model = CentroidClassifier::new("empty", Vec::new());
        let input = IrisFeatures::from_array([5.8, 3.0, 3.7, 1.2]);
        assert_eq!(model.predict(&input), Err(PredictError::NoClasses));
    }

    #[test]
    fn test_version_from_config() {
        let model = CentroidClassifier::default();
        assert_eq!(model.version(), "v1.0");
        assert_eq!(model.labels().count(), 3);
    }
}
