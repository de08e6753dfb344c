//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds and timeouts > 0, addresses parse)
//! - Check the model has usable centroids
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address '{}'", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.breaker.max_failures == 0 {
        errors.push(ValidationError::new(
            "breaker.max_failures",
            "must be greater than zero",
        ));
    }
    if config.breaker.recovery_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "breaker.recovery_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.single_per_minute == 0 {
            errors.push(ValidationError::new(
                "rate_limit.single_per_minute",
                "must be greater than zero when rate limiting is enabled",
            ));
        }
        if config.rate_limit.batch_per_minute == 0 {
            errors.push(ValidationError::new(
                "rate_limit.batch_per_minute",
                "must be greater than zero when rate limiting is enabled",
            ));
        }
    }

    if config.model.centroids.is_empty() {
        errors.push(ValidationError::new("model.centroids", "at least one centroid is required"));
    }
    let mut seen = HashSet::new();
    for centroid in &config.model.centroids {
        if !seen.insert(centroid.label.as_str()) {
            errors.push(ValidationError::new(
                "model.centroids",
                format!("duplicate label '{}'", centroid.label),
            ));
        }
        if centroid.features.iter().any(|v| !v.is_finite()) {
            errors.push(ValidationError::new(
                "model.centroids",
                format!("centroid '{}' has non-finite features", centroid.label),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CentroidConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.breaker.max_failures = 0;
        config.breaker.recovery_timeout_secs = 0;
        config.listener.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "breaker.max_failures",
                "breaker.recovery_timeout_secs",
            ]
        );
    }

    #[test]
    fn test_rate_limits_only_checked_when_enabled() {
        let mut config = ServiceConfig::default();
        config.rate_limit.single_per_minute = 0;
        assert!(validate_config(&config).is_err());

        config.rate_limit.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_centroid_labels() {
        let mut config = ServiceConfig::default();
        config.model.centroids.push(CentroidConfig {
            label: "setosa".into(),
            features: [5.0, 3.4, 1.5, 0.2],
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duplicate"));
    }
}
