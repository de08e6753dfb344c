//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the prediction service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Circuit breaker settings.
    pub breaker: BreakerConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Model settings.
    pub model: ModelConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures before the breaker opens.
    pub max_failures: u32,

    /// Seconds the breaker stays open after the last failure.
    pub recovery_timeout_secs: u64,
}

impl BreakerConfig {
    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_secs(self.recovery_timeout_secs)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: 3,
            recovery_timeout_secs: 60,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Single predictions allowed per client per minute.
    pub single_per_minute: u32,

    /// Batch predictions allowed per client per minute.
    pub batch_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            single_per_minute: 30,
            batch_per_minute: 10,
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name reported by the status endpoint.
    pub name: String,

    /// Version label attached to prediction metrics.
    pub version: String,

    /// Per-species centroids for the built-in classifier.
    pub centroids: Vec<CentroidConfig>,
}

/// A species label and its mean feature vector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CentroidConfig {
    pub label: String,

    /// `[sepal_length, sepal_width, petal_length, petal_width]`.
    pub features: [f64; 4],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "iris_classifier".to_string(),
            version: "v1.0".to_string(),
            // Class means of the Fisher Iris dataset
            centroids: vec![
                CentroidConfig {
                    label: "setosa".to_string(),
                    features: [5.006, 3.428, 1.462, 0.246],
                },
                CentroidConfig {
                    label: "versicolor".to_string(),
                    features: [5.936, 2.770, 4.260, 1.326],
                },
                CentroidConfig {
                    label: "virginica".to_string(),
                    features: [6.588, 2.974, 5.552, 2.026],
                },
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
