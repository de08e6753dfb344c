//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [breaker]
            max_failures = 5

            [rate_limit]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.breaker.max_failures, 5);
        assert_eq!(config.breaker.recovery_timeout_secs, 60);
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.model.centroids.len(), 3);
    }

    #[test]
    fn test_custom_centroids() {
        let config = parse_config(
            r#"
            [model]
            version = "v2.0"

            [[model.centroids]]
            label = "setosa"
            features = [5.0, 3.4, 1.5, 0.2]
            "#,
        )
        .unwrap();

        assert_eq!(config.model.version, "v2.0");
        assert_eq!(config.model.centroids.len(), 1);
    }

    #[test]
    fn test_validation_error_is_reported() {
        let err = parse_config("[breaker]\nmax_failures = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("breaker.max_failures"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[breaker\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
