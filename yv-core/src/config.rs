//! Unified configuration schema for the yv workspace.
//!
//! One YAML file configures model seeding and the training pass; every
//! section has serde defaults so a partial file (or none at all) still
//! yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Model construction settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Training pass settings.
    #[serde(default)]
    pub training: TrainingConfig,
}

/// Model construction configuration.
///
/// The layer architecture itself is fixed per value-function kind at
/// construction and is intentionally not configurable here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Seed for weight initialization and epoch shuffling.
    #[serde(default)]
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

/// Training configuration for one `train` call (one pass over a game batch).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingConfig {
    /// Minibatch size within an epoch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Adam learning rate.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Epochs per `train` call.
    #[serde(default = "default_epochs")]
    pub epochs: u32,
}

fn default_batch_size() -> u32 {
    32
}

fn default_learning_rate() -> f64 {
    1e-3
}

fn default_epochs() -> u32 {
    1
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.model.seed, 0);
        assert_eq!(config.training.batch_size, 32);
        assert!((config.training.learning_rate - 1e-3).abs() < 1e-12);
        assert_eq!(config.training.epochs, 1);
    }

    #[test]
    fn parse_partial_yaml_applies_defaults() {
        let yaml = r#"
model:
  seed: 7

training:
  learning_rate: 0.01
"#;
        let config = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.model.seed, 7);
        assert!((config.training.learning_rate - 0.01).abs() < 1e-12);
        // Check defaults are applied
        assert_eq!(config.training.batch_size, 32);
        assert_eq!(config.training.epochs, 1);
    }

    #[test]
    fn invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        let result = Config::from_yaml(invalid_yaml);
        assert!(result.is_err());
    }
}
