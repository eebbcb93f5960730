//! Configuration management
//!
//! Provides unified configuration for model construction and device
//! selection.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{DiscriminatorConfig, GeneratorConfig};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Device: "cpu" or "cuda"
    ///
    /// Kept ahead of the table-valued fields so the TOML form serializes.
    pub device: String,
    /// Model configuration
    pub model: ModelConfig,
}

/// Model-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Latent vector length
    pub latent_vector_length: i64,
    /// Dropout rate for the discriminator
    pub dropout: f64,
    /// Initialize layer weights with Xavier-uniform
    pub init_weights_xavier: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: "cpu".to_string(),
            model: ModelConfig {
                latent_vector_length: 100,
                dropout: 0.2,
                init_weights_xavier: false,
            },
        }
    }
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_toml(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generator configuration derived from this config
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            latent_vector_length: self.model.latent_vector_length,
            init_weights_xavier: self.model.init_weights_xavier,
        }
    }

    /// Discriminator configuration derived from this config
    pub fn discriminator_config(&self) -> DiscriminatorConfig {
        DiscriminatorConfig {
            dropout: self.model.dropout,
            init_weights_xavier: self.model.init_weights_xavier,
        }
    }

    /// Get device from configuration
    pub fn get_device(&self) -> tch::Device {
        match self.device.to_lowercase().as_str() {
            "cuda" | "gpu" => {
                if tch::Cuda::is_available() {
                    tch::Device::Cuda(0)
                } else {
                    tracing::warn!("CUDA requested but not available, falling back to CPU");
                    tch::Device::Cpu
                }
            }
            _ => tch::Device::Cpu,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model.latent_vector_length <= 0 {
            anyhow::bail!("Latent vector length must be > 0");
        }
        if !(0.0..1.0).contains(&self.model.dropout) {
            anyhow::bail!("Dropout must be in [0, 1)");
        }
        Ok(())
    }
}

/// Create default configuration file if it doesn't exist
pub fn ensure_config_exists(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        if path.ends_with(".toml") {
            Config::from_toml(path)
        } else {
            Config::from_json(path)
        }
    } else {
        let config = Config::default();
        if path.ends_with(".toml") {
            config.save_toml(path)?;
        } else {
            config.save_json(path)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.model.latent_vector_length, 100);
        assert_eq!(config.model.dropout, 0.2);
        assert_eq!(config.device, "cpu");
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.model.latent_vector_length, loaded.model.latent_vector_length);
        assert_eq!(config.model.dropout, loaded.model.dropout);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&content).unwrap();

        assert_eq!(config.device, loaded.device);
        assert_eq!(
            config.model.init_weights_xavier,
            loaded.model.init_weights_xavier
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.model.latent_vector_length = 0;
        assert!(config.validate().is_err());

        config.model.latent_vector_length = 100;
        config.model.dropout = 1.0;
        assert!(config.validate().is_err());
    }
}
