use super::{
    evolution::EvolutionConfig,
    fitness::{EarlyStoppingConfig, FitnessConfig, SignalConfig},
    traits::ConfigSection,
};
use crate::error::SignalGpError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `SIGNALGP__EVOLUTION__POPULATION_SIZE=50`
pub const ENV_PREFIX: &str = "SIGNALGP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
    pub signal: SignalConfig,
    pub early_stopping: EarlyStoppingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SignalGpError> {
        self.evolution.validate()?;
        self.fitness.validate()?;
        self.signal.validate()?;
        self.early_stopping.validate()?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SignalGpError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| SignalGpError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignalGpError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SignalGpError::Configuration(format!("Failed to read config: {}", e)))?;
        Self::from_toml_str(&contents)
    }

    /// Load a TOML file, then apply `SIGNALGP__<SECTION>__<FIELD>` environment overrides
    pub fn load_layered<P: AsRef<Path>>(path: P) -> Result<Self, SignalGpError> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SignalGpError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| SignalGpError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SignalGpError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
