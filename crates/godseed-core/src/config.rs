//! Configuration loading and typed config structures for the simulation.
//!
//! The canonical configuration lives in `godseed-config.yaml` at the
//! project root. Every field has a default, so a missing file or an empty
//! document yields a fully usable configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `godseed-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing, data directory).
    #[serde(default)]
    pub world: WorldConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Display name for this world, used in startup logging only.
    pub name: String,

    /// Seed for the random number generator. `None` seeds from OS entropy,
    /// making every run unique.
    pub seed: Option<u64>,

    /// Delay between ticks in milliseconds.
    pub tick_interval_ms: u64,

    /// Directory the per-entity logs live in.
    pub data_dir: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: String::from("The Garden"),
            seed: None,
            tick_interval_ms: 2000,
            data_dir: String::from("data"),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends cleanly (0 = run until
    /// cancelled).
    pub max_ticks: u64,
}
