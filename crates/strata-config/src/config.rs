//! Tool settings with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted settings inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Header values for generators built from the presets.
    pub generator: GeneratorConfig,
    /// Where and how the descriptor is written.
    pub output: OutputConfig,
    pub debug: DebugConfig,
}

/// Generator header defaults. A manifest's own header wins over these,
/// except where a CLI flag was given explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub id: String,
    pub version: String,
    pub source: String,
    /// Sea level written to `meta.ocean-level`.
    pub ocean_level: i32,
    /// Extra global preprocessors appended after the preset ones.
    pub preprocessors: Vec<String>,
    /// Seed for the variant preview and the `meta.seed` key. `None` skips both.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            id: "overworld".to_string(),
            version: "1.0.0".to_string(),
            source: "strata".to_string(),
            ocean_level: 62,
            preprocessors: Vec::new(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Descriptor file path; stdout when unset.
    pub path: Option<PathBuf>,
    /// Emit the trailing `- block: 1` entry after MATCH_SET patterns, for
    /// engines that still expect it.
    pub legacy_match_set_sentinel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level filter (e.g. "debug", "info", "strata_descriptor=trace").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// `<platform config dir>/strata`.
///
/// # Errors
///
/// [`ConfigError::NoConfigDir`] when the platform has no config directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("strata"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Loads `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// I/O and parse failures.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Writes `config.ron` into `config_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// I/O and serialization failures.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let write_error = |source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_error)?;
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(&config_path, serialized).map_err(write_error)?;
        Ok(())
    }

    /// Re-reads the file: `Some(new)` if it differs from `self`, else `None`.
    ///
    /// # Errors
    ///
    /// I/O and parse failures.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
