//! Configuration for the strata descriptor tool.
//!
//! Settings persist to disk as `config.ron` and can be overridden per run
//! from the command line. Unknown or missing fields fall back to defaults so
//! old config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, GeneratorConfig, OutputConfig, default_config_dir,
};
pub use error::ConfigError;
