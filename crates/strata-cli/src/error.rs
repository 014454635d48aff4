//! Errors surfaced by the `strata` binary.

use std::path::PathBuf;

use strata_config::ConfigError;
use strata_descriptor::{DescriptorError, ManifestError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("cannot write descriptor to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write descriptor to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}
