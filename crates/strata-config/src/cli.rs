//! Command-line arguments for the `strata` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Builds a world-generation descriptor and writes it out.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "World-generation descriptor builder")]
pub struct CliArgs {
    /// RON generator manifest; the built-in presets are used when omitted.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Descriptor output file (stdout when neither this nor the config sets one).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Path to config directory (overrides the platform default).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generator id.
    #[arg(long)]
    pub id: Option<String>,

    /// Generator version string.
    #[arg(long)]
    pub version_tag: Option<String>,

    /// Sea level.
    #[arg(long, allow_hyphen_values = true)]
    pub ocean_level: Option<i32>,

    /// Emit the legacy MATCH_SET trailing sentinel.
    #[arg(long)]
    pub legacy_sentinel: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Seed for the variant preview.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.output {
            self.output.path = Some(path.clone());
        }
        if let Some(ref id) = args.id {
            self.generator.id = id.clone();
        }
        if let Some(ref version) = args.version_tag {
            self.generator.version = version.clone();
        }
        if let Some(level) = args.ocean_level {
            self.generator.ocean_level = level;
        }
        if args.legacy_sentinel {
            self.output.legacy_match_set_sentinel = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.generator.seed = Some(seed);
        }
    }
}
