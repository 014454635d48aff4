//! `strata`: builds a world-generation descriptor and writes it out.
//!
//! The generator comes from a RON manifest (`--manifest`) or from the
//! built-in presets. The descriptor goes to `--output`, the configured
//! output path, or stdout.
//!
//! Run with: `cargo run -p strata-cli -- --manifest worlds/overworld.ron`

mod error;
mod preview;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use strata_config::{CONFIG_FILE, CliArgs, Config, default_config_dir};
use strata_descriptor::{
    EmitOptions, Generator, GeneratorManifest, GeneratorRegistry, ProgressListener,
    TracingProgress, presets,
};
use tracing::{error, info};

use crate::error::CliError;

/// World name the built generator is bound to in the registry.
const DEFAULT_WORLD: &str = "world";

struct LoadedConfig {
    config: Config,
    dir: PathBuf,
    /// `config.ron` was missing and has just been written with defaults.
    created: bool,
}

/// Loads the config before logging exists; [`LoadedConfig::report`] logs the
/// outcome once the subscriber is installed.
fn load_config(args: &CliArgs) -> Result<LoadedConfig, CliError> {
    let dir = match &args.config {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };
    let created = !dir.join(CONFIG_FILE).exists();
    let mut config = Config::load_or_create(&dir)?;
    config.apply_cli_overrides(args);
    Ok(LoadedConfig {
        config,
        dir,
        created,
    })
}

impl LoadedConfig {
    fn report(&self) {
        let path = self.dir.join(CONFIG_FILE);
        if self.created {
            info!("Created default config at {}", path.display());
        } else {
            info!("Loaded config from {}", path.display());
        }
    }
}

/// Builds the generator from the manifest or the presets and applies the
/// config on top.
fn build_generator(config: &Config, args: &CliArgs) -> Result<Generator, CliError> {
    let mut generator = match &args.manifest {
        Some(path) => GeneratorManifest::load(path)?.into_generator()?,
        None => presets::default_generator(
            config.generator.id.clone(),
            config.generator.version.clone(),
            config.generator.source.clone(),
            config.generator.ocean_level,
        )?,
    };

    // A manifest carries its own sea level; only an explicit flag beats it.
    if let Some(level) = args.ocean_level {
        generator.set_ocean_level(level);
    }
    for name in &config.generator.preprocessors {
        generator.add_preprocessor(name.clone());
    }
    if let Some(seed) = config.generator.seed {
        generator.set_meta("seed", seed.to_string());
    }
    Ok(generator)
}

/// Registers the generator, resolves it back through the world binding and
/// serializes it.
fn render_descriptor(
    config: &Config,
    args: &CliArgs,
    progress: &mut dyn ProgressListener,
) -> Result<String, CliError> {
    progress.on_progress_update(0.0, "building");
    let generator = build_generator(config, args)?;
    let generator_id = generator.id().to_string();

    let mut registry = GeneratorRegistry::new();
    registry.register(generator)?;
    registry.bind_world(DEFAULT_WORLD, &generator_id)?;
    let generator = registry.generator_for_world(DEFAULT_WORLD)?;

    if let Some(seed) = config.generator.seed {
        progress.on_progress_update(40.0, "preview");
        preview::preview_variants(generator, seed);
    }

    progress.on_progress_update(60.0, "serializing");
    let options = EmitOptions {
        legacy_match_set_sentinel: config.output.legacy_match_set_sentinel,
    };
    Ok(generator.serialize_with(options)?)
}

fn write_descriptor(text: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            let write_error = |source| CliError::Write {
                path: path.to_path_buf(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(write_error)?;
            }
            std::fs::write(path, text).map_err(write_error)?;
            info!("Descriptor written to {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).map_err(CliError::Stdout)?;
            stdout.flush().map_err(CliError::Stdout)
        }
    }
}

fn run(config: &Config, args: &CliArgs) -> Result<(), CliError> {
    let mut progress = TracingProgress::new();
    let text = render_descriptor(config, args, &mut progress)?;
    progress.on_progress_update(90.0, "writing");
    write_descriptor(&text, config.output.path.as_deref())?;
    progress.on_progress_update(100.0, "done");
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let loaded = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("strata: {e}");
            std::process::exit(1);
        }
    };

    let log_dir = loaded.dir.join("logs");
    let config = &loaded.config;
    if let Err(e) = strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(config))
    {
        eprintln!("strata: logging disabled: {e}");
    }
    loaded.report();

    info!(
        "Generator: {} {} | ocean level {}",
        config.generator.id, config.generator.version, config.generator.ocean_level
    );

    if let Err(e) = run(config, &args) {
        error!("{e}");
        std::process::exit(1);
    }
}
