//! Tracing subscriber setup for the strata tools.
//!
//! Console output goes to stderr so a descriptor written to stdout stays
//! clean. Debug builds with a log directory also write `strata.log` as JSON
//! lines.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use strata_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log inside the log directory.
pub const LOG_FILE: &str = "strata.log";

/// Filter directive from the config, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> &str {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
}

/// An `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Opens the JSON log file, or `None` when file logging is off or the
/// directory cannot be written.
fn open_log_file(log_dir: Option<&Path>, debug_build: bool) -> Option<File> {
    if !debug_build {
        return None;
    }
    let log_dir = log_dir?;
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE)).ok()
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the config's `debug.log_level`. Console output is
/// human-readable on stderr. With `debug_build` and a `log_dir`, a JSON
/// layer additionally writes [`LOG_FILE`].
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use strata_config::Config;
/// use strata_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config)).ok();
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    match open_log_file(log_dir, debug_build) {
        Some(log_file) => {
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();
            subscriber.with(file_layer).try_init()?;
            tracing::debug!(file = LOG_FILE, "json file logging enabled");
            Ok(())
        }
        None => subscriber.try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert!(default_env_filter().to_string().contains("info"));
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_config_level_used() {
        let mut config = Config::default();
        config.debug.log_level = "strata_descriptor=debug".to_string();
        assert_eq!(filter_directive(Some(&config)), "strata_descriptor=debug");

        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_directives_parse() {
        for directive in ["info", "warn,strata_descriptor=trace", "error"] {
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
    }

    #[test]
    fn test_log_file_only_in_debug_builds() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        assert!(open_log_file(Some(&logs), false).is_none());
        assert!(!logs.exists());
        assert!(open_log_file(None, true).is_none());

        assert!(open_log_file(Some(&logs), true).is_some());
        assert!(logs.join(LOG_FILE).exists());
    }
}
