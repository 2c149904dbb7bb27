//! File logging.
//!
//! Logs go to `${NEXTHIRE_HOME}/logs/nexthire.log`, never to the terminal, so
//! the TUI's screen and the CLI's stdout stay clean.
//!
//! Filter: `NEXTHIRE_LOG` if set, else the config's `log_level`, else `info`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, paths};

pub const LOG_ENV: &str = "NEXTHIRE_LOG";
const LOG_FILE: &str = "nexthire.log";
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. Keep the returned guard alive until exit.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber is
/// already installed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), config)
}

fn init_in(log_dir: &Path, config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}

fn env_filter(config: &Config) -> EnvFilter {
    let directives = filter_directives(std::env::var(LOG_ENV).ok().as_deref(), config);
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter '{directives}': {e}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

fn filter_directives(env_value: Option<&str>, config: &Config) -> String {
    [env_value, config.log_level.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}
