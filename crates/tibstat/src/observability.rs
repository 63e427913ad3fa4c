//! Logging and tracing setup for the CLI.
//!
//! Two sinks are installed:
//!
//! - a human-readable layer on stderr, quiet by default (warnings and errors)
//!   and raised by `-v`/`-vv`;
//! - a JSONL file layer written through a non-blocking daily-rolling
//!   appender, filtered by the configured log level or `RUST_LOG`.
//!
//! The file sink is skipped when no log directory can be determined.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Environment variable naming an explicit log file.
const LOG_PATH_ENV: &str = "TIBSTAT_LOG_PATH";

/// Environment variable naming the log directory.
const LOG_DIR_ENV: &str = "TIBSTAT_LOG_DIR";

/// File name parts of the rolling log: `tibstat.<date>.jsonl`.
const LOG_FILE_PREFIX: &str = "tibstat";
const LOG_FILE_SUFFIX: &str = "jsonl";

/// Where and how loudly to log.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Explicit log file; disables rolling.
    pub log_path: Option<PathBuf>,
    /// Directory for the rolling JSONL log.
    pub log_dir: Option<PathBuf>,
    /// Most verbose level printed to stderr.
    pub console_level: LevelFilter,
}

impl ObservabilityConfig {
    /// Read `TIBSTAT_LOG_PATH` and `TIBSTAT_LOG_DIR`, falling back to
    /// `config_log_dir` and then the platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let log_path = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from);
        let log_dir = std::env::var_os(LOG_DIR_ENV)
            .map(PathBuf::from)
            .or(config_log_dir)
            .or_else(|| {
                tibstat_core::config::user_data_local_dir()
                    .map(|dir| dir.join("logs").into_std_path_buf())
            });
        Self {
            log_path,
            log_dir,
            console_level: LevelFilter::WARN,
        }
    }

    /// Set the stderr level from the `-q`/`-v` flags.
    pub const fn with_verbosity(mut self, quiet: bool, verbose: u8) -> Self {
        self.console_level = console_level(quiet, verbose);
        self
    }
}

/// Keeps the non-blocking file writer flushing until dropped.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Stderr level for the `-q`/`-v` flags.
const fn console_level(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the global filter.
///
/// `RUST_LOG` wins when set. Otherwise `-v` raises the configured level to
/// debug, `-vv` to trace, and `-q` lowers it to errors only.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// A log file that cannot be opened is reported on stderr once the
/// subscriber is up; logging then continues on stderr only.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(config.console_level);

    let (file_layer, file_guard, file_error) = match file_writer(config) {
        Ok(Some((writer, guard))) => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_current_span(true)
                .with_span_list(false);
            (Some(layer), Some(guard), None)
        }
        Ok(None) => (None, None, None),
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    if let Some(e) = file_error {
        tracing::warn!(error = %format!("{e:#}"), "file logging disabled");
    }
    Ok(ObservabilityGuard { _file: file_guard })
}

fn file_writer(config: &ObservabilityConfig) -> anyhow::Result<Option<(NonBlocking, WorkerGuard)>> {
    let builder = RollingFileAppender::builder();
    let (builder, dir) = if let Some(path) = &config.log_path {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            anyhow::bail!("log path has no usable file name: {}", path.display());
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        (builder.rotation(Rotation::NEVER).filename_prefix(name), dir)
    } else if let Some(dir) = &config.log_dir {
        let builder = builder
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX);
        (builder, dir.as_path())
    } else {
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = builder
        .build(dir)
        .with_context(|| format!("failed to open log file in {}", dir.display()))?;
    Ok(Some(tracing_appender::non_blocking(appender)))
}
