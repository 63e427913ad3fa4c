//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tibstat_core::config::{Config, ConfigSources};
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary: Option<String>,
    algorithm: String,
    colour_buckets: u8,
    step_mode: String,
    /// `None` when the limit is disabled.
    max_input_bytes: Option<usize>,
    suffix_particles: usize,
    excluded_words: usize,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            dictionary: config.dictionary.as_ref().map(|p| p.to_string()),
            algorithm: config.algorithm.as_str().to_string(),
            colour_buckets: config.colour_buckets,
            step_mode: config.step_mode.as_str().to_string(),
            max_input_bytes: config.input_limit(),
            suffix_particles: config.tables.suffix_particles.len(),
            excluded_words: config.tables.excluded_words.len(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match &cfg.config_file {
        Some(path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(dir) = &cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match &cfg.max_input_bytes {
        Some(max) => println!("{}: {} bytes", "Input limit".dimmed(), max),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Segmentation".bold().underline());
    match &cfg.dictionary {
        Some(path) => println!("{}: {}", "Dictionary".dimmed(), path.cyan()),
        None => println!("{}: {}", "Dictionary".dimmed(), "(not set)".dimmed()),
    }
    println!("{}: {}", "Algorithm".dimmed(), cfg.algorithm);
    println!("{}: {}", "Colour buckets".dimmed(), cfg.colour_buckets);
    println!("{}: {}", "Step mode".dimmed(), cfg.step_mode);
    println!("{}: {}", "Suffix particles".dimmed(), cfg.suffix_particles);
    println!("{}: {}", "Excluded words".dimmed(), cfg.excluded_words);

    Ok(())
}
