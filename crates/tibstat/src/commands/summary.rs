//! Summary command: combine saved segmentation results.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use tibstat_core::{AnnotatedResult, Config, WorkOutcome, summary};

use super::{print_rows, read_input_file};

/// Arguments for the `summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Result files written by `segment --out-dir` (or bare result JSON).
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,
}

/// A saved result: a full job outcome or just its rows and text.
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedResult {
    Outcome(WorkOutcome),
    Result(AnnotatedResult),
}

impl SavedResult {
    fn into_result(self) -> Option<AnnotatedResult> {
        match self {
            Self::Outcome(outcome) => outcome.result,
            Self::Result(result) => Some(result),
        }
    }
}

/// Sum the counts of several results and recolour them.
#[instrument(name = "cmd_summary", skip_all, fields(files = args.files.len()))]
pub fn cmd_summary(
    args: SummaryArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let mut results = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let json = read_input_file(file, max_input)?;
        let saved: SavedResult =
            serde_json::from_str(&json).with_context(|| format!("failed to parse {file}"))?;
        match saved.into_result() {
            Some(result) => results.push(result),
            None => warn!(file = %file, "skipping failed result"),
        }
    }
    debug!(results = results.len(), "executing summary command");

    let summary = summary::summarize(
        results.iter().map(|r| r.rows.as_slice()),
        &config.colourizer(),
    )
    .context("nothing to summarize")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!(
        "{} words, {} matches",
        summary.rows.len(),
        summary.total_matches()
    );
    print_rows(&summary.rows);
    println!();
    println!("{}", "Chart".bold().underline());
    for (bucket, distinct) in &summary.chart {
        println!("c{bucket}: {distinct}");
    }
    Ok(())
}
