//! Segment command: count dictionary words in one or more text files.

use std::collections::HashSet;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use tibstat_core::{
    Algorithm, Config, SegmentOptions, StepMode, WorkOutcome, WorkStatus, report, run_work,
};

use super::{dictionary_path, load_pool, print_rows, read_input_file};

/// Arguments for the `segment` subcommand.
#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Text files to segment.
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Dictionary file (JSON array of `{id, word, category}`).
    #[arg(short, long, value_name = "FILE")]
    pub dictionary: Option<Utf8PathBuf>,

    /// Segmentation algorithm.
    #[arg(long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// Number of colour buckets.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub buckets: Option<u8>,

    /// How the bucket step is computed.
    #[arg(long, value_enum)]
    pub step_mode: Option<StepMode>,

    /// Write `<name>.annotated.txt`, `<name>.export.txt` and
    /// `<name>.result.json` for each input into DIR.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<Utf8PathBuf>,
}

#[derive(Serialize)]
struct FileOutcome<'a> {
    file: &'a Utf8Path,
    #[serde(flatten)]
    outcome: WorkOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Segment every file and print the counted words.
#[instrument(name = "cmd_segment", skip_all, fields(files = args.files.len()))]
pub fn cmd_segment(
    args: SegmentArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let options = resolve_options(&args, config);
    let dictionary = dictionary_path(args.dictionary.clone(), config.dictionary.as_ref())?;
    let pool = load_pool(&dictionary, &options.tables)?;
    debug!(
        dictionary = %dictionary,
        entries = pool.len(),
        algorithm = %options.algorithm,
        "executing segment command"
    );

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir.as_std_path())
            .with_context(|| format!("failed to create {dir}"))?;
    }

    let progress = (args.files.len() > 1 && !global_json).then(|| {
        let pb = ProgressBar::new(args.files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        pb.set_message("Segmenting");
        pb
    });

    let stems = output_stems(&args.files);
    let mut outcomes = Vec::with_capacity(args.files.len());
    for (file, stem) in args.files.iter().zip(&stems) {
        let (outcome, error) = match read_input_file(file, max_input) {
            Ok(text) => (run_work(&text, &pool, &options), None),
            Err(e) => {
                let error = format!("{e:#}");
                warn!(file = %file, error = %error, "skipping unreadable input");
                let failed = WorkOutcome {
                    status: WorkStatus::Failed,
                    result: None,
                };
                (failed, Some(error))
            }
        };
        if let Some(dir) = &args.out_dir {
            write_outputs(dir, stem, file, &outcome, &options)?;
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        outcomes.push(FileOutcome {
            file,
            outcome,
            error,
        });
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for (i, item) in outcomes.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_outcome(item);
        }
    }

    let failed = outcomes
        .iter()
        .filter(|o| o.outcome.status == WorkStatus::Failed)
        .count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed to segment", outcomes.len());
    }
    Ok(())
}

fn resolve_options(args: &SegmentArgs, config: &Config) -> SegmentOptions {
    let mut config = config.clone();
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(buckets) = args.buckets {
        config.colour_buckets = buckets;
    }
    if let Some(step_mode) = args.step_mode {
        config.step_mode = step_mode;
    }
    config.segment_options()
}

/// Output name for each input: the file stem, with `-2`, `-3`, ... appended
/// to repeats so that no two inputs share output files.
fn output_stems(files: &[Utf8PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    files
        .iter()
        .map(|file| {
            let base = file.file_stem().unwrap_or("input");
            let mut stem = base.to_string();
            let mut n = 1;
            while !taken.insert(stem.clone()) {
                n += 1;
                stem = format!("{base}-{n}");
            }
            stem
        })
        .collect()
}

fn print_outcome(item: &FileOutcome<'_>) {
    let Some(result) = &item.outcome.result else {
        match &item.error {
            Some(error) => println!("{} {}: {error}", item.file.bold(), "failed".red()),
            None => println!("{} {}", item.file.bold(), "failed".red()),
        }
        return;
    };
    println!(
        "{} {} words, {} matches",
        item.file.bold(),
        result.rows.len(),
        result.total_matches()
    );
    print_rows(&result.rows);
}

fn write_outputs(
    dir: &Utf8Path,
    stem: &str,
    file: &Utf8Path,
    outcome: &WorkOutcome,
    options: &SegmentOptions,
) -> anyhow::Result<()> {
    let json_path = dir.join(format!("{stem}.result.json"));
    std::fs::write(json_path.as_std_path(), serde_json::to_string_pretty(outcome)?)
        .with_context(|| format!("failed to write {json_path}"))?;

    let Some(result) = &outcome.result else {
        warn!(file = %file, "no result to write");
        return Ok(());
    };
    let annotated_path = dir.join(format!("{stem}.annotated.txt"));
    std::fs::write(annotated_path.as_std_path(), &result.annotated_text)
        .with_context(|| format!("failed to write {annotated_path}"))?;

    let export_path = dir.join(format!("{stem}.export.txt"));
    std::fs::write(
        export_path.as_std_path(),
        report::export_rows(&result.rows, &options.tables),
    )
    .with_context(|| format!("failed to write {export_path}"))?;

    debug!(file = %file, dir = %dir, "outputs written");
    Ok(())
}
