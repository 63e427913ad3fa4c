//! Colour command: bucket a list of occurrence counts.

use std::collections::BTreeMap;

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use tibstat_core::colour::{self, ColourMap};
use tibstat_core::{Colourizer, Config, StepMode};

/// Arguments for the `colour` subcommand.
#[derive(Args, Debug)]
pub struct ColourArgs {
    /// Occurrence counts, in any order; duplicates share a bucket.
    #[arg(required = true)]
    pub counts: Vec<usize>,

    /// Number of colour buckets.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub buckets: Option<u8>,

    /// How the bucket step is computed.
    #[arg(long, value_enum)]
    pub step_mode: Option<StepMode>,
}

#[derive(Serialize)]
struct ColourReport {
    buckets: u8,
    step_mode: StepMode,
    colours: ColourMap,
    chart: BTreeMap<u8, usize>,
}

/// Print the bucket of every distinct count.
#[instrument(name = "cmd_colour", skip_all, fields(counts = args.counts.len()))]
pub fn cmd_colour(args: ColourArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let colourizer = Colourizer::new(
        args.buckets.unwrap_or(config.colour_buckets),
        args.step_mode.unwrap_or(config.step_mode),
    );
    let colours = colourizer.divide(args.counts.iter().copied());
    let report = ColourReport {
        buckets: colourizer.buckets(),
        step_mode: colourizer.step_mode(),
        chart: colour::histogram(&colours),
        colours,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "{} buckets, {} step",
        report.buckets,
        report.step_mode.as_str()
    );
    for (count, bucket) in report.colours.iter().rev() {
        println!("{:>8}  {}", count, format!("c{bucket}").bold());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_in_both_output_modes() {
        for json in [false, true] {
            let args = ColourArgs {
                counts: vec![9, 4, 4, 1],
                buckets: None,
                step_mode: Some(StepMode::Truncated),
            };
            assert!(cmd_colour(args, json, &Config::default()).is_ok());
        }
    }
}
