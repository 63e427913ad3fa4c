//! Tally command: count dictionary words in space-separated text.

use camino::Utf8PathBuf;
use clap::Args;
use tracing::{debug, instrument};

use tibstat_core::{Config, tally};

use super::{dictionary_path, load_pool, print_rows, read_input_file};

/// Arguments for the `tally` subcommand.
#[derive(Args, Debug)]
pub struct TallyArgs {
    /// Segmented text file (words separated by spaces).
    pub file: Utf8PathBuf,

    /// Dictionary file (JSON array of `{id, word, category}`).
    #[arg(short, long, value_name = "FILE")]
    pub dictionary: Option<Utf8PathBuf>,
}

/// Count the dictionary words of a segmented file.
#[instrument(name = "cmd_tally", skip_all, fields(file = %args.file))]
pub fn cmd_tally(
    args: TallyArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let dictionary = dictionary_path(args.dictionary, config.dictionary.as_ref())?;
    let pool = load_pool(&dictionary, &config.tables)?;
    let text = read_input_file(&args.file, max_input)?;
    debug!(entries = pool.len(), "executing tally command");

    let rows = tally::tally(&text, &pool, &config.tables, &config.colourizer())
        .map_err(|e| anyhow::anyhow!("{}: {e}", args.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_rows(&rows);
    }
    Ok(())
}
