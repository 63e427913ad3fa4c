//! Search command: list the sentences containing a word.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use tibstat_core::{Config, search};

use super::read_input_file;

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text file to search.
    pub file: Utf8PathBuf,

    /// Word to look for (a trailing tsheg or shad is ignored).
    pub term: String,
}

/// Print every sentence of a file that contains the term.
#[instrument(name = "cmd_search", skip_all, fields(file = %args.file))]
pub fn cmd_search(
    args: SearchArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let text = read_input_file(&args.file, max_input)?;
    let result = search::search(&text, &args.term, &config.tables)?;
    debug!(
        sentences = result.content.len(),
        hits = result.hits.len(),
        "executing search command"
    );

    if global_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if result.hits.is_empty() {
        println!("{}", "no sentences contain the term".dimmed());
        return Ok(());
    }
    for hit in &result.hits {
        println!(
            "{:>5}  {}{}{}",
            hit.seq.dimmed(),
            hit.before,
            hit.term.bold().yellow(),
            hit.after
        );
    }
    println!(
        "\n{} of {} sentences",
        result.hits.len(),
        result.content.len()
    );
    Ok(())
}
