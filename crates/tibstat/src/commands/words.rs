//! Words command: list the distinct Tibetan words of segmented files.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use tracing::{debug, instrument};

use tibstat_core::{Config, WordPool, WordSelection, tally};

use super::{dictionary_path, load_pool, read_input_file};

/// Arguments for the `words` subcommand.
#[derive(Args, Debug)]
pub struct WordsArgs {
    /// Segmented text files (words separated by spaces).
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Dictionary file; required when selecting new words.
    #[arg(short, long, value_name = "FILE")]
    pub dictionary: Option<Utf8PathBuf>,

    /// Keep only words missing from the dictionary, or every word.
    #[arg(long, value_enum, default_value_t)]
    pub select: WordSelection,

    /// Write the list to FILE, one word per line, instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

/// Print or save the word list of the given files.
#[instrument(name = "cmd_words", skip_all, fields(files = args.files.len(), select = %args.select))]
pub fn cmd_words(
    args: WordsArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    let pool = match args.select {
        WordSelection::New => {
            let dictionary = dictionary_path(args.dictionary, config.dictionary.as_ref())?;
            load_pool(&dictionary, &config.tables)?
        }
        WordSelection::All => WordPool::default(),
    };

    let texts = args
        .files
        .iter()
        .map(|file| read_input_file(file, max_input))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let words = tally::word_list(
        texts.iter().map(String::as_str),
        &pool,
        &config.tables,
        args.select,
    );
    debug!(entries = pool.len(), words = words.len(), "executing words command");

    if let Some(path) = &args.output {
        let mut body = words.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        std::fs::write(path.as_std_path(), body)
            .with_context(|| format!("failed to write {path}"))?;
        if !global_json {
            println!("{} words written to {path}", words.len());
            return Ok(());
        }
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&words)?);
    } else {
        for word in &words {
            println!("{word}");
        }
    }
    Ok(())
}
