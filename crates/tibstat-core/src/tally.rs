//! Counting over text that is already segmented.
//!
//! Tokens are separated by spaces (and line breaks). Every token is counted
//! and the counts are coloured before filtering, so a dictionary word's bucket
//! reflects its rank among all tokens of the document, not only among the
//! dictionary words found.
//!
//! [`word_list`] goes the other way and lists the distinct Tibetan tokens,
//! optionally only those the dictionary does not know yet.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::colour::Colourizer;
use crate::error::{StatError, StatResult};
use crate::pool::WordPool;
use crate::report::{self, FrequencyRow};
use crate::tables::{self, BoundaryTables};

/// Token separator of segmented text.
pub const TOKEN_SEPARATOR: char = ' ';

/// Which tokens [`word_list`] keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum WordSelection {
    /// Only tokens missing from the dictionary.
    #[default]
    New,
    /// Every Tibetan token.
    All,
}

impl WordSelection {
    /// Returns the selection as a kebab-case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for WordSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn tokens(segmented: &str) -> impl Iterator<Item = &str> {
    segmented
        .split(|c: char| c == TOKEN_SEPARATOR || c == '\t' || c == '\n' || c == '\r')
        .filter(|t| !t.is_empty())
}

/// Count the tokens of `segmented` and return rows for dictionary words.
///
/// Returns [`StatError::EmptyInput`] when the text has no tokens at all.
#[instrument(skip_all, fields(len = segmented.len(), pool = pool.len()))]
pub fn tally(
    segmented: &str,
    pool: &WordPool,
    tables: &BoundaryTables,
    colourizer: &Colourizer,
) -> StatResult<Vec<FrequencyRow>> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens(segmented) {
        let slot = counts.entry(token).or_insert(0);
        if *slot == 0 {
            order.push(token);
        }
        *slot += 1;
    }
    if order.is_empty() {
        return Err(StatError::EmptyInput);
    }

    let map = colourizer.divide(counts.values().copied());
    let mut rows: Vec<FrequencyRow> = order
        .iter()
        .filter_map(|&token| {
            let entry = pool.find_word(token)?;
            let count = counts[token];
            Some(FrequencyRow {
                word: entry.word.clone(),
                category: entry.category.clone(),
                count,
                id: entry.id.clone(),
                colour: map.get(&count).copied().unwrap_or(colourizer.buckets() - 1),
                is_underline: tables.is_bare_particle(tables.strip_separator(token)),
            })
        })
        .collect();
    report::sort_rows(&mut rows);

    debug!(tokens = order.len(), words = rows.len(), "tally finished");
    Ok(rows)
}

/// Distinct Tibetan tokens of `segmented` texts, in first-seen order.
///
/// Tokens that are not Tibetan script or are excluded punctuation are
/// dropped. With [`WordSelection::New`], tokens whose word is already in
/// `pool` are dropped too; the trailing separator is ignored when comparing.
#[instrument(skip_all, fields(pool = pool.len(), selection = %selection))]
pub fn word_list<'a, I>(
    segmented: I,
    pool: &WordPool,
    tables: &BoundaryTables,
    selection: WordSelection,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let known: HashSet<&str> = match selection {
        WordSelection::New => pool
            .entries()
            .iter()
            .map(|e| tables.strip_separator(&e.word))
            .collect(),
        WordSelection::All => HashSet::new(),
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut words = Vec::new();
    let mut scanned = 0usize;
    for text in segmented {
        for token in tokens(text) {
            scanned += 1;
            if !tables::is_tibetan_word(token)
                || tables.is_excluded(token)
                || known.contains(tables.strip_separator(token))
            {
                continue;
            }
            if seen.insert(token) {
                words.push(token.to_string());
            }
        }
    }

    debug!(tokens = scanned, words = words.len(), "word list built");
    words
}
