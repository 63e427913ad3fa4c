//! Result structs for segmentation runs.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for use
//! in CLI JSON output, persisted work results, and MCP tool responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::colour::{ColourMap, Colourizer};
use crate::tables::BoundaryTables;

/// One counted dictionary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrequencyRow {
    /// Dictionary word with its trailing separator.
    pub word: String,
    /// Grammatical category of the matching entry.
    #[serde(alias = "nature")]
    pub category: String,
    /// Occurrences in the text.
    pub count: usize,
    /// Dictionary identifier of the matching entry.
    pub id: String,
    /// Heat bucket for `count`; `0` is the most frequent tier.
    pub colour: u8,
    /// Set for bare particles, which the review UI underlines.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_underline: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Output of one segmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedResult {
    /// Counted words, most frequent first.
    pub rows: Vec<FrequencyRow>,
    /// Source text with every matched word replaced by `[id]`.
    pub annotated_text: String,
}

impl AnnotatedResult {
    /// Total number of matched occurrences.
    pub fn total_matches(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Whether no word was matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sort rows by descending count, keeping the existing order among ties.
pub fn sort_rows(rows: &mut [FrequencyRow]) {
    rows.sort_by(|a, b| b.count.cmp(&a.count));
}

/// Colour `rows` by rank of their counts and return the map used.
pub fn colour_rows(rows: &mut [FrequencyRow], colourizer: &Colourizer) -> ColourMap {
    let map = colourizer.divide(rows.iter().map(|r| r.count));
    for row in rows.iter_mut() {
        row.colour = map.get(&row.count).copied().unwrap_or(colourizer.buckets() - 1);
    }
    map
}

/// Render rows as the plain-text export: one `word, count, category` per line.
///
/// Rows are written by descending count and excluded punctuation tokens are
/// left out.
pub fn export_rows(rows: &[FrequencyRow], tables: &BoundaryTables) -> String {
    let mut sorted: Vec<&FrequencyRow> = rows.iter().filter(|r| !tables.is_excluded(&r.word)).collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));

    let mut out = String::new();
    for row in sorted {
        out.push_str(&format!("{}, {}, {}\n", row.word, row.count, row.category));
    }
    out
}
