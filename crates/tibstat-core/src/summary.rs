//! Aggregation of several segmentation results.

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::colour::{self, Colourizer};
use crate::error::{StatError, StatResult};
use crate::report::{self, FrequencyRow};

/// Combined frequency table over several results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// Summed rows, most frequent first, recoloured over the combined counts.
    pub rows: Vec<FrequencyRow>,
    /// Number of distinct counts per colour bucket.
    pub chart: BTreeMap<u8, usize>,
}

impl Summary {
    /// Total occurrences across all rows.
    pub fn total_matches(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// Sum the counts of each (word, category) pair across `results` and
/// recolour.
///
/// A word listed under two categories keeps one row per category. The first
/// row seen for a pair supplies its id and underline flag. Fails with
/// [`StatError::EmptyInput`] when there are no rows at all.
#[instrument(skip_all)]
pub fn summarize<'a, I>(results: I, colourizer: &Colourizer) -> StatResult<Summary>
where
    I: IntoIterator<Item = &'a [FrequencyRow]>,
{
    let mut rows: Vec<FrequencyRow> = Vec::new();
    let mut row_of: HashMap<(String, String), usize> = HashMap::new();
    let mut sources = 0usize;

    for result in results {
        sources += 1;
        for row in result {
            let key = (row.word.clone(), row.category.clone());
            if let Some(&i) = row_of.get(&key) {
                rows[i].count += row.count;
            } else {
                row_of.insert(key, rows.len());
                rows.push(row.clone());
            }
        }
    }
    if rows.is_empty() {
        return Err(StatError::EmptyInput);
    }

    report::sort_rows(&mut rows);
    let map = report::colour_rows(&mut rows, colourizer);
    tracing::debug!(sources, words = rows.len(), "results summarized");

    Ok(Summary {
        rows,
        chart: colour::histogram(&map),
    })
}
