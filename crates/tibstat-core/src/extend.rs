//! Word-extend segmentation variant.
//!
//! Instead of validating each occurrence's neighbours, this variant expands
//! every dictionary word into its full set of bounded spellings
//! (`head + word + tail` for every head and tail in [`BoundaryTables`]) and
//! counts plain substring occurrences of each spelling, longest words first.
//! Each counted spelling is rewritten to `head + [id] + tail` so later,
//! shorter words cannot match inside it.
//!
//! Occurrences are counted left to right without overlap, so two adjacent
//! words sharing one separator (`་W་W་`) only count once per pass. Bare
//! particles get no exemption here. Use [`crate::segment`] when those cases
//! matter.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::colour::Colourizer;
use crate::pool::WordPool;
use crate::preprocess;
use crate::report::{self, AnnotatedResult, FrequencyRow};
use crate::tables::BoundaryTables;

/// Word-extend segmenter over one word pool.
#[derive(Debug)]
pub struct ExtendSegmenter<'a> {
    pool: &'a WordPool,
    tables: &'a BoundaryTables,
    heads: Vec<String>,
    tails: Vec<String>,
}

impl<'a> ExtendSegmenter<'a> {
    /// Create a word-extend segmenter for `pool`.
    pub fn new(pool: &'a WordPool, tables: &'a BoundaryTables) -> Self {
        Self {
            pool,
            tables,
            heads: tables.extend_heads(),
            tails: tables.tail_patterns(),
        }
    }

    /// Number of bounded spellings tried per dictionary word.
    pub fn spellings_per_word(&self) -> usize {
        self.heads.len() * self.tails.len()
    }

    /// Segment `source` and count matched words.
    #[instrument(skip_all, fields(source_len = source.len(), pool = self.pool.len()))]
    pub fn run(&self, source: &str, colourizer: &Colourizer) -> AnnotatedResult {
        let mut buffer = preprocess::prepare(source, self.tables);
        let mut rows: Vec<FrequencyRow> = Vec::new();
        let mut row_of: HashMap<String, usize> = HashMap::new();

        for entry in self.pool {
            let word = self.tables.strip_separator(&entry.word);
            if word.is_empty() {
                continue;
            }
            let marker = format!("[{}]", entry.id);
            let mut found = 0usize;

            for head in &self.heads {
                for tail in &self.tails {
                    let spelling = format!("{head}{word}{tail}");
                    let hits = buffer.matches(spelling.as_str()).count();
                    if hits == 0 {
                        continue;
                    }
                    buffer = buffer.replace(spelling.as_str(), &format!("{head}{marker}{tail}"));
                    found += hits;
                }
            }

            if found == 0 {
                continue;
            }
            if let Some(&i) = row_of.get(word) {
                rows[i].count += found;
            } else {
                row_of.insert(word.to_string(), rows.len());
                rows.push(FrequencyRow {
                    word: self.tables.with_separator(word),
                    category: entry.category.clone(),
                    count: found,
                    id: entry.id.clone(),
                    colour: 0,
                    is_underline: self.tables.is_bare_particle(word),
                });
            }
        }

        report::sort_rows(&mut rows);
        report::colour_rows(&mut rows, colourizer);
        debug!(words = rows.len(), "word-extend segmentation finished");

        AnnotatedResult {
            rows,
            annotated_text: preprocess::strip_sentinels(&buffer, self.tables),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DictionaryEntry;

    fn run(source: &str, entries: &[(&str, &str)]) -> AnnotatedResult {
        let pool: WordPool = entries
            .iter()
            .map(|(id, word)| DictionaryEntry::new(*id, *word, "noun"))
            .collect();
        let tables = BoundaryTables::default();
        ExtendSegmenter::new(&pool, &tables).run(source, &Colourizer::default())
    }

    #[test]
    fn default_tables_give_twenty_four_spellings() {
        let pool = WordPool::default();
        let tables = BoundaryTables::default();
        assert_eq!(ExtendSegmenter::new(&pool, &tables).spellings_per_word(), 24);
    }

    #[test]
    fn counts_bounded_occurrences() {
        let result = run(
            "རྒྱལ་ཁབ་ཆེན་པོ།",
            &[("w1", "རྒྱལ་ཁབ་"), ("w2", "ཆེན་པོ་")],
        );
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows.iter().all(|r| r.count == 1 && r.colour == 0));
        assert_eq!(result.annotated_text, "[w1]་[w2]།");
    }

    #[test]
    fn counts_particle_spellings() {
        let result = run("བོད་ཡུལ་ཁབས་ཁབ།", &[("w", "ཁབ་")]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].count, 2);
        assert_eq!(result.annotated_text, "བོད་ཡུལ་[w]ས་[w]།");
    }

    #[test]
    fn longer_words_consume_text_first() {
        let result = run("ཀ་ཁ་ག།", &[("short", "ཁ་"), ("long", "ཀ་ཁ་")]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].id, "long");
        assert_eq!(result.annotated_text, "[long]་ག།");
    }

    #[test]
    fn unbounded_substrings_are_ignored() {
        let result = run("རྒྱལ་ཁབག་", &[("w", "ཁབ་")]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn empty_pool_leaves_text() {
        let result = run("བོད་ཡུལ།", &[]);
        assert!(result.rows.is_empty());
        assert_eq!(result.annotated_text, "བོད་ཡུལ།");
    }
}
