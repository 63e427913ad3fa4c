//! Dictionary-driven boundary-scan segmentation.
//!
//! Tibetan runs syllables together with no spaces between words, so a
//! dictionary word found as a substring is only a real occurrence when the
//! text around it closes a word on both sides. The scan works in four
//! passes over the prepared text:
//!
//! 1. Collect every (overlapping) occurrence of every pool word.
//! 2. Keep the occurrences whose head and tail satisfy [`BoundaryTables`],
//!    one per start position, preferring the longer word.
//! 3. Walk the kept starts in order and drop any match that begins inside
//!    the previous surviving match.
//! 4. Replace each surviving match with `[id]` and count words.

use std::collections::{BTreeMap, HashMap};

use aho_corasick::{AhoCorasick, MatchKind};
use tracing::{debug, instrument};

use crate::colour::Colourizer;
use crate::error::StatResult;
use crate::pool::WordPool;
use crate::preprocess;
use crate::report::{self, AnnotatedResult, FrequencyRow};
use crate::tables::BoundaryTables;

/// A confirmed word occurrence in the prepared text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Index of the dictionary entry in the pool.
    pub entry: usize,
}

impl Match {
    /// The matched text.
    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.start..self.end]
    }
}

/// Boundary-scan segmenter over one word pool.
#[derive(Debug)]
pub struct Segmenter<'a> {
    pool: &'a WordPool,
    tables: &'a BoundaryTables,
    tails: Vec<String>,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter for `pool` using `tables` for boundary rules.
    pub fn new(pool: &'a WordPool, tables: &'a BoundaryTables) -> Self {
        Self {
            pool,
            tables,
            tails: tables.tail_patterns(),
        }
    }

    /// Segment `source` and count matched words.
    ///
    /// Empty text, an empty pool, or text without any valid occurrence all
    /// produce an empty row list and the prepared text with its line
    /// sentinels removed.
    #[instrument(skip_all, fields(source_len = source.len(), pool = self.pool.len()))]
    pub fn run(&self, source: &str, colourizer: &Colourizer) -> StatResult<AnnotatedResult> {
        let text = preprocess::prepare(source, self.tables);
        let matches = self.find_matches(&text)?;
        let (mut rows, annotated) = self.emit(&text, &matches);

        report::colour_rows(&mut rows, colourizer);
        debug!(
            matches = matches.len(),
            words = rows.len(),
            "segmentation finished"
        );

        Ok(AnnotatedResult {
            rows,
            annotated_text: preprocess::strip_sentinels(&annotated, self.tables),
        })
    }

    /// Find the non-overlapping word matches in prepared `text`, in order.
    pub fn find_matches(&self, text: &str) -> StatResult<Vec<Match>> {
        let candidates = self.candidate_matches(text)?;
        Ok(resolve_overlaps(candidates))
    }

    /// One validated match per start offset, before overlap resolution.
    fn candidate_matches(&self, text: &str) -> StatResult<BTreeMap<usize, Match>> {
        let mut recorded = BTreeMap::new();
        if text.is_empty() || self.pool.is_empty() {
            return Ok(recorded);
        }

        // Distinct stripped words, each owning the pool entries that share it.
        let mut patterns: Vec<&str> = Vec::new();
        let mut owners: Vec<Vec<usize>> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for (entry, e) in self.pool.iter().enumerate() {
            let word = self.tables.strip_separator(&e.word);
            if word.is_empty() {
                continue;
            }
            let slot = *slots.entry(word).or_insert_with(|| {
                patterns.push(word);
                owners.push(Vec::new());
                patterns.len() - 1
            });
            owners[slot].push(entry);
        }
        if patterns.is_empty() {
            return Ok(recorded);
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;

        let mut by_start: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
        for m in automaton.find_overlapping_iter(text) {
            let at = by_start.entry(m.start()).or_default();
            at.extend(owners[m.pattern().as_usize()].iter().map(|&e| (e, m.end())));
        }

        // Pool order at each start reproduces a longest-first scan per entry.
        for (start, mut candidates) in by_start {
            candidates.sort_unstable();
            for (entry, end) in candidates {
                let candidate = Match { start, end, entry };
                let word = candidate.text(text);

                if self.tables.is_bare_particle(word) {
                    recorded.entry(start).or_insert(candidate);
                    continue;
                }
                if !self.valid_head(text, start) || !self.valid_tail(text, end) {
                    continue;
                }
                let longer = recorded.get(&start).is_none_or(|kept: &Match| {
                    word.chars().count() > kept.text(text).chars().count()
                });
                if longer {
                    recorded.insert(start, candidate);
                }
            }
        }

        Ok(recorded)
    }

    fn valid_head(&self, text: &str, start: usize) -> bool {
        let before = &text[..start];
        before.chars().next_back().is_some_and(|c| self.tables.is_head_mark(c))
            || (!self.tables.line_sentinel.is_empty()
                && before.ends_with(self.tables.line_sentinel.as_str()))
    }

    fn valid_tail(&self, text: &str, end: usize) -> bool {
        let after = &text[end..];
        self.tails.iter().any(|t| after.starts_with(t.as_str()))
    }

    /// Replace matches with `[id]` markers and count words.
    ///
    /// Rows come back ordered by descending count, ties by first occurrence.
    fn emit(&self, text: &str, matches: &[Match]) -> (Vec<FrequencyRow>, String) {
        let mut annotated = String::with_capacity(text.len());
        let mut rows: Vec<FrequencyRow> = Vec::new();
        let mut row_of: HashMap<&str, usize> = HashMap::new();
        let mut last = 0;

        for m in matches {
            let Some(entry) = self.pool.get(m.entry) else {
                continue;
            };
            annotated.push_str(&text[last..m.start]);
            annotated.push('[');
            annotated.push_str(&entry.id);
            annotated.push(']');
            last = m.end;

            let word = m.text(text);
            if let Some(&i) = row_of.get(word) {
                rows[i].count += 1;
            } else {
                row_of.insert(word, rows.len());
                rows.push(FrequencyRow {
                    word: self.tables.with_separator(word),
                    category: entry.category.clone(),
                    count: 1,
                    id: entry.id.clone(),
                    colour: 0,
                    is_underline: self.tables.is_bare_particle(word),
                });
            }
        }
        annotated.push_str(&text[last..]);

        report::sort_rows(&mut rows);
        (rows, annotated)
    }
}

/// Drop every match that starts before the previous surviving match ends.
fn resolve_overlaps(candidates: BTreeMap<usize, Match>) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::with_capacity(candidates.len());
    let mut dropped = 0usize;
    for m in candidates.into_values() {
        if kept.last().is_some_and(|prev| prev.end > m.start) {
            dropped += 1;
            continue;
        }
        kept.push(m);
    }
    if dropped > 0 {
        debug!(dropped, "overlapping matches dropped");
    }
    kept
}
