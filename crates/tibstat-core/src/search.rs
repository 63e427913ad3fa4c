//! Sentence-level term search.
//!
//! A document is cut into numbered sentences and every sentence containing
//! the term as a complete word is reported. "Complete" uses the same tail
//! grammar as segmentation: the term may carry one suffix particle and must
//! then be followed by a terminator or a space.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{StatError, StatResult};
use crate::tables::{BoundaryTables, SHAD};

/// One numbered sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sentence {
    /// Position in the document, starting at 1.
    pub seq: usize,
    /// Sentence text including its closing shad marks.
    pub sentence: String,
}

/// A sentence containing the term, split around the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    /// Sequence number of the sentence.
    pub seq: usize,
    /// Text before the term.
    pub before: String,
    /// The term as searched.
    pub term: String,
    /// Text after the term, starting with its particle or terminator.
    pub after: String,
}

/// Result of searching one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// Every non-blank sentence of the document.
    pub content: Vec<Sentence>,
    /// Sequence numbers of the sentences containing the term.
    pub seq: Vec<usize>,
    /// Matching sentences split around the term.
    pub hits: Vec<SearchHit>,
}

/// Compiled search for one term.
#[derive(Debug, Clone)]
pub struct TermSearch {
    term: String,
    pattern: Regex,
}

impl TermSearch {
    /// Compile a search for `term`.
    ///
    /// One trailing terminator is removed from the term first. Fails with
    /// [`StatError::EmptyTerm`] when nothing is left.
    pub fn new(term: &str, tables: &BoundaryTables) -> StatResult<Self> {
        let term = term.trim();
        let term = term
            .strip_suffix(|c: char| tables.terminators.contains(&c))
            .unwrap_or(term);
        if term.is_empty() {
            return Err(StatError::EmptyTerm);
        }

        let particles = tables
            .suffix_particles
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let closers: String = tables
            .terminators
            .iter()
            .chain(std::iter::once(&' '))
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let pattern = if particles.is_empty() {
            format!("{}[{closers}]", regex::escape(term))
        } else {
            format!("{}(?:{particles})?[{closers}]", regex::escape(term))
        };

        Ok(Self {
            term: term.to_string(),
            pattern: Regex::new(&pattern)?,
        })
    }

    /// The term after trimming.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether `text` contains the term as a complete word.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Search every sentence of `text`.
    #[instrument(skip_all, fields(term = %self.term, len = text.len()))]
    pub fn run(&self, text: &str) -> SearchResult {
        let content = split_sentences(text);
        let mut result = SearchResult::default();

        for sentence in &content {
            let Some(found) = self.pattern.find(&sentence.sentence) else {
                continue;
            };
            let start = found.start();
            let end = start + self.term.len();
            result.seq.push(sentence.seq);
            result.hits.push(SearchHit {
                seq: sentence.seq,
                before: sentence.sentence[..start].to_string(),
                term: self.term.clone(),
                after: sentence.sentence[end..].to_string(),
            });
        }

        debug!(sentences = content.len(), hits = result.seq.len(), "search finished");
        result.content = content;
        result
    }
}

/// Cut `text` into sentences at shad runs and line breaks.
///
/// A shad run (shad marks possibly separated by spaces) stays attached to
/// the sentence it closes. Blank sentences are skipped and do not take a
/// sequence number.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut closing = false;

    let flush = |current: &mut String, sentences: &mut Vec<Sentence>| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            sentences.push(Sentence {
                seq: sentences.len() + 1,
                sentence: trimmed.to_string(),
            });
        }
        current.clear();
    };

    for ch in text.chars() {
        match ch {
            '\n' | '\r' => {
                flush(&mut current, &mut sentences);
                closing = false;
            }
            SHAD => {
                current.push(ch);
                closing = true;
            }
            ' ' if closing => current.push(ch),
            _ => {
                if closing {
                    flush(&mut current, &mut sentences);
                    closing = false;
                }
                current.push(ch);
            }
        }
    }
    flush(&mut current, &mut sentences);
    sentences
}

/// Search `text` for `term`.
pub fn search(text: &str, term: &str, tables: &BoundaryTables) -> StatResult<SearchResult> {
    Ok(TermSearch::new(term, tables)?.run(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> BoundaryTables {
        BoundaryTables::default()
    }

    #[test]
    fn splits_at_shad_runs_and_lines() {
        let sentences = split_sentences("བོད་ཡུལ། ། ཆེན་པོ།།\n\nབཀྲ་ཤིས");
        let texts: Vec<_> = sentences.iter().map(|s| s.sentence.as_str()).collect();
        assert_eq!(texts, ["བོད་ཡུལ། །", "ཆེན་པོ།།", "བཀྲ་ཤིས"]);
        let seqs: Vec<_> = sentences.iter().map(|s| s.seq).collect();
        assert_eq!(seqs, [1, 2, 3]);
    }

    #[test]
    fn blank_text_has_no_sentences() {
        assert!(split_sentences(" \n \r\n").is_empty());
    }

    #[test]
    fn finds_term_with_terminator() {
        let result = search("བོད་ཡུལ་ཆེན་པོ།\nཁ་བ་ཅན།\nཡུལ་ལྗོངས།", "ཡུལ་", &tables()).unwrap();
        assert_eq!(result.content.len(), 3);
        assert_eq!(result.seq, [1, 3]);
        assert_eq!(result.hits[0].before, "བོད་");
        assert_eq!(result.hits[0].term, "ཡུལ");
        assert_eq!(result.hits[0].after, "་ཆེན་པོ།");
    }

    #[test]
    fn accepts_suffix_particle_and_space() {
        let search = TermSearch::new("ཁབ", &tables()).unwrap();
        assert!(search.is_match("རྒྱལ་ཁབས་"));
        assert!(search.is_match("རྒྱལ་ཁབའི།"));
        assert!(search.is_match("རྒྱལ་ཁབ ཆེན"));
        assert!(!search.is_match("རྒྱལ་ཁབག་"));
        assert!(!search.is_match("རྒྱལ་ཁབ"));
    }

    #[test]
    fn trailing_shad_is_trimmed_from_term() {
        let search = TermSearch::new("ཡུལ།", &tables()).unwrap();
        assert_eq!(search.term(), "ཡུལ");
    }

    #[test]
    fn term_is_escaped() {
        let search = TermSearch::new("a.b", &tables()).unwrap();
        assert!(search.is_match("a.b་"));
        assert!(!search.is_match("axb་"));
    }

    #[test]
    fn empty_term_is_rejected() {
        assert!(matches!(TermSearch::new("་", &tables()), Err(StatError::EmptyTerm)));
        assert!(matches!(TermSearch::new("  ", &tables()), Err(StatError::EmptyTerm)));
    }
}
