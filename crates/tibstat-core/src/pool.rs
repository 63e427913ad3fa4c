//! Dictionary word pool.
//!
//! A [`WordPool`] is a snapshot of the dictionary entries taking part in one
//! segmentation run, ordered longest word first so that the longer of two
//! words starting at the same position is tried first.

use std::cmp::Reverse;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StatResult;
use crate::tables::BoundaryTables;

/// One dictionary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DictionaryEntry {
    /// Opaque dictionary identifier, emitted as `[id]` in annotated text.
    pub id: String,
    /// Syllables joined by tsheg; the trailing tsheg is optional.
    pub word: String,
    /// Grammatical category tag.
    #[serde(alias = "nature")]
    pub category: String,
}

impl DictionaryEntry {
    /// Create an entry from its parts.
    pub fn new(id: impl Into<String>, word: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            category: category.into(),
        }
    }
}

/// A dictionary record as delivered by the dictionary store.
///
/// Every field is optional so one malformed record does not reject the
/// whole dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawEntry {
    /// Identifier.
    pub id: Option<String>,
    /// Word text.
    pub word: Option<String>,
    /// Category tag (also accepted as `nature`).
    #[serde(alias = "nature")]
    pub category: Option<String>,
    /// Entries flagged as excluded are dropped.
    #[serde(default)]
    pub is_exclude: bool,
}

/// Ordered, read-only collection of dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    entries: Vec<DictionaryEntry>,
}

impl WordPool {
    /// Build a pool, sorting by descending word length in code points.
    ///
    /// The sort is stable, so entries of equal length keep their input order.
    pub fn new(mut entries: Vec<DictionaryEntry>) -> Self {
        entries.sort_by_key(|e| Reverse(e.word.chars().count()));
        Self { entries }
    }

    /// Build a pool from raw store records, skipping unusable ones.
    ///
    /// A record is skipped when its `id` or `word` is missing or blank, when
    /// it is flagged `is_exclude`, when its word is empty once the trailing
    /// separator is removed, or when the word is an excluded punctuation
    /// token.
    #[tracing::instrument(skip_all)]
    pub fn from_raw<I>(raw: I, tables: &BoundaryTables) -> Self
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut entries = Vec::new();
        let mut skipped = 0usize;

        for (position, record) in raw.into_iter().enumerate() {
            if record.is_exclude {
                debug!(position, "skipping excluded dictionary entry");
                skipped += 1;
                continue;
            }
            let id = record.id.as_deref().map(str::trim).unwrap_or_default();
            let word = record.word.as_deref().map(str::trim).unwrap_or_default();
            if id.is_empty() || word.is_empty() {
                warn!(position, "dictionary entry is missing id or word");
                skipped += 1;
                continue;
            }
            if tables.strip_separator(word).is_empty() || tables.is_excluded(word) {
                debug!(position, word, "skipping punctuation-only dictionary entry");
                skipped += 1;
                continue;
            }
            let category = record.category.as_deref().map(str::trim).unwrap_or_default();
            entries.push(DictionaryEntry::new(id, word, category));
        }

        debug!(kept = entries.len(), skipped, "word pool built");
        Self::new(entries)
    }

    /// Parse a JSON array of dictionary records.
    pub fn from_json(json: &str, tables: &BoundaryTables) -> StatResult<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw, tables))
    }

    /// Entries in scan order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Entry at `index` in scan order.
    pub fn get(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in scan order.
    pub fn iter(&self) -> std::slice::Iter<'_, DictionaryEntry> {
        self.entries.iter()
    }

    /// First entry whose word equals `word` exactly.
    pub fn find_word(&self, word: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|e| e.word == word)
    }
}

impl FromIterator<DictionaryEntry> for WordPool {
    fn from_iter<T: IntoIterator<Item = DictionaryEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a WordPool {
    type Item = &'a DictionaryEntry;
    type IntoIter = std::slice::Iter<'a, DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_longest_first_by_code_points() {
        let pool = WordPool::new(vec![
            DictionaryEntry::new("a", "ཀ་", "n"),
            DictionaryEntry::new("b", "ཀ་ཁ་ག་", "n"),
            DictionaryEntry::new("c", "ཀ་ཁ་", "n"),
        ]);
        let ids: Vec<_> = pool.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn equal_lengths_keep_input_order() {
        let pool = WordPool::new(vec![
            DictionaryEntry::new("first", "ཀ་ཁ་", "n"),
            DictionaryEntry::new("second", "ག་ང་", "n"),
        ]);
        assert_eq!(pool.get(0).unwrap().id, "first");
        assert_eq!(pool.get(1).unwrap().id, "second");
    }

    #[test]
    fn length_is_code_points_not_bytes() {
        // "ab" is 2 bytes and 2 chars; "ཀ" is 3 bytes but 1 char
        let pool = WordPool::new(vec![
            DictionaryEntry::new("tib", "ཀ", "n"),
            DictionaryEntry::new("lat", "ab", "n"),
        ]);
        assert_eq!(pool.get(0).unwrap().id, "lat");
    }

    #[test]
    fn from_json_skips_malformed_entries() {
        let json = r#"[
            {"id": "w1", "word": "རྒྱལ་ཁབ་", "nature": "noun"},
            {"word": "ཆེན་པོ་", "category": "adj"},
            {"id": "w3", "category": "adj"},
            {"id": "w4", "word": "  ", "category": "adj"},
            {"id": "w5", "word": "བོད་", "category": "noun", "is_exclude": true},
            {"id": "w6", "word": "།", "category": "punct"},
            {"id": "w7", "word": "བཀྲ་ཤིས་"}
        ]"#;
        let pool = WordPool::from_json(json, &BoundaryTables::default()).unwrap();
        let ids: Vec<_> = pool.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["w1", "w7"]);
        assert_eq!(pool.get(0).unwrap().category, "noun");
        assert_eq!(pool.get(1).unwrap().category, "");
    }

    #[test]
    fn from_json_rejects_non_array() {
        let result = WordPool::from_json(r#"{"id": "w1"}"#, &BoundaryTables::default());
        assert!(result.is_err());
    }

    #[test]
    fn empty_pool_is_valid() {
        let pool = WordPool::from_json("[]", &BoundaryTables::default()).unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn find_word_is_exact() {
        let pool: WordPool = [DictionaryEntry::new("w1", "བོད་", "noun")]
            .into_iter()
            .collect();
        assert!(pool.find_word("བོད་").is_some());
        assert!(pool.find_word("བོད").is_none());
    }
}
