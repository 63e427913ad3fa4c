//! Boundary tables for Tibetan segmentation.
//!
//! The syllable and particle sets that decide whether a dictionary word
//! occurrence is a genuine word or a fragment of a longer syllable run.
//! They are plain data so deployments can tune them from configuration;
//! the defaults are the sets the corpus tool has always shipped with.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tsheg, the intersyllabic separator (U+0F0B).
pub const TSHEG: char = '\u{0F0B}';

/// Non-breaking tsheg (U+0F0C). Renders like [`TSHEG`] but is a distinct
/// code point; input text is normalized to [`TSHEG`].
pub const NON_BREAKING_TSHEG: char = '\u{0F0C}';

/// Shad, the clause/sentence terminator (U+0F0D).
pub const SHAD: char = '\u{0F0D}';

/// Marker prepended to every line before scanning.
///
/// It ends in a tsheg so a word at the start of a line sees a valid head.
pub const LINE_SENTINEL: &str = "->\u{0F0B}";

/// Data tables driving head/tail boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct BoundaryTables {
    /// Canonical syllable separator.
    pub separator: char,
    /// Look-alike separator rewritten to `separator` during preprocessing.
    pub confusable_separator: char,
    /// Characters that close a word: the separator and sentence-end marks.
    pub terminators: Vec<char>,
    /// Characters allowed immediately before a word.
    pub head_marks: Vec<char>,
    /// Case/ornamental suffix syllables that may follow a word before its terminator.
    pub suffix_particles: Vec<String>,
    /// Bare particles that attach directly to a preceding syllable.
    ///
    /// Matches of these skip head and tail validation and render underlined.
    pub bare_particles: Vec<String>,
    /// Punctuation-only tokens that never count as dictionary words.
    pub excluded_words: Vec<String>,
    /// Sentinel prepended to each line during scanning.
    pub line_sentinel: String,
}

impl Default for BoundaryTables {
    fn default() -> Self {
        Self {
            separator: TSHEG,
            confusable_separator: NON_BREAKING_TSHEG,
            terminators: vec![TSHEG, SHAD],
            // space, closing bracket, tsheg, shad, no-break space
            head_marks: vec![' ', ']', TSHEG, SHAD, '\u{00A0}'],
            suffix_particles: ["འི", "འུ", "འོ", "ས", "ར"]
                .into_iter()
                .map(String::from)
                .collect(),
            bare_particles: ["འི", "འུ", "འོ"].into_iter().map(String::from).collect(),
            excluded_words: [
                "་", "།", "།།", "༎", "༏", "༐", "༑", "༔", "༈", "༄", "༅", "༄༅", "༄༅།", "༄༅།།",
                "༼", "༽", "༺", "༻", "༴",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            line_sentinel: LINE_SENTINEL.to_string(),
        }
    }
}

impl BoundaryTables {
    /// Every string a word may be followed by to count as a complete word.
    ///
    /// The bare terminators come first, then each suffix particle joined with
    /// each terminator.
    pub fn tail_patterns(&self) -> Vec<String> {
        let mut tails: Vec<String> = self.terminators.iter().map(char::to_string).collect();
        for terminator in &self.terminators {
            for particle in &self.suffix_particles {
                tails.push(format!("{particle}{terminator}"));
            }
        }
        tails
    }

    /// Strings allowed before a word in the word-extend variant.
    pub fn extend_heads(&self) -> Vec<String> {
        self.terminators.iter().map(char::to_string).collect()
    }

    /// Whether `ch` may directly precede a word.
    pub fn is_head_mark(&self, ch: char) -> bool {
        self.head_marks.contains(&ch)
    }

    /// Whether `word` (separator already stripped) is an exempt bare particle.
    pub fn is_bare_particle(&self, word: &str) -> bool {
        self.bare_particles.iter().any(|p| p == word)
    }

    /// Whether `word` is a punctuation-only token that never counts.
    ///
    /// Compares both the word as given and the word with its trailing
    /// separator removed.
    pub fn is_excluded(&self, word: &str) -> bool {
        let stripped = self.strip_separator(word);
        self.excluded_words
            .iter()
            .any(|w| w == word || (!stripped.is_empty() && w == stripped))
    }

    /// Remove a single trailing separator, if present.
    pub fn strip_separator<'a>(&self, word: &'a str) -> &'a str {
        word.strip_suffix(self.separator).unwrap_or(word)
    }

    /// Append the separator unless the word already ends with one.
    pub fn with_separator(&self, word: &str) -> String {
        if word.ends_with(self.separator) {
            word.to_string()
        } else {
            format!("{word}{}", self.separator)
        }
    }
}

/// Whether `word` is written in Tibetan script.
///
/// Every character must lie in the Tibetan block and at least one must be a
/// letter or vowel sign, so marks and digits alone do not qualify.
pub fn is_tibetan_word(word: &str) -> bool {
    !word.is_empty()
        && word.chars().all(|c| ('\u{0F00}'..='\u{0FFF}').contains(&c))
        && word.chars().any(|c| ('\u{0F40}'..='\u{0FBC}').contains(&c))
}
