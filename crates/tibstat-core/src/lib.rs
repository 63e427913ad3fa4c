//! Core library for tibstat.
//!
//! Dictionary-driven segmentation of unspaced Tibetan text, word frequency
//! counting, and rank-based heat colouring of the counts. Everything here is
//! synchronous and free of global state; the `tibstat` CLI and MCP server are
//! thin layers over these modules.
//!
//! # Modules
//!
//! - [`pool`] - Dictionary entries ordered for longest-first matching
//! - [`tables`] - Separator, terminator and particle tables
//! - [`preprocess`] - Text normalisation and line framing
//! - [`segment`] - Boundary-scan segmentation (default)
//! - [`extend`] - Word-extend segmentation variant
//! - [`colour`] - Rank-based colour buckets
//! - [`report`] - Frequency rows, annotated results, plain-text export
//! - [`work`] - Job boundary with success/failure status
//! - [`tally`] - Counting and word lists over already segmented text
//! - [`summary`] - Aggregation of several results
//! - [`search`] - Sentence-level term search
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use tibstat_core::{Colourizer, DictionaryEntry, Segmenter, BoundaryTables, WordPool};
//!
//! let pool: WordPool = [
//!     DictionaryEntry::new("w1", "རྒྱལ་ཁབ་", "noun"),
//!     DictionaryEntry::new("w2", "ཆེན་པོ་", "adj"),
//! ]
//! .into_iter()
//! .collect();
//! let tables = BoundaryTables::default();
//!
//! let result = Segmenter::new(&pool, &tables)
//!     .run("རྒྱལ་ཁབ་ཆེན་པོ།", &Colourizer::default())
//!     .unwrap();
//! assert_eq!(result.annotated_text, "[w1]་[w2]།");
//! ```
#![deny(unsafe_code)]

pub mod colour;
pub mod config;
pub mod error;
pub mod extend;
pub mod pool;
pub mod preprocess;
pub mod report;
pub mod search;
pub mod segment;
pub mod summary;
pub mod tables;
pub mod tally;
pub mod work;

/// Default maximum input size: 5 MiB.
///
/// Applied by the CLI and MCP server unless the configuration raises or
/// disables it.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use colour::{ColourMap, Colourizer, StepMode};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{ConfigError, ConfigResult, StatError, StatResult};
pub use extend::ExtendSegmenter;
pub use pool::{DictionaryEntry, RawEntry, WordPool};
pub use report::{AnnotatedResult, FrequencyRow};
pub use search::{SearchResult, TermSearch};
pub use segment::Segmenter;
pub use summary::Summary;
pub use tables::BoundaryTables;
pub use tally::WordSelection;
pub use work::{Algorithm, SegmentOptions, WorkOutcome, WorkStatus, run_work};
