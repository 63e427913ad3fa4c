//! Error types for tibstat-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while segmenting, counting, or searching text.
///
/// The segmenter itself degrades to an empty result for empty text or an
/// empty pool; these variants cover the faults that callers map to a failed
/// work status.
#[derive(Error, Debug)]
pub enum StatError {
    /// The input has no countable content.
    #[error("no countable text in input")]
    EmptyInput,

    /// The dictionary could not be parsed.
    #[error("invalid dictionary: {0}")]
    Dictionary(#[from] serde_json::Error),

    /// The multi-pattern matcher could not be built from the word pool.
    #[error("failed to build word matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),

    /// A search term produced an invalid pattern.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A search term was empty after trimming terminators.
    #[error("search term is empty")]
    EmptyTerm,
}

/// Result type alias using [`StatError`].
pub type StatResult<T> = Result<T, StatError>;
