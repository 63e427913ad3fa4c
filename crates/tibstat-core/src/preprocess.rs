//! Source text preparation before scanning.
//!
//! Tibetan has no inter-word spaces, so any spaces in a document are layout
//! noise and are removed. The non-breaking tsheg is folded into the regular
//! tsheg, and every line is framed with the line sentinel so a word at the
//! start of a line still passes the head-boundary check.

use crate::tables::BoundaryTables;

/// Remove spaces and fold the confusable separator into the canonical one.
///
/// Idempotent: normalizing already-normalized text returns it unchanged.
pub fn normalize(source: &str, tables: &BoundaryTables) -> String {
    source
        .chars()
        .filter(|&c| c != ' ')
        .map(|c| {
            if c == tables.confusable_separator {
                tables.separator
            } else {
                c
            }
        })
        .collect()
}

/// Prefix every line with the sentinel and rejoin with `\n`.
pub fn frame_lines(text: &str, tables: &BoundaryTables) -> String {
    let sentinel = tables.line_sentinel.as_str();
    text.lines()
        .map(|line| format!("{sentinel}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize and frame `source`, producing the text the segmenter scans.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn prepare(source: &str, tables: &BoundaryTables) -> String {
    frame_lines(&normalize(source, tables), tables)
}

/// Remove every sentinel inserted by [`frame_lines`].
pub fn strip_sentinels(text: &str, tables: &BoundaryTables) -> String {
    if tables.line_sentinel.is_empty() {
        return text.to_string();
    }
    text.replace(tables.line_sentinel.as_str(), "")
}
