//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use owo_colors::{OwoColorize, Style};
use tibstat_core::{BoundaryTables, FrequencyRow, WordPool};

pub mod colour;
pub mod info;
pub mod search;
pub mod segment;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod summary;
pub mod tally;
pub mod words;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Pick the dictionary from the flag or the configuration.
pub fn dictionary_path(
    flag: Option<Utf8PathBuf>,
    configured: Option<&Utf8PathBuf>,
) -> anyhow::Result<Utf8PathBuf> {
    flag.or_else(|| configured.cloned()).context(
        "no dictionary given: pass --dictionary or set `dictionary` in the configuration",
    )
}

/// Load a dictionary file into a word pool.
pub fn load_pool(path: &Utf8Path, tables: &BoundaryTables) -> anyhow::Result<WordPool> {
    let json = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read dictionary {path}"))?;
    let pool = WordPool::from_json(&json, tables)
        .with_context(|| format!("failed to parse dictionary {path}"))?;
    tracing::debug!(dictionary = %path, entries = pool.len(), "dictionary loaded");
    Ok(pool)
}

/// Terminal style for a colour bucket, hottest first.
fn bucket_style(bucket: u8) -> Style {
    match bucket {
        0 => Style::new().red().bold(),
        1 => Style::new().red(),
        2 => Style::new().yellow(),
        3 => Style::new().green(),
        4 => Style::new().cyan(),
        _ => Style::new().blue(),
    }
}

/// Print frequency rows as an aligned table.
pub fn print_rows(rows: &[FrequencyRow]) {
    if rows.is_empty() {
        println!("{}", "no dictionary words found".dimmed());
        return;
    }
    let width = rows.iter().map(|r| r.word.chars().count()).max().unwrap_or(0);
    for row in rows {
        let pad = width.saturating_sub(row.word.chars().count());
        let word = if row.is_underline {
            row.word.underline().to_string()
        } else {
            row.word.clone()
        };
        println!(
            "{}{}  {:>6}  {}  {}  {}",
            word,
            " ".repeat(pad),
            row.count.style(bucket_style(row.colour)),
            format!("c{}", row.colour).style(bucket_style(row.colour)),
            row.category.dimmed(),
            row.id.dimmed(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_input_file_enforces_limit() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("in.txt")).unwrap();
        fs::write(&path, "བོད་ཡུལ།").unwrap();

        assert!(read_input_file(&path, None).is_ok());
        assert!(read_input_file(&path, Some(1024)).is_ok());
        let err = read_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn dictionary_flag_wins_over_config() {
        let configured = Utf8PathBuf::from("config.json");
        let picked = dictionary_path(Some("flag.json".into()), Some(&configured)).unwrap();
        assert_eq!(picked, "flag.json");
        let picked = dictionary_path(None, Some(&configured)).unwrap();
        assert_eq!(picked, "config.json");
        assert!(dictionary_path(None, None).is_err());
    }

    #[test]
    fn load_pool_reports_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("dict.json")).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(load_pool(&path, &BoundaryTables::default()).is_err());

        fs::write(&path, r#"[{"id": "w1", "word": "བོད་", "nature": "noun"}]"#).unwrap();
        assert_eq!(load_pool(&path, &BoundaryTables::default()).unwrap().len(), 1);
    }
}
