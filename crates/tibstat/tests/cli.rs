//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn info_json_contains_expected_fields() {
    cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\""))
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn info_help_shows_command_options() {
    cmd()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn verbose_flag_accepted() {
    cmd().args(["--verbose", "info"]).assert().success();
}

#[test]
fn short_verbose_flag_accepted() {
    cmd().args(["-v", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_auto_accepted() {
    cmd().args(["--color", "auto", "info"]).assert().success();
}

#[test]
fn color_always_accepted() {
    cmd().args(["--color", "always", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Fixtures
// =============================================================================

const DICTIONARY: &str = r#"[
    {"id": "w1", "word": "རྒྱལ་ཁབ་", "nature": "noun"},
    {"id": "w2", "word": "ཆེན་པོ་", "nature": "adj"}
]"#;

/// Write the test dictionary and return its path.
fn write_dictionary(dir: &Path) -> PathBuf {
    let path = dir.join("dict.json");
    fs::write(&path, DICTIONARY).unwrap();
    path
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn stdout_json(output: &assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).expect("command should output valid JSON")
}

// =============================================================================
// Segment Command
// =============================================================================

#[test]
fn segment_json_reports_rows_and_annotation() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let text = write_file(tmp.path(), "doc.txt", "རྒྱལ་ཁབ་ཆེན་པོ། རྒྱལ་ཁབ་");

    let output = cmd()
        .args(["segment", "--json", "-d"])
        .arg(&dict)
        .arg(&text)
        .assert()
        .success();

    let json = stdout_json(&output);
    let first = &json[0];
    assert_eq!(first["status"], 1);
    assert_eq!(first["result"]["rows"][0]["id"], "w1");
    assert_eq!(first["result"]["rows"][0]["count"], 2);
    assert_eq!(first["result"]["rows"][0]["colour"], 0);
    assert!(
        first["result"]["annotated_text"]
            .as_str()
            .unwrap()
            .starts_with("[w1]་[w2]།")
    );
}

#[test]
fn segment_text_output_lists_words() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let text = write_file(tmp.path(), "doc.txt", "རྒྱལ་ཁབ་ཆེན་པོ།");

    cmd()
        .args(["--color", "never", "segment", "-d"])
        .arg(&dict)
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains("རྒྱལ་ཁབ་"))
        .stdout(predicate::str::contains("noun"));
}

#[test]
fn segment_extend_algorithm_accepted() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let text = write_file(tmp.path(), "doc.txt", "རྒྱལ་ཁབ་ཆེན་པོ།");

    let output = cmd()
        .args(["segment", "--json", "--algorithm", "extend", "-d"])
        .arg(&dict)
        .arg(&text)
        .assert()
        .success();
    assert_eq!(stdout_json(&output)[0]["result"]["annotated_text"], "[w1]་[w2]།");
}

#[test]
fn segment_uses_dictionary_from_config() {
    let tmp = TempDir::new().unwrap();
    write_dictionary(tmp.path());
    write_file(tmp.path(), ".tibstat.toml", r#"dictionary = "dict.json""#);
    write_file(tmp.path(), "doc.txt", "ཆེན་པོ།");

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "segment", "--json", "doc.txt"])
        .assert()
        .success();
    assert_eq!(stdout_json(&output)[0]["result"]["rows"][0]["id"], "w2");
}

#[test]
fn segment_without_dictionary_fails() {
    let tmp = TempDir::new().unwrap();
    let text = write_file(tmp.path(), "doc.txt", "རྒྱལ་ཁབ།");

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "segment"])
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dictionary given"));
}

#[test]
fn segment_blank_file_has_no_rows() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let text = write_file(tmp.path(), "blank.txt", "  \n");

    let output = cmd()
        .args(["segment", "--json", "-d"])
        .arg(&dict)
        .arg(&text)
        .assert()
        .success();
    let json = stdout_json(&output);
    assert_eq!(json[0]["status"], 1);
    assert!(json[0]["result"]["rows"].as_array().unwrap().is_empty());
}

#[test]
fn segment_rejects_zero_buckets() {
    cmd()
        .args(["segment", "doc.txt", "--buckets", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn segment_keeps_going_past_an_unreadable_file() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let good = write_file(tmp.path(), "good.txt", "རྒྱལ་ཁབ་ཆེན་པོ།");
    let bad = tmp.path().join("bad.txt");
    fs::write(&bad, [0xff, 0xfe, 0x00]).unwrap();

    let output = cmd()
        .args(["segment", "--json", "-d"])
        .arg(&dict)
        .arg(&bad)
        .arg(&good)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 files failed"));
    let json = stdout_json(&output);
    assert_eq!(json[0]["status"], 2);
    assert!(json[0]["error"].as_str().unwrap().contains("failed to read"));
    assert_eq!(json[1]["status"], 1);
    assert_eq!(json[1]["result"]["annotated_text"], "[w1]་[w2]།");
}

// =============================================================================
// Summary Command
// =============================================================================

#[test]
fn summary_sums_saved_results() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let one = write_file(tmp.path(), "one.txt", "རྒྱལ་ཁབ་ཆེན་པོ།");
    let two = write_file(tmp.path(), "two.txt", "རྒྱལ་ཁབ།");
    let out = tmp.path().join("out");

    cmd()
        .args(["segment", "--json", "-d"])
        .arg(&dict)
        .arg(&one)
        .arg(&two)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success();
    assert!(out.join("one.annotated.txt").is_file());
    assert!(out.join("two.export.txt").is_file());

    let output = cmd()
        .args(["summary", "--json"])
        .arg(out.join("one.result.json"))
        .arg(out.join("two.result.json"))
        .assert()
        .success();
    let json = stdout_json(&output);
    assert_eq!(json["rows"][0]["id"], "w1");
    assert_eq!(json["rows"][0]["count"], 2);
    assert_eq!(json["rows"][1]["count"], 1);
    assert!(json["chart"].is_object());
}

#[test]
fn summary_of_nothing_fails() {
    let tmp = TempDir::new().unwrap();
    let failed = write_file(tmp.path(), "failed.json", r#"{"status": 2}"#);

    cmd()
        .arg("summary")
        .arg(&failed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to summarize"));
}

// =============================================================================
// Tally Command
// =============================================================================

#[test]
fn tally_counts_space_separated_words() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let text = write_file(tmp.path(), "seg.txt", "རྒྱལ་ཁབ་ ཆེན་པོ་ རྒྱལ་ཁབ་ ཡིན་");

    let output = cmd()
        .args(["tally", "--json", "-d"])
        .arg(&dict)
        .arg(&text)
        .assert()
        .success();
    let json = stdout_json(&output);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["word"], "རྒྱལ་ཁབ་");
    assert_eq!(rows[0]["count"], 2);
}

// =============================================================================
// Words Command
// =============================================================================

#[test]
fn words_lists_only_new_words() {
    let tmp = TempDir::new().unwrap();
    let dict = write_dictionary(tmp.path());
    let text = write_file(tmp.path(), "seg.txt", "རྒྱལ་ཁབ་ ཡིན་ ། ཆེན་པོ་ ཡིན་\nབོད་");

    cmd()
        .args(["words", "-d"])
        .arg(&dict)
        .arg(&text)
        .assert()
        .success()
        .stdout("ཡིན་\nབོད་\n");
}

#[test]
fn words_all_json_needs_no_dictionary() {
    let tmp = TempDir::new().unwrap();
    let text = write_file(tmp.path(), "seg.txt", "རྒྱལ་ཁབ་ ཡིན་ abc རྒྱལ་ཁབ་");

    let output = cmd()
        .args(["words", "--json", "--select", "all"])
        .arg(&text)
        .assert()
        .success();
    assert_eq!(stdout_json(&output), serde_json::json!(["རྒྱལ་ཁབ་", "ཡིན་"]));
}

// =============================================================================
// Colour Command
// =============================================================================

#[test]
fn colour_buckets_counts() {
    let output = cmd()
        .args(["colour", "--json", "3", "2", "1"])
        .assert()
        .success();
    let json = stdout_json(&output);
    assert_eq!(json["colours"]["3"], 0);
    assert_eq!(json["colours"]["2"], 2);
    assert_eq!(json["colours"]["1"], 4);
    assert_eq!(json["step_mode"], "fractional");
}

#[test]
fn colour_requires_counts() {
    cmd().arg("colour").assert().failure();
}

// =============================================================================
// Search Command
// =============================================================================

#[test]
fn search_reports_matching_sentences() {
    let tmp = TempDir::new().unwrap();
    let text = write_file(tmp.path(), "doc.txt", "བོད་ཡུལ་ཆེན་པོ།\nཁ་བ་ཅན་གྱི་ཡུལ།");

    let output = cmd()
        .args(["search", "--json"])
        .arg(&text)
        .arg("ཁ་བ")
        .assert()
        .success();
    let json = stdout_json(&output);
    assert_eq!(json["seq"], serde_json::json!([2]));
    assert_eq!(json["content"].as_array().unwrap().len(), 2);
}

#[test]
fn search_enforces_input_limit() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), ".tibstat.toml", "max_input_bytes = 4\n");
    write_file(tmp.path(), "doc.txt", "བོད་ཡུལ་ཆེན་པོ།");

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "search", "doc.txt", "བོད"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    // The -C flag should be accepted and work without error
    // We use a path that definitely exists
    cmd().args(["-C", "/tmp", "info"]).assert().success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
