//! Integration tests for the nada binary.
//!
//! These tests verify end-to-end behavior including:
//! - Marking days and the once-per-day rule
//! - Streak and history reporting
//! - Deletion, export and seeding

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary pinned to UTC
///
/// The config home points at an empty directory so a developer's own
/// `~/.config/nada/config.toml` never leaks into the results.
fn cli() -> Command {
    let home = std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("nada-empty-home");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nada"));
    cmd.env("TZ", "UTC")
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("HOME", &home);
    cmd
}

/// Run `nada mark` in `data_dir` at the given instant
fn mark_at(data_dir: &Path, now: &str) -> assert_cmd::assert::Assert {
    cli()
        .arg("mark")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg(now)
        .assert()
}

fn entry_ids(data_dir: &Path) -> Vec<String> {
    let content = fs::read_to_string(data_dir.join("entries.jsonl")).expect("Failed to read entries");
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let value: serde_json::Value = serde_json::from_str(l).expect("valid JSON line");
            value["id"].as_str().expect("id").to_string()
        })
        .collect()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("A log for days spent doing nothing"));
}

#[test]
fn test_mark_creates_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-15T12:00:00Z")
        .success()
        .stdout(predicate::str::contains("Marked today"))
        .stdout(predicate::str::contains("Current streak: 1 day(s)"));

    assert_eq!(entry_ids(data_dir).len(), 1);
}

#[test]
fn test_mark_with_note() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["mark", "--note", "stared at the ceiling", "--now", "2026-10-15T12:00:00Z"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-10-15 12:00"))
        .stdout(predicate::str::contains("stared at the ceiling"));
}

#[test]
fn test_second_mark_same_day_is_refused() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-15T08:00:00Z").success();
    mark_at(data_dir, "2026-10-15T20:00:00Z")
        .success()
        .stdout(predicate::str::contains("Already marked today"));

    assert_eq!(entry_ids(data_dir).len(), 1);
}

#[test]
fn test_consecutive_marks_build_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-13T12:00:00Z").success();
    mark_at(data_dir, "2026-10-14T12:00:00Z").success();
    mark_at(data_dir, "2026-10-15T12:00:00Z")
        .success()
        .stdout(predicate::str::contains("Current streak: 3 day(s)"));

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg("2026-10-15T18:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 3 day(s)"))
        .stdout(predicate::str::contains("Longest streak: 3 day(s)"))
        .stdout(predicate::str::contains("You're on fire!"))
        .stdout(predicate::str::contains("Already marked today"))
        .stdout(predicate::str::contains("Next day starts in 06h 00m 00s"));
}

#[test]
fn test_status_after_broken_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-01T12:00:00Z").success();
    mark_at(data_dir, "2026-10-02T12:00:00Z").success();

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg("2026-10-15T12:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 0 day(s)"))
        .stdout(predicate::str::contains("Longest streak: 2 day(s)"))
        .stdout(predicate::str::contains("Today is not marked yet"));
}

#[test]
fn test_seventh_day_unlocks_achievement() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for day in 9..15 {
        mark_at(data_dir, &format!("2026-10-{:02}T12:00:00Z", day)).success();
    }

    mark_at(data_dir, "2026-10-15T12:00:00Z")
        .success()
        .stdout(predicate::str::contains("Achievement unlocked"))
        .stdout(predicate::str::contains("7 Day Streak"));
}

#[test]
fn test_history_weekly_and_monthly() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Mon 2026-09-28, Tue 09-29, Thu 10-01, Mon 10-05
    for now in [
        "2026-09-28T12:00:00Z",
        "2026-09-29T12:00:00Z",
        "2026-10-01T12:00:00Z",
        "2026-10-05T12:00:00Z",
    ] {
        mark_at(data_dir, now).success();
    }

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg("2026-10-15T12:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-09-28    3  ###"))
        .stdout(predicate::str::contains("2026-10-05    1  #"))
        .stdout(predicate::str::contains("Total days: 4"))
        .stdout(predicate::str::contains("This month: 2"));

    cli()
        .args(["history", "--granularity", "monthly"])
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg("2026-10-15T12:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly overview"))
        .stdout(predicate::str::contains("2026-09-01    2  ##"))
        .stdout(predicate::str::contains("2026-10-01    2  ##"));
}

#[test]
fn test_history_rejects_unknown_granularity() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["history", "--granularity", "daily"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown granularity"));
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No history yet"));
}

#[test]
fn test_delete_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-14T12:00:00Z").success();
    mark_at(data_dir, "2026-10-15T12:00:00Z").success();
    let ids = entry_ids(data_dir);

    cli()
        .arg("delete")
        .arg(&ids[1])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry"));

    assert_eq!(entry_ids(data_dir), vec![ids[0].clone()]);

    // Deleting today's mark allows marking again
    mark_at(data_dir, "2026-10-15T10:00:00Z")
        .success()
        .stdout(predicate::str::contains("Marked today"))
        .stdout(predicate::str::contains("Current streak: 2 day(s)"));
}

#[test]
fn test_delete_unknown_entry_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["delete", "00000000-0000-0000-0000-000000000000"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();

    cli()
        .args(["delete", "not-a-uuid"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_export_entries_and_buckets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-14T12:00:00Z").success();
    mark_at(data_dir, "2026-10-15T12:00:00Z").success();

    let entries_csv = data_dir.join("export/entries.csv");
    cli()
        .arg("export")
        .arg("--output")
        .arg(&entries_csv)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 entries"));

    let content = fs::read_to_string(&entries_csv).expect("Failed to read CSV");
    assert!(content.starts_with("id,timestamp,note"));
    assert_eq!(content.lines().count(), 3);

    let buckets_csv = data_dir.join("export/monthly.csv");
    cli()
        .args(["export", "--buckets", "monthly", "--output"])
        .arg(&buckets_csv)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 monthly buckets"));

    let content = fs::read_to_string(&buckets_csv).expect("Failed to read CSV");
    assert_eq!(content, "start,count\n2026-10-01T00:00:00+00:00,2\n");
}

#[test]
fn test_seed_and_refuse_overwrite() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["seed", "--now", "2026-10-15T09:00:00Z"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 30 days"));

    cli()
        .args(["status", "--now", "2026-10-15T10:00:00Z"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 30 day(s)"))
        .stdout(predicate::str::contains("Legendary!"));

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("use --force"));

    assert_eq!(entry_ids(data_dir).len(), 30);
}

#[test]
fn test_watch_with_simulated_clock() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    mark_at(data_dir, "2026-10-14T12:00:00Z").success();
    mark_at(data_dir, "2026-10-15T12:00:00Z").success();

    // Refreshes at 15th 20:00, 16th 00:00 and 17th 00:00
    let output = cli()
        .args(["watch", "--cycles", "3", "--now", "2026-10-15T20:00:00Z"])
        .arg("--data-dir")
        .arg(data_dir)
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("utf8 output");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("current=2"));
    assert!(lines[1].starts_with("[2026-10-16 00:00]"));
    assert!(lines[1].contains("current=2"));
    assert!(lines[2].contains("current=0"));
    assert!(lines[2].contains("longest=2"));
}
