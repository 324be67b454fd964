//! Tests for the commands that read the ledgers and reports on disk.

use std::fs;

use assert_cmd::prelude::*;
use indoc::indoc;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::util::no_cfg_netledger_command;

const USAGE_LEDGER: &str = indoc! {r#"
    {
        "2024-05": {
            "2024-05-01": {
                "sent_MB": 10.5,
                "recv_MB": 20.25
            },
            "2024-05-02": {
                "sent_MB": 1.0,
                "recv_MB": 2.0
            }
        }
    }
"#};

const SESSION_LEDGER: &str = indoc! {r#"
    {
        "2024-05-01": {
            "chrome.exe": {
                "hits": 2,
                "start": "10:00:00",
                "end": "10:00:10",
                "times": ["10:00:00", "10:00:10"]
            },
            "steam.exe": {
                "hits": 1,
                "start": "10:00:00",
                "end": "10:00:00",
                "times": ["10:00:00"]
            }
        }
    }
"#};

fn prepared_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data_usage_record.json"), USAGE_LEDGER).unwrap();
    fs::write(dir.path().join("app_usage_log.json"), SESSION_LEDGER).unwrap();
    dir
}

#[test]
fn test_export() {
    let dir = prepared_data_dir();
    let out = dir.path().join("exports");

    no_cfg_netledger_command(dir.path())
        .arg("export")
        .arg("--export_dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logs exported to"));

    let daily = fs::read_to_string(out.join("daily_usage.csv")).unwrap();
    assert_eq!(
        daily,
        "Date,Sent_MB,Received_MB,Total_MB\n2024-05-01,10.5,20.25,30.75\n2024-05-02,1,2,3\n"
    );

    let summary = fs::read_to_string(out.join("app_summary.csv")).unwrap();
    assert!(summary.contains("2024-05-01,chrome.exe,2,10:00:00,10:00:10,0.17"));
    assert!(out.join("app_log.csv").exists());
}

#[test]
fn test_export_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("exports");

    no_cfg_netledger_command(dir.path())
        .arg("export")
        .arg("--export_dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("No usage data found yet"));

    assert!(!out.join("daily_usage.csv").exists());
}

#[test]
fn test_totals() {
    let dir = prepared_data_dir();

    no_cfg_netledger_command(dir.path())
        .arg("totals")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-05-01  30.75 MB").and(
            predicate::str::contains("2024-05-02  3 MB"),
        ));
}

#[test]
fn test_corrupt_ledger_is_kept_aside() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data_usage_record.json"), "{ not json").unwrap();

    no_cfg_netledger_command(dir.path())
        .arg("totals")
        .assert()
        .success()
        .stdout(predicate::str::contains("No usage data found yet"));

    assert!(dir.path().join("data_usage_record.json.corrupt").exists());
}

#[test]
fn test_report_then_merge() {
    let dir = prepared_data_dir();
    let reports = dir.path().join("reports");
    fs::create_dir_all(&reports).unwrap();
    fs::write(reports.join("2024-05-01.txt"), "first\n").unwrap();

    no_cfg_netledger_command(dir.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily report written to"));

    no_cfg_netledger_command(dir.path())
        .arg("merge")
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 daily reports"));

    let merged = fs::read_to_string(reports.join("merged_report.txt")).unwrap();
    assert!(merged.starts_with("first\nDate: "));
}

#[test]
fn test_nothing_to_merge() {
    let dir = TempDir::new().unwrap();

    no_cfg_netledger_command(dir.path())
        .arg("merge")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to merge"));

    assert!(!dir.path().join("reports").join("merged_report.txt").exists());
}
