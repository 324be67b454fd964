//! These tests are mostly here just to ensure that invalid results will be
//! caught when passing arguments.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::util::{netledger_command, no_cfg_netledger_command};

#[test]
fn test_small_interval() {
    let dir = TempDir::new().unwrap();

    no_cfg_netledger_command(dir.path())
        .arg("-r")
        .arg("250")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval to be at least 1s"));
}

#[test]
fn test_invalid_interval() {
    let dir = TempDir::new().unwrap();

    no_cfg_netledger_command(dir.path())
        .arg("-r")
        .arg("whenever")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'--interval' was set with an invalid value",
        ));
}

#[test]
fn test_invalid_limit() {
    let dir = TempDir::new().unwrap();

    no_cfg_netledger_command(dir.path())
        .arg("-l")
        .arg("lots")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'--limit' was set with an invalid value",
        ));
}

#[test]
fn test_invalid_limit_from_env() {
    let dir = TempDir::new().unwrap();

    no_cfg_netledger_command(dir.path())
        .env("NETLEDGER_LIMIT_MB", "NaN")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'--limit' was set with an invalid value",
        ));
}

#[test]
fn test_unknown_command() {
    netledger_command(&["explode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_version() {
    netledger_command(&["-V"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_commands() {
    netledger_command(&["--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("export")
                .and(predicate::str::contains("merge"))
                .and(predicate::str::contains("--interface")),
        );
}
