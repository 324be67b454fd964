//! These tests are for testing some invalid config-file-specific options.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::util::netledger_command;

fn with_config(config: &str, data_dir: &TempDir) -> std::process::Command {
    let mut cmd = netledger_command(&["-C", config]);
    cmd.arg("--data_dir").arg(data_dir.path()).arg("totals");
    cmd
}

#[test]
fn test_toml_mismatch_type() {
    let dir = TempDir::new().unwrap();

    with_config("./tests/invalid_configs/toml_mismatch_type.toml", &dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid type"));
}

#[test]
fn test_invalid_interval() {
    let dir = TempDir::new().unwrap();

    with_config("./tests/invalid_configs/invalid_interval.toml", &dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'interval' was set with an invalid value",
        ));
}

#[test]
fn test_negative_limit() {
    let dir = TempDir::new().unwrap();

    with_config("./tests/invalid_configs/negative_limit.toml", &dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'daily_limit_mb' was set with an invalid value",
        ));
}

#[test]
fn test_zero_enumerator_timeout() {
    let dir = TempDir::new().unwrap();

    with_config("./tests/invalid_configs/zero_enumerator_timeout.toml", &dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'enumerator_timeout' was set with an invalid value",
        ));
}

/// This test isn't really needed as the TOML parser already rejects this.
/// However, it is worth checking anyways.
#[test]
fn test_duplicate_key() {
    let dir = TempDir::new().unwrap();

    with_config("./tests/invalid_configs/duplicate_key.toml", &dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate key"));
}

#[test]
fn test_missing_config_is_created() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config").join("netledger.toml");

    netledger_command(&[])
        .arg("-C")
        .arg(&config)
        .arg("--data_dir")
        .arg(dir.path())
        .arg("totals")
        .assert()
        .success();

    assert!(config.exists());
}
