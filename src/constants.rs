use std::time::Duration;

use indoc::indoc;

// File names.
pub const USAGE_LEDGER_FILE: &str = "data_usage_record.json";
pub const SESSION_LEDGER_FILE: &str = "app_usage_log.json";
pub const REPORT_DIR_NAME: &str = "reports";
pub const MERGED_REPORT_FILE: &str = "merged_report.txt";
pub const LOG_FILE_NAME: &str = "netledger.log";

pub const DAILY_USAGE_CSV: &str = "daily_usage.csv";
pub const APP_LOG_CSV: &str = "app_log.csv";
pub const APP_SUMMARY_CSV: &str = "app_summary.csv";

// Config and data locations, relative to the platform config/data directories.
pub const DEFAULT_CONFIG_FILE_LOCATION: &str = "netledger/netledger.toml";
pub const DEFAULT_DATA_DIR_NAME: &str = "netledger";

// Collection defaults.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_ENUMERATOR_TIMEOUT: Duration = Duration::from_secs(5);

/// The smallest tick interval accepted.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_secs(1);

cfg_if::cfg_if! {
    if #[cfg(target_os = "windows")] {
        pub const DEFAULT_INTERFACE: &str = "Wi-Fi";
    } else if #[cfg(target_os = "macos")] {
        pub const DEFAULT_INTERFACE: &str = "en0";
    } else {
        pub const DEFAULT_INTERFACE: &str = "wlan0";
    }
}

// Environment overrides.
pub const ENV_INTERFACE: &str = "NETLEDGER_INTERFACE";
pub const ENV_LIMIT_MB: &str = "NETLEDGER_LIMIT_MB";
pub const ENV_INTERVAL: &str = "NETLEDGER_INTERVAL";
pub const ENV_DATA_DIR: &str = "NETLEDGER_DATA_DIR";

/// Written to the config location if no config file exists yet.
pub const CONFIG_TEXT: &str = indoc! {r#"
    # This is a default config file for netledger. All of the settings are commented
    # out by default; if you wish to change them, uncomment and modify as you see fit.

    [collector]
    # The network interface to sample, e.g. "Wi-Fi", "eth0", or "en0".
    # Run `netledger --list_interfaces` to see what is available.
    #interface = "wlan0"
    # How often to sample. Takes milliseconds or a human duration such as "10s".
    #interval = "10s"
    # How long to wait for the connection listing before giving up on a tick.
    #enumerator_timeout = "5s"

    [alert]
    # Warn when the day's total (sent + received) goes over this many MB.
    #daily_limit_mb = 1024

    [storage]
    # Where the usage and application ledgers are kept.
    #data_dir = "/path/to/data"
    # Where daily reports are written. Defaults to a "reports" directory in the data directory.
    #report_dir = "/path/to/reports"
"#};

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::Config;

    #[test]
    fn default_config_text_parses() {
        let config: Config = toml_edit::de::from_str(CONFIG_TEXT).unwrap();
        assert_eq!(config, Config::default());
    }
}
