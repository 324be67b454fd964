pub mod alert;
pub mod collector;
pub mod storage;

use std::time::Duration;

use serde::Deserialize;

use self::{alert::AlertConfig, collector::CollectorConfig, storage::StorageConfig};

/// The parsed TOML config file.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq))]
pub struct Config {
    #[serde(default)]
    pub(crate) collector: CollectorConfig,
    #[serde(default)]
    pub(crate) alert: AlertConfig,
    #[serde(default)]
    pub(crate) storage: StorageConfig,
}

/// A duration that may be written as milliseconds or as a human string
/// such as `"10s"`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub(crate) enum StringOrNum {
    String(String),
    Num(u64),
}

impl From<String> for StringOrNum {
    fn from(value: String) -> Self {
        StringOrNum::String(value)
    }
}

impl From<u64> for StringOrNum {
    fn from(value: u64) -> Self {
        StringOrNum::Num(value)
    }
}

impl StringOrNum {
    /// Interprets the value as a duration. Bare numbers, including numeric
    /// strings, are milliseconds.
    pub(crate) fn to_duration(&self) -> Option<Duration> {
        match self {
            StringOrNum::Num(ms) => Some(Duration::from_millis(*ms)),
            StringOrNum::String(s) => {
                let s = s.trim();
                match s.parse::<u64>() {
                    Ok(ms) => Some(Duration::from_millis(ms)),
                    Err(_) => humantime::parse_duration(s).ok(),
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use indoc::indoc;

    use super::*;

    #[test]
    fn durations() {
        assert_eq!(
            StringOrNum::from(2500).to_duration(),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(
            StringOrNum::from("1500".to_string()).to_duration(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            StringOrNum::from("1m 30s".to_string()).to_duration(),
            Some(Duration::from_secs(90))
        );
        assert_eq!(StringOrNum::from("soon".to_string()).to_duration(), None);
    }

    #[test]
    fn empty_config() {
        let config: Config = toml_edit::de::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn full_config() {
        let config: Config = toml_edit::de::from_str(indoc! {r#"
            [collector]
            interface = "eth0"
            interval = "30s"
            enumerator_timeout = 2000

            [alert]
            daily_limit_mb = 512.5

            [storage]
            data_dir = "/tmp/netledger"
        "#})
        .unwrap();

        assert_eq!(config.collector.interface.as_deref(), Some("eth0"));
        assert_eq!(
            config.collector.interval,
            Some(StringOrNum::String("30s".to_string()))
        );
        assert_eq!(
            config.collector.enumerator_timeout,
            Some(StringOrNum::Num(2000))
        );
        assert_eq!(config.alert.daily_limit_mb, Some(512.5));
        assert_eq!(
            config.storage.data_dir.as_deref(),
            Some(Path::new("/tmp/netledger"))
        );
        assert_eq!(config.storage.report_dir, None);
    }

    #[test]
    fn wrong_type() {
        let result: Result<Config, _> = toml_edit::de::from_str(indoc! {r#"
            [alert]
            daily_limit_mb = "lots"
        "#});
        assert!(result.is_err());
    }
}
