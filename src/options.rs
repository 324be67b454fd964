//! How netledger is configured: command line arguments, environment
//! variables, and the TOML config file, resolved in that order of priority.

pub mod args;
pub mod config;
mod error;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub use self::{
    args::{get_args, Args, NetledgerCommand},
    config::Config,
    error::{OptionError, OptionResult},
};
pub(crate) use self::config::StringOrNum;
use crate::constants::*;

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectorOptions {
    pub interface: String,
    pub interval: Duration,
    pub enumerator_timeout: Duration,
    pub daily_limit_mb: Option<f64>,
    pub data_dir: PathBuf,
    pub report_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub once: bool,
}

impl CollectorOptions {
    pub fn usage_ledger_path(&self) -> PathBuf {
        self.data_dir.join(USAGE_LEDGER_FILE)
    }

    pub fn session_ledger_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_LEDGER_FILE)
    }
}

/// Returns the config path to use. If `override_config_path` is specified,
/// then we will use that. If not, then we use the platform config directory.
pub fn get_config_path(override_config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(conf_loc) = override_config_path {
        return Some(conf_loc.to_path_buf());
    }

    dirs::config_dir().map(|path| path.join(DEFAULT_CONFIG_FILE_LOCATION))
}

/// Reads the config at `config_path`, or writes the default config text
/// there and returns the default config if nothing exists yet.
pub fn get_or_create_config(config_path: Option<&Path>) -> OptionResult<Config> {
    let Some(path) = config_path else {
        return Ok(Config::default());
    };

    if path.exists() {
        let config_string = fs::read_to_string(path)?;
        Ok(toml_edit::de::from_str(&config_string)?)
    } else {
        if let Some(parent_path) = path.parent() {
            fs::create_dir_all(parent_path)?;
        }
        fs::write(path, CONFIG_TEXT)?;
        Ok(Config::default())
    }
}

/// The directory ledgers live in if none is configured.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(DEFAULT_DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn get_interface(args: &Args, config: &Config) -> OptionResult<String> {
    if let Some(interface) = &args.collector_args.interface {
        if interface.trim().is_empty() {
            return Err(OptionError::invalid_arg_value("interface"));
        }
        Ok(interface.clone())
    } else if let Some(interface) = &config.collector.interface {
        if interface.trim().is_empty() {
            return Err(OptionError::invalid_config_value("interface"));
        }
        Ok(interface.clone())
    } else {
        Ok(DEFAULT_INTERFACE.to_string())
    }
}

fn get_interval(args: &Args, config: &Config) -> OptionResult<Duration> {
    let interval = if let Some(interval) = &args.collector_args.interval {
        StringOrNum::from(interval.clone())
            .to_duration()
            .ok_or_else(|| OptionError::invalid_arg_value("interval"))?
    } else if let Some(interval) = &config.collector.interval {
        interval
            .to_duration()
            .ok_or_else(|| OptionError::invalid_config_value("interval"))?
    } else {
        DEFAULT_TICK_INTERVAL
    };

    if interval < MIN_TICK_INTERVAL {
        return Err(OptionError::other(format!(
            "set your interval to be at least {}.",
            humantime::format_duration(MIN_TICK_INTERVAL)
        )));
    }

    Ok(interval)
}

fn get_enumerator_timeout(config: &Config) -> OptionResult<Duration> {
    match &config.collector.enumerator_timeout {
        Some(timeout) => match timeout.to_duration() {
            Some(timeout) if !timeout.is_zero() => Ok(timeout),
            _ => Err(OptionError::invalid_config_value("enumerator_timeout")),
        },
        None => Ok(DEFAULT_ENUMERATOR_TIMEOUT),
    }
}

fn get_daily_limit(args: &Args, config: &Config) -> OptionResult<Option<f64>> {
    let is_valid = |limit: f64| limit.is_finite() && limit >= 0.0;

    if let Some(limit) = &args.collector_args.limit {
        match limit.trim().parse::<f64>() {
            Ok(limit) if is_valid(limit) => Ok(Some(limit)),
            _ => Err(OptionError::invalid_arg_value("limit")),
        }
    } else if let Some(limit) = config.alert.daily_limit_mb {
        if is_valid(limit) {
            Ok(Some(limit))
        } else {
            Err(OptionError::invalid_config_value("daily_limit_mb"))
        }
    } else {
        Ok(None)
    }
}

/// Resolves the arguments and config file into [`CollectorOptions`].
pub fn init_options(args: &Args, config: &Config) -> OptionResult<CollectorOptions> {
    let data_dir = args
        .general_args
        .data_dir
        .clone()
        .or_else(|| config.storage.data_dir.clone())
        .unwrap_or_else(default_data_dir);

    let report_dir = args
        .general_args
        .report_dir
        .clone()
        .or_else(|| config.storage.report_dir.clone())
        .unwrap_or_else(|| data_dir.join(REPORT_DIR_NAME));

    let export_dir = args
        .general_args
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let log_file = args
        .general_args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME));

    Ok(CollectorOptions {
        interface: get_interface(args, config)?,
        interval: get_interval(args, config)?,
        enumerator_timeout: get_enumerator_timeout(config)?,
        daily_limit_mb: get_daily_limit(args, config)?,
        data_dir,
        report_dir,
        export_dir,
        log_file,
        once: args.collector_args.once,
    })
}
