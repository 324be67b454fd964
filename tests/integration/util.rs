use std::{ffi::OsString, path::Path, process::Command};

pub fn abs_path(path: &str) -> OsString {
    let path = Path::new(path);

    if path.exists() {
        path.canonicalize().unwrap().into_os_string()
    } else {
        // We are going to trust that the path given is valid...
        path.to_owned().into_os_string()
    }
}

const NETLEDGER_EXE_PATH: &str = env!("CARGO_BIN_EXE_netledger");
const DEFAULT_CFG: [&str; 2] = ["-C", "./tests/valid_configs/empty_config.toml"];

/// Environment overrides that would leak the caller's settings into a test.
const CLEARED_ENV_VARS: [&str; 4] = [
    "NETLEDGER_INTERFACE",
    "NETLEDGER_LIMIT_MB",
    "NETLEDGER_INTERVAL",
    "NETLEDGER_DATA_DIR",
];

/// Returns the [`Command`] of a binary invocation of netledger with a clean
/// environment.
pub fn netledger_command(args: &[&str]) -> Command {
    let mut cmd = Command::new(NETLEDGER_EXE_PATH);
    for var in CLEARED_ENV_VARS {
        cmd.env_remove(var);
    }

    let mut prev = "";
    for arg in args.iter() {
        if prev == "-C" {
            // This is the config file; make sure we set it to absolute path!
            cmd.arg(abs_path(arg));
        } else {
            cmd.arg(arg);
        }

        prev = arg;
    }

    cmd
}

/// Returns the [`Command`] of a binary invocation of netledger with the
/// default, empty config file, storing everything under `data_dir`.
pub fn no_cfg_netledger_command(data_dir: &Path) -> Command {
    let mut cmd = netledger_command(&DEFAULT_CFG);
    cmd.arg("--data_dir").arg(data_dir);
    cmd
}
