//! Argument parsing via clap.

use std::path::PathBuf;

use clap::*;
use indoc::indoc;

use crate::constants::{ENV_DATA_DIR, ENV_INTERFACE, ENV_INTERVAL, ENV_LIMIT_MB};

const TEMPLATE: &str = indoc! {
    "{name} {version}
    {author}

    {about}

    {usage-heading} {usage}

    {all-args}"
};

const USAGE: &str = "netledger [OPTIONS] [COMMAND]";

/// The arguments for netledger.
#[derive(Parser, Debug)]
#[command(
    name = crate_name!(),
    version = crate_version!(),
    author = crate_authors!(),
    about = crate_description!(),
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true,
    color = ColorChoice::Auto,
    help_template = TEMPLATE,
    override_usage = USAGE,
    rename_all = "snake_case",
)]
pub struct Args {
    #[command(subcommand)]
    pub(crate) command: Option<NetledgerCommand>,

    #[command(flatten)]
    pub(crate) general_args: GeneralArgs,

    #[command(flatten)]
    pub(crate) collector_args: CollectorArgs,

    #[command(flatten)]
    pub(crate) other_args: OtherArgs,
}

impl Args {
    /// The command to run, defaulting to [`NetledgerCommand::Run`].
    pub fn selected_command(&self) -> NetledgerCommand {
        self.command.unwrap_or(NetledgerCommand::Run)
    }
}

/// What netledger should do.
#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetledgerCommand {
    #[command(about = "Samples on every tick until interrupted. This is the default.")]
    Run,

    #[command(about = "Exports the ledgers to CSV files in the export directory.")]
    Export,

    #[command(about = "Appends a report block for today to today's report file.")]
    Report,

    #[command(about = "Merges all daily reports into a single file.")]
    Merge,

    #[command(about = "Prints the total usage recorded for each day.")]
    Totals,

    #[command(about = "Prints today's application sightings.")]
    Today,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "General Options", rename_all = "snake_case")]
pub(crate) struct GeneralArgs {
    #[arg(
        short = 'C',
        long,
        value_name = "PATH",
        global = true,
        help = "Sets the location of the config file.",
        long_help = "Sets the location of the config file. Expects a config file in the TOML format. \
                    If it doesn't exist, a default config file is created at the path."
    )]
    pub(crate) config_location: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        env = ENV_DATA_DIR,
        global = true,
        help = "Sets the directory holding the usage and application ledgers."
    )]
    pub(crate) data_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        global = true,
        help = "Sets the directory daily reports are written to.",
        long_help = "Sets the directory daily reports are written to and merged from. Defaults to \
                    a 'reports' directory inside the data directory."
    )]
    pub(crate) report_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        global = true,
        help = "Sets the directory CSV exports are written to.",
        long_help = "Sets the directory CSV exports are written to. Defaults to the current directory."
    )]
    pub(crate) export_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        global = true,
        help = "Sets the location of the log file.",
        long_help = "Sets the location of the log file. Defaults to 'netledger.log' inside the data \
                    directory."
    )]
    pub(crate) log_file: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "Collector Options", rename_all = "snake_case")]
pub(crate) struct CollectorArgs {
    #[arg(
        short = 'i',
        long,
        value_name = "NAME",
        env = ENV_INTERFACE,
        global = true,
        help = "Sets the network interface to sample.",
        long_help = "Sets the network interface to sample, e.g. 'Wi-Fi', 'eth0', or 'en0'. An interface \
                    that does not exist is recorded as zero usage; use --list_interfaces to see what \
                    is available."
    )]
    pub(crate) interface: Option<String>,

    #[arg(
        short = 'l',
        long,
        value_name = "MB",
        env = ENV_LIMIT_MB,
        global = true,
        help = "Warns when the day's total usage goes over this many MB."
    )]
    pub(crate) limit: Option<String>,

    #[arg(
        short = 'r',
        long,
        value_name = "TIME",
        env = ENV_INTERVAL,
        global = true,
        help = "Sets how often usage is sampled.",
        long_help = "Sets how often usage is sampled. Takes a number in milliseconds or a human \
                    duration (e.g. 30s). The minimum is 1s, and the default is 10s."
    )]
    pub(crate) interval: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Runs a single tick, writes the report, and exits."
    )]
    pub(crate) once: bool,

    #[arg(
        long,
        help = "Lists the network interfaces that can be sampled, and exits."
    )]
    pub(crate) list_interfaces: bool,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "Other Options", rename_all = "snake_case")]
pub(crate) struct OtherArgs {
    #[arg(short='h', long, action=ArgAction::Help, help="Prints help info (for more details use '--help'.)")]
    help: (),

    #[arg(short='V', long, action=ArgAction::Version, help="Prints version information.")]
    version: (),
}

/// Returns the parsed command line arguments.
pub fn get_args() -> Args {
    Args::parse()
}

/// Returns an [`Command`] based off of [`Args`].
#[cfg(test)]
fn build_cmd() -> Command {
    <Args as CommandFactory>::command()
}
