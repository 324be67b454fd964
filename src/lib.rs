//! netledger is a local network usage collector.
//!
//! On every tick it samples one interface's byte counters, works out which
//! applications own the active connections, and folds both into two JSON
//! ledgers keyed by day. The ledgers can be exported to CSV, and a plain-text
//! report is appended for the day whenever collection stops.

pub mod alert;
pub mod collection;
pub mod collector;
pub mod constants;
pub mod ledger;
pub mod options;
pub mod report;
pub mod utils {
    pub mod cancellation_token;
    pub mod clock;
    pub mod data_units;
    pub mod error;
    pub mod logging;
}

use std::sync::Arc;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::error;

use crate::{
    collection::{CounterSampler, SysinfoCounters},
    collector::{Collector, TickSummary},
    ledger::{SessionStore, UsageStore},
    options::{
        get_args, get_config_path, get_or_create_config, init_options, CollectorOptions,
        NetledgerCommand,
    },
    report::{export_csv, merge_daily_reports, write_daily_report, DailyReport},
    utils::{
        cancellation_token::CancellationToken,
        clock::{Clock, LocalClock},
    },
};

/// Parses the arguments and config, then runs the requested command.
pub fn start_netledger() -> Result<()> {
    let args = get_args();

    let config_path = get_config_path(args.general_args.config_location.as_deref());
    let config = get_or_create_config(config_path.as_deref())
        .context("Unable to properly parse or create the config file.")?;
    let options = init_options(&args, &config)?;

    if args.collector_args.list_interfaces {
        list_interfaces(&options);
        return Ok(());
    }

    #[cfg(feature = "logging")]
    {
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };

        if let Err(err) = utils::logging::init_logger(level, &options.log_file) {
            eprintln!(
                "Unable to log to '{}', continuing without a log: {err}",
                options.log_file.display()
            );
        }
    }

    match args.selected_command() {
        NetledgerCommand::Run => run_collector(&options),
        NetledgerCommand::Export => export(&options),
        NetledgerCommand::Report => report(&options),
        NetledgerCommand::Merge => merge(&options),
        NetledgerCommand::Totals => totals(&options),
        NetledgerCommand::Today => today(&options),
    }
}

fn print_tick(summary: &TickSummary) {
    let apps = if summary.apps.is_empty() {
        "-".to_string()
    } else {
        summary.apps.iter().join(", ")
    };

    println!(
        "{}  sent {} MB  received {} MB  total {} MB  apps: {apps}",
        summary.at.format("%H:%M:%S"),
        summary.measurement.sent_mb,
        summary.measurement.recv_mb,
        summary.measurement.total(),
    );
}

fn run_collector(options: &CollectorOptions) -> Result<()> {
    let mut collector = Collector::with_system_sources(options);

    let result = if options.once {
        print_tick(&collector.tick());
        collector.shutdown()
    } else {
        let token = Arc::new(CancellationToken::default());
        {
            let token = token.clone();
            ctrlc::set_handler(move || token.cancel())
                .context("Unable to set the termination handler.")?;
        }

        collector.run(&token, options.interval, print_tick)
    };

    match result {
        Ok(path) => {
            println!("Daily report written to {}.", path.display());
            Ok(())
        }
        Err(err) => {
            error!("Failed to write the daily report: {err}");
            Err(err).context("Unable to write the daily report.")
        }
    }
}

fn export(options: &CollectorOptions) -> Result<()> {
    let usage = UsageStore::new(options.usage_ledger_path()).load()?;
    let sessions = SessionStore::new(options.session_ledger_path()).load()?;

    let summary = export_csv(&usage, &sessions, &options.export_dir)
        .context("Unable to export the ledgers.")?;
    println!("{summary}");

    Ok(())
}

fn report(options: &CollectorOptions) -> Result<()> {
    let usage = UsageStore::new(options.usage_ledger_path()).load()?;
    let sessions = SessionStore::new(options.session_ledger_path()).load()?;

    // Without a running collector, the day opens at its first sighting.
    let now = LocalClock.now();
    let opened = sessions
        .sightings(now.date())
        .first()
        .map(|(time, _)| now.date().and_time(*time))
        .unwrap_or(now);

    let report = DailyReport::from_ledgers(opened, now, &usage, &sessions);
    let path = write_daily_report(&options.report_dir, &report)
        .context("Unable to write the daily report.")?;
    println!("Daily report written to {}.", path.display());

    Ok(())
}

fn merge(options: &CollectorOptions) -> Result<()> {
    let outcome =
        merge_daily_reports(&options.report_dir).context("Unable to merge the daily reports.")?;
    println!("{outcome}");

    Ok(())
}

fn totals(options: &CollectorOptions) -> Result<()> {
    let usage = UsageStore::new(options.usage_ledger_path()).load()?;
    let totals = usage.daily_totals();

    if totals.is_empty() {
        println!("No usage data found yet.");
    }
    for (day, total) in totals {
        println!("{day}  {total} MB");
    }

    Ok(())
}

fn today(options: &CollectorOptions) -> Result<()> {
    let sessions = SessionStore::new(options.session_ledger_path()).load()?;
    let sightings = sessions.sightings(LocalClock.now().date());

    if sightings.is_empty() {
        println!("No applications seen today.");
    }
    for (time, app) in sightings {
        println!("{}  {app}", time.format("%H:%M:%S"));
    }

    Ok(())
}

fn list_interfaces(options: &CollectorOptions) {
    let mut sampler =
        CounterSampler::new(Box::<SysinfoCounters>::default(), options.interface.clone());

    for name in sampler.available_interfaces() {
        let marker = if name == options.interface { "*" } else { " " };
        println!("{marker} {name}");
    }
}
