//! The scheduler: drives collection ticks and writes the daily report when
//! collection stops.

use std::{collections::BTreeSet, path::PathBuf, time::Duration};

use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::{
    alert::{AlertPolicy, AlertStatus, Notifier, TerminalNotifier},
    collection::{
        Attribution, CommandEnumerator, CounterSampler, Measurement, SysinfoCounters,
        SysinfoResolver,
    },
    ledger::{SessionStore, UsageStore},
    options::CollectorOptions,
    report::{write_daily_report, DailyReport},
    utils::{
        cancellation_token::CancellationToken,
        clock::{Clock, LocalClock},
        error,
    },
};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub at: NaiveDateTime,
    pub measurement: Measurement,
    pub apps: BTreeSet<String>,
    pub alert: AlertStatus,
    /// Ledger writes that failed and were skipped.
    pub failures: usize,
}

/// Owns the ledgers and every collaborator a tick needs.
///
/// Built once per run. Nothing inside a tick is fatal: failures are logged
/// and the next tick tries again.
pub struct Collector {
    sampler: CounterSampler,
    attribution: Attribution,
    usage: UsageStore,
    sessions: SessionStore,
    policy: AlertPolicy,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    report_dir: PathBuf,
    opened_at: NaiveDateTime,
}

impl Collector {
    pub fn new(
        options: &CollectorOptions, sampler: CounterSampler, attribution: Attribution,
        notifier: Box<dyn Notifier>, clock: Box<dyn Clock>,
    ) -> Self {
        let opened_at = clock.now();

        Self {
            sampler,
            attribution,
            usage: UsageStore::new(options.usage_ledger_path()),
            sessions: SessionStore::new(options.session_ledger_path()),
            policy: AlertPolicy::new(options.daily_limit_mb),
            notifier,
            clock,
            report_dir: options.report_dir.clone(),
            opened_at,
        }
    }

    /// A collector using the sysinfo counters, the platform's connection
    /// listing, the local clock, and terminal alerts.
    pub fn with_system_sources(options: &CollectorOptions) -> Self {
        Self::new(
            options,
            CounterSampler::new(Box::<SysinfoCounters>::default(), options.interface.clone()),
            Attribution::new(
                Box::new(CommandEnumerator::platform_default()),
                Box::<SysinfoResolver>::default(),
                options.enumerator_timeout,
            ),
            Box::new(TerminalNotifier),
            Box::new(LocalClock),
        )
    }

    /// When this collector was created.
    pub fn opened_at(&self) -> NaiveDateTime {
        self.opened_at
    }

    /// Runs one tick: sample, update the usage ledger, attribute, update the
    /// session ledger, then check the alert limit.
    pub fn tick(&mut self) -> TickSummary {
        let at = self.clock.now();
        let mut failures = 0;

        let measurement = self.sampler.sample();
        if let Err(err) = self.usage.merge_today(at.date(), measurement) {
            warn!("Skipping this tick's usage update: {err}");
            failures += 1;
        }

        let apps = self.attribution.active_applications();
        if let Err(err) = self.sessions.record_sightings(at, &apps) {
            warn!("Skipping this tick's application update: {err}");
            failures += 1;
        }

        let alert = self.policy.evaluate(&measurement);
        if alert.is_exceeded() {
            self.notifier.notify(&alert);
        }

        debug!(
            "Tick at {at}: sent {} MB, received {} MB, {} app(s).",
            measurement.sent_mb,
            measurement.recv_mb,
            apps.len()
        );

        TickSummary {
            at,
            measurement,
            apps,
            alert,
            failures,
        }
    }

    /// Ticks immediately and then every `interval` until `token` is
    /// cancelled, then writes the daily report. `on_tick` sees every tick's
    /// summary.
    pub fn run<F>(
        &mut self, token: &CancellationToken, interval: Duration, mut on_tick: F,
    ) -> error::Result<PathBuf>
    where
        F: FnMut(&TickSummary),
    {
        info!(
            "Collecting on '{}' every {} since {}.",
            self.sampler.interface(),
            humantime::format_duration(interval),
            self.opened_at(),
        );
        match self.policy.limit_mb() {
            Some(limit_mb) => info!("Alerting when the day's total goes over {limit_mb} MB."),
            None => debug!("No daily limit set, alerts are off."),
        }

        while !token.is_cancelled() {
            let summary = self.tick();
            on_tick(&summary);

            if token.sleep_with_cancellation(interval) {
                break;
            }
        }

        info!("Collection stopped, writing the daily report.");
        self.shutdown()
    }

    /// Appends the report block for this run to today's report file.
    pub fn shutdown(&mut self) -> error::Result<PathBuf> {
        let closed_at = self.clock.now();
        let report = DailyReport::from_ledgers(
            self.opened_at,
            closed_at,
            &self.usage.load()?,
            &self.sessions.load()?,
        );

        let path = write_daily_report(&self.report_dir, &report)?;
        info!("Daily report written to '{}'.", path.display());

        Ok(path)
    }
}
