//! The usage ledger: one measurement per calendar day, grouped by month.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{store, LedgerError, MonthKey, Validate};
use crate::collection::network::Measurement;

/// `month → day → measurement`, ordered by key.
///
/// Each day holds the last measurement written for it; writes overwrite rather
/// than accumulate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageLedger {
    months: BTreeMap<MonthKey, BTreeMap<NaiveDate, Measurement>>,
}

impl UsageLedger {
    /// Sets the measurement for `day`, replacing any earlier one.
    pub fn set_day(&mut self, day: NaiveDate, measurement: Measurement) {
        self.months
            .entry(MonthKey::of(day))
            .or_default()
            .insert(day, measurement);
    }

    /// The measurement recorded for `day`, if any.
    pub fn get(&self, day: NaiveDate) -> Option<&Measurement> {
        self.months.get(&MonthKey::of(day))?.get(&day)
    }

    /// All recorded days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &Measurement)> + '_ {
        self.months
            .values()
            .flat_map(|days| days.iter().map(|(day, measurement)| (*day, measurement)))
    }

    /// Days recorded under `month`, ascending.
    pub fn month(&self, month: MonthKey) -> impl Iterator<Item = (NaiveDate, &Measurement)> + '_ {
        self.months
            .get(&month)
            .into_iter()
            .flat_map(|days| days.iter().map(|(day, measurement)| (*day, measurement)))
    }

    /// `(day, total MB)` pairs in ascending day order, for plotting history.
    pub fn daily_totals(&self) -> Vec<(NaiveDate, f64)> {
        self.days()
            .map(|(day, measurement)| (day, measurement.total()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.months.values().all(BTreeMap::is_empty)
    }
}

impl Validate for UsageLedger {
    fn validate(&self) -> Result<(), String> {
        for (month, days) in &self.months {
            for (day, measurement) in days {
                if !month.contains(*day) {
                    return Err(format!("day '{day}' is filed under month '{month}'"));
                }
                if !measurement.is_valid() {
                    return Err(format!("day '{day}' has an invalid measurement"));
                }
            }
        }

        Ok(())
    }
}

/// The file-backed usage ledger.
#[derive(Clone, Debug)]
pub struct UsageStore {
    path: PathBuf,
}

impl UsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger; an absent or corrupt file yields an empty ledger.
    pub fn load(&self) -> Result<UsageLedger, LedgerError> {
        store::load_or_default(&self.path)
    }

    /// Records `measurement` as the value for `today` and rewrites the whole
    /// ledger. Calling this again with the same arguments leaves the ledger
    /// unchanged.
    pub fn merge_today(
        &self, today: NaiveDate, measurement: Measurement,
    ) -> Result<UsageLedger, LedgerError> {
        let mut ledger = self.load()?;
        ledger.set_day(today, measurement);
        store::persist(&self.path, &ledger)?;

        Ok(ledger)
    }
}
