//! The session ledger: per day, per application sighting statistics.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{store, LedgerError, Validate};

/// Serializes a [`NaiveTime`] as `HH:MM:SS`.
mod hms {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(super) const FORMAT: &str = "%H:%M:%S";

    pub(super) fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }

    pub(super) mod seq {
        use chrono::NaiveTime;
        use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

        pub(in super::super) fn serialize<S: Serializer>(
            times: &[NaiveTime], serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(times.len()))?;
            for time in times {
                seq.serialize_element(&time.format(super::FORMAT).to_string())?;
            }
            seq.end()
        }

        pub(in super::super) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<NaiveTime>, D::Error> {
            Vec::<String>::deserialize(deserializer)?
                .iter()
                .map(|raw| NaiveTime::parse_from_str(raw, super::FORMAT).map_err(de::Error::custom))
                .collect()
        }
    }
}

/// How often, and when, an application was seen on one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    hits: u64,
    #[serde(with = "hms")]
    start: NaiveTime,
    #[serde(with = "hms")]
    end: NaiveTime,
    #[serde(with = "hms::seq")]
    times: Vec<NaiveTime>,
}

impl SessionRecord {
    /// A record for an application first seen at `at`.
    pub fn first_seen(at: NaiveTime) -> Self {
        Self {
            hits: 1,
            start: at,
            end: at,
            times: vec![at],
        }
    }

    /// Adds a sighting at `at`. A time earlier than the last sighting (the
    /// clock was moved back) is recorded as the last sighting's time so the
    /// sequence stays ordered.
    pub fn observe(&mut self, at: NaiveTime) {
        let at = if at < self.end {
            debug!("Sighting at {at} precedes last sighting at {}.", self.end);
            self.end
        } else {
            at
        };

        self.hits += 1;
        self.end = at;
        self.times.push(at);
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// Minutes between the first and last sighting, by time of day only.
    pub fn duration_minutes(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 60.0
    }

    fn check(&self) -> Result<(), String> {
        let (Some(first), Some(last)) = (self.times.first(), self.times.last()) else {
            return Err("has no sightings".into());
        };

        if self.hits as usize != self.times.len() {
            return Err(format!(
                "has {} hits but {} timestamps",
                self.hits,
                self.times.len()
            ));
        }
        if *first != self.start || *last != self.end {
            return Err("start/end do not match its timestamps".into());
        }
        if !self.times.iter().tuple_windows().all(|(a, b)| a <= b) {
            return Err("timestamps are out of order".into());
        }

        Ok(())
    }
}

/// `day → application → session record`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLedger {
    days: BTreeMap<NaiveDate, BTreeMap<String, SessionRecord>>,
}

impl SessionLedger {
    /// Records one sighting at `at` for every application in `apps`.
    ///
    /// Applications are processed in lexicographic order regardless of the
    /// order they are given in; repeated names count once.
    pub fn record<I, S>(&mut self, at: NaiveDateTime, apps: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let apps = apps
            .into_iter()
            .map(|app| app.as_ref().to_owned())
            .sorted()
            .dedup()
            .collect_vec();
        if apps.is_empty() {
            return;
        }

        let time = at.time();
        let day = self.days.entry(at.date()).or_default();

        for app in apps {
            match day.get_mut(&app) {
                Some(record) => record.observe(time),
                None => {
                    day.insert(app, SessionRecord::first_seen(time));
                }
            }
        }
    }

    /// The record for `app` on `day`.
    pub fn get(&self, day: NaiveDate, app: &str) -> Option<&SessionRecord> {
        self.days.get(&day)?.get(app)
    }

    /// All days with records, ascending, each with its applications by name.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &BTreeMap<String, SessionRecord>)> + '_ {
        self.days.iter().map(|(day, apps)| (*day, apps))
    }

    /// Distinct application names seen on `day`, sorted.
    pub fn apps_on(&self, day: NaiveDate) -> Vec<&str> {
        self.days
            .get(&day)
            .map(|apps| apps.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every individual sighting on `day` as `(time, app)`, ordered by time and
    /// then by name.
    pub fn sightings(&self, day: NaiveDate) -> Vec<(NaiveTime, &str)> {
        self.days
            .get(&day)
            .into_iter()
            .flatten()
            .flat_map(|(app, record)| record.times.iter().map(move |time| (*time, app.as_str())))
            .sorted()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(BTreeMap::is_empty)
    }
}

impl Validate for SessionLedger {
    fn validate(&self) -> Result<(), String> {
        for (day, apps) in &self.days {
            for (app, record) in apps {
                record
                    .check()
                    .map_err(|reason| format!("'{app}' on '{day}' {reason}"))?;
            }
        }

        Ok(())
    }
}

/// The file-backed session ledger.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger; an absent or corrupt file yields an empty ledger.
    pub fn load(&self) -> Result<SessionLedger, LedgerError> {
        store::load_or_default(&self.path)
    }

    /// Records a sighting of each application at `at` and rewrites the ledger.
    pub fn record_sightings<I, S>(&self, at: NaiveDateTime, apps: I) -> Result<SessionLedger, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ledger = self.load()?;
        ledger.record(at, apps);
        store::persist(&self.path, &ledger)?;

        Ok(ledger)
    }
}
