//! The per-day text report and the merged multi-day report.

use std::{
    ffi::OsStr,
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

use super::ReportError;
use crate::{
    constants::MERGED_REPORT_FILE,
    ledger::{SessionLedger, UsageLedger},
};

const RULE: &str = "========================================";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// One appended block of a daily report.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub opened: NaiveDateTime,
    pub closed: NaiveDateTime,
    pub total_mb: f64,
    pub apps: Vec<String>,
}

impl DailyReport {
    /// Builds the report for the day `closed` falls on, taking the day's
    /// usage total and the applications seen that day from the ledgers.
    pub fn from_ledgers(
        opened: NaiveDateTime, closed: NaiveDateTime, usage: &UsageLedger,
        sessions: &SessionLedger,
    ) -> Self {
        let date = closed.date();

        DailyReport {
            date,
            opened,
            closed,
            total_mb: usage.get(date).map(|m| m.total()).unwrap_or(0.0),
            apps: sessions.apps_on(date).into_iter().map(str::to_string).collect(),
        }
    }

    /// The time between opening and closing, clamped to zero.
    pub fn elapsed(&self) -> Duration {
        (self.closed - self.opened).to_std().unwrap_or_default()
    }
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        writeln!(f, "Opening: {}", self.opened.format(TIME_FORMAT))?;
        writeln!(f, "Closing: {}", self.closed.format(TIME_FORMAT))?;
        writeln!(f, "Duration: {}", humantime::format_duration(self.elapsed()))?;
        writeln!(f, "Total: {} MB", self.total_mb)?;
        writeln!(f, "Apps:")?;
        if self.apps.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            for app in &self.apps {
                writeln!(f, "  - {app}")?;
            }
        }
        writeln!(f, "{RULE}")
    }
}

/// The report file for `date` inside `report_dir`.
pub fn report_path(report_dir: &Path, date: NaiveDate) -> PathBuf {
    report_dir.join(format!("{}.txt", date.format(DATE_FORMAT)))
}

/// Appends `report` to the file named after its date, creating the directory
/// and file if needed. Returns the path written to.
pub fn write_daily_report(report_dir: &Path, report: &DailyReport) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(report_dir).map_err(|err| ReportError::io(report_dir, err))?;

    let path = report_path(report_dir, report.date);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| ReportError::io(&path, err))?;

    file.write_all(report.to_string().as_bytes())
        .map_err(|err| ReportError::io(&path, err))?;

    Ok(path)
}

/// What [`merge_daily_reports`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { output: PathBuf, reports: usize },
    NothingToMerge,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Merged { output, reports } => write!(
                f,
                "Merged {reports} daily report{} into {}.",
                if *reports == 1 { "" } else { "s" },
                output.display()
            ),
            MergeOutcome::NothingToMerge => write!(f, "No daily reports found, nothing to merge."),
        }
    }
}

/// Whether `path` looks like `YYYY-MM-DD.txt`.
fn is_daily_report(path: &Path) -> bool {
    let is_txt = path.extension().is_some_and(|ext| ext == "txt");

    is_txt
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| NaiveDate::parse_from_str(stem, DATE_FORMAT).is_ok())
}

/// Concatenates every daily report in `report_dir` in ascending date order
/// into the merged report file, overwriting any previous merge.
///
/// A missing directory or one without daily reports is not an error; no
/// output file is created in that case.
pub fn merge_daily_reports(report_dir: &Path) -> Result<MergeOutcome, ReportError> {
    let entries = match fs::read_dir(report_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(MergeOutcome::NothingToMerge);
        }
        Err(err) => return Err(ReportError::io(report_dir, err)),
    };

    let reports: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_daily_report(path))
        .filter(|path| path.file_name() != Some(OsStr::new(MERGED_REPORT_FILE)))
        .sorted()
        .collect();

    if reports.is_empty() {
        return Ok(MergeOutcome::NothingToMerge);
    }

    let mut merged = String::new();
    for path in &reports {
        merged.push_str(&fs::read_to_string(path).map_err(|err| ReportError::io(path, err))?);
    }

    let output = report_dir.join(MERGED_REPORT_FILE);
    fs::write(&output, merged).map_err(|err| ReportError::io(&output, err))?;

    Ok(MergeOutcome::Merged {
        output,
        reports: reports.len(),
    })
}
