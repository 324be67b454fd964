//! CSV projections of the ledgers.

use std::{
    borrow::Cow,
    fmt,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use super::ReportError;
use crate::{
    constants::{APP_LOG_CSV, APP_SUMMARY_CSV, DAILY_USAGE_CSV},
    ledger::{SessionLedger, UsageLedger},
    utils::data_units::round_hundredths,
};

const DAILY_USAGE_HEADER: [&str; 4] = ["Date", "Sent_MB", "Received_MB", "Total_MB"];
const APP_LOG_HEADER: [&str; 3] = ["Date", "Time", "App"];
const APP_SUMMARY_HEADER: [&str; 6] = ["Date", "App", "Hits", "Start", "End", "Duration(min)"];

const TIME_FORMAT: &str = "%H:%M:%S";

/// The files written by one export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
}

impl ExportSummary {
    /// Whether there was nothing to export.
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.written.is_empty() {
            return write!(f, "No usage data found yet, nothing was exported.");
        }

        write!(f, "Logs exported to ")?;
        for (i, path) in self.written.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        write!(f, ".")
    }
}

/// Quotes a field if it contains a delimiter, quote, or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> std::io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape(field.as_ref()).as_bytes())?;
    }
    writer.write_all(b"\n")
}

/// Writes a header and rows to `path`.
fn write_table<S: AsRef<str>>(
    path: &Path, header: &[&str], rows: impl IntoIterator<Item = Vec<S>>,
) -> Result<(), ReportError> {
    let io_err = |err| ReportError::io(path, err);

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    write_row(&mut writer, header).map_err(io_err)?;
    for row in rows {
        write_row(&mut writer, &row).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Writes `daily_usage.csv`, `app_log.csv` and `app_summary.csv` into `out_dir`.
///
/// A ledger with no entries produces no files rather than an error; the
/// returned summary lists what was actually written.
pub fn export_csv(
    usage: &UsageLedger, sessions: &SessionLedger, out_dir: &Path,
) -> Result<ExportSummary, ReportError> {
    let mut summary = ExportSummary::default();

    if usage.is_empty() && sessions.is_empty() {
        return Ok(summary);
    }
    fs::create_dir_all(out_dir).map_err(|err| ReportError::io(out_dir, err))?;

    if !usage.is_empty() {
        let path = out_dir.join(DAILY_USAGE_CSV);
        let rows = usage.days().map(|(day, measurement)| {
            vec![
                day.to_string(),
                measurement.sent_mb.to_string(),
                measurement.recv_mb.to_string(),
                measurement.total().to_string(),
            ]
        });
        write_table(&path, &DAILY_USAGE_HEADER, rows)?;
        summary.written.push(path);
    }

    if !sessions.is_empty() {
        let path = out_dir.join(APP_LOG_CSV);
        let rows = sessions.days().flat_map(|(day, _)| {
            sessions.sightings(day).into_iter().map(move |(time, app)| {
                vec![
                    day.to_string(),
                    time.format(TIME_FORMAT).to_string(),
                    app.to_string(),
                ]
            })
        });
        write_table(&path, &APP_LOG_HEADER, rows)?;
        summary.written.push(path);

        let path = out_dir.join(APP_SUMMARY_CSV);
        let rows = sessions.days().flat_map(|(day, apps)| {
            apps.iter().map(move |(app, record)| {
                vec![
                    day.to_string(),
                    app.clone(),
                    record.hits().to_string(),
                    record.start().format(TIME_FORMAT).to_string(),
                    record.end().format(TIME_FORMAT).to_string(),
                    round_hundredths(record.duration_minutes()).to_string(),
                ]
            })
        });
        write_table(&path, &APP_SUMMARY_HEADER, rows)?;
        summary.written.push(path);
    }

    Ok(summary)
}
