//! Derived artifacts built from the ledgers: CSV exports, the per-day text
//! report, and the merged multi-day report.

pub mod csv;
pub mod daily;

use std::path::PathBuf;

use thiserror::Error;

pub use self::csv::{export_csv, ExportSummary};
pub use daily::{merge_daily_reports, write_daily_report, DailyReport, MergeOutcome};

/// An error while writing a report or export.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
