use std::result;

use thiserror::Error;

use crate::{ledger::LedgerError, report::ReportError};

/// A type alias for handling errors related to netledger.
pub type Result<T> = result::Result<T, NetledgerError>;

/// An error that stops netledger from finishing a run.
#[derive(Debug, Error)]
pub enum NetledgerError {
    /// An error from reading one of the ledgers.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// An error from writing the daily report.
    #[error(transparent)]
    Report(#[from] ReportError),
}
