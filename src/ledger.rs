//! The two durable ledgers: daily usage totals and per-application sessions.
//!
//! Both are JSON documents that get fully rewritten on every merge. Loading is
//! strict (the document is parsed into typed structures and its invariants are
//! checked), but a file whose contents fail to load is treated as an empty
//! ledger so a tick never fails because of what a previous run left behind. A
//! file that cannot be read at all is an error and is never overwritten.

mod month;
pub mod session;
mod store;
pub mod usage;

use std::path::PathBuf;

use thiserror::Error;

pub use month::MonthKey;
pub use session::{SessionLedger, SessionRecord, SessionStore};
pub use usage::{UsageLedger, UsageStore};

/// An error while reading or writing a ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a valid ledger: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LedgerError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LedgerError::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Structural checks applied to a ledger after it has been parsed.
pub(crate) trait Validate {
    /// Returns the reason the ledger is inconsistent, if it is.
    fn validate(&self) -> Result<(), String>;
}
