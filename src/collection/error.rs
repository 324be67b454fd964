use std::{process::ExitStatus, time::Duration};

use thiserror::Error;

use super::processes::Pid;

/// A type alias for handling errors related to data collection.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Kinds of errors that can occur while collecting data. None of these are
/// fatal to a tick.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The enumerator command could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The enumerator command did not finish in time and was killed.
    #[error("'{program}' did not finish within {}", humantime::format_duration(*timeout))]
    Timeout { program: String, timeout: Duration },

    /// The enumerator command exited unsuccessfully, commonly for lack of
    /// privileges.
    #[error("'{program}' exited with {status}")]
    Failed { program: String, status: ExitStatus },

    /// No running process has the given PID (it may have exited).
    #[error("no process with PID {0}")]
    UnknownProcess(Pid),
}
