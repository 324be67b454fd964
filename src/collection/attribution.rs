//! Attribution of active connections to the applications that own them.

use std::{collections::BTreeSet, time::Duration};

use hashbrown::HashSet;
use itertools::Itertools;
use log::{debug, warn};

use super::{
    connections::ConnectionEnumerator,
    error::CollectionError,
    processes::{Pid, ProcessResolver},
};

/// The most application names reported per tick.
pub const MAX_APPS: usize = 10;

/// Recorded in place of application names when connections could not be
/// enumerated at all. It is not a real application.
pub const UNAVAILABLE_SENTINEL: &str = "(attribution unavailable: run with elevated privileges)";

/// The result of one attribution pass.
#[derive(Debug)]
pub enum AttributionOutcome {
    /// Connections were listed. `apps` holds every name that resolved (capped
    /// at [`MAX_APPS`]); `unresolved` holds the PIDs that did not. `unowned`
    /// counts connections listed without an owning process, which is what an
    /// unprivileged listing of other users' sockets looks like.
    Resolved {
        apps: BTreeSet<String>,
        unresolved: Vec<(Pid, CollectionError)>,
        unowned: usize,
    },
    /// Connections could not be listed.
    Unavailable(CollectionError),
}

impl AttributionOutcome {
    /// The application names to record for this pass; a failed pass yields just
    /// the [`UNAVAILABLE_SENTINEL`].
    pub fn into_apps(self) -> BTreeSet<String> {
        match self {
            AttributionOutcome::Resolved { apps, .. } => apps,
            AttributionOutcome::Unavailable(_) => {
                BTreeSet::from([UNAVAILABLE_SENTINEL.to_string()])
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AttributionOutcome::Unavailable(_))
    }
}

/// Combines a [`ConnectionEnumerator`] and a [`ProcessResolver`] into the set of
/// applications currently using the network.
pub struct Attribution {
    enumerator: Box<dyn ConnectionEnumerator>,
    resolver: Box<dyn ProcessResolver>,
    timeout: Duration,
}

impl Attribution {
    pub fn new(
        enumerator: Box<dyn ConnectionEnumerator>, resolver: Box<dyn ProcessResolver>,
        timeout: Duration,
    ) -> Self {
        Self {
            enumerator,
            resolver,
            timeout,
        }
    }

    /// Names of at most [`MAX_APPS`] applications with active connections, or
    /// the sentinel if connections could not be listed.
    pub fn active_applications(&mut self) -> BTreeSet<String> {
        self.attribute().into_apps()
    }

    /// Runs one attribution pass, keeping the per-PID failures.
    pub fn attribute(&mut self) -> AttributionOutcome {
        let connections = match self.enumerator.connections(self.timeout) {
            Ok(connections) => connections,
            Err(err) => {
                warn!("Could not list active connections: {err}");
                return AttributionOutcome::Unavailable(err);
            }
        };

        // PID 0 is the idle/kernel pseudo-process, not an application.
        let pids: Vec<Pid> = connections
            .iter()
            .filter_map(|connection| connection.pid)
            .filter(|pid| *pid != 0)
            .collect::<HashSet<_>>()
            .into_iter()
            .sorted()
            .collect();

        let unowned = connections
            .iter()
            .filter(|connection| matches!(connection.pid, None | Some(0)))
            .count();
        if pids.is_empty() && unowned > 0 {
            debug!(
                "{unowned} connection(s) listed but none had a visible owner; the listing may \
                need elevated privileges."
            );
        }

        self.resolver.refresh(&pids);

        let (names, unresolved): (Vec<_>, Vec<_>) = pids
            .into_iter()
            .map(|pid| self.resolver.resolve(pid).map_err(|err| (pid, err)))
            .partition_result();

        if !unresolved.is_empty() {
            debug!(
                "{} of {} connection owners could not be resolved.",
                unresolved.len(),
                unresolved.len() + names.len()
            );
        }

        let apps = names
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .take(MAX_APPS)
            .collect();

        AttributionOutcome::Resolved {
            apps,
            unresolved,
            unowned,
        }
    }
}
