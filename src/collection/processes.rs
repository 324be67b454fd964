//! Resolution of process identifiers to application names.

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use super::error::{CollectionError, CollectionResult};

/// A process ID, as reported by the connection enumerator.
pub type Pid = u32;

/// Maps process IDs to display names. Each lookup succeeds or fails on its
/// own; one unknown PID never affects the others.
pub trait ProcessResolver {
    /// Prepares for a batch of lookups. Called once per tick before
    /// [`ProcessResolver::resolve`].
    fn refresh(&mut self, _pids: &[Pid]) {}

    /// The display name of the process with `pid`.
    fn resolve(&self, pid: Pid) -> CollectionResult<String>;
}

/// A [`ProcessResolver`] backed by sysinfo's process table.
pub struct SysinfoResolver {
    system: System,
}

impl Default for SysinfoResolver {
    fn default() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl ProcessResolver for SysinfoResolver {
    fn refresh(&mut self, pids: &[Pid]) {
        let pids: Vec<sysinfo::Pid> = pids.iter().map(|pid| sysinfo::Pid::from_u32(*pid)).collect();

        // Only the name is needed, so skip CPU, memory, and disk details.
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing(),
        );
    }

    fn resolve(&self, pid: Pid) -> CollectionResult<String> {
        self.system
            .process(sysinfo::Pid::from_u32(pid))
            .map(|process| process.name().to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .ok_or(CollectionError::UnknownProcess(pid))
    }
}
