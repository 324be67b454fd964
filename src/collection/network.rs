//! Data collection for network usage/IO.

pub mod sysinfo;
pub use self::sysinfo::*;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::utils::data_units::{bytes_to_mb, round_hundredths};

/// Cumulative byte counters of one interface, as reported by the OS. These
/// count from the last interface reset or boot, not from midnight.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub total_received: u64,
    pub total_transmitted: u64,
}

/// A source of per-interface cumulative counters.
pub trait CounterSource {
    /// Refreshes and returns the counters for `interface`, or `None` if no
    /// interface by that name currently exists.
    fn counters(&mut self, interface: &str) -> Option<InterfaceCounters>;

    /// Names of the interfaces currently present.
    fn interface_names(&mut self) -> Vec<String>;
}

/// One sampled `{sent, received}` pair, in megabytes.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "sent_MB")]
    pub sent_mb: f64,
    #[serde(rename = "recv_MB")]
    pub recv_mb: f64,
}

impl Measurement {
    pub fn new(sent_mb: f64, recv_mb: f64) -> Self {
        Self { sent_mb, recv_mb }
    }

    pub fn from_counters(counters: InterfaceCounters) -> Self {
        Self {
            sent_mb: bytes_to_mb(counters.total_transmitted),
            recv_mb: bytes_to_mb(counters.total_received),
        }
    }

    /// Sent plus received, in megabytes.
    pub fn total(&self) -> f64 {
        round_hundredths(self.sent_mb + self.recv_mb)
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.sent_mb, self.recv_mb]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

/// Samples the counters of a single configured interface.
pub struct CounterSampler {
    source: Box<dyn CounterSource>,
    interface: String,
}

impl CounterSampler {
    pub fn new(source: Box<dyn CounterSource>, interface: impl Into<String>) -> Self {
        Self {
            source,
            interface: interface.into(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Reads the interface's counters. A missing interface (renamed, or the
    /// adapter switched off) reads as zero rather than failing.
    pub fn sample(&mut self) -> Measurement {
        match self.source.counters(&self.interface) {
            Some(counters) => Measurement::from_counters(counters),
            None => {
                debug!("Interface '{}' not found, sampling as zero.", self.interface);
                Measurement::default()
            }
        }
    }

    /// Interfaces the underlying source can see, sorted.
    pub fn available_interfaces(&mut self) -> Vec<String> {
        let mut names = self.source.interface_names();
        names.sort();
        names
    }
}
