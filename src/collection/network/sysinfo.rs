//! Gets network counters via sysinfo.

use sysinfo::Networks;

use super::{CounterSource, InterfaceCounters};

/// A [`CounterSource`] backed by sysinfo's interface list.
pub struct SysinfoCounters {
    networks: Networks,
}

impl Default for SysinfoCounters {
    fn default() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl CounterSource for SysinfoCounters {
    fn counters(&mut self, interface: &str) -> Option<InterfaceCounters> {
        // Interfaces can come and go between ticks, so the list is refreshed too.
        self.networks.refresh(true);

        self.networks
            .list()
            .get(interface)
            .map(|network| InterfaceCounters {
                total_received: network.total_received(),
                total_transmitted: network.total_transmitted(),
            })
    }

    fn interface_names(&mut self) -> Vec<String> {
        self.networks.refresh(true);
        self.networks.list().keys().cloned().collect()
    }
}
