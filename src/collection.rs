//! Data collection: interface counters and the applications behind active
//! connections.
//!
//! Everything platform-specific sits behind a trait ([`network::CounterSource`],
//! [`connections::ConnectionEnumerator`], [`processes::ProcessResolver`]) with a
//! default implementation, so the collector can be driven by fakes in tests.

pub mod attribution;
pub mod connections;
pub mod error;
pub mod network;
pub mod processes;

pub use attribution::{Attribution, AttributionOutcome, MAX_APPS, UNAVAILABLE_SENTINEL};
pub use connections::{CommandEnumerator, Connection, ConnectionEnumerator};
pub use network::{CounterSampler, CounterSource, Measurement, SysinfoCounters};
pub use processes::{Pid, ProcessResolver, SysinfoResolver};
