use serde::Deserialize;

use super::StringOrNum;

/// Sampling configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq, Eq))]
pub(crate) struct CollectorConfig {
    /// The interface whose counters are sampled.
    pub(crate) interface: Option<String>,
    /// Time between ticks.
    pub(crate) interval: Option<StringOrNum>,
    /// Upper bound on one connection listing.
    pub(crate) enumerator_timeout: Option<StringOrNum>,
}
