use serde::Deserialize;

/// Alert configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq))]
pub(crate) struct AlertConfig {
    /// The daily total, in MB, above which a warning is raised.
    pub(crate) daily_limit_mb: Option<f64>,
}
