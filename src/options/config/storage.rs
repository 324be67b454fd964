use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq, Eq))]
pub(crate) struct StorageConfig {
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) report_dir: Option<PathBuf>,
}
