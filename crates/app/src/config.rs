//! Run configuration.

use std::path::PathBuf;

use restcase_application::{InstanceFilter, TransportConfig};

/// Case file read when no path is given.
pub const DEFAULT_CASES_PATH: &str = "data/posts_data.yaml";

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Case definition file.
    pub cases_path: PathBuf,
    /// Which instances to run.
    pub filter: InstanceFilter,
    /// Print the collected ids instead of running.
    pub list: bool,
    /// Endpoint, headers and timeout.
    pub transport: TransportConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cases_path: PathBuf::from(DEFAULT_CASES_PATH),
            filter: InstanceFilter::all(),
            list: false,
            transport: TransportConfig::default(),
        }
    }
}
