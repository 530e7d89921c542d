//! Command line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use restcase_application::{DEFAULT_BASE_URL, InstanceFilter, TransportConfig};

use crate::config::{DEFAULT_CASES_PATH, RunConfig};

/// Data-driven REST API test runner.
#[derive(Debug, Parser)]
#[command(name = "restcase")]
#[command(author, version)]
#[command(about = "Runs the posts API suite against a REST endpoint")]
pub struct Cli {
    /// Only run tests whose id contains this string
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    /// Case definition file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CASES_PATH)]
    pub cases: PathBuf,

    /// Endpoint every request path is appended to
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Match FILTER against whole test ids
    #[arg(long)]
    pub exact: bool,

    /// List the collected tests without running them
    #[arg(long)]
    pub list: bool,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Turns parsed arguments into a run configuration.
    #[must_use]
    pub fn into_config(self) -> RunConfig {
        let filter = self
            .filter
            .map_or_else(InstanceFilter::all, |pattern| InstanceFilter::new(pattern, self.exact));

        RunConfig {
            cases_path: self.cases,
            filter,
            list: self.list,
            transport: TransportConfig::new(self.base_url)
                .with_timeout(Duration::from_secs(self.timeout_secs)),
        }
    }
}
