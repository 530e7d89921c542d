//! Restcase runner - wiring and console front end
//!
//! Loads the case book, builds the reqwest-backed clients and drives the
//! case runner, printing libtest-style output.

pub mod cli;
pub mod config;
pub mod report;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use restcase_application::{ApiClient, CaseRunner, HttpClient, ResourceClient, RunEvent};
use restcase_domain::CaseBook;
use restcase_infrastructure::{ReqwestHttpClient, shared_case_book};
use tracing::info;

pub use cli::Cli;
pub use config::RunConfig;

/// Runs the posts suite as configured. Returns whether every selected
/// instance passed.
///
/// # Errors
///
/// Setup failures: the case file cannot be loaded or violates its group
/// bindings, or the HTTP client cannot be built. No instance runs then.
pub async fn run(config: &RunConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    info!(
        cases = %config.cases_path.display(),
        base_url = %config.transport.base_url,
        "starting run"
    );
    let book = shared_case_book(&config.cases_path).context("cannot load test cases")?;
    let client = ReqwestHttpClient::new().context("cannot build the HTTP client")?;
    let api = ApiClient::new(Arc::new(client), config.transport.clone());
    let runner = CaseRunner::new(ResourceClient::posts(api));

    run_suite(&runner, book, config, out).await
}

/// Collects and runs (or lists) the instances of `book` on `runner`.
///
/// # Errors
///
/// Collection failures and write errors on `out`.
pub async fn run_suite<C: HttpClient>(
    runner: &CaseRunner<C>,
    book: &CaseBook,
    config: &RunConfig,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let instances = runner
        .collect(book, &config.filter)
        .context("cannot collect test instances")?;

    if config.list {
        report::write_listing(out, &instances)?;
        return Ok(true);
    }

    report::write_running(out, instances.len())?;
    let mut write_error = None;
    let run = runner
        .run_with(&instances, |event| {
            if let RunEvent::Finished(instance) = event
                && write_error.is_none()
                && let Err(err) = report::write_outcome(&mut *out, instance)
            {
                write_error = Some(err);
            }
        })
        .await;
    if let Some(err) = write_error {
        return Err(err.into());
    }

    report::write_summary(out, &run)?;
    out.flush()?;
    Ok(run.all_passed())
}
