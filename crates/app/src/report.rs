//! libtest-style console output.

use std::io::{self, Write};
use std::time::Duration;

use restcase_application::TestInstance;
use restcase_domain::{InstanceReport, InstanceState, RunReport};

/// `--list` output: one line per collected instance, then a count.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_listing(out: &mut impl Write, instances: &[TestInstance]) -> io::Result<()> {
    for instance in instances {
        writeln!(out, "{}: test", instance.id)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", plural(instances.len(), "test"))
}

/// Header printed before the first instance runs.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_running(out: &mut impl Write, count: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "running {}", plural(count, "test"))
}

/// One line per finished instance.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_outcome(out: &mut impl Write, report: &InstanceReport) -> io::Result<()> {
    writeln!(out, "test {} ... {}", report.id, report.state.label())
}

/// Failure details and the result line.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_summary(out: &mut impl Write, report: &RunReport) -> io::Result<()> {
    let unsuccessful: Vec<_> = report
        .instances
        .iter()
        .filter(|i| i.state != InstanceState::Passed)
        .collect();

    if !unsuccessful.is_empty() {
        writeln!(out)?;
        writeln!(out, "failures:")?;
        for instance in &unsuccessful {
            writeln!(out)?;
            writeln!(out, "---- {} ----", instance.id)?;
            if let Some(error) = &instance.error {
                writeln!(out, "transport error: {error}")?;
            }
            for check in instance.failures() {
                write!(out, "{}", check.expectation.description())?;
                if let Some(message) = &check.message {
                    write!(out, ": {message}")?;
                }
                writeln!(out)?;
            }
        }
        writeln!(out)?;
        writeln!(out, "failures:")?;
        for instance in &unsuccessful {
            writeln!(out, "    {}", instance.id)?;
        }
    }

    let verdict = if report.all_passed() { "ok" } else { "FAILED" };
    writeln!(out)?;
    writeln!(
        out,
        "test result: {verdict}. {} passed; {} failed; {} errored; finished in {:.2}s",
        report.passed,
        report.failed,
        report.errored,
        Duration::from_millis(report.duration_ms).as_secs_f64()
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use restcase_domain::{CheckResult, Expectation, InstanceId};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn mixed_report() -> RunReport {
        RunReport::new(
            Utc::now(),
            vec![
                InstanceReport::from_checks(
                    InstanceId::fixed("list_posts"),
                    vec![CheckResult::pass(Expectation::status(200))],
                    3,
                ),
                InstanceReport::from_checks(
                    InstanceId::case("get_post_cases", "get post 1"),
                    vec![CheckResult::fail(
                        Expectation::status(200),
                        "Expected status 200, got 404",
                    )],
                    3,
                ),
                InstanceReport::errored(
                    InstanceId::fixed("delete_post"),
                    "request timed out after 10000ms",
                    3,
                ),
            ],
            1500,
        )
    }

    #[test]
    fn test_outcome_lines() {
        let report = mixed_report();
        let text = render(|out| {
            report
                .instances
                .iter()
                .try_for_each(|instance| write_outcome(out, instance))
        });

        assert_eq!(
            text,
            "test list_posts ... ok\n\
             test get_post_cases::get post 1 ... FAILED\n\
             test delete_post ... ERROR\n"
        );
    }

    #[test]
    fn test_summary_with_failures() {
        let text = render(|out| write_summary(out, &mixed_report()));

        assert_eq!(
            text,
            "\nfailures:\n\
             \n---- get_post_cases::get post 1 ----\n\
             Status code = 200: Expected status 200, got 404\n\
             \n---- delete_post ----\n\
             transport error: request timed out after 10000ms\n\
             \nfailures:\n    get_post_cases::get post 1\n    delete_post\n\
             \ntest result: FAILED. 1 passed; 1 failed; 1 errored; finished in 1.50s\n"
        );
    }

    #[test]
    fn test_summary_all_passed() {
        let report = RunReport::new(Utc::now(), Vec::new(), 0);
        let text = render(|out| write_summary(out, &report));

        assert_eq!(
            text,
            "\ntest result: ok. 0 passed; 0 failed; 0 errored; finished in 0.00s\n"
        );
    }

    #[test]
    fn test_running_header() {
        assert_eq!(render(|out| write_running(out, 1)), "\nrunning 1 test\n");
        assert_eq!(render(|out| write_running(out, 6)), "\nrunning 6 tests\n");
    }
}
