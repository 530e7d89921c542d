//! Test instances, expectations and their results.
//!
//! A test instance moves through `Pending -> Running` and ends in exactly
//! one of `Passed`, `Failed` (an expectation did not hold) or `Errored`
//! (no response to check, e.g. a transport failure).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Response status equals `expected`.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// Top-level body field equals `expected`.
    FieldEquals {
        /// Field name in the JSON body.
        field: String,
        /// Expected value.
        expected: Value,
    },
    /// Top-level body field exists, any value.
    FieldPresent {
        /// Field name in the JSON body.
        field: String,
    },
    /// Body is a JSON array with at least one element.
    NonEmptyList,
}

impl Expectation {
    /// Exact status expectation.
    #[must_use]
    pub const fn status(expected: u16) -> Self {
        Self::StatusCode { expected }
    }

    /// Field equality expectation.
    #[must_use]
    pub fn field_equals(field: impl Into<String>, expected: Value) -> Self {
        Self::FieldEquals {
            field: field.into(),
            expected,
        }
    }

    /// Field presence expectation.
    #[must_use]
    pub fn field_present(field: impl Into<String>) -> Self {
        Self::FieldPresent {
            field: field.into(),
        }
    }

    /// Whether evaluating this needs a JSON body.
    #[must_use]
    pub const fn needs_json(&self) -> bool {
        !matches!(self, Self::StatusCode { .. })
    }

    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code = {expected}"),
            Self::FieldEquals { field, expected } => format!("Field '{field}' equals {expected}"),
            Self::FieldPresent { field } => format!("Field '{field}' is present"),
            Self::NonEmptyList => "Body is a non-empty list".to_string(),
        }
    }
}

/// Result of evaluating a single expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    /// The expectation that was evaluated.
    pub expectation: Expectation,
    /// Whether it held.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Failure message.
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(expectation: Expectation) -> Self {
        Self {
            expectation,
            passed: true,
            actual: None,
            message: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(expectation: Expectation, actual: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: true,
            actual: Some(actual.into()),
            message: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(expectation: Expectation, message: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: false,
            actual: None,
            message: Some(message.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        expectation: Expectation,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            expectation,
            passed: false,
            actual: Some(actual.into()),
            message: Some(message.into()),
        }
    }
}

/// Lifecycle state of a test instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstanceState {
    /// Collected, not started.
    #[default]
    Pending,
    /// Operation in flight.
    Running,
    /// Every expectation held.
    Passed,
    /// At least one expectation did not hold.
    Failed,
    /// No response could be checked.
    Errored,
}

impl InstanceState {
    /// Returns true for `Passed`, `Failed` and `Errored`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::Errored)
    }

    /// Returns whether `self -> next` is a legal transition.
    ///
    /// There is no way back to `Pending` and terminal states are final.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Running, Self::Passed | Self::Failed | Self::Errored)
        )
    }

    /// Short label used in run output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "ok",
            Self::Failed => "FAILED",
            Self::Errored => "ERROR",
        }
    }
}

/// Identifier of a test instance.
///
/// Case-driven instances carry their group; fixed scenarios do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    /// Case group, `None` for fixed scenarios.
    pub group: Option<String>,
    /// Case or scenario name.
    pub name: String,
}

impl InstanceId {
    /// Id of an instance expanded from a case group.
    #[must_use]
    pub fn case(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            name: name.into(),
        }
    }

    /// Id of a fixed scenario.
    #[must_use]
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{group}::{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Terminal outcome of one test instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceReport {
    /// Which instance.
    pub id: InstanceId,
    /// Terminal state.
    pub state: InstanceState,
    /// Evaluated expectations (empty when errored).
    pub checks: Vec<CheckResult>,
    /// Error message when errored.
    pub error: Option<String>,
    /// Wall time of the instance in milliseconds.
    pub duration_ms: u64,
}

impl InstanceReport {
    /// Builds a report from evaluated checks: `Passed` if all held.
    #[must_use]
    pub fn from_checks(id: InstanceId, checks: Vec<CheckResult>, duration_ms: u64) -> Self {
        let state = if checks.iter().all(|c| c.passed) {
            InstanceState::Passed
        } else {
            InstanceState::Failed
        };
        Self {
            id,
            state,
            checks,
            error: None,
            duration_ms,
        }
    }

    /// Builds an `Errored` report.
    #[must_use]
    pub fn errored(id: InstanceId, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id,
            state: InstanceState::Errored,
            checks: Vec::new(),
            error: Some(error.into()),
            duration_ms,
        }
    }

    /// Checks that did not hold.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier of the run.
    pub run_id: Uuid,
    /// When the first instance started.
    pub started_at: DateTime<Utc>,
    /// Instance reports in execution order.
    pub instances: Vec<InstanceReport>,
    /// Number of passed instances.
    pub passed: usize,
    /// Number of failed instances.
    pub failed: usize,
    /// Number of errored instances.
    pub errored: usize,
    /// Total wall time in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Creates a report and tallies the states.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, instances: Vec<InstanceReport>, duration_ms: u64) -> Self {
        let count = |state: InstanceState| instances.iter().filter(|i| i.state == state).count();
        let passed = count(InstanceState::Passed);
        let failed = count(InstanceState::Failed);
        let errored = count(InstanceState::Errored);

        Self {
            run_id: Uuid::now_v7(),
            started_at,
            instances,
            passed,
            failed,
            errored,
            duration_ms,
        }
    }

    /// Number of instances run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.instances.len()
    }

    /// True if nothing failed or errored.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Looks up an instance report by its display id.
    #[must_use]
    pub fn instance(&self, id: &str) -> Option<&InstanceReport> {
        self.instances.iter().find(|i| i.id.to_string() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_expectation_description() {
        assert_eq!(Expectation::status(200).description(), "Status code = 200");
        assert_eq!(
            Expectation::field_equals("userId", json!(1)).description(),
            "Field 'userId' equals 1"
        );
        assert_eq!(
            Expectation::field_present("id").description(),
            "Field 'id' is present"
        );
        assert!(!Expectation::status(200).needs_json());
        assert!(Expectation::NonEmptyList.needs_json());
    }

    #[test]
    fn test_state_transitions() {
        use InstanceState::{Errored, Failed, Passed, Pending, Running};

        assert!(Pending.can_transition_to(Running));
        assert!(Running.can_transition_to(Passed));
        assert!(Running.can_transition_to(Failed));
        assert!(Running.can_transition_to(Errored));
        assert!(!Pending.can_transition_to(Passed));
        assert!(!Failed.can_transition_to(Pending));
        assert!(!Passed.can_transition_to(Running));
        assert!(Errored.is_terminal());
        assert!(!Running.is_terminal());
    }

    #[test]
    fn test_instance_id_display() {
        assert_eq!(
            InstanceId::case("get_post_cases", "get post 1").to_string(),
            "get_post_cases::get post 1"
        );
        assert_eq!(InstanceId::fixed("list_posts").to_string(), "list_posts");
    }

    #[test]
    fn test_report_from_checks() {
        let ok = InstanceReport::from_checks(
            InstanceId::fixed("a"),
            vec![CheckResult::pass(Expectation::status(200))],
            3,
        );
        assert_eq!(ok.state, InstanceState::Passed);

        let bad = InstanceReport::from_checks(
            InstanceId::fixed("b"),
            vec![
                CheckResult::pass(Expectation::status(200)),
                CheckResult::fail(Expectation::field_present("id"), "Field 'id' not found"),
            ],
            3,
        );
        assert_eq!(bad.state, InstanceState::Failed);
        assert_eq!(bad.failures().count(), 1);
    }

    #[test]
    fn test_run_report_counts() {
        let instances = vec![
            InstanceReport::from_checks(InstanceId::fixed("a"), Vec::new(), 1),
            InstanceReport::from_checks(
                InstanceId::fixed("b"),
                vec![CheckResult::fail(Expectation::status(200), "Expected status = 200, got 404")],
                1,
            ),
            InstanceReport::errored(InstanceId::case("g", "c"), "connection refused", 1),
        ];

        let report = RunReport::new(Utc::now(), instances, 10);
        assert_eq!(report.total(), 3);
        assert_eq!((report.passed, report.failed, report.errored), (1, 1, 1));
        assert!(!report.all_passed());
        assert_eq!(
            report.instance("g::c").map(|i| i.state),
            Some(InstanceState::Errored)
        );
    }
}
