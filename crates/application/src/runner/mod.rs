//! Data-driven test runner.
//!
//! Expands case groups into individually identified test instances, runs
//! them one after another against a shared [`ResourceClient`] and collects
//! a [`RunReport`].
//!
//! Instances are independent: a failed check or a transport error only
//! affects the instance it happened in.

mod binding;
mod check;
pub mod scenario;

use std::time::Instant;

use chrono::Utc;
use restcase_domain::{
    CaseBook, CaseGroup, CheckResult, Expectation, InstanceId, InstanceReport, InstanceState,
    RunReport,
};
use tracing::{info, warn};

pub use binding::{CaseOperation, GroupBinding, ResourceCall};
pub use check::evaluate;

use crate::error::{RunnerError, RunnerResult};
use crate::ports::HttpClient;
use crate::resource::ResourceClient;

/// One runnable unit: a call and the checks its response must pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TestInstance {
    /// Stable identifier.
    pub id: InstanceId,
    /// Resource operation to perform.
    pub call: ResourceCall,
    /// Checks in evaluation order.
    pub expectations: Vec<Expectation>,
}

/// Selects instances by id, libtest style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    pattern: Option<String>,
    exact: bool,
}

impl InstanceFilter {
    /// Matches every instance.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            pattern: None,
            exact: false,
        }
    }

    /// Matches ids containing `pattern`, or equal to it when `exact`.
    #[must_use]
    pub fn new(pattern: impl Into<String>, exact: bool) -> Self {
        Self {
            pattern: Some(pattern.into()),
            exact,
        }
    }

    /// Returns whether the instance is selected.
    #[must_use]
    pub fn matches(&self, id: &InstanceId) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        let id = id.to_string();
        if self.exact {
            id == *pattern
        } else {
            id.contains(pattern.as_str())
        }
    }
}

/// Progress notification emitted while running.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// The instance is about to execute.
    Started(&'a InstanceId),
    /// The instance reached a terminal state.
    Finished(&'a InstanceReport),
}

/// Runs test instances against one resource client.
///
/// A run is the `before` scenarios, then every case group of the book in
/// file order, then the `after` scenarios. Every bound group must be in
/// the book.
pub struct CaseRunner<C> {
    resource: ResourceClient<C>,
    bindings: Vec<GroupBinding>,
    before: Vec<TestInstance>,
    after: Vec<TestInstance>,
}

impl<C: HttpClient> CaseRunner<C> {
    /// Creates a runner for the posts suite: its bindings, `list_posts`
    /// before the case groups, `update_post` and `delete_post` after them.
    #[must_use]
    pub fn new(resource: ResourceClient<C>) -> Self {
        Self {
            resource,
            bindings: GroupBinding::defaults(),
            before: vec![scenario::list_posts()],
            after: vec![scenario::update_post(), scenario::delete_post()],
        }
    }

    /// Replaces the fixed scenarios.
    #[must_use]
    pub fn with_scenarios(mut self, before: Vec<TestInstance>, after: Vec<TestInstance>) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    /// Returns the binding of a group.
    #[must_use]
    pub fn binding(&self, group: &str) -> Option<&GroupBinding> {
        self.bindings.iter().find(|b| b.group == group)
    }

    /// Expands one group into one instance per case, in case order.
    ///
    /// # Errors
    ///
    /// [`RunnerError::UnknownGroup`] if no binding exists for the group,
    /// [`RunnerError::InvalidCases`] if a case violates the binding.
    pub fn expand(&self, group: &CaseGroup) -> RunnerResult<Vec<TestInstance>> {
        let binding = self
            .binding(&group.name)
            .ok_or_else(|| RunnerError::UnknownGroup(group.name.clone()))?;
        binding.validate(group)?;

        let instances = group
            .cases
            .iter()
            .map(|case| binding.instance_for(case))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(instances)
    }

    /// Collects the instances of a run in execution order, keeping only
    /// those selected by `filter`.
    ///
    /// Every group is validated even if the filter drops all its cases.
    ///
    /// # Errors
    ///
    /// See [`CaseRunner::expand`]. Once every group of the book expanded,
    /// [`RunnerError::MissingGroup`] if a bound group is not in the book.
    pub fn collect(&self, book: &CaseBook, filter: &InstanceFilter) -> RunnerResult<Vec<TestInstance>> {
        let mut instances = self.before.clone();
        for group in book.groups() {
            instances.extend(self.expand(group)?);
        }
        if let Some(missing) = self.bindings.iter().find(|b| book.group(&b.group).is_none()) {
            return Err(RunnerError::MissingGroup(missing.group.clone()));
        }
        instances.extend(self.after.iter().cloned());
        instances.retain(|instance| filter.matches(&instance.id));
        Ok(instances)
    }

    /// Runs one instance to a terminal state.
    pub async fn run_instance(&self, instance: &TestInstance) -> InstanceReport {
        let mut state = InstanceState::Pending;
        advance(&mut state, InstanceState::Running);

        let start = Instant::now();
        let outcome = instance.call.execute(&self.resource).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let report = match outcome {
            Ok(response) => {
                let checks = evaluate(&instance.expectations, &response);
                InstanceReport::from_checks(instance.id.clone(), checks, duration_ms)
            }
            Err(err) => InstanceReport::errored(instance.id.clone(), err.to_string(), duration_ms),
        };
        advance(&mut state, report.state);

        match report.state {
            InstanceState::Passed => info!(instance = %instance.id, duration_ms, "passed"),
            InstanceState::Failed => warn!(
                instance = %instance.id,
                failures = report.failures().count(),
                first = report.failures().next().map_or("", first_message),
                "failed"
            ),
            _ => warn!(
                instance = %instance.id,
                error = report.error.as_deref().unwrap_or_default(),
                "errored"
            ),
        }
        report
    }

    /// Runs instances in order.
    pub async fn run(&self, instances: &[TestInstance]) -> RunReport {
        self.run_with(instances, |_| {}).await
    }

    /// Runs instances in order, reporting progress to `on_event`.
    pub async fn run_with(
        &self,
        instances: &[TestInstance],
        mut on_event: impl FnMut(RunEvent<'_>),
    ) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut reports = Vec::with_capacity(instances.len());

        for instance in instances {
            on_event(RunEvent::Started(&instance.id));
            let report = self.run_instance(instance).await;
            on_event(RunEvent::Finished(&report));
            reports.push(report);
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let report = RunReport::new(started_at, reports, duration_ms);
        info!(
            run_id = %report.run_id,
            passed = report.passed,
            failed = report.failed,
            errored = report.errored,
            duration_ms,
            "run finished"
        );
        report
    }
}

fn advance(state: &mut InstanceState, next: InstanceState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {state:?} -> {next:?}"
    );
    *state = next;
}

fn first_message(check: &CheckResult) -> &str {
    check.message.as_deref().unwrap_or_default()
}
