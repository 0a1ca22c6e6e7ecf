// ABOUTME: Aggregate outcome of executing a teardown plan.
// ABOUTME: One result per attempted step, in plan order, plus what was skipped and why.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub id: String,
    pub kind: ResourceKind,
    pub required: bool,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    /// Attempted steps in plan order.
    pub steps: Vec<StepResult>,
    /// Steps never attempted because a required step failed first.
    pub skipped: Vec<String>,
    /// True iff every required step in the plan succeeded.
    pub overall_succeeded: bool,
    /// The required step whose failure stopped the plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TeardownReport {
    pub fn step(&self, id: &str) -> Option<&StepResult> {
        self.steps.iter().find(|result| result.id == id)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|result| !result.succeeded)
    }

    pub fn succeeded_count(&self) -> usize {
        self.steps.iter().filter(|result| result.succeeded).count()
    }

    /// One line for humans.
    pub fn summary(&self) -> String {
        let attempted = self.steps.len();
        let succeeded = self.succeeded_count();
        match &self.halted_at {
            Some(id) => format!(
                "{succeeded} of {attempted} steps succeeded; halted at '{id}', {} skipped",
                self.skipped.len()
            ),
            None if succeeded == attempted => format!("all {attempted} steps succeeded"),
            None => format!(
                "{succeeded} of {attempted} steps succeeded; {} optional step(s) failed",
                attempted - succeeded
            ),
        }
    }
}
