// ABOUTME: Executes a teardown plan and aggregates every step outcome into one report.
// ABOUTME: Required failures halt the plan; optional failures are recorded and skipped past.

use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, warn};

use super::plan::PlanEntry;
use super::step::StepInfo;
use super::{StepResult, TeardownPlan, TeardownReport, TeardownStep};
use crate::ops::OpsError;

/// Runs [`TeardownPlan`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeardownOrchestrator;

impl TeardownOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Execute `plan`. Never fails: every step failure lands in the report.
    pub async fn execute(&self, plan: TeardownPlan) -> TeardownReport {
        let started_at = Utc::now();
        let (entries, notices) = plan.into_parts();
        info!(entries = entries.len(), "starting teardown");

        let mut steps = Vec::new();
        let mut skipped = Vec::new();
        let mut halted_at = None;
        let mut entries = entries.into_iter();

        while let Some(entry) = entries.next() {
            let (results, lane_skipped) = match entry {
                PlanEntry::Single(step) => (vec![run_step(step).await], Vec::new()),
                PlanEntry::Parallel(lanes) => run_batch(lanes).await,
            };
            let halt = results
                .iter()
                .find(|result| result.required && !result.succeeded)
                .map(|result| result.id.clone());
            steps.extend(results);
            skipped.extend(lane_skipped);

            if let Some(id) = halt {
                skipped.extend(entries.by_ref().flat_map(|entry| entry.step_ids()));
                error!(step = %id, skipped = skipped.len(), "required teardown step failed, halting");
                halted_at = Some(id);
                break;
            }
        }

        let overall_succeeded = halted_at.is_none()
            && steps
                .iter()
                .filter(|result| result.required)
                .all(|result| result.succeeded);

        let report = TeardownReport {
            steps,
            skipped,
            overall_succeeded,
            halted_at,
            notices,
            started_at,
            finished_at: Utc::now(),
        };
        info!(summary = %report.summary(), "teardown finished");
        report
    }
}

async fn run_step(step: TeardownStep) -> StepResult {
    let (info, action) = step.into_parts();
    info!(step = %info.id, kind = %info.kind, "running teardown step");
    let outcome = action().await;
    record(info, outcome)
}

/// Lanes are joined all-settled; results keep lane order, not finish order.
async fn run_batch(lanes: Vec<Vec<TeardownStep>>) -> (Vec<StepResult>, Vec<String>) {
    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for (lane_results, lane_skipped) in join_all(lanes.into_iter().map(run_lane)).await {
        results.extend(lane_results);
        skipped.extend(lane_skipped);
    }
    (results, skipped)
}

/// Steps of one lane in order. A required failure skips the rest of the lane.
async fn run_lane(lane: Vec<TeardownStep>) -> (Vec<StepResult>, Vec<String>) {
    let mut results = Vec::new();
    let mut steps = lane.into_iter();
    while let Some(step) = steps.next() {
        let result = run_step(step).await;
        let halted = result.required && !result.succeeded;
        results.push(result);
        if halted {
            let rest: Vec<String> = steps.map(|step| step.id().to_string()).collect();
            if !rest.is_empty() {
                warn!(skipped = ?rest, "skipping the rest of the lane");
            }
            return (results, rest);
        }
    }
    (results, Vec::new())
}

fn record(info: StepInfo, outcome: Result<(), OpsError>) -> StepResult {
    let error = match outcome {
        Ok(()) => {
            info!(step = %info.id, "teardown step succeeded");
            None
        }
        Err(err) if info.required => {
            error!(step = %info.id, error = %err, "required teardown step failed");
            Some(err.to_string())
        }
        Err(err) => {
            warn!(step = %info.id, error = %err, "optional teardown step failed");
            Some(err.to_string())
        }
    };
    StepResult {
        id: info.id,
        kind: info.kind,
        required: info.required,
        succeeded: error.is_none(),
        error,
    }
}
