// ABOUTME: Ordered teardown plan built from steps and concurrent batches.
// ABOUTME: Plans are built once per delete invocation and consumed by the orchestrator.

use super::TeardownStep;

pub(crate) enum PlanEntry {
    Single(TeardownStep),
    /// Lanes started together and joined all-settled. Steps within a lane
    /// run in order, and a required failure skips the rest of its lane.
    Parallel(Vec<Vec<TeardownStep>>),
}

impl PlanEntry {
    pub(crate) fn step_ids(&self) -> Vec<String> {
        match self {
            PlanEntry::Single(step) => vec![step.id().to_string()],
            PlanEntry::Parallel(lanes) => lanes
                .iter()
                .flatten()
                .map(|step| step.id().to_string())
                .collect(),
        }
    }
}

/// Steps in execution order, plus notices for the final report.
#[derive(Default)]
pub struct TeardownPlan {
    entries: Vec<PlanEntry>,
    notices: Vec<String>,
}

impl TeardownPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: TeardownStep) -> Self {
        self.push(step);
        self
    }

    /// Append a batch whose steps run concurrently. Results keep plan order.
    pub fn parallel(mut self, steps: Vec<TeardownStep>) -> Self {
        self.push_parallel(steps);
        self
    }

    /// Append a batch of sequences: lanes run concurrently, each in order.
    pub fn lanes(mut self, lanes: Vec<Vec<TeardownStep>>) -> Self {
        self.push_lanes(lanes);
        self
    }

    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notices.push(notice.into());
        self
    }

    pub fn push(&mut self, step: TeardownStep) {
        self.entries.push(PlanEntry::Single(step));
    }

    pub fn push_parallel(&mut self, steps: Vec<TeardownStep>) {
        self.push_lanes(steps.into_iter().map(|step| vec![step]).collect());
    }

    pub fn push_lanes(&mut self, lanes: Vec<Vec<TeardownStep>>) {
        let lanes: Vec<_> = lanes.into_iter().filter(|lane| !lane.is_empty()).collect();
        if !lanes.is_empty() {
            self.entries.push(PlanEntry::Parallel(lanes));
        }
    }

    /// Number of steps, counting each member of a batch.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                PlanEntry::Single(_) => 1,
                PlanEntry::Parallel(lanes) => lanes.iter().map(Vec::len).sum(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn step_ids(&self) -> Vec<String> {
        self.entries.iter().flat_map(PlanEntry::step_ids).collect()
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub(crate) fn into_parts(self) -> (Vec<PlanEntry>, Vec<String>) {
        (self.entries, self.notices)
    }
}

impl std::fmt::Debug for TeardownPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeardownPlan")
            .field("steps", &self.step_ids())
            .field("notices", &self.notices)
            .finish()
    }
}
