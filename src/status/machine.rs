// ABOUTME: The lifecycle every status poller moves through.
// ABOUTME: Polling until one absorbing end state: terminal, cancelled, exhausted, or failed.

use serde::Serialize;

use crate::poll::PollOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerState {
    #[default]
    Polling,
    Terminal,
    Cancelled,
    Exhausted,
    Failed,
}

/// Something that happened during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerEvent {
    Observed {
        terminal: bool,
        iterations_remaining: bool,
    },
    CancelRequested,
    FetchFailed,
}

impl PollerState {
    pub fn transition(self, event: PollerEvent) -> Self {
        if self.is_absorbing() {
            return self;
        }
        match event {
            PollerEvent::Observed { terminal: true, .. } => PollerState::Terminal,
            PollerEvent::Observed {
                iterations_remaining: true,
                ..
            } => PollerState::Polling,
            PollerEvent::Observed { .. } => PollerState::Exhausted,
            PollerEvent::CancelRequested => PollerState::Cancelled,
            PollerEvent::FetchFailed => PollerState::Failed,
        }
    }

    pub fn is_absorbing(self) -> bool {
        !matches!(self, PollerState::Polling)
    }

    /// The end state a finished poll session corresponds to.
    pub fn from_outcome<S, E>(outcome: &PollOutcome<S, E>) -> Self {
        match outcome {
            PollOutcome::Completed(_) => PollerState::Terminal,
            PollOutcome::Cancelled => PollerState::Cancelled,
            PollOutcome::Exhausted(_) => PollerState::Exhausted,
            PollOutcome::Failed(_) => PollerState::Failed,
        }
    }
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PollerState::Polling => "polling",
            PollerState::Terminal => "terminal",
            PollerState::Cancelled => "cancelled",
            PollerState::Exhausted => "exhausted",
            PollerState::Failed => "failed",
        };
        f.write_str(s)
    }
}
