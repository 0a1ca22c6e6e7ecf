// ABOUTME: Poll cadence and budgets for stack and replica pollers.
// ABOUTME: Durations are humantime strings such as 5s or 1m.

use serde::Deserialize;
use std::time::Duration;

use crate::status::{DEFAULT_EVENT_WINDOW, ReplicaPollSettings, StackPollSettings};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollingConfig {
    #[serde(default)]
    pub stack: StackPolling,

    #[serde(default)]
    pub replicas: ReplicaPolling,

    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackPolling {
    #[serde(default = "default_stack_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_stack_iterations")]
    pub max_iterations: u32,

    #[serde(default = "default_event_window")]
    pub event_window: usize,
}

impl Default for StackPolling {
    fn default() -> Self {
        Self {
            interval: default_stack_interval(),
            max_iterations: default_stack_iterations(),
            event_window: default_event_window(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplicaPolling {
    #[serde(default = "default_start_interval", with = "humantime_serde")]
    pub start_interval: Duration,

    #[serde(default = "default_stop_interval", with = "humantime_serde")]
    pub stop_interval: Duration,

    #[serde(default = "default_replica_iterations")]
    pub max_iterations: u32,
}

impl Default for ReplicaPolling {
    fn default() -> Self {
        Self {
            start_interval: default_start_interval(),
            stop_interval: default_stop_interval(),
            max_iterations: default_replica_iterations(),
        }
    }
}

/// Retries of transient fetch failures; zero keeps polls fail-fast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub transient_attempts: u32,
}

fn default_stack_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_stack_iterations() -> u32 {
    720
}

fn default_event_window() -> usize {
    DEFAULT_EVENT_WINDOW
}

fn default_start_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_stop_interval() -> Duration {
    Duration::from_secs(7)
}

fn default_replica_iterations() -> u32 {
    120
}

impl PollingConfig {
    /// Zero intervals and budgets are rejected before any poll starts.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let durations = [
            ("polling.stack.interval", self.stack.interval),
            ("polling.replicas.start_interval", self.replicas.start_interval),
            ("polling.replicas.stop_interval", self.replicas.stop_interval),
        ];
        for (field, value) in durations {
            if value.is_zero() {
                problems.push(format!("{field} must be greater than zero"));
            }
        }
        let budgets = [
            ("polling.stack.max_iterations", self.stack.max_iterations),
            ("polling.replicas.max_iterations", self.replicas.max_iterations),
        ];
        for (field, value) in budgets {
            if value == 0 {
                problems.push(format!("{field} must be greater than zero"));
            }
        }
        problems
    }

    pub fn stack_settings(&self) -> StackPollSettings {
        StackPollSettings {
            interval: self.stack.interval,
            max_iterations: self.stack.max_iterations,
            event_window: self.stack.event_window,
            retry_attempts: self.retry.transient_attempts,
        }
    }

    pub fn replica_settings(&self) -> ReplicaPollSettings {
        ReplicaPollSettings {
            start_interval: self.replicas.start_interval,
            stop_interval: self.replicas.stop_interval,
            max_iterations: self.replicas.max_iterations,
            retry_attempts: self.retry.transient_attempts,
        }
    }
}
