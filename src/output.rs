// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON-lines output modes.

use serde::Serialize;
use std::time::Instant;

use crate::teardown::TeardownReport;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

impl OutputMode {
    /// `--json` wins over `--quiet`.
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        match (quiet, json) {
            (_, true) => OutputMode::Json,
            (true, false) => OutputMode::Quiet,
            (false, false) => OutputMode::Normal,
        }
    }
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// A status observation. JSON mode emits it as an `update` event.
    pub fn update<T: Serialize>(&self, message: &str, data: &T) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent {
                event: "update",
                message,
                duration_secs: self.duration(),
                data: Some(data),
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({elapsed:.1}s)");
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => emit(&JsonEvent::<()> {
                event: "success",
                message,
                duration_secs: self.duration(),
                data: None,
            }),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent::<()> {
                event: "warning",
                message,
                duration_secs: None,
                data: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent::<()> {
                    event: "error",
                    message,
                    duration_secs: self.duration(),
                    data: None,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print a teardown report: one line per step, then the summary.
    pub fn report(&self, report: &TeardownReport) {
        match self.mode {
            OutputMode::Normal => {
                for notice in &report.notices {
                    println!("  ! {notice}");
                }
                for step in &report.steps {
                    match &step.error {
                        None => println!("  ✓ {}", step.id),
                        Some(error) => println!("  ✗ {}: {error}", step.id),
                    }
                }
                for id in &report.skipped {
                    println!("  - {id} (skipped)");
                }
                println!("{}", report.summary());
            }
            OutputMode::Quiet => println!("{}", report.summary()),
            OutputMode::Json => emit(&JsonEvent {
                event: "report",
                message: &report.summary(),
                duration_secs: self.duration(),
                data: Some(report),
            }),
        }
    }
}

fn emit<T: Serialize>(event: &JsonEvent<'_, T>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a, T> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}
