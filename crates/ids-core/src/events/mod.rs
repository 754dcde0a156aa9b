//! Progress event emission.
//!
//! Long passes report liveness through a [`ProgressSink`]. Progress is a
//! side channel: sinks cannot fail and never influence the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard progress event names.
pub mod event_names {
    pub const SIMULATION_STARTED: &str = "simulation_started";
    pub const SIMULATION_PROGRESS: &str = "simulation_progress";
    pub const SIMULATION_COMPLETE: &str = "simulation_complete";
}

/// Pipeline phase for a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Baseline,
    Live,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Baseline => write!(f, "baseline"),
            Phase::Live => write!(f, "live"),
        }
    }
}

/// Structured progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub phase: Phase,
    pub current: u32,
    pub total: u32,
}

impl ProgressEvent {
    pub fn new(event: &str, phase: Phase, current: u32, total: u32) -> Self {
        Self {
            event: event.to_string(),
            timestamp: Utc::now(),
            phase,
            current,
            total,
        }
    }
}

/// Receiver of progress events.
pub trait ProgressSink {
    fn emit(&mut self, event: &ProgressEvent);
}

impl<F: FnMut(&ProgressEvent)> ProgressSink for F {
    fn emit(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&mut self, _event: &ProgressEvent) {}
}

/// Forwards events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&mut self, event: &ProgressEvent) {
        match event.event.as_str() {
            event_names::SIMULATION_PROGRESS => tracing::info!(
                phase = %event.phase,
                "Simulated day {}/{}",
                event.current,
                event.total
            ),
            event_names::SIMULATION_COMPLETE => tracing::info!(
                phase = %event.phase,
                days = event.total,
                "Finished simulation"
            ),
            other => tracing::debug!(phase = %event.phase, event = other, "progress"),
        }
    }
}

/// Days between progress notifications: roughly ten per run.
pub fn progress_step(total: u32) -> u32 {
    (total / 10).max(1)
}

/// Whether `day` (1-based) of `total` gets a progress notification.
pub fn should_report(day: u32, total: u32) -> bool {
    day == 1 || day == total || day % progress_step(total) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_at_least_one() {
        assert_eq!(progress_step(0), 1);
        assert_eq!(progress_step(9), 1);
        assert_eq!(progress_step(10), 1);
        assert_eq!(progress_step(25), 2);
        assert_eq!(progress_step(365), 36);
    }

    #[test]
    fn reports_first_last_and_every_step() {
        let reported: Vec<u32> = (1..=25).filter(|d| should_report(*d, 25)).collect();
        assert_eq!(reported.first(), Some(&1));
        assert_eq!(reported.last(), Some(&25));
        assert!(reported.contains(&2));
        assert!(reported.contains(&24));
        assert!(!reported.contains(&3));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |e: &ProgressEvent| seen.push(e.current);
            sink.emit(&ProgressEvent::new(event_names::SIMULATION_PROGRESS, Phase::Live, 3, 10));
        }
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn event_serializes_phase_snake_case() {
        let e = ProgressEvent::new(event_names::SIMULATION_STARTED, Phase::Baseline, 0, 5);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""phase":"baseline""#));
        assert!(json.contains(r#""event":"simulation_started""#));
    }
}
