use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::Phase;

/// Every state change in the timer core produces an Event.
/// The UI renders from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TrackingStarted {
        project: String,
        task: String,
        at: DateTime<Utc>,
    },
    TrackingPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TrackingResumed {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second counted by the stopwatch.
    TrackingTicked {
        elapsed_secs: u64,
    },
    /// A stopwatch was stopped and its entry handed to the caller.
    EntryCommitted {
        entry_id: Uuid,
        project: String,
        task: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PomodoroStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PomodoroPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    PomodoroResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    PomodoroReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second taken off the countdown.
    CountdownTicked {
        remaining_secs: u64,
    },
    /// Countdown reached zero and the cycle advanced.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        completed_in_cycle: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    /// User forced the cycle forward.
    PhaseSkipped {
        from: Phase,
        to: Phase,
        completed_in_cycle: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    PomodoroStopped {
        phase: Phase,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        pomodoro: Option<PomodoroSnapshot>,
        tracking: Option<TrackingSnapshot>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Phase the engine moved into, for completion and skip events.
    pub fn next_phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseCompleted { to, .. } | Event::PhaseSkipped { to, .. } => Some(*to),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroSnapshot {
    pub project: String,
    pub task: String,
    pub phase: Phase,
    pub completed_in_cycle: u32,
    /// Completed focus phases since the session started, across cycles.
    pub total_completed_focus: u32,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub is_running: bool,
    pub muted: bool,
    /// 0.0 .. 100.0 within the current phase.
    pub progress_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub project: String,
    pub task: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: u64,
    pub is_running: bool,
}
