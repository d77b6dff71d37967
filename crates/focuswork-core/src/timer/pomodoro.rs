//! Pomodoro countdown engine.
//!
//! A one-second-per-call state machine. It owns no timer of its own: the
//! caller invokes `tick()` once per elapsed second while `is_running()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            +-- countdown hits zero / skip --> next phase (Running or Paused)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(settings)?;
//! engine.start("Website Redesign", "Homepage wireframes")?;
//! // once per second:
//! engine.tick(&notifier); // Some(Event::PhaseCompleted) when a phase ends
//! ```

use chrono::Utc;

use super::cycle::{on_phase_expired, Phase};
use super::settings::TimerSettings;
use super::stopwatch::required;
use crate::error::{InvalidStateError, Result};
use crate::events::{Event, PomodoroSnapshot};
use crate::notify::{NotificationRequest, Notifier};

#[derive(Debug, Clone)]
struct Session {
    project: String,
    task: String,
    phase: Phase,
    completed_in_cycle: u32,
    /// Focus phases that ran to zero this session. Never reset by the cycle.
    total_completed_focus: u32,
    remaining_secs: u64,
    running: bool,
}

#[derive(Debug, Clone)]
pub struct PomodoroEngine {
    settings: TimerSettings,
    session: Option<Session>,
    muted: bool,
}

impl Default for PomodoroEngine {
    fn default() -> Self {
        Self {
            settings: TimerSettings::default(),
            session: None,
            muted: false,
        }
    }
}

impl PomodoroEngine {
    /// # Errors
    ///
    /// Returns a `ValidationError` if `settings` break their invariants.
    pub fn new(settings: TimerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            session: None,
            muted: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.running)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn completed_in_cycle(&self) -> u32 {
        self.session
            .as_ref()
            .map(|s| s.completed_in_cycle)
            .unwrap_or(0)
    }

    /// Focus phases finished by the countdown since `start`. Skips do not count.
    pub fn total_completed_focus(&self) -> u32 {
        self.session
            .as_ref()
            .map(|s| s.total_completed_focus)
            .unwrap_or(0)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.session.as_ref().map(|s| s.remaining_secs).unwrap_or(0)
    }

    /// Full length of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.phase()
            .map(|p| p.duration_secs(&self.settings))
            .unwrap_or(0)
    }

    /// 0.0 .. 100.0 progress within the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        100.0 - (self.remaining_secs() as f64 / total as f64) * 100.0
    }

    pub fn snapshot(&self) -> Option<PomodoroSnapshot> {
        let s = self.session.as_ref()?;
        Some(PomodoroSnapshot {
            project: s.project.clone(),
            task: s.task.clone(),
            phase: s.phase,
            completed_in_cycle: s.completed_in_cycle,
            total_completed_focus: s.total_completed_focus,
            remaining_secs: s.remaining_secs,
            total_secs: self.total_secs(),
            is_running: s.running,
            muted: self.muted,
            progress_pct: self.progress_pct(),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh cycle in the focus phase.
    ///
    /// # Errors
    ///
    /// `ValidationError::MissingField` when `project` or `task` is blank.
    /// Any running session is left untouched in that case.
    pub fn start(&mut self, project: &str, task: &str) -> Result<Event> {
        let project = required("project", project)?;
        let task = required("task", task)?;
        let duration_secs = Phase::Focus.duration_secs(&self.settings);
        self.session = Some(Session {
            project,
            task,
            phase: Phase::Focus,
            completed_in_cycle: 0,
            total_completed_focus: 0,
            remaining_secs: duration_secs,
            running: true,
        });
        Ok(Event::PomodoroStarted {
            phase: Phase::Focus,
            duration_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let s = self.session.as_mut().filter(|s| s.running)?;
        s.running = false;
        Some(Event::PomodoroPaused {
            remaining_secs: s.remaining_secs,
            at: Utc::now(),
        })
    }

    /// # Errors
    ///
    /// `InvalidStateError::NotStarted` without a session.
    pub fn resume(&mut self) -> Result<Option<Event>> {
        let s = self
            .session
            .as_mut()
            .ok_or(InvalidStateError::NotStarted { operation: "resume" })?;
        if s.running {
            return Ok(None);
        }
        s.running = true;
        Ok(Some(Event::PomodoroResumed {
            remaining_secs: s.remaining_secs,
            at: Utc::now(),
        }))
    }

    /// Re-arm the current phase at its full length and pause.
    ///
    /// # Errors
    ///
    /// `InvalidStateError::NotStarted` without a session.
    pub fn reset(&mut self) -> Result<Event> {
        let total = self.total_secs();
        let s = self
            .session
            .as_mut()
            .ok_or(InvalidStateError::NotStarted { operation: "reset" })?;
        s.remaining_secs = total;
        s.running = false;
        Ok(Event::PomodoroReset {
            phase: s.phase,
            remaining_secs: total,
            at: Utc::now(),
        })
    }

    /// Jump to the next phase now. No notification is requested.
    ///
    /// # Errors
    ///
    /// `InvalidStateError::NotStarted` without a session.
    pub fn skip(&mut self) -> Result<Event> {
        let s = self
            .session
            .as_mut()
            .ok_or(InvalidStateError::NotStarted { operation: "skip" })?;
        Ok(advance(s, &self.settings, false))
    }

    /// Discard the session.
    pub fn stop(&mut self) -> Option<Event> {
        let s = self.session.take()?;
        Some(Event::PomodoroStopped {
            phase: s.phase,
            at: Utc::now(),
        })
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Replace the settings between sessions.
    ///
    /// # Errors
    ///
    /// `InvalidStateError::SessionActive` while a session exists, or a
    /// `ValidationError` for out-of-range values.
    pub fn update_settings(&mut self, settings: TimerSettings) -> Result<()> {
        if self.session.is_some() {
            return Err(InvalidStateError::SessionActive {
                operation: "change settings",
            }
            .into());
        }
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Call once per elapsed second. Returns `Some(Event::PhaseCompleted)`
    /// when the countdown reaches zero.
    pub fn tick(&mut self, notifier: &dyn Notifier) -> Option<Event> {
        let s = self.session.as_mut().filter(|s| s.running)?;
        s.remaining_secs = s.remaining_secs.saturating_sub(1);
        if s.remaining_secs > 0 {
            return None;
        }
        s.running = false;
        if self.settings.sound_enabled && !self.muted {
            let request = NotificationRequest {
                completed: s.phase,
                next: on_phase_expired(
                    s.phase,
                    s.completed_in_cycle,
                    self.settings.sessions_before_long_break,
                )
                .next,
                sound: self.settings.alarm_sound,
                volume: self.settings.sound_volume,
            };
            if let Err(e) = notifier.notify(&request) {
                tracing::warn!(error = %e, "phase notification failed");
            }
        }
        Some(advance(s, &self.settings, true))
    }
}

/// Apply one `PhaseExpired` transition to a live session.
fn advance(s: &mut Session, settings: &TimerSettings, natural: bool) -> Event {
    let from = s.phase;
    let t = on_phase_expired(from, s.completed_in_cycle, settings.sessions_before_long_break);
    let auto_started = if t.next.is_break() {
        settings.auto_start_breaks
    } else {
        settings.auto_start_next_focus
    };
    if natural && from == Phase::Focus {
        s.total_completed_focus = s.total_completed_focus.saturating_add(1);
    }
    s.phase = t.next;
    s.completed_in_cycle = t.completed_in_cycle;
    s.remaining_secs = t.next.duration_secs(settings);
    s.running = auto_started;
    tracing::info!(
        from = from.label(),
        to = t.next.label(),
        completed_in_cycle = t.completed_in_cycle,
        auto_started,
        skipped = !natural,
        "phase advanced"
    );
    let at = Utc::now();
    if natural {
        Event::PhaseCompleted {
            from,
            to: t.next,
            completed_in_cycle: t.completed_in_cycle,
            auto_started,
            at,
        }
    } else {
        Event::PhaseSkipped {
            from,
            to: t.next,
            completed_in_cycle: t.completed_in_cycle,
            auto_started,
            at,
        }
    }
}
