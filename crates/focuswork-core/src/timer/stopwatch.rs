//! Free-running tracker for the plain time-tracking surface.
//!
//! Counts whole seconds through [`Stopwatch::tick`]. The caller owns the
//! one-second cadence (see [`super::Ticker`]).

use chrono::{DateTime, Utc};

use crate::entry::TimeEntryRecord;
use crate::error::{InvalidStateError, Result, ValidationError};
use crate::events::{Event, TrackingSnapshot};

#[derive(Debug, Clone)]
struct Tracking {
    project: String,
    task: String,
    started_at: DateTime<Utc>,
    elapsed_secs: u64,
    running: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    active: Option<Tracking>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_started(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|t| t.running)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.active.as_ref().map(|t| t.elapsed_secs).unwrap_or(0)
    }

    pub fn snapshot(&self) -> Option<TrackingSnapshot> {
        self.active.as_ref().map(|t| TrackingSnapshot {
            project: t.project.clone(),
            task: t.task.clone(),
            started_at: t.started_at,
            elapsed_secs: t.elapsed_secs,
            is_running: t.running,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin tracking from zero. Restarts if already tracking.
    ///
    /// # Errors
    ///
    /// `ValidationError::MissingField` when `project` or `task` is blank.
    pub fn start(&mut self, project: &str, task: &str) -> Result<Event> {
        let now = Utc::now();
        let project = required("project", project)?;
        let task = required("task", task)?;
        self.active = Some(Tracking {
            project: project.clone(),
            task: task.clone(),
            started_at: now,
            elapsed_secs: 0,
            running: true,
        });
        tracing::debug!(%project, %task, "tracking started");
        Ok(Event::TrackingStarted { project, task, at: now })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let t = self.active.as_mut().filter(|t| t.running)?;
        t.running = false;
        Some(Event::TrackingPaused {
            elapsed_secs: t.elapsed_secs,
            at: Utc::now(),
        })
    }

    /// # Errors
    ///
    /// `InvalidStateError::NotStarted` when nothing is being tracked.
    pub fn resume(&mut self) -> Result<Option<Event>> {
        let t = self
            .active
            .as_mut()
            .ok_or(InvalidStateError::NotStarted { operation: "resume" })?;
        if t.running {
            return Ok(None);
        }
        t.running = true;
        Ok(Some(Event::TrackingResumed {
            elapsed_secs: t.elapsed_secs,
            at: Utc::now(),
        }))
    }

    /// Advance by one second. Returns the new elapsed count when running.
    pub fn tick(&mut self) -> Option<u64> {
        let t = self.active.as_mut().filter(|t| t.running)?;
        t.elapsed_secs += 1;
        Some(t.elapsed_secs)
    }

    /// Finish tracking and hand back the finalized entry.
    ///
    /// # Errors
    ///
    /// `InvalidStateError::NotStarted` when nothing is being tracked.
    pub fn stop_and_commit<I, S>(&mut self, notes: &str, tags: I) -> Result<TimeEntryRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let t = self.active.take().ok_or(InvalidStateError::NotStarted {
            operation: "stop and commit",
        })?;
        let entry = TimeEntryRecord::new(
            t.project,
            t.task,
            t.started_at,
            t.elapsed_secs,
            notes,
            tags,
        );
        tracing::info!(
            entry_id = %entry.id(),
            duration_secs = entry.duration_secs(),
            "time entry committed"
        );
        Ok(entry)
    }
}

pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::missing(field).into());
    }
    Ok(trimmed.to_string())
}
