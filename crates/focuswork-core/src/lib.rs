//! # focuswork Core Library
//!
//! Timer logic behind the focuswork dashboard: the pomodoro countdown and the
//! plain time tracker, factored out of the UI so every screen drives the same
//! engine.
//!
//! ## Architecture
//!
//! - **Engines**: [`PomodoroEngine`] and [`Stopwatch`] are synchronous state
//!   machines advanced one second per `tick()` call
//! - **Service**: [`TimerService`] owns both engines and one tick source each,
//!   serializing ticks and user commands on a single tokio task
//! - **Entries**: [`TimeEntryRecord`] values are handed to the caller when
//!   tracking stops; [`TimeEntryLog`] keeps immutable snapshots of them
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`on_phase_expired`]: the phase transition table
//! - [`TimerHandle`]: cloneable command interface to a running service
//! - [`Notifier`]: boundary to the platform's sound/notification player
//! - [`Config`]: application configuration management

pub mod entry;
pub mod error;
pub mod events;
pub mod format;
pub mod notify;
pub mod service;
pub mod storage;
pub mod timer;

pub use entry::{EntryFilter, SortKey, SortOrder, TimeEntryLog, TimeEntryRecord};
pub use error::{ConfigError, CoreError, InvalidStateError, NotifyError, ValidationError};
pub use events::{Event, PomodoroSnapshot, TrackingSnapshot};
pub use format::{format_clock, format_countdown, format_hours_minutes, format_human, parse_clock};
pub use notify::{LogNotifier, NotificationRequest, Notifier, NullNotifier};
pub use service::{TimerHandle, TimerService};
pub use storage::Config;
pub use timer::{on_phase_expired, AlarmSound, Phase, PomodoroEngine, Stopwatch, TimerSettings};
