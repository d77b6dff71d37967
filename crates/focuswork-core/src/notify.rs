//! Notification boundary for phase expiry.
//!
//! The engine only asks for a sound at a volume. Playing it belongs to a
//! platform collaborator implementing [`Notifier`].

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::timer::{AlarmSound, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub completed: Phase,
    pub next: Phase,
    pub sound: AlarmSound,
    /// 0..=100
    pub volume: u8,
}

impl NotificationRequest {
    pub fn title(&self) -> &'static str {
        match self.completed {
            Phase::Focus => "Pomodoro completed!",
            Phase::ShortBreak | Phase::LongBreak => "Break completed!",
        }
    }

    pub fn body(&self) -> String {
        match self.next {
            Phase::Focus => "Ready to focus again?".to_string(),
            next => format!("Time for a {}.", next.label().to_lowercase()),
        }
    }
}

/// Plays phase-expiry notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

/// Discards every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _request: &NotificationRequest) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Writes requests to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        tracing::info!(
            sound = request.sound.as_str(),
            volume = request.volume,
            "{}: {}",
            request.title(),
            request.body()
        );
        Ok(())
    }
}
