use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    #[default]
    Bell,
    Digital,
    Gentle,
}

impl AlarmSound {
    pub fn as_str(self) -> &'static str {
        match self {
            AlarmSound::Bell => "bell",
            AlarmSound::Digital => "digital",
            AlarmSound::Gentle => "gentle",
        }
    }
}

/// Pomodoro configuration. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_focus_duration")]
    pub focus_duration_minutes: u32,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_next_focus: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// 0..=100
    #[serde(default = "default_volume")]
    pub sound_volume: u8,
    #[serde(default)]
    pub alarm_sound: AlarmSound,
}

fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_volume() -> u8 {
    50
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_duration_minutes: default_focus_duration(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start_breaks: true,
            auto_start_next_focus: false,
            sound_enabled: true,
            sound_volume: default_volume(),
            alarm_sound: AlarmSound::Bell,
        }
    }
}

impl TimerSettings {
    /// Check the duration, cycle-length and volume invariants.
    ///
    /// # Errors
    ///
    /// Returns the first field that violates its range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let durations = [
            ("focus_duration_minutes", self.focus_duration_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ];
        for (field, minutes) in durations {
            if minutes == 0 {
                return Err(ValidationError::invalid(field, "must be greater than 0"));
            }
        }
        if self.sessions_before_long_break == 0 {
            return Err(ValidationError::invalid(
                "sessions_before_long_break",
                "must be at least 1",
            ));
        }
        if self.sound_volume > 100 {
            return Err(ValidationError::invalid(
                "sound_volume",
                format!("{} is outside 0-100", self.sound_volume),
            ));
        }
        Ok(())
    }
}
