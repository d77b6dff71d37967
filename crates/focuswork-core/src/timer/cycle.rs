//! Phase sequencing for the pomodoro cycle.
//!
//! [`on_phase_expired`] is the only place that decides which phase follows
//! which. Natural expiry and skips both go through it.

use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Configured length of this phase in seconds.
    pub fn duration_secs(self, settings: &TimerSettings) -> u64 {
        let minutes = match self {
            Phase::Focus => settings.focus_duration_minutes,
            Phase::ShortBreak => settings.short_break_minutes,
            Phase::LongBreak => settings.long_break_minutes,
        };
        u64::from(minutes).saturating_mul(60)
    }
}

/// Result of applying a `PhaseExpired` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Phase,
    pub completed_in_cycle: u32,
}

/// Transition table for a `PhaseExpired` event.
///
/// A focus phase bumps the counter; reaching `sessions_before_long_break`
/// (strictly `>=`) selects the long break and resets the counter. Breaks
/// always return to focus with the counter unchanged.
pub fn on_phase_expired(
    phase: Phase,
    completed_in_cycle: u32,
    sessions_before_long_break: u32,
) -> Transition {
    match phase {
        Phase::Focus => {
            let completed = completed_in_cycle.saturating_add(1);
            if completed >= sessions_before_long_break {
                Transition {
                    next: Phase::LongBreak,
                    completed_in_cycle: 0,
                }
            } else {
                Transition {
                    next: Phase::ShortBreak,
                    completed_in_cycle: completed,
                }
            }
        }
        Phase::ShortBreak | Phase::LongBreak => Transition {
            next: Phase::Focus,
            completed_in_cycle,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_goes_to_short_break_below_threshold() {
        let t = on_phase_expired(Phase::Focus, 0, 4);
        assert_eq!(t.next, Phase::ShortBreak);
        assert_eq!(t.completed_in_cycle, 1);
    }

    #[test]
    fn threshold_reached_exactly_selects_long_break() {
        let t = on_phase_expired(Phase::Focus, 3, 4);
        assert_eq!(t.next, Phase::LongBreak);
        assert_eq!(t.completed_in_cycle, 0);
    }

    #[test]
    fn single_session_cycle_always_long_break() {
        let t = on_phase_expired(Phase::Focus, 0, 1);
        assert_eq!(t.next, Phase::LongBreak);
        assert_eq!(t.completed_in_cycle, 0);
    }

    #[test]
    fn breaks_return_to_focus_without_touching_counter() {
        for phase in [Phase::ShortBreak, Phase::LongBreak] {
            let t = on_phase_expired(phase, 2, 4);
            assert_eq!(t.next, Phase::Focus);
            assert_eq!(t.completed_in_cycle, 2);
        }
    }

    #[test]
    fn four_session_cycle_sequence() {
        let mut phase = Phase::Focus;
        let mut completed = 0;
        let mut breaks = Vec::new();
        for _ in 0..8 {
            let t = on_phase_expired(phase, completed, 4);
            if t.next.is_break() {
                breaks.push(t.next);
            }
            phase = t.next;
            completed = t.completed_in_cycle;
        }
        assert_eq!(
            breaks,
            vec![
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::LongBreak
            ]
        );
        assert_eq!(completed, 0);
    }
}
