mod cycle;
mod pomodoro;
mod settings;
mod stopwatch;
mod ticker;

pub use cycle::{on_phase_expired, Phase, Transition};
pub use pomodoro::PomodoroEngine;
pub use settings::{AlarmSound, TimerSettings};
pub use stopwatch::Stopwatch;
pub use ticker::{Tick, Ticker, TimerId, TICK_PERIOD};
