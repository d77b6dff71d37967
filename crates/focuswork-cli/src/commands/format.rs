use clap::Subcommand;
use focuswork_core::{format_clock, format_countdown, format_hours_minutes, format_human, parse_clock};

#[derive(Subcommand)]
pub enum FormatAction {
    /// HH:MM:SS
    Clock { secs: u64 },
    /// MM:SS
    Countdown { secs: u64 },
    /// e.g. "1h 2m 5s"
    Human { secs: u64 },
    /// e.g. "1h 2m"
    Hm { secs: u64 },
    /// Parse HH:MM:SS or MM:SS back into seconds
    Parse { clock: String },
}

pub fn run(action: FormatAction) -> Result<(), Box<dyn std::error::Error>> {
    let out = match action {
        FormatAction::Clock { secs } => format_clock(secs),
        FormatAction::Countdown { secs } => format_countdown(secs),
        FormatAction::Human { secs } => format_human(secs),
        FormatAction::Hm { secs } => format_hours_minutes(secs),
        FormatAction::Parse { clock } => parse_clock(&clock)
            .ok_or_else(|| format!("invalid clock value: {clock}"))?
            .to_string(),
    };
    println!("{out}");
    Ok(())
}
