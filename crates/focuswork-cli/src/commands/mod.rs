pub mod config;
pub mod format;
pub mod pomodoro;
pub mod track;

use focuswork_core::Event;

/// Print one event as a JSON line on stdout.
pub(crate) fn print_event(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
