//! Duration formatting for timer displays and time-entry summaries.
//!
//! All functions take whole seconds. Pick one clock format per surface:
//! the tracker uses [`format_clock`], countdowns use [`format_countdown`].

/// `HH:MM:SS`, zero-padded. Hours widen past two digits when needed.
pub fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// `MM:SS`, zero-padded. Minutes absorb whole hours.
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `"1h 2m 5s"`, with the hour part omitted when zero (`"2m 5s"`).
pub fn format_human(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

/// `"Xh Ym"` summary used by entry lists. Seconds are truncated.
pub fn format_hours_minutes(secs: u64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// Parse `HH:MM:SS` or `MM:SS` back into seconds.
///
/// Minute and second fields must be below 60 when an hour field is present;
/// in `MM:SS` form the minute field may be any width.
pub fn parse_clock(s: &str) -> Option<u64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let field = |p: &str| -> Option<u64> {
        if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        p.parse().ok()
    };
    match parts.as_slice() {
        [h, m, s] => {
            let (h, m, s) = (field(h)?, field(m)?, field(s)?);
            if m >= 60 || s >= 60 {
                return None;
            }
            h.checked_mul(3600)?.checked_add(m * 60 + s)
        }
        [m, s] => {
            let (m, s) = (field(m)?, field(s)?);
            if s >= 60 {
                return None;
            }
            m.checked_mul(60)?.checked_add(s)
        }
        _ => None,
    }
}
