//! Desktop notifications for phase expiry.

use focuswork_core::{AlarmSound, NotificationRequest, Notifier, NotifyError};
use notify_rust::Notification;

/// Rings the terminal bell and shows a desktop notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

fn sound_name(sound: AlarmSound) -> &'static str {
    // freedesktop sound theme names
    match sound {
        AlarmSound::Bell => "bell",
        AlarmSound::Digital => "alarm-clock-elapsed",
        AlarmSound::Gentle => "message",
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        if request.volume > 0 {
            eprint!("\x07");
        }
        Notification::new()
            .summary(request.title())
            .body(&request.body())
            .appname("focuswork")
            .sound_name(sound_name(request.sound))
            .show()
            .map(drop)
            .map_err(|e| NotifyError::Unavailable(e.to_string()))
    }
}
