//! Boundaries to the host application's UI.
//!
//! The request client only ever produces two UI effects: a transient
//! notification and a forced navigation to the login page. Both go through
//! the traits here so the host decides how they are rendered.

use tracing::warn;

/// Text of the notification shown when the server rejects the token.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Shows a transient, non-blocking, auto-dismissing message.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Moves the application to its login entry point.
pub trait Navigator: Send + Sync {
    fn navigate_to_login(&self);
}

/// Notifier that only logs. Used when the host has no UI of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!(text = message, "Notification");
    }
}
