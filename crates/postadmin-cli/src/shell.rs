use postadmin_core::Notifier;
use tracing::info;

/// Prints notifications to stderr so they don't mix with JSON output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        info!(text = message, "Notification");
        eprintln!("! {}", message);
    }
}
