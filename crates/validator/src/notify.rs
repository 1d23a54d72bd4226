//! User-facing status notifications.
//!
//! Notifications are fire-and-forget and never affect control flow;
//! diagnostics that no user needs to see go through `tracing` directly.

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Emits notifications through the tracing pipeline.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(target: "notify", "{message}");
    }
}

/// Collects notifications for assertions in tests.
#[cfg(test)]
pub struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
