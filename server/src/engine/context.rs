use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Fire-and-forget sink for user-facing notifications. The transport to
/// the end user (flash message, toast, mail) lives outside this crate.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Per-request context: the authenticated user plus the notification sink.
/// Passed explicitly into every engine operation; the engine reads no
/// ambient request state.
#[derive(Clone)]
pub struct RequestContext {
    pub user_id: String,
    notifier: Arc<dyn Notifier>,
}

impl RequestContext {
    pub fn new(user_id: String, notifier: Arc<dyn Notifier>) -> Self {
        Self { user_id, notifier }
    }

    pub fn notify(&self, severity: Severity, message: &str) {
        self.notifier.notify(severity, message);
    }
}

/// Notifier that logs through tracing. Used by the server binary, where
/// notifications have no richer delivery channel.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!(target: "parley::notify", "{message}"),
            Severity::Warning => warn!(target: "parley::notify", "{message}"),
            Severity::Error => error!(target: "parley::notify", "{message}"),
        }
    }
}

/// Notifier that records notifications in memory, for assertions in tests.
#[derive(Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages.lock().unwrap().push((severity, message.to_string()));
    }
}
