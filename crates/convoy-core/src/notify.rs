//! User-facing outcome reporting seam.
//!
//! The engine never renders anything; it reports human-readable outcomes of
//! mutating operations through this trait and the calling surface decides
//! how to show them (toast, status bar, stderr).

/// Outcome sink implemented by the UI collaborator.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Default notifier that routes outcomes through tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "convoy::notify", "{message}");
    }

    fn failure(&self, message: &str) {
        tracing::warn!(target: "convoy::notify", "{message}");
    }
}
