//! User-facing notices (toasts and confirmation dialogs).
//!
//! The dialog library is an optional collaborator: everything that reports
//! to a [`Notifier`] works the same with [`NoopNotifier`].

use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Icon shown with a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
}

/// A message for the user, optionally dismissed after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
    pub auto_dismiss: Option<Duration>,
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            auto_dismiss: None,
        }
    }

    /// Dismiss automatically after `millis` milliseconds.
    #[must_use]
    pub const fn dismiss_after(mut self, millis: u64) -> Self {
        self.auto_dismiss = Some(Duration::from_millis(millis));
        self
    }
}

/// Capability for showing notices and asking for confirmation.
pub trait Notifier: Send + Sync {
    /// Show a notice.
    fn notify(&self, notice: Notice);

    /// Ask a yes/no question.
    ///
    /// `None` means no dialog is available and the caller proceeds as if
    /// confirmed.
    fn confirm(&self, _prompt: &str) -> Option<bool> {
        None
    }
}

/// Notifier used when no dialog library is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Notifier that keeps every notice, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RwLock<Vec<Notice>>,
    answer: Option<bool>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with `answer`.
    #[must_use]
    pub fn answering(answer: bool) -> Self {
        Self {
            notices: RwLock::default(),
            answer: Some(answer),
        }
    }

    /// Notices shown so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.read().map(|n| n.clone()).unwrap_or_default()
    }

    /// The most recent notice.
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .read()
            .ok()
            .and_then(|n| n.last().cloned())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.write() {
            notices.push(notice);
        }
    }

    fn confirm(&self, _prompt: &str) -> Option<bool> {
        self.answer
    }
}

/// Shared handle to a notifier.
pub type SharedNotifier = Arc<dyn Notifier>;

/// A shared [`NoopNotifier`].
#[must_use]
pub fn noop() -> SharedNotifier {
    Arc::new(NoopNotifier)
}
