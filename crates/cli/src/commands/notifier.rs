//! Notices as log lines.

use tackle_storefront::notify::{Notice, Notifier, Severity};
use tracing::{info, warn};

/// Logs notices through `tracing` and answers prompts from a flag.
#[derive(Debug, Clone, Copy)]
pub struct CliNotifier {
    assume_yes: bool,
}

impl CliNotifier {
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for CliNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success | Severity::Info => info!("{}", notice.text),
            Severity::Warning => warn!("{}", notice.text),
        }
    }

    fn confirm(&self, prompt: &str) -> Option<bool> {
        if !self.assume_yes {
            warn!("{prompt} Pass --yes to confirm.");
        }
        Some(self.assume_yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_follows_flag() {
        assert_eq!(CliNotifier::new(true).confirm("Empty cart?"), Some(true));
        assert_eq!(CliNotifier::new(false).confirm("Empty cart?"), Some(false));
    }
}
