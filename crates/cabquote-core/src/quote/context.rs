//! Current door color while scanning one document.

use crate::models::quote::NO_CONTEXT;

/// Tracks the context label in effect for the records being read.
///
/// One tracker belongs to one parse invocation.
#[derive(Debug, Clone, Default)]
pub struct ContextTracker {
    label: Option<String>,
    changes: usize,
}

impl ContextTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label for the next record, `"N/A"` before any heading was seen.
    pub fn current(&self) -> &str {
        self.label.as_deref().unwrap_or(NO_CONTEXT)
    }

    /// Set a new label. Returns true when it differs from the current one.
    pub fn update(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.label.as_deref() == Some(label.as_str()) {
            return false;
        }
        tracing::debug!("context changed: {} -> {}", self.current(), label);
        self.label = Some(label);
        self.changes += 1;
        true
    }

    /// Number of times the label changed.
    pub fn changes(&self) -> usize {
        self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_context() {
        assert_eq!(ContextTracker::new().current(), "N/A");
    }

    #[test]
    fn test_update_counts_changes_only() {
        let mut tracker = ContextTracker::new();
        assert!(tracker.update("BSS"));
        assert!(!tracker.update("BSS"));
        assert!(tracker.update("MNW"));

        assert_eq!(tracker.current(), "MNW");
        assert_eq!(tracker.changes(), 2);
    }
}
