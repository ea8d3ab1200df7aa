//! Retention rules for timestamped snapshot files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long snapshot entries stay fresh and how many of them are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Age after which an entry is no longer served
    pub max_age: Duration,
    /// Number of newest entries kept after each write
    pub keep_latest: usize,
    /// Whether persistence is enabled at all
    pub enabled: bool,
}

impl RetentionPolicy {
    /// Create a policy with default settings.
    ///
    /// Default: entries stay fresh for 24 hours, the newest 3 are kept.
    pub fn new() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60),
            keep_latest: 3,
            enabled: true,
        }
    }

    /// Set the freshness window.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set how many newest entries survive a cleanup.
    #[must_use]
    pub fn keep_latest(mut self, keep_latest: usize) -> Self {
        self.keep_latest = keep_latest;
        self
    }

    /// Enable or disable persistence.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Disable persistence entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Whether an entry captured at `captured_at_ms` is past the freshness window
    /// at `now_ms`. Both are Unix epoch milliseconds.
    pub fn is_expired(&self, captured_at_ms: i64, now_ms: i64) -> bool {
        let max_age_ms = i64::try_from(self.max_age.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(captured_at_ms) > max_age_ms
    }

    /// Given `(timestamp, entry)` pairs in any order, returns the ones that
    /// fall outside the newest `keep_latest`, newest first.
    pub fn surplus<T>(&self, mut entries: Vec<(i64, T)>) -> Vec<(i64, T)> {
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().skip(self.keep_latest).collect()
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
