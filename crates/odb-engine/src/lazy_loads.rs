//! Lazy-load tracking.
//!
//! Relations resolve with one query per access, so iterating N records and
//! touching a relation on each issues N extra queries. The tracker counts
//! resolutions per `(record type, relation)` and warns once a pair reaches the
//! configured threshold.

use std::collections::HashMap;
use std::sync::Mutex;

/// Statistics about lazy relation loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LazyLoadStats {
    /// Total number of relation resolutions recorded.
    pub total_loads: usize,
    /// Number of distinct relations resolved.
    pub relations_loaded: usize,
    /// Number of relations that reached the threshold.
    pub over_threshold: usize,
}

/// Counts relation resolutions per `(record type, relation)`.
#[derive(Debug)]
pub struct LazyLoadTracker {
    counts: Mutex<HashMap<(&'static str, &'static str), usize>>,
    threshold: Option<usize>,
}

impl LazyLoadTracker {
    /// Create a tracker; `None` disables warnings but keeps counting.
    pub fn new(threshold: Option<usize>) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            threshold,
        }
    }

    pub fn threshold(&self) -> Option<usize> {
        self.threshold
    }

    /// Record one resolution and return the new count for the pair.
    pub fn record_load(&self, record_type: &'static str, relation: &'static str) -> usize {
        let Ok(mut counts) = self.counts.lock() else {
            return 0;
        };
        let count = counts.entry((record_type, relation)).or_insert(0);
        *count += 1;
        let count = *count;
        drop(counts);

        if self.threshold == Some(count) {
            tracing::warn!(
                target: "odb::lazy_loads",
                record = record_type,
                relation = relation,
                queries = count,
                "Relation resolved once per record; consider fetching the targets with one query"
            );
        }
        count
    }

    pub fn count_for(&self, record_type: &'static str, relation: &'static str) -> usize {
        self.counts
            .lock()
            .map(|counts| counts.get(&(record_type, relation)).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Forget all counts, e.g. at the start of a request.
    pub fn reset(&self) {
        if let Ok(mut counts) = self.counts.lock() {
            counts.clear();
        }
    }

    pub fn stats(&self) -> LazyLoadStats {
        let Ok(counts) = self.counts.lock() else {
            return LazyLoadStats::default();
        };
        LazyLoadStats {
            total_loads: counts.values().sum(),
            relations_loaded: counts.len(),
            over_threshold: self
                .threshold
                .map_or(0, |t| counts.values().filter(|c| **c >= t).count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_per_relation() {
        let tracker = LazyLoadTracker::new(None);
        tracker.record_load("User", "profile");
        tracker.record_load("User", "profile");
        tracker.record_load("User", "friends");
        assert_eq!(tracker.count_for("User", "profile"), 2);
        assert_eq!(tracker.count_for("User", "friends"), 1);
        assert_eq!(tracker.count_for("Order", "customer"), 0);
    }

    #[test]
    fn stats_count_over_threshold() {
        let tracker = LazyLoadTracker::new(Some(2));
        tracker.record_load("User", "profile");
        tracker.record_load("User", "profile");
        tracker.record_load("User", "friends");
        assert_eq!(
            tracker.stats(),
            LazyLoadStats {
                total_loads: 3,
                relations_loaded: 2,
                over_threshold: 1,
            }
        );
    }

    #[test]
    fn reset_clears_counts() {
        let tracker = LazyLoadTracker::new(Some(3));
        tracker.record_load("User", "profile");
        tracker.reset();
        assert_eq!(tracker.count_for("User", "profile"), 0);
        assert_eq!(tracker.stats(), LazyLoadStats::default());
    }
}
