//! In-memory list of recently selected locations
//!
//! Most-recently-added first, unique by exact name, bounded to
//! [`RECENT_CAPACITY`] entries. Nothing is persisted between runs.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Maximum number of entries kept
pub const RECENT_CAPACITY: usize = 5;

/// One remembered selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecentEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RecentLocationCache {
    entries: VecDeque<RecentEntry>,
}

impl RecentLocationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a selection. Returns `true` if the list changed.
    ///
    /// A name that is already present is left where it is; it is not moved
    /// to the front.
    pub fn record(&mut self, name: &str, latitude: f64, longitude: f64) -> bool {
        if self.entries.iter().any(|entry| entry.name == name) {
            debug!("'{}' already in recent list", name);
            return false;
        }

        self.entries.push_front(RecentEntry {
            name: name.to_string(),
            latitude,
            longitude,
        });
        while self.entries.len() > RECENT_CAPACITY {
            if let Some(evicted) = self.entries.pop_back() {
                debug!("Evicted '{}' from recent list", evicted.name);
            }
        }
        true
    }

    /// Entries, newest first
    #[must_use]
    pub fn list(&self) -> Vec<RecentEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Entry at `index` in [`list`](Self::list) order
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RecentEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(cache: &RecentLocationCache) -> Vec<String> {
        cache.list().into_iter().map(|entry| entry.name).collect()
    }

    #[test]
    fn test_newest_first() {
        let mut cache = RecentLocationCache::new();
        assert!(cache.record("Bavaria", 48.9, 11.4));
        assert!(cache.record("Tyrol", 47.2, 11.4));
        assert_eq!(names(&cache), vec!["Tyrol", "Bavaria"]);
    }

    #[test]
    fn test_record_is_idempotent_on_name() {
        let mut cache = RecentLocationCache::new();
        cache.record("Bavaria", 48.9, 11.4);
        cache.record("Tyrol", 47.2, 11.4);
        let before = cache.list();

        // same name, different coordinate: still a no-op
        assert!(!cache.record("Bavaria", 1.0, 2.0));
        assert_eq!(cache.list(), before);
        assert_eq!(cache.get(1).unwrap().latitude, 48.9);
    }

    #[test]
    fn test_sixth_distinct_name_evicts_oldest() {
        let mut cache = RecentLocationCache::new();
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            cache.record(name, i as f64, 0.0);
        }
        assert_eq!(cache.len(), RECENT_CAPACITY);
        assert_eq!(names(&cache), vec!["F", "E", "D", "C", "B"]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(12)]
    fn test_never_exceeds_capacity(#[case] count: usize) {
        let mut cache = RecentLocationCache::new();
        for i in 0..count {
            cache.record(&format!("place-{i}"), 0.0, 0.0);
        }
        assert_eq!(cache.len(), count.min(RECENT_CAPACITY));
        assert_eq!(cache.is_empty(), count == 0);
    }

    #[test]
    fn test_names_are_compared_exactly() {
        let mut cache = RecentLocationCache::new();
        cache.record("Georgia", 32.6, -83.4);
        assert!(cache.record("georgia", 42.3, 43.3));
        assert_eq!(cache.len(), 2);
    }
}
