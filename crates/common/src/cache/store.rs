//! Thread-safe cache store with tag-based invalidation
//!
//! Entries carry their own staleness window and a set of tags; invalidating
//! a tag removes every entry carrying it, nothing else. Writes (insert,
//! invalidate) are atomic with respect to readers: a reader sees either the
//! pre- or post-invalidation state, never a partial one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: Instant,
    stale_after: Duration,
    tags: Vec<String>,
}

/// Generic thread-safe cache keyed by canonical strings.
///
/// # Type Parameters
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for staleness checks (defaults to `SystemClock`)
///
/// Clones share storage.
pub struct TaggedCache<V, C = SystemClock>
where
    V: Clone,
    C: Clock,
{
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
    clock: C,
}

impl<V> TaggedCache<V, SystemClock>
where
    V: Clone,
{
    /// Create a cache using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V> Default for TaggedCache<V, SystemClock>
where
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> TaggedCache<V, C>
where
    V: Clone,
    C: Clock,
{
    /// Create a cache with a custom clock (useful for testing).
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), clock }
    }

    /// Insert a value with its staleness window and tags.
    ///
    /// Replaces any existing entry under the same key.
    pub fn insert(&self, key: String, value: V, stale_after: Duration, tags: Vec<String>) {
        let entry = Entry { value, fetched_at: self.clock.now(), stale_after, tags };
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key, entry);
    }

    /// Get a value if its entry is still fresh.
    ///
    /// Returns `None` for missing or stale entries. Stale entries are left in
    /// place; the next successful fetch overwrites them.
    #[must_use]
    pub fn get_fresh(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = entries.get(key)?;
        let age = self.clock.now().duration_since(entry.fetched_at);
        (age < entry.stale_after).then(|| entry.value.clone())
    }

    /// Remove every entry carrying `tag`. Returns the number removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(tag, removed, "cache entries invalidated");
        }
        removed
    }

    /// Remove a single entry by key.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(key).map(|entry| entry.value)
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.clear();
    }

    /// Current number of entries (fresh and stale).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V, C> Clone for TaggedCache<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries), clock: self.clock.clone() }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the tagged cache store.
    use super::*;
    use crate::time::MockClock;

    fn cache() -> TaggedCache<i32, MockClock> {
        TaggedCache::with_clock(MockClock::new())
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn fresh_entry_is_returned() {
        let cache = cache();
        cache.insert("student?page=0".into(), 1, Duration::from_secs(60), tags(&["student"]));

        assert_eq!(cache.get_fresh("student?page=0"), Some(1));
        assert_eq!(cache.get_fresh("student?page=1"), None);
    }

    #[test]
    fn stale_entry_is_not_returned() {
        let clock = MockClock::new();
        let cache: TaggedCache<i32, MockClock> = TaggedCache::with_clock(clock.clone());
        cache.insert("k".into(), 1, Duration::from_secs(30), tags(&["student"]));

        clock.advance(Duration::from_secs(29));
        assert_eq!(cache.get_fresh("k"), Some(1));

        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get_fresh("k"), None);
        // Entry remains until overwritten or invalidated
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn per_entry_staleness_windows() {
        let clock = MockClock::new();
        let cache: TaggedCache<i32, MockClock> = TaggedCache::with_clock(clock.clone());
        cache.insert("student/1".into(), 1, Duration::from_secs(15), tags(&["student", "student:1"]));
        cache.insert("setting/2".into(), 2, Duration::from_secs(300), tags(&["setting", "setting:2"]));

        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get_fresh("student/1"), None);
        assert_eq!(cache.get_fresh("setting/2"), Some(2));
    }

    #[test]
    fn invalidate_tag_removes_exactly_tagged_entries() {
        let cache = cache();
        cache.insert("student?page=0".into(), 1, Duration::from_secs(60), tags(&["student"]));
        cache.insert("student/42".into(), 2, Duration::from_secs(60), tags(&["student", "student:42"]));
        cache.insert("student/43".into(), 3, Duration::from_secs(60), tags(&["student", "student:43"]));
        cache.insert("setting/7".into(), 4, Duration::from_secs(60), tags(&["setting", "setting:7"]));

        assert_eq!(cache.invalidate_tag("student:42"), 1);
        assert_eq!(cache.get_fresh("student/42"), None);
        assert_eq!(cache.get_fresh("student/43"), Some(3));

        assert_eq!(cache.invalidate_tag("student"), 2);
        assert_eq!(cache.get_fresh("student?page=0"), None);
        assert_eq!(cache.get_fresh("student/43"), None);
        assert_eq!(cache.get_fresh("setting/7"), Some(4));
    }

    #[test]
    fn invalidate_unknown_tag_is_noop() {
        let cache = cache();
        cache.insert("k".into(), 1, Duration::from_secs(60), tags(&["student"]));
        assert_eq!(cache.invalidate_tag("teacher"), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let cache = cache();
        cache.insert("k".into(), 1, Duration::from_secs(60), tags(&["student"]));
        cache.insert("k".into(), 2, Duration::from_secs(60), tags(&["student"]));

        assert_eq!(cache.get_fresh("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_storage() {
        let cache = cache();
        let clone = cache.clone();
        cache.insert("k".into(), 1, Duration::from_secs(60), tags(&["student"]));

        assert_eq!(clone.get_fresh("k"), Some(1));
        clone.clear();
        assert!(cache.is_empty());
    }
}
