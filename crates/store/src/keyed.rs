//! Ordered lists of identified records: the Feed Cache and the request inbox.
//!
//! Both lists share the same contract:
//! - `load` replaces the whole list (first occurrence of an id wins)
//! - `remove_by_id` drops one entry and is a silent no-op when it is absent
//!
//! Once an id has been removed it stays gone until the next `load`.

use crate::slice::Slice;
use model::{CandidateProfile, ConnectionRequest, Identified};
use std::collections::HashSet;
use tokio::sync::watch;
use tracing::debug;

/// Ordered, duplicate-free list of `T` held in the store.
#[derive(Debug)]
pub struct KeyedSlice<T> {
    items: Slice<Vec<T>>,
}

/// The swipe feed: display order = decision order
pub type FeedCache = KeyedSlice<CandidateProfile>;

/// Connection requests received by the current user
pub type RequestInbox = KeyedSlice<ConnectionRequest>;

impl<T: Identified + Clone> KeyedSlice<T> {
    pub fn new() -> Self {
        Self {
            items: Slice::new(Vec::new()),
        }
    }

    /// Replace the entire contents.
    ///
    /// Returns the number of duplicate entries that were dropped.
    pub fn load(&self, items: Vec<T>) -> usize {
        let incoming = items.len();
        let mut seen = HashSet::with_capacity(incoming);
        let unique: Vec<T> = items
            .into_iter()
            .filter(|item| seen.insert(item.id().to_string()))
            .collect();
        let dropped = incoming - unique.len();

        debug!("Loaded {} entries ({} duplicates dropped)", unique.len(), dropped);
        self.items.set(unique);
        dropped
    }

    /// Remove the entry with `id`.
    ///
    /// Returns whether anything was removed. Subscribers are only notified
    /// when the list actually changed.
    pub fn remove_by_id(&self, id: &str) -> bool {
        let removed = self.items.update(|items| {
            let before = items.len();
            items.retain(|item| item.id() != id);
            items.len() != before
        });
        debug!("remove_by_id({}): removed={}", id, removed);
        removed
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.items.update(|items| {
            let had_items = !items.is_empty();
            items.clear();
            had_items
        });
    }

    /// The entry at the front of the queue
    pub fn head(&self) -> Option<T> {
        self.items.read(|items| items.first().cloned())
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.items
            .read(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.read(|items| items.iter().any(|item| item.id() == id))
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.get()
    }

    /// Identifiers in display order
    pub fn ids(&self) -> Vec<String> {
        self.items
            .read(|items| items.iter().map(|item| item.id().to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.items.read(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.items.read(Vec::is_empty)
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.items.subscribe()
    }
}

impl<T: Identified + Clone> Default for KeyedSlice<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(ids: &[&str]) -> Vec<CandidateProfile> {
        ids.iter().map(|id| CandidateProfile::new(*id)).collect()
    }

    #[test]
    fn test_load_replaces_contents() {
        let feed = FeedCache::new();
        feed.load(profiles(&["a", "b"]));
        feed.load(profiles(&["c"]));

        assert_eq!(feed.ids(), vec!["c"]);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let feed = FeedCache::new();
        let mut items = profiles(&["a", "b", "a"]);
        items[2].about = "second copy".to_string();

        let dropped = feed.load(items);

        assert_eq!(dropped, 1);
        assert_eq!(feed.ids(), vec!["a", "b"]);
        assert_ne!(feed.get("a").unwrap().about, "second copy");
    }

    #[test]
    fn test_remove_by_id_is_idempotent() {
        let feed = FeedCache::new();
        feed.load(profiles(&["a", "b", "c"]));

        assert!(feed.remove_by_id("b"));
        let after_first = feed.snapshot();

        assert!(!feed.remove_by_id("b"));
        assert_eq!(feed.snapshot(), after_first);
        assert_eq!(feed.ids(), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let feed = FeedCache::new();
        assert!(!feed.remove_by_id("nobody"));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_removed_id_stays_gone_until_reload() {
        let feed = FeedCache::new();
        feed.load(profiles(&["a", "b"]));
        feed.remove_by_id("a");

        assert!(!feed.contains("a"));
        assert_eq!(feed.head().unwrap().id, "b");

        feed.load(profiles(&["a", "b"]));
        assert!(feed.contains("a"));
    }

    #[tokio::test]
    async fn test_subscribers_only_woken_on_real_removal() {
        let feed = FeedCache::new();
        feed.load(profiles(&["a"]));
        let mut rx = feed.subscribe();

        feed.remove_by_id("zzz");
        assert!(!rx.has_changed().unwrap());

        feed.remove_by_id("a");
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }
}
