//! The client-side query cache.
//!
//! Holds one entry per query key, each carrying its request lifecycle
//! (`Idle → Loading → Success | Error`), the tags its last response
//! provided, and a fetch timestamp for the status bar. Views subscribe
//! to the keys they render; `invalidate` marks matching entries stale
//! and reports which subscribed keys need a re-fetch.
//!
//! All writes go through the owning `App`'s reducer on the UI thread,
//! in channel arrival order. The cache is a derived view of server
//! state with no invariants of its own.

// Allow dead code: some accessors are exercised only by tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::Tutorial;

use super::{QueryData, QueryKey, Tag};

/// Request lifecycle for a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Success(QueryData),
    Error(String),
}

impl QueryState {
    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Entry {
    state: QueryState,
    tags: Vec<Tag>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
}

/// Tag-keyed query cache with explicit subscriptions.
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<QueryKey, Entry>,
    subscribed: HashSet<QueryKey>,
    generation: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter bumped on every successful write. Views use it
    /// to detect that the underlying data changed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self, key: QueryKey) -> &QueryState {
        static IDLE: QueryState = QueryState::Idle;
        self.entries.get(&key).map(|e| &e.state).unwrap_or(&IDLE)
    }

    /// Register a view's interest in a key. Returns true when the entry
    /// has no usable data and a fetch should be started.
    pub fn subscribe(&mut self, key: QueryKey) -> bool {
        self.subscribed.insert(key);
        let entry = self.entries.entry(key).or_default();
        match entry.state {
            QueryState::Success(_) => entry.stale,
            QueryState::Loading => false,
            QueryState::Idle | QueryState::Error(_) => true,
        }
    }

    /// Drop a view's interest. The cached data is kept; it just no
    /// longer participates in invalidation-triggered re-fetches.
    pub fn unsubscribe(&mut self, key: QueryKey) {
        self.subscribed.remove(&key);
    }

    pub fn is_subscribed(&self, key: QueryKey) -> bool {
        self.subscribed.contains(&key)
    }

    /// Begin a fetch. An entry that already holds data keeps serving it
    /// during the re-fetch; `Loading` is only rendered on first load.
    pub fn mark_loading(&mut self, key: QueryKey) {
        let entry = self.entries.entry(key).or_default();
        if !matches!(entry.state, QueryState::Success(_)) {
            entry.state = QueryState::Loading;
        }
    }

    /// Keys with at least one live subscriber, for manual refresh.
    pub fn subscribed_keys(&self) -> Vec<QueryKey> {
        self.subscribed.iter().copied().collect()
    }

    /// Record a successful response: store the data, label the entry
    /// with the tags the query provides, and bump the generation.
    pub fn apply_success(&mut self, key: QueryKey, data: QueryData) {
        let tags = key.provides(&data);
        let entry = self.entries.entry(key).or_default();
        entry.state = QueryState::Success(data);
        entry.tags = tags;
        entry.fetched_at = Some(Utc::now());
        entry.stale = false;
        self.generation += 1;
    }

    pub fn apply_error(&mut self, key: QueryKey, message: String) {
        let entry = self.entries.entry(key).or_default();
        entry.state = QueryState::Error(message);
        entry.stale = false;
        self.generation += 1;
    }

    /// Mark every entry labeled with any of `tags` stale and return the
    /// subscribed keys among them, which the caller must re-fetch.
    /// Unsubscribed entries stay stale until their next subscribe.
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<QueryKey> {
        let mut refetch = Vec::new();
        for (key, entry) in &mut self.entries {
            if entry.tags.iter().any(|t| tags.contains(t)) {
                entry.stale = true;
                if self.subscribed.contains(key) {
                    refetch.push(*key);
                }
            }
        }
        debug!(invalidated = ?tags, refetch = ?refetch, "Cache invalidation");
        refetch
    }

    // ===== Typed accessors =====

    /// The cached full collection, if present.
    pub fn tutorials(&self) -> Option<&[Tutorial]> {
        match self.state(QueryKey::Tutorials) {
            QueryState::Success(QueryData::List(items)) => Some(items),
            _ => None,
        }
    }

    /// The cached published listing, if present.
    pub fn published(&self) -> Option<&[Tutorial]> {
        match self.state(QueryKey::Published) {
            QueryState::Success(QueryData::List(items)) => Some(items),
            _ => None,
        }
    }

    /// A cached single record, if present.
    pub fn tutorial(&self, id: i64) -> Option<&Tutorial> {
        match self.state(QueryKey::Tutorial(id)) {
            QueryState::Success(QueryData::One(t)) => Some(t),
            _ => None,
        }
    }

    /// Most recent fetch time across all entries, for the status bar.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.entries.values().filter_map(|e| e.fetched_at).max()
    }
}

/// Render a fetch timestamp as a short relative age.
pub fn age_display(fetched_at: DateTime<Utc>) -> String {
    let minutes = (Utc::now() - fetched_at).num_minutes();
    if minutes < 1 {
        // Covers clock skew (negative) as well
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Mutation;
    use chrono::Duration;

    fn tutorial(id: i64) -> Tutorial {
        Tutorial {
            id,
            title: format!("t{}", id),
            description: "d".to_string(),
            published: false,
        }
    }

    fn list(ids: &[i64]) -> QueryData {
        QueryData::List(ids.iter().map(|&id| tutorial(id)).collect())
    }

    #[test]
    fn test_subscribe_idle_requests_fetch() {
        let mut store = Store::new();
        assert!(store.subscribe(QueryKey::Tutorials));
        // Already loading: no second fetch
        store.mark_loading(QueryKey::Tutorials);
        assert!(!store.subscribe(QueryKey::Tutorials));
    }

    #[test]
    fn test_subscribe_serves_fresh_cache_without_fetch() {
        let mut store = Store::new();
        store.apply_success(QueryKey::Tutorials, list(&[1]));
        assert!(!store.subscribe(QueryKey::Tutorials));
    }

    #[test]
    fn test_success_bumps_generation_and_stores_data() {
        let mut store = Store::new();
        let before = store.generation();
        store.apply_success(QueryKey::Tutorials, list(&[1, 2]));
        assert_eq!(store.generation(), before + 1);
        assert_eq!(store.tutorials().map(<[Tutorial]>::len), Some(2));
    }

    #[test]
    fn test_update_invalidates_subscribed_list_and_item() {
        let mut store = Store::new();
        store.subscribe(QueryKey::Tutorials);
        store.subscribe(QueryKey::Tutorial(1));
        store.apply_success(QueryKey::Tutorials, list(&[1, 2]));
        store.apply_success(QueryKey::Tutorial(1), QueryData::One(tutorial(1)));

        let refetch = store.invalidate(&Mutation::Update(1).invalidates());
        assert_eq!(refetch.len(), 2);
        assert!(refetch.contains(&QueryKey::Tutorials));
        assert!(refetch.contains(&QueryKey::Tutorial(1)));
    }

    #[test]
    fn test_delete_all_invalidates_collection_only() {
        let mut store = Store::new();
        store.subscribe(QueryKey::Tutorials);
        store.subscribe(QueryKey::Tutorial(1));
        store.apply_success(QueryKey::Tutorials, list(&[1]));
        store.apply_success(QueryKey::Tutorial(1), QueryData::One(tutorial(1)));

        let refetch = store.invalidate(&Mutation::DeleteAll.invalidates());
        // The list carries Item(1) too, so it matches; the lone-record
        // entry does not, since delete-all touches only the collection.
        assert_eq!(refetch, vec![QueryKey::Tutorials]);
    }

    #[test]
    fn test_published_entry_never_invalidated() {
        let mut store = Store::new();
        store.subscribe(QueryKey::Published);
        store.apply_success(QueryKey::Published, list(&[1, 2]));

        for mutation in [
            Mutation::Create,
            Mutation::Update(1),
            Mutation::Delete(1),
            Mutation::DeleteAll,
        ] {
            assert!(store.invalidate(&mutation.invalidates()).is_empty());
        }
    }

    #[test]
    fn test_unsubscribed_entry_goes_stale_then_refetches_on_subscribe() {
        let mut store = Store::new();
        store.apply_success(QueryKey::Tutorials, list(&[1]));
        // Not subscribed: invalidation returns nothing to refetch
        assert!(store.invalidate(&[Tag::List]).is_empty());
        // but the staleness is remembered for the next subscribe
        assert!(store.subscribe(QueryKey::Tutorials));
    }

    #[test]
    fn test_refetch_keeps_previous_data() {
        let mut store = Store::new();
        store.subscribe(QueryKey::Tutorials);
        store.apply_success(QueryKey::Tutorials, list(&[1, 2]));
        store.invalidate(&[Tag::List]);
        store.mark_loading(QueryKey::Tutorials);
        // Old data still renders while the re-fetch is in flight
        assert_eq!(store.tutorials().map(<[Tutorial]>::len), Some(2));
    }

    #[test]
    fn test_error_state_surfaces_message() {
        let mut store = Store::new();
        store.apply_error(QueryKey::Tutorial(3), "404 Not Found".to_string());
        assert_eq!(
            store.state(QueryKey::Tutorial(3)).error(),
            Some("404 Not Found")
        );
    }

    #[test]
    fn test_age_display() {
        assert_eq!(age_display(Utc::now()), "just now");
        assert_eq!(age_display(Utc::now() - Duration::minutes(5)), "5m ago");
        assert_eq!(age_display(Utc::now() - Duration::minutes(90)), "1h ago");
        assert_eq!(age_display(Utc::now() - Duration::days(3)), "3d ago");
    }
}
