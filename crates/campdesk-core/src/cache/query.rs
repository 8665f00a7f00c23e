//! In-memory query repository.
//!
//! Fetched payloads are stored under a `QueryKey`. A mutation invalidates the
//! keys whose data it may have changed; the next `get` misses and the caller
//! re-fetches from the server.
//!
//! Every invalidation bumps the key's generation. A fetch records the
//! generation before its request and stores the response with
//! `insert_if_current`, so a response that started before an invalidation
//! never repopulates the cache with pre-mutation data.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::manager::CachedData;

/// Default freshness window for cached queries.
const DEFAULT_MAX_AGE_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Agenda(i64),
    Camp(i64),
    Clinicians(i64),
    Locations(i64),
    Staff(i64),
}

impl QueryKey {
    pub fn camp_id(&self) -> i64 {
        match self {
            QueryKey::Agenda(id)
            | QueryKey::Camp(id)
            | QueryKey::Clinicians(id)
            | QueryKey::Locations(id)
            | QueryKey::Staff(id) => *id,
        }
    }

    /// Keys a successful agenda mutation must invalidate. The camp record
    /// carries summary fields derived from agenda contents.
    pub fn agenda_mutation(camp_id: i64) -> [QueryKey; 2] {
        [QueryKey::Agenda(camp_id), QueryKey::Camp(camp_id)]
    }

    /// Every key a camp can have.
    pub fn for_camp(camp_id: i64) -> [QueryKey; 5] {
        [
            QueryKey::Agenda(camp_id),
            QueryKey::Camp(camp_id),
            QueryKey::Clinicians(camp_id),
            QueryKey::Locations(camp_id),
            QueryKey::Staff(camp_id),
        ]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Agenda(id) => write!(f, "camps/{}/agenda", id),
            QueryKey::Camp(id) => write!(f, "camps/{}", id),
            QueryKey::Clinicians(id) => write!(f, "camps/{}/clinicians", id),
            QueryKey::Locations(id) => write!(f, "camps/{}/locations", id),
            QueryKey::Staff(id) => write!(f, "camps/{}/staff", id),
        }
    }
}

#[derive(Default)]
struct Entries {
    values: HashMap<QueryKey, CachedData<serde_json::Value>>,
    generations: HashMap<QueryKey, u64>,
}

impl Entries {
    fn bump(&mut self, key: QueryKey) {
        *self.generations.entry(key).or_insert(0) += 1;
    }
}

pub struct QueryCache {
    entries: RwLock<Entries>,
    max_age: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_max_age(Duration::minutes(DEFAULT_MAX_AGE_MINUTES))
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            max_age,
        }
    }

    /// Cached value for `key`, or `None` if absent, expired, or unreadable as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let cached = entries.values.get(key)?;
        if cached.cached_at + self.max_age < chrono::Utc::now() {
            debug!(key = %key, "Cached query expired");
            return None;
        }
        match serde_json::from_value(cached.data.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Cached query has unexpected shape");
                None
            }
        }
    }

    /// Current generation of `key`. Take this before issuing the request
    /// whose response goes to `insert_if_current`.
    pub fn generation(&self, key: &QueryKey) -> u64 {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.generations.get(key).copied().unwrap_or(0)
    }

    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        let generation = self.generation(&key);
        self.insert_if_current(key, generation, value);
    }

    /// Store `value` unless `key` was invalidated after `generation` was
    /// read. Returns whether the value was stored.
    pub fn insert_if_current<T: Serialize>(&self, key: QueryKey, generation: u64, value: &T) -> bool {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to cache query result");
                return false;
            }
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.generations.get(&key).copied().unwrap_or(0) != generation {
            debug!(key = %key, "Discarded response older than the last invalidation");
            return false;
        }
        entries.values.insert(key, CachedData::new(json));
        true
    }

    /// Drop `key` so the next read goes to the server. Returns whether an entry existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let existed = entries.values.remove(key).is_some();
        entries.bump(*key);
        debug!(key = %key, existed, "Invalidated query");
        existed
    }

    pub fn invalidate_all(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(key);
        }
    }

    /// Drop every cached query belonging to `camp_id`.
    pub fn invalidate_camp(&self, camp_id: i64) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.values.retain(|key, _| key.camp_id() != camp_id);
        for key in QueryKey::for_camp(camp_id) {
            entries.bump(key);
        }
        debug!(camp_id, "Invalidated all camp queries");
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.values.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_inserted_value() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Camp(1), &vec![1, 2, 3]);
        assert_eq!(cache.get::<Vec<i32>>(&QueryKey::Camp(1)), Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>(&QueryKey::Camp(2)), None);
    }

    #[test]
    fn test_invalidate_forces_miss() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Agenda(1), &"agenda");
        assert!(cache.invalidate(&QueryKey::Agenda(1)));
        assert!(!cache.invalidate(&QueryKey::Agenda(1)));
        assert_eq!(cache.get::<String>(&QueryKey::Agenda(1)), None);
    }

    #[test]
    fn test_agenda_mutation_keys_cover_camp_record() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Agenda(3), &1);
        cache.insert(QueryKey::Camp(3), &2);
        cache.insert(QueryKey::Locations(3), &3);
        cache.invalidate_all(&QueryKey::agenda_mutation(3));
        assert!(!cache.contains(&QueryKey::Agenda(3)));
        assert!(!cache.contains(&QueryKey::Camp(3)));
        assert!(cache.contains(&QueryKey::Locations(3)));
    }

    #[test]
    fn test_invalidate_camp_leaves_other_camps() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Agenda(1), &1);
        cache.insert(QueryKey::Staff(1), &1);
        cache.insert(QueryKey::Agenda(2), &2);
        cache.invalidate_camp(1);
        assert!(!cache.contains(&QueryKey::Staff(1)));
        assert!(cache.contains(&QueryKey::Agenda(2)));
    }

    #[test]
    fn test_response_older_than_invalidation_is_discarded() {
        let cache = QueryCache::new();
        let key = QueryKey::Agenda(1);
        let before = cache.generation(&key);
        cache.invalidate(&key);
        assert!(!cache.insert_if_current(key, before, &"pre-mutation"));
        assert!(!cache.contains(&key));

        let after = cache.generation(&key);
        assert!(cache.insert_if_current(key, after, &"fresh"));
        assert_eq!(cache.get::<String>(&key).as_deref(), Some("fresh"));
    }

    #[test]
    fn test_invalidate_camp_bumps_absent_keys() {
        let cache = QueryCache::new();
        let before = cache.generation(&QueryKey::Staff(1));
        cache.invalidate_camp(1);
        assert!(!cache.insert_if_current(QueryKey::Staff(1), before, &1));
        assert_eq!(cache.generation(&QueryKey::Staff(2)), 0);
    }

    #[test]
    fn test_expired_entries_miss() {
        let cache = QueryCache::with_max_age(Duration::minutes(-1));
        cache.insert(QueryKey::Camp(1), &1);
        assert_eq!(cache.get::<i32>(&QueryKey::Camp(1)), None);
    }

    #[test]
    fn test_wrong_shape_misses() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Camp(1), &"not a number");
        assert_eq!(cache.get::<i32>(&QueryKey::Camp(1)), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(QueryKey::Agenda(7).to_string(), "camps/7/agenda");
        assert_eq!(QueryKey::Camp(7).to_string(), "camps/7");
    }
}
