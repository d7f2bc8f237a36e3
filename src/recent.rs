//! Recent-search history over a pluggable key-value store.
//!
//! The store boundary is deliberately tiny (get/set one string key) so
//! an embedding application can back it with whatever client-local
//! persistence it has. Entries are capped, deduplicated by route and
//! kept newest first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Key the encoded history is stored under.
const STORAGE_KEY: &str = "farescope_recent_searches";

/// History never grows beyond this many entries.
const MAX_ENTRIES: usize = 5;

/// Minimal client-local persistence boundary.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory store, the default when no persistence is wired up.
#[derive(Default)]
pub struct MemoryStore {
    entries: parking_lot::RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }
}

/// One endpoint of a remembered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEndpoint {
    pub iata_code: String,
    pub city_name: String,
}

/// A remembered search, enough to replay it from the search form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub origin: RecentEndpoint,
    pub destination: RecentEndpoint,
    /// Departure date in `yyyy-mm-dd` form
    pub departure_date: String,
    pub passengers: u32,
    /// Unix timestamp in milliseconds when the search was made
    pub timestamp: i64,
}

/// Capped, route-deduplicated search history.
pub struct RecentSearches<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> RecentSearches<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored searches, newest first. Corrupt stored data reads as an
    /// empty history rather than an error.
    pub fn list(&self) -> Vec<RecentSearch> {
        self.store
            .get(STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Records a search at the head of the history. An earlier entry
    /// for the same origin/destination pair is replaced (newest wins)
    /// and the history is trimmed to its cap.
    pub fn add(
        &self,
        origin: RecentEndpoint,
        destination: RecentEndpoint,
        departure_date: String,
        passengers: u32,
    ) {
        let mut entries = self.list();
        entries.retain(|entry| {
            !(entry.origin.iata_code == origin.iata_code
                && entry.destination.iata_code == destination.iata_code)
        });

        let timestamp = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        entries.insert(
            0,
            RecentSearch {
                origin,
                destination,
                departure_date,
                passengers,
                timestamp,
            },
        );
        entries.truncate(MAX_ENTRIES);

        match serde_json::to_string(&entries) {
            Ok(encoded) => self.store.set(STORAGE_KEY, &encoded),
            Err(e) => log::warn!("failed to encode recent searches: {}", e),
        }
    }
}
