use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::types::Place;

pub const DEFAULT_TTL_SECS: u64 = 300;

/// Source of "now" for cache freshness.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::starting_at(Utc::now())
    }
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        ManualClock {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    places: Vec<Place>,
    stored_at: DateTime<Utc>,
}

/// Short-lived memo of nearby lookups.
///
/// Stale entries are skipped on read and overwritten by the next store; they
/// are only removed by [`PlaceCache::clear`] or [`PlaceCache::evict_expired`].
pub struct PlaceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for PlaceCache {
    fn default() -> Self {
        PlaceCache::new(Duration::seconds(DEFAULT_TTL_SECS as i64), Arc::new(SystemClock))
    }
}

impl PlaceCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        PlaceCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// `category|lat|lng|radius` with the coordinate rounded to 4 decimals
    /// (about 11 m), so tiny map jitter reuses the same entry.
    pub fn key(category: &str, lat: f64, lng: f64, radius_m: u32) -> String {
        format!("{category}|{lat:.4}|{lng:.4}|{radius_m}")
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Vec<Place>> {
        let now = self.clock.now();
        self.entries()
            .get(key)
            .filter(|entry| now - entry.stored_at < self.ttl)
            .map(|entry| entry.places.clone())
    }

    pub fn put(&self, key: String, places: Vec<Place>) {
        let entry = CacheEntry {
            places,
            stored_at: self.clock.now(),
        };
        self.entries().insert(key, entry);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Drops every stale entry. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| now - entry.stored_at < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
