//! Reply caching and failure tracking for the planner server.

use super::types::{CourseCheck, GeocodePayload};
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Concurrent map whose entries expire a fixed time after insertion.
pub struct TtlCache<K, V> {
    entries: DashMap<K, (V, Instant)>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// The live value for `key`. An expired entry is evicted on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        let live = self
            .entries
            .get(key)
            .and_then(|entry| (Instant::now() < entry.1).then(|| entry.0.clone()));

        if live.is_none() {
            self.entries.remove_if(key, |_, (_, expires_at)| Instant::now() >= *expires_at);
        }
        live
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (value, Instant::now() + self.ttl));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Entries held, expired ones included.
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Opens after `threshold` consecutive transient failures and stays open
/// for `recovery_time` after the latest one.
pub struct CircuitBreaker {
    failures: AtomicU32,
    last_failure: Mutex<Option<Instant>>,
    threshold: u32,
    recovery_time: Duration,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, recovery_time: Duration) -> Self {
        Self {
            failures: AtomicU32::new(0),
            last_failure: Mutex::new(None),
            threshold,
            recovery_time,
        }
    }

    pub fn is_open(&self) -> bool {
        if self.failures.load(Ordering::Relaxed) < self.threshold {
            return false;
        }

        let recovered = match self.last_failure.lock() {
            Ok(last) => last.map_or(true, |at| at.elapsed() > self.recovery_time),
            Err(_) => false,
        };
        if recovered {
            self.record_success();
        }
        !recovered
    }

    pub fn record_success(&self) {
        self.failures.store(0, Ordering::Relaxed);
        if let Ok(mut last) = self.last_failure.lock() {
            *last = None;
        }
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_failure.lock() {
            *last = Some(Instant::now());
        }
    }
}

/// Cache key for the single geocode payload.
pub const GEOCODE_KEY: &str = "/get_geocode/";

/// Reply caches plus the breaker shared by every request of one client.
pub struct UpstreamCacheState {
    /// Geocode payload; it only changes after a gather
    pub geocode: TtlCache<&'static str, Arc<GeocodePayload>>,
    /// Course checks by normalized course id
    pub course_checks: TtlCache<String, CourseCheck>,
    pub circuit_breaker: CircuitBreaker,
    /// Serializes geocode refreshes so concurrent misses fetch once
    pub geocode_refresh: tokio::sync::Mutex<()>,
}

impl UpstreamCacheState {
    pub fn new(ttl: Duration, breaker_threshold: u32, breaker_recovery: Duration) -> Self {
        Self {
            geocode: TtlCache::new(ttl),
            course_checks: TtlCache::new(ttl),
            circuit_breaker: CircuitBreaker::new(breaker_threshold, breaker_recovery),
            geocode_refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// Drops every cached reply.
    pub fn clear(&self) {
        self.geocode.clear();
        self.course_checks.clear();
    }
}

impl Default for UpstreamCacheState {
    fn default() -> Self {
        Self::new(Duration::from_secs(10 * 60), 5, Duration::from_secs(30))
    }
}
