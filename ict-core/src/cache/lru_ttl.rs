//! LRU + TTL signal cache (`spec.md` §4.10), grounded on the Python
//! `CacheManager` in `examples/original_source/cache_manager.py`: an
//! `OrderedDict`-style store keyed `"signal:{symbol}:{timeframe}"` with
//! move-to-end-on-hit recency tracking and hit/miss/eviction/expiration
//! counters.
//!
//! Freshness re-validation is layered on top of the original: a cached
//! signal is only returned if its entry price is still within 5% of the
//! caller's current price (`spec.md` §4.10, §8 invariant 6).

use crate::error::CacheError;
use std::collections::HashMap;

/// `|entry - current| / current` bound beyond which a cache hit is
/// discarded and treated as a miss.
const FRESHNESS_BOUND_PCT: f64 = 5.0;

fn cache_key(symbol: &str, timeframe: &str) -> String {
    format!("signal:{symbol}:{timeframe}")
}

struct Entry<V> {
    value: V,
    expires_at_epoch_secs: u64,
}

/// Snapshot of cache statistics (`spec.md` §4.10).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub evictions: u64,
    pub expirations: u64,
}

/// Outcome of a `SignalCache::get` call, distinguishing a stale-by-price
/// hit from an ordinary miss so callers can log the right reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
    ExpiredByTtl,
    StaleByPrice,
}

/// LRU eviction + TTL expiration cache of generic values, keyed by
/// `(symbol, timeframe)`. `V` is `Signal` in production; generic so tests
/// don't need a full `Signal` fixture.
pub struct SignalCache<V> {
    max_size: usize,
    default_ttl_secs: u64,
    entries: HashMap<String, Entry<V>>,
    /// Recency order, oldest (least-recently-used) first. The key at the
    /// front is the next eviction candidate.
    order: Vec<String>,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<V> SignalCache<V> {
    pub fn new(max_size: usize, default_ttl_secs: u64) -> Result<Self, CacheError> {
        if max_size == 0 {
            return Err(CacheError::InvalidCapacity(max_size));
        }
        Ok(Self {
            max_size,
            default_ttl_secs,
            entries: HashMap::new(),
            order: Vec::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
        })
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos);
            self.order.push(k);
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Raw get by key, checking only TTL expiration (no freshness
    /// re-validation — that requires domain knowledge of entry/current
    /// price and lives in `get_signal`).
    fn get_raw(&mut self, key: &str, now_epoch_secs: u64) -> Option<&V> {
        let expired = match self.entries.get(key) {
            None => {
                self.misses += 1;
                return None;
            }
            Some(entry) => now_epoch_secs > entry.expires_at_epoch_secs,
        };

        if expired {
            self.remove(key);
            self.expirations += 1;
            self.misses += 1;
            return None;
        }

        self.touch(key);
        self.hits += 1;
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn set(&mut self, key: String, value: V, ttl_secs: Option<u64>, now_epoch_secs: u64) {
        let ttl = ttl_secs.unwrap_or(self.default_ttl_secs);
        let expires_at_epoch_secs = now_epoch_secs + ttl;

        let is_new = !self.entries.contains_key(&key);
        self.entries.insert(
            key.clone(),
            Entry {
                value,
                expires_at_epoch_secs,
            },
        );

        if is_new {
            self.order.push(key);
            // capacity is only checked on insert of a new key, matching
            // `cache_manager.py::set` (updates never trigger eviction).
            if self.order.len() > self.max_size {
                let oldest = self.order.remove(0);
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        } else {
            self.touch(&key);
        }
    }

    /// Bulk sweep of all entries whose TTL has passed, independent of
    /// reads. Returns the number removed.
    pub fn cleanup_expired(&mut self, now_epoch_secs: u64) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| now_epoch_secs > entry.expires_at_epoch_secs)
            .map(|(k, _)| k.clone())
            .collect();
        let removed = expired_keys.len();
        for key in expired_keys {
            self.remove(&key);
            self.expirations += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total > 0 {
            self.hits as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            hits: self.hits,
            misses: self.misses,
            hit_rate,
            evictions: self.evictions,
            expirations: self.expirations,
        }
    }
}

impl SignalCache<crate::domain::Signal> {
    /// Convenience wrapper matching `cache_manager.py`'s `cache_signal`.
    pub fn set_signal(
        &mut self,
        symbol: &str,
        timeframe: &str,
        signal: crate::domain::Signal,
        ttl_secs: Option<u64>,
        now_epoch_secs: u64,
    ) {
        self.set(cache_key(symbol, timeframe), signal, ttl_secs, now_epoch_secs);
    }

    /// Convenience wrapper matching `cache_manager.py`'s
    /// `get_cached_signal`, with the freshness re-validation from
    /// `spec.md` §4.10 layered on top: a cached signal is discarded (and
    /// counted as a miss) if its entry price has drifted more than 5%
    /// from `current_price`.
    pub fn get_signal(
        &mut self,
        symbol: &str,
        timeframe: &str,
        current_price: f64,
        now_epoch_secs: u64,
    ) -> (Option<crate::domain::Signal>, CacheLookup) {
        let key = cache_key(symbol, timeframe);

        let stale = match self.entries.get(&key) {
            None => false,
            Some(entry) => {
                if now_epoch_secs > entry.expires_at_epoch_secs {
                    false
                } else {
                    let entry_price = entry.value.entry_price;
                    current_price > 0.0
                        && (entry_price - current_price).abs() / current_price * 100.0
                            > FRESHNESS_BOUND_PCT
                }
            }
        };

        if stale {
            self.remove(&key);
            self.misses += 1;
            return (None, CacheLookup::StaleByPrice);
        }

        match self.get_raw(&key, now_epoch_secs) {
            Some(signal) => (Some(signal.clone()), CacheLookup::Hit),
            None => (None, CacheLookup::Miss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> SignalCache<i32> {
        SignalCache::new(2, 100).unwrap()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            SignalCache::<i32>::new(0, 100),
            Err(CacheError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn miss_then_hit_after_set() {
        let mut c = cache();
        assert_eq!(c.get_raw("a", 0), None);
        c.set("a".into(), 1, None, 0);
        assert_eq!(c.get_raw("a", 1), Some(&1));
        let stats = c.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut c = cache();
        c.set("a".into(), 1, Some(10), 0);
        assert_eq!(c.get_raw("a", 11), None);
        assert_eq!(c.stats().expirations, 1);
    }

    #[test]
    fn capacity_overflow_evicts_least_recently_used() {
        let mut c = cache();
        c.set("a".into(), 1, None, 0);
        c.set("b".into(), 2, None, 0);
        // touch "a" so "b" becomes the LRU candidate
        let _ = c.get_raw("a", 1);
        c.set("c".into(), 3, None, 1);

        assert_eq!(c.get_raw("b", 2), None);
        assert!(c.get_raw("a", 2).is_some());
        assert!(c.get_raw("c", 2).is_some());
        assert_eq!(c.stats().evictions, 1);
    }

    #[test]
    fn cleanup_expired_sweeps_without_a_read() {
        let mut c = cache();
        c.set("a".into(), 1, Some(5), 0);
        c.set("b".into(), 2, Some(50), 0);
        let removed = c.cleanup_expired(6);
        assert_eq!(removed, 1);
        assert_eq!(c.stats().size, 1);
    }

    #[test]
    fn hit_rate_is_a_percentage() {
        let mut c = cache();
        c.set("a".into(), 1, None, 0);
        let _ = c.get_raw("a", 1);
        let _ = c.get_raw("a", 1);
        let _ = c.get_raw("missing", 1);
        let stats = c.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 66.666).abs() < 0.01);
    }
}
