// =============================================================================
// Fetch cache — explicit time-to-live cache in front of a provider
// =============================================================================
//
// Entries older than `ttl` are treated as absent and evicted on read. The
// dashboard's refresh action calls `clear()` so the next pass refetches every
// pair. Absent outcomes are cached too, so a pair with no data is not re-polled
// on every page view until the entry expires or the cache is cleared.
// =============================================================================

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{MarketDataProvider, OhlcvSeries};

/// Thread-safe key/value cache with a fixed time-to-live per entry.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, (Instant, V)>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a clone of the value for `key` if it has not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let map = self.entries.read();
            match map.get(key) {
                Some((stored_at, value)) if stored_at.elapsed() < self.ttl => {
                    return Some(value.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: evict under the write lock.
        let mut map = self.entries.write();
        if let Some((stored_at, _)) = map.get(key) {
            if stored_at.elapsed() >= self.ttl {
                map.remove(key);
            }
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.write().insert(key, (Instant::now(), value));
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, including any not yet evicted after expiry.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -----------------------------------------------------------------------------
// CachedProvider
// -----------------------------------------------------------------------------

/// Wraps a provider and memoises its fetch outcomes by symbol.
pub struct CachedProvider<P> {
    inner: P,
    cache: TtlCache<String, Option<Arc<OhlcvSeries>>>,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    async fn fetch(&self, symbol: &str) -> Option<Arc<OhlcvSeries>> {
        let key = symbol.to_string();
        if let Some(hit) = self.cache.get(&key) {
            debug!(symbol, "fetch cache hit");
            return hit;
        }

        debug!(symbol, ttl_s = self.cache.ttl().as_secs(), "fetch cache miss");
        let outcome = self.inner.fetch(symbol).await;
        self.cache.insert(key, outcome.clone());
        outcome
    }

    fn invalidate(&self) {
        if !self.cache.is_empty() {
            debug!(entries = self.cache.len(), "fetch cache cleared");
            self.cache.clear();
        }
        self.inner.invalidate();
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_returns_fresh_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("EURUSD=X".to_string(), 1.08);
        assert_eq!(cache.get(&"EURUSD=X".to_string()), Some(1.08));
        assert_eq!(cache.get(&"GBPUSD=X".to_string()), None);
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = TtlCache::new(Duration::from_millis(20));
        cache.insert("k", 1);
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&"k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.ttl(), Duration::from_secs(60));
    }

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn fetch(&self, symbol: &str) -> Option<Arc<OhlcvSeries>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if symbol == "EMPTY" {
                return None;
            }
            Some(Arc::new(OhlcvSeries::from_raw(symbol, Vec::new())))
        }
    }

    #[tokio::test]
    async fn cached_provider_hits_inner_once_until_cleared() {
        let provider = CachedProvider::new(
            CountingProvider { calls: AtomicUsize::new(0) },
            Duration::from_secs(60),
        );

        assert!(provider.fetch("EURUSD=X").await.is_some());
        assert!(provider.fetch("EURUSD=X").await.is_some());
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 1);

        provider.invalidate();
        assert!(provider.cache.is_empty());
        assert!(provider.fetch("EURUSD=X").await.is_some());
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn absent_outcomes_are_cached() {
        let provider = CachedProvider::new(
            CountingProvider { calls: AtomicUsize::new(0) },
            Duration::from_secs(60),
        );
        assert!(provider.fetch("EMPTY").await.is_none());
        assert!(provider.fetch("EMPTY").await.is_none());
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 1);
    }
}
