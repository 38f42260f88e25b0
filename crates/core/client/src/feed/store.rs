use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru_time_cache::LruCache;
use tokio::sync::RwLock;

/// Cached value and when it was fetched
struct Entry<V> {
    value: Arc<V>,
    fetched_at: Instant,
}

/// Keyed results with a staleness window
///
/// Entries older than `stale` are still kept but no longer served, entries
/// unused for the expiry duration are evicted by the cache itself.
///
/// Every [`Store::clear`] starts a new generation. Results fetched during an
/// earlier generation are not stored.
pub(crate) struct Store<K: Ord + Clone, V> {
    entries: Arc<RwLock<LruCache<K, Entry<V>>>>,
    generation: Arc<AtomicU64>,
    stale: Duration,
}

impl<K: Ord + Clone, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            generation: self.generation.clone(),
            stale: self.stale,
        }
    }
}

impl<K: Ord + Clone, V> Store<K, V> {
    pub fn new(stale: Duration, expiry: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(
                LruCache::with_expiry_duration_and_capacity(expiry, capacity.max(1)),
            )),
            generation: Arc::new(AtomicU64::new(0)),
            stale,
        }
    }

    /// Generation a fetch starting now belongs to
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Value for `key` if it was fetched within the staleness window
    pub async fn fresh(&self, key: &K) -> Option<Arc<V>> {
        if !self.entries.read().await.contains_key(key) {
            return None;
        }

        self.entries
            .write()
            .await
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.stale)
            .map(|entry| entry.value.clone())
    }

    /// Store a result fetched during `generation`
    ///
    /// Returns false and stores nothing if the store was cleared since.
    pub async fn insert(&self, generation: u64, key: K, value: Arc<V>) -> bool {
        let mut entries = self.entries.write().await;
        if self.generation() != generation {
            return false;
        }

        entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
