use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::models::DiscoverParams;

use super::store::{KeyValueStore, StoreError, StoreResult};

/// Namespace shared by every entry this cache writes
pub const CACHE_PREFIX: &str = "movie_cache_";

/// Entries live for a day unless told otherwise
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Genre-combination lookups. Ids are kept sorted so the same logical
    /// query always maps to one entry.
    GenreCombination { ids: Vec<u32>, require_all: bool },
    Discover(String),
    Details(u64),
    Search { query: String, page: u32 },
    Custom(String),
}

impl CacheKey {
    pub fn genre_combination(ids: &[u32], require_all: bool) -> Self {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        CacheKey::GenreCombination { ids, require_all }
    }

    /// Key for a discover query: parameters sorted by name, unset ones dropped
    pub fn discover(params: &DiscoverParams) -> Self {
        let canonical = match serde_json::to_value(params) {
            Ok(serde_json::Value::Object(map)) => {
                let present: serde_json::Map<String, serde_json::Value> =
                    map.into_iter().filter(|(_, v)| !v.is_null()).collect();
                serde_json::Value::Object(present).to_string()
            }
            _ => format!("{:?}", params),
        };
        CacheKey::Discover(canonical)
    }

    pub fn search(query: &str, page: u32) -> Self {
        CacheKey::Search {
            query: query.to_lowercase(),
            page,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::GenreCombination { ids, require_all } => {
                let ids = ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join("_");
                let mode = if *require_all { "all" } else { "any" };
                write!(f, "genres_{}_{}", ids, mode)
            }
            CacheKey::Discover(params) => write!(f, "discover_{}", params),
            CacheKey::Details(id) => write!(f, "details_{}", id),
            CacheKey::Search { query, page } => write!(f, "search_{}_{}", query, page),
            CacheKey::Custom(key) => write!(f, "{}", key),
        }
    }
}

/// Stored form of a cached value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub data: T,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Milliseconds
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    /// An entry is fresh while `now - created_at <= ttl`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.timestamp_millis() - self.created_at;
        age > i64::try_from(self.ttl).unwrap_or(i64::MAX)
    }
}

/// Envelope read back when only the timing fields matter
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryHeader {
    created_at: i64,
    ttl: u64,
}

/// Source of the current time, swappable in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Summary of what is currently stored under the cache namespace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub count: usize,
    pub size_bytes: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
}

/// Key-value cache where every entry carries its own time-to-live
///
/// Expired entries are evicted lazily when read, or in bulk through
/// `clear_expired`. There is no background sweeper and no size-based eviction.
/// Cache trouble never reaches callers: failed reads behave like misses and
/// failed writes are logged and dropped.
#[derive(Clone)]
pub struct ExpiringCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl ExpiringCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn storage_key(key: &CacheKey) -> String {
        format!("{}{}", CACHE_PREFIX, key)
    }

    /// Returns the cached value if present and still fresh
    ///
    /// A stale or unreadable entry is removed as a side effect of the lookup.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let storage_key = Self::storage_key(key);

        let raw = match self.store.get(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Dropping unreadable cache entry");
                self.evict(&storage_key).await;
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            tracing::debug!(key = %key, "Cache entry expired");
            self.evict(&storage_key).await;
            return None;
        }

        Some(entry.data)
    }

    /// Stores a value with the default TTL
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T) {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Stores a value, overwriting any existing entry
    ///
    /// When the store is full, expired entries are swept and the write is
    /// retried once. A second failure is logged and the value is not cached.
    pub async fn set_with_ttl<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let storage_key = Self::storage_key(key);
        let entry = CacheEntry {
            data: value,
            created_at: self.clock.now().timestamp_millis(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        match self.store.set(&storage_key, &json).await {
            Ok(()) => {}
            Err(StoreError::CapacityExceeded) => {
                tracing::warn!(key = %key, "Cache store full, clearing expired entries");
                if let Err(e) = self.clear_expired().await {
                    tracing::error!(error = %e, "Failed to clear expired cache entries");
                }
                if let Err(e) = self.store.set(&storage_key, &json).await {
                    tracing::error!(key = %key, error = %e, "Failed to cache even after cleanup");
                }
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache write failed");
            }
        }
    }

    pub async fn remove(&self, key: &CacheKey) {
        self.evict(&Self::storage_key(key)).await;
    }

    async fn evict(&self, storage_key: &str) {
        if let Err(e) = self.store.remove(storage_key).await {
            tracing::warn!(key = %storage_key, error = %e, "Cache eviction failed");
        }
    }

    /// Removes every entry in the cache namespace, returning how many were removed
    pub async fn clear_all(&self) -> StoreResult<usize> {
        let keys = self.store.keys(CACHE_PREFIX).await?;
        for key in &keys {
            self.store.remove(key).await?;
        }
        tracing::info!(
            removed = keys.len(),
            store = self.store.name(),
            "Cache cleared"
        );
        Ok(keys.len())
    }

    /// Removes expired entries, and any entry that can no longer be parsed
    pub async fn clear_expired(&self) -> StoreResult<usize> {
        let now = self.clock.now();
        let mut removed = 0;

        for key in self.store.keys(CACHE_PREFIX).await? {
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };

            let stale = match serde_json::from_str::<EntryHeader>(&raw) {
                Ok(header) => {
                    let entry = CacheEntry {
                        data: (),
                        created_at: header.created_at,
                        ttl: header.ttl,
                    };
                    entry.is_expired(now)
                }
                Err(_) => true,
            };

            if stale {
                self.store.remove(&key).await?;
                removed += 1;
            }
        }

        tracing::debug!(
            removed,
            store = self.store.name(),
            "Expired cache entries cleared"
        );
        Ok(removed)
    }

    pub async fn stats(&self) -> StoreResult<CacheStats> {
        let mut stats = CacheStats {
            count: 0,
            size_bytes: 0,
            oldest_entry: None,
        };

        for key in self.store.keys(CACHE_PREFIX).await? {
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };

            stats.count += 1;
            stats.size_bytes += key.len() + raw.len();

            if let Ok(header) = serde_json::from_str::<EntryHeader>(&raw) {
                let created = DateTime::from_timestamp_millis(header.created_at);
                stats.oldest_entry = match (stats.oldest_entry, created) {
                    (Some(oldest), Some(created)) => Some(oldest.min(created)),
                    (oldest, created) => oldest.or(created),
                };
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to
    pub(crate) struct ManualClock(AtomicI64);

    impl ManualClock {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(1_700_000_000_000)))
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.0.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.0.load(Ordering::SeqCst)).unwrap()
        }
    }

    fn cache_with(store: MemoryStore) -> (ExpiringCache, Arc<ManualClock>) {
        let clock = ManualClock::new();
        let cache = ExpiringCache::with_clock(Arc::new(store), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_genre_key_is_order_independent() {
        assert_eq!(
            CacheKey::genre_combination(&[28, 12], false).to_string(),
            CacheKey::genre_combination(&[12, 28], false).to_string()
        );
        assert_eq!(
            CacheKey::genre_combination(&[28, 12], false),
            CacheKey::genre_combination(&[12, 28], false)
        );
    }

    #[test]
    fn test_genre_key_distinguishes_require_all() {
        let ids = [10752, 18];
        assert_ne!(
            CacheKey::genre_combination(&ids, true).to_string(),
            CacheKey::genre_combination(&ids, false).to_string()
        );
        assert_eq!(
            CacheKey::genre_combination(&ids, true).to_string(),
            "genres_18_10752_all"
        );
    }

    #[test]
    fn test_cache_key_display_families() {
        assert_eq!(CacheKey::Details(857).to_string(), "details_857");
        assert_eq!(
            CacheKey::search("The MATRIX", 2).to_string(),
            "search_the matrix_2"
        );
        assert_eq!(
            CacheKey::Custom("anything".to_string()).to_string(),
            "anything"
        );
    }

    #[test]
    fn test_discover_key_drops_unset_params() {
        let params = DiscoverParams::for_genres(vec![28]);
        assert_eq!(
            CacheKey::discover(&params).to_string(),
            "discover_{\"genres\":[28]}"
        );
    }

    #[tokio::test]
    async fn test_set_then_get_before_ttl() {
        let (cache, clock) = cache_with(MemoryStore::new());
        let key = CacheKey::Custom("k".to_string());

        cache

            .set_with_ttl(&key, &vec![1, 2, 3], Duration::from_secs(60))

            .await;
        clock.advance(Duration::from_secs(60));

        let value: Option<Vec<i32>> = cache.get(&key).await;
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_get_after_ttl_evicts() {
        let store = MemoryStore::new();
        let (cache, clock) = cache_with(store.clone());
        let key = CacheKey::Custom("k".to_string());

        cache

            .set_with_ttl(&key, &"v", Duration::from_secs(60))

            .await;
        clock.advance(Duration::from_millis(60_001));

        let value: Option<String> = cache.get(&key).await;
        assert_eq!(value, None);
        assert!(
            store.is_empty().await,
            "stale entry should be evicted on read"
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (cache, _clock) = cache_with(MemoryStore::new());
        let key = CacheKey::Details(1);

        cache.set(&key, &"first").await;
        cache.set(&key, &"second").await;

        let value: Option<String> = cache.get(&key).await;
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_a_miss() {
        let store = MemoryStore::new();
        store.set("movie_cache_details_1", "garbage").await.unwrap();
        let (cache, _clock) = cache_with(store.clone());

        let value: Option<String> = cache.get(&CacheKey::Details(1)).await;
        assert_eq!(value, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_expired_and_clear_all() {
        let store = MemoryStore::new();
        store.set("unrelated", "kept").await.unwrap();
        let (cache, clock) = cache_with(store.clone());

        cache

            .set_with_ttl(&CacheKey::Details(1), &1, Duration::from_secs(10))

            .await;
        cache
            .set_with_ttl(&CacheKey::Details(2), &2, Duration::from_secs(100))
            .await;
        clock.advance(Duration::from_secs(50));

        assert_eq!(cache.clear_expired().await.unwrap(), 1);
        assert_eq!(cache.get::<i32>(&CacheKey::Details(2)).await, Some(2));

        assert_eq!(cache.clear_all().await.unwrap(), 1);
        assert_eq!(store.keys("").await.unwrap(), vec!["unrelated".to_string()]);
    }

    #[tokio::test]
    async fn test_full_store_sweeps_expired_and_retries() {
        let store = MemoryStore::with_capacity(200);
        let (cache, clock) = cache_with(store.clone());

        let filler = "x".repeat(80);
        cache
            .set_with_ttl(&CacheKey::Details(1), &filler, Duration::from_secs(1))
            .await;
        clock.advance(Duration::from_secs(5));

        // Does not fit next to the stale entry, fits once it is swept
        cache.set(&CacheKey::Details(2), &filler).await;

        assert_eq!(
            cache.get::<String>(&CacheKey::Details(2)).await,
            Some(filler)
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_write_that_never_fits_is_dropped() {
        let (cache, _clock) = cache_with(MemoryStore::with_capacity(16));
        let key = CacheKey::Details(1);

        cache.set(&key, &"y".repeat(100)).await;

        assert_eq!(cache.get::<String>(&key).await, None);
    }

    #[tokio::test]
    async fn test_stats() {
        let (cache, clock) = cache_with(MemoryStore::new());
        let first_written = clock.now();

        cache.set(&CacheKey::Details(1), &"a").await;
        clock.advance(Duration::from_secs(5));
        cache.set(&CacheKey::Details(2), &"b").await;

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.count, 2);
        assert!(stats.size_bytes > 0);
        assert_eq!(stats.oldest_entry, Some(first_written));
    }
}
