pub mod cache;
pub mod file;
pub mod redis;
pub mod store;

mod macros;

use std::sync::Arc;

use anyhow::Context;

use crate::config::{CacheBackend, Config};

pub use self::cache::{CacheEntry, CacheKey, CacheStats, Clock, ExpiringCache, SystemClock};
pub use self::file::FileStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use self::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// Builds the store selected by `CACHE_BACKEND`
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(memory_store(config)),
        CacheBackend::File => Arc::new(
            FileStore::open(&config.cache_path, config.cache_capacity_bytes)
                .await
                .with_context(|| format!("Failed to open cache file {}", config.cache_path))?,
        ),
        CacheBackend::Redis => Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?)),
    };

    tracing::debug!(backend = store.name(), "Cache store ready");
    Ok(store)
}

/// Like `open_store`, but an unusable backend degrades to an in-process store
pub async fn open_store_or_memory(config: &Config) -> Arc<dyn KeyValueStore> {
    match open_store(config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(
                error = ?e,
                backend = ?config.cache_backend,
                "Cache store unavailable, using in-memory cache"
            );
            Arc::new(memory_store(config))
        }
    }
}

fn memory_store(config: &Config) -> MemoryStore {
    match config.cache_capacity_bytes {
        Some(capacity) => MemoryStore::with_capacity(capacity),
        None => MemoryStore::new(),
    }
}
