use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Errors raised by a backing key-value store
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Store capacity exceeded")]
    CapacityExceeded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key-value storage capability backing the expiring cache
///
/// Implementations only move opaque strings around. Expiry, namespacing and
/// serialization are handled by `ExpiringCache`, so any backend can be swapped
/// in without touching cache logic.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores a value, failing with `StoreError::CapacityExceeded` when full
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys starting with `prefix`
    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

/// In-process store, optionally bounded by a byte budget
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    capacity_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes once keys plus values exceed `capacity_bytes`
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            capacity_bytes: Some(capacity_bytes),
        }
    }

    pub(crate) fn from_entries(
        entries: HashMap<String, String>,
        capacity_bytes: Option<usize>,
    ) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            capacity_bytes,
        }
    }

    /// Puts `key` back to `previous`, bypassing the capacity check
    pub(crate) async fn restore(&self, key: &str, previous: Option<String>) {
        let mut entries = self.entries.write().await;
        match previous {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
    }

    pub(crate) async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().await;

        if let Some(capacity) = self.capacity_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();

            if used + entry_size(key, value) > capacity {
                return Err(StoreError::CapacityExceeded);
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
