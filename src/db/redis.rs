use redis::AsyncCommands;
use redis::Client;

use super::store::{KeyValueStore, StoreError, StoreResult};

/// Creates a Redis client for the cache store
///
/// Opening a client does not connect; connections are made per operation
/// through the multiplexed connection.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Store backed by a Redis instance
///
/// Values are written without a Redis-side expiry: entry freshness is decided
/// by `ExpiringCache` from the TTL stored inside each value.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Redis reports `maxmemory` exhaustion as an `OOM` error
fn map_write_error(e: redis::RedisError) -> StoreError {
    if e.code() == Some("OOM") {
        StoreError::CapacityExceeded
    } else {
        StoreError::Redis(e)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await.map_err(map_write_error)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pattern = format!("{}*", prefix);

        let mut keys = Vec::new();
        let mut iter: redis::AsyncIter<String> = conn.scan_match(pattern).await?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
