//! matome-redis
//!
//! Production [`CacheStore`] over a Redis instance. Uses a
//! `ConnectionManager` for automatic reconnection; the handle is cheap to
//! clone and safe for concurrent use by all workers.
#![warn(missing_docs)]

use std::fmt;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use matome_core::{CacheStore, MatomeError};

/// Redis-backed flat keyspace.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    url: String,
}

// ConnectionManager has no Debug impl.
impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

impl RedisStore {
    /// Connect to the given `redis://` URL.
    ///
    /// # Errors
    /// Returns `Store` when the URL is invalid or the initial connection
    /// cannot be established.
    pub async fn connect(url: &str) -> Result<Self, MatomeError> {
        let client =
            redis::Client::open(url).map_err(|e| MatomeError::store(format!("redis url: {e}")))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| MatomeError::store(format!("redis connect: {e}")))?;
        info!(url, "redis connection manager initialized");
        Ok(Self {
            manager,
            url: url.to_string(),
        })
    }
}

fn store_err(e: redis::RedisError) -> MatomeError {
    MatomeError::store(e.to_string())
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MatomeError> {
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(store_err)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), MatomeError> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(store_err)
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<String>, MatomeError> {
        let mut conn = self.manager.clone();
        let pattern = format!("{prefix}*");
        let mut keys = Vec::new();
        let mut iter = conn
            .scan_match::<_, String>(&pattern)
            .await
            .map_err(store_err)?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }

    async fn flush(&self) -> Result<(), MatomeError> {
        let mut conn = self.manager.clone();
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_err)
    }
}
