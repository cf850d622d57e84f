//! Redis-backed store
//!
//! Speaks only `GET` and `SET key value EX ttl`, the subset a hosted
//! Redis-compatible store guarantees.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::info;

use crate::cache::KvStore;
use crate::error::Result;

/// Remote store over a reconnecting Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Opens a connection manager for `redis_url`.
    ///
    /// Fails if the URL is malformed or the first connection cannot be made.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager().await?;
        info!("Connected to redis store");
        Ok(Self { connection })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds.max(1))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
