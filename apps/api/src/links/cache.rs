//! Short-link resolution cache — pluggable, trait-based.
//!
//! `RedisLinkCache` when `REDIS_URL` is configured and reachable, `NoopLinkCache`
//! otherwise. Cache failures are logged and treated as misses; the database is
//! always the source of truth.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::warn;

#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Target URL for `code`, if cached.
    async fn get(&self, code: &str) -> Option<String>;
    async fn put(&self, code: &str, target_url: &str);
    async fn evict(&self, code: &str);
}

fn cache_key(code: &str) -> String {
    format!("outreach:link:{code}")
}

/// Redis-backed cache. `ConnectionManager` reconnects on its own after failures.
#[derive(Clone)]
pub struct RedisLinkCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisLinkCache {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> redis::RedisResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(RedisLinkCache { conn, ttl_secs })
    }
}

#[async_trait]
impl LinkCache for RedisLinkCache {
    async fn get(&self, code: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match redis::cmd("GET")
            .arg(cache_key(code))
            .query_async::<_, Option<String>>(&mut conn)
            .await
        {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Link cache read failed for {code}: {e}");
                None
            }
        }
    }

    async fn put(&self, code: &str, target_url: &str) {
        let mut conn = self.conn.clone();
        let result = redis::cmd("SET")
            .arg(cache_key(code))
            .arg(target_url)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await;
        if let Err(e) = result {
            warn!("Link cache write failed for {code}: {e}");
        }
    }

    async fn evict(&self, code: &str) {
        let mut conn = self.conn.clone();
        let result = redis::cmd("DEL")
            .arg(cache_key(code))
            .query_async::<_, ()>(&mut conn)
            .await;
        if let Err(e) = result {
            warn!("Link cache eviction failed for {code}: {e}");
        }
    }
}

/// Cache that never holds anything. Every lookup goes to the database.
pub struct NoopLinkCache;

#[async_trait]
impl LinkCache for NoopLinkCache {
    async fn get(&self, _code: &str) -> Option<String> {
        None
    }

    async fn put(&self, _code: &str, _target_url: &str) {}

    async fn evict(&self, _code: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_namespaced() {
        assert_eq!(cache_key("aB3xY9z"), "outreach:link:aB3xY9z");
    }

    #[tokio::test]
    async fn test_noop_cache_always_misses() {
        let cache = NoopLinkCache;
        cache.put("abc1234", "https://example.com").await;
        assert_eq!(cache.get("abc1234").await, None);
        cache.evict("abc1234").await;
    }
}
