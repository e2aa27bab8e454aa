use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::Result;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 按条目自身的有效期过期
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _now: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _now: Instant,
        _current: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, Entry>,
    default_ttl: u64,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            "Moka 内存缓存已初始化，容量 {}，默认有效期 {}s",
            max_capacity, default_ttl
        );
        Self { inner, default_ttl }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        self.inner
            .insert(
                key,
                Entry {
                    value,
                    ttl: Duration::from_secs(ttl),
                },
            )
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_capacity(8, 60);
        cache.insert_raw("user:abc".into(), "{}".into(), 0).await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::Found("{}".into()));

        cache.remove("user:abc").await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires_with_own_ttl() {
        let cache = MokaCacheWrapper::with_capacity(8, 60);
        cache.insert_raw("dashboard:1".into(), "x".into(), 1).await;
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get_raw("dashboard:1").await, CacheResult::NotFound);
    }
}
