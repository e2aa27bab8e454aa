use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{Result, SISystemError};

declare_object_cache_plugin!("redis", RedisObjectCache);

/// 删除前缀键时每批扫描数量
const SCAN_BATCH: usize = 200;

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone()).map_err(|e| {
            SISystemError::cache_connection(format!("Redis 地址无效 {}: {e}", redis_config.url))
        })?;

        // 启动时探活，失败则由启动流程回退到内存缓存
        let mut conn = client
            .get_connection()
            .map_err(|e| SISystemError::cache_connection(format!("无法连接 Redis: {e}")))?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| SISystemError::cache_connection(format!("Redis PING 失败: {e}")))?;
        debug!("Redis 连接正常: {}", pong);

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("获取 Redis 连接失败: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(key)).await;
        match result {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("读取缓存 {} 失败: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<String, String, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("写入缓存 {} 失败: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        if let Err(e) = conn.del::<String, i32>(self.make_key(key)).await {
            error!("删除缓存 {} 失败: {}", key, e);
        }
    }

    /// 只清理本应用前缀下的键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => {
                    warn!("扫描缓存键失败: {}", e);
                    return;
                }
            };

            if !keys.is_empty() {
                removed += keys.len();
                if let Err(e) = conn.del::<Vec<String>, i32>(keys).await {
                    warn!("批量删除缓存键失败: {}", e);
                    return;
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!("已清理 {} 个 Redis 缓存键", removed);
    }
}
