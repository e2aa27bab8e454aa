//! 缓存层
//!
//! 后端通过 `declare_object_cache_plugin!` 在启动前注册，运行时按配置名称选择。
//! 目前缓存两类数据：已认证用户（`user:{token}`）与学校仪表盘统计（`dashboard:{school_id}`）。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// 缓存读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端异常，调用方按未命中处理
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用默认有效期
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

pub fn user_key(token: &str) -> String {
    format!("user:{token}")
}

pub fn dashboard_key(school_id: i64) -> String {
    format!("dashboard:{school_id}")
}

/// 读取并反序列化，格式不符时删除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("缓存数据反序列化失败 {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        CacheResult::NotFound | CacheResult::ExistsButNoValue => None,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key, json, ttl).await,
        Err(e) => warn!("缓存数据序列化失败 {}: {}", key, e),
    }
}

/// 注册缓存后端，在 main 之前通过 ctor 执行
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $backend:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let backend: $backend = <$backend>::new()?;
                        let boxed: Box<dyn $crate::cache::ObjectCache> = Box::new(backend);
                        $crate::errors::Result::Ok(boxed)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::object_cache::moka::MokaCacheWrapper;
    use super::*;
    use crate::models::dashboard::DashboardStats;

    #[tokio::test]
    async fn test_json_helpers_round_trip_and_evict_garbage() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        let stats = DashboardStats {
            students: 3,
            staff: 2,
            letters: 1,
            active_academic_year: Some("2024/2025".into()),
        };

        insert_json(&cache, dashboard_key(7), &stats, 0).await;
        let cached: DashboardStats = get_json(&cache, &dashboard_key(7)).await.unwrap();
        assert_eq!(cached.students, 3);

        cache
            .insert_raw(dashboard_key(8), "not-json".into(), 0)
            .await;
        assert!(get_json::<DashboardStats>(&cache, &dashboard_key(8)).await.is_none());
        assert_eq!(cache.get_raw(&dashboard_key(8)).await, CacheResult::NotFound);
    }
}
