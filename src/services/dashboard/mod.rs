//! 仪表盘：按学校缓存的统计与最近动态

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::{self, ObjectCache};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    dashboard::{DashboardStats, RECENT_ACTIVITY_LIMIT, RecentActivityResponse},
};
use crate::services::{app_cache, current_tenant, error_response};
use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

/// 先读缓存，未命中时统计并写回
pub(crate) async fn load_stats(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    school_id: i64,
) -> Result<DashboardStats> {
    let key = cache::dashboard_key(school_id);
    if let Some(stats) = cache::get_json::<DashboardStats>(cache, &key).await {
        return Ok(stats);
    }

    let stats = storage.dashboard_stats(school_id).await?;
    cache::insert_json(cache, key, &stats, 0).await;
    Ok(stats)
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let (_, school_id) = match current_tenant(request) {
            Ok(tenant) => tenant,
            Err(e) => return Ok(error_response(&e)),
        };
        let storage = self.get_storage(request);
        let cache = app_cache(request);

        match load_stats(storage.as_ref(), cache.as_ref(), school_id).await {
            Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                stats,
                "Statistik berhasil dimuat",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn recent_activities(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let (_, school_id) = match current_tenant(request) {
            Ok(tenant) => tenant,
            Err(e) => return Ok(error_response(&e)),
        };
        let storage = self.get_storage(request);

        match storage
            .recent_activities(school_id, RECENT_ACTIVITY_LIMIT as u64)
            .await
        {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                RecentActivityResponse { items },
                "Aktivitas terbaru berhasil dimuat",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    #[tokio::test]
    async fn test_stats_cached_until_invalidated() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let cache = MokaCacheWrapper::new().unwrap();
        let school_id = test_support::create_school(&storage, "dasbor").await;

        storage
            .create_student(school_id, test_support::student_record("7001", "Hana", 2024))
            .await
            .unwrap();
        let stats = load_stats(&storage, &cache, school_id).await.unwrap();
        assert_eq!(stats.students, 1);

        storage
            .create_student(school_id, test_support::student_record("7002", "Indra", 2024))
            .await
            .unwrap();
        // 命中缓存，仍是旧值
        assert_eq!(load_stats(&storage, &cache, school_id).await.unwrap().students, 1);

        cache.remove(&cache::dashboard_key(school_id)).await;
        assert_eq!(load_stats(&storage, &cache, school_id).await.unwrap().students, 2);
    }
}
