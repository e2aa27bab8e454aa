use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::config::AppConfig;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::{
        entities::ClassGroup,
        requests::{ClassGroupListParams, CreateClassGroupRequest, NewClassGroup},
        responses::{ClassGroupDetailResponse, ClassGroupListResponse},
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;

/// 学年、年级、班主任必须属于本校
pub(crate) async fn create(
    storage: &dyn Storage,
    school_id: i64,
    group: CreateClassGroupRequest,
    default_capacity: i32,
) -> Result<ClassGroup> {
    let name = group.name.trim().to_string();
    if name.is_empty() {
        return Err(SISystemError::validation("Nama rombel wajib diisi"));
    }
    let capacity = group.capacity.unwrap_or(default_capacity);
    if capacity < 1 {
        return Err(SISystemError::validation("Kapasitas rombel minimal 1"));
    }

    if storage
        .get_academic_year(school_id, group.academic_year_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Tahun ajaran tidak ditemukan"));
    }
    if storage
        .get_grade_level(school_id, group.grade_level_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Tingkat kelas tidak ditemukan"));
    }
    if let Some(teacher_id) = group.homeroom_teacher_id
        && storage.get_staff(school_id, teacher_id).await?.is_none()
    {
        return Err(SISystemError::validation("Wali kelas tidak ditemukan"));
    }

    storage
        .create_class_group(
            school_id,
            NewClassGroup {
                academic_year_id: group.academic_year_id,
                grade_level_id: group.grade_level_id,
                name,
                homeroom_teacher_id: group.homeroom_teacher_id,
                capacity,
            },
        )
        .await
}

pub async fn list_class_groups(
    service: &CurriculumService,
    query: ClassGroupListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage
        .list_class_groups(school_id, query.academic_year_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassGroupListResponse { items },
            "Daftar rombel berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_class_group(
    service: &CurriculumService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    let class_group = match storage.get_class_group(school_id, id).await {
        Ok(Some(group)) => group,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassGroupNotFound,
                "Rombel tidak ditemukan",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.list_enrolled_students(school_id, id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassGroupDetailResponse {
                class_group,
                students,
            },
            "Detail rombel berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_class_group(
    service: &CurriculumService,
    group: CreateClassGroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);
    let default_capacity = AppConfig::get().school.default_class_capacity;

    match create(storage.as_ref(), school_id, group, default_capacity).await {
        Ok(group) => Ok(HttpResponse::Created().json(ApiResponse::success(
            group,
            "Rombel berhasil dibuat",
        ))),
        Err(e @ SISystemError::Validation(_)) => Ok(coded_error(&e, ErrorCode::CurriculumInvalid)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_class_group(
    service: &CurriculumService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.delete_class_group(school_id, id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Rombel berhasil dihapus")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassGroupNotFound,
            "Rombel tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    #[tokio::test]
    async fn test_create_checks_tenant_references_and_defaults_capacity() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_a = test_support::create_school(&storage, "rombel-a").await;
        let school_b = test_support::create_school(&storage, "rombel-b").await;
        let year_b = test_support::create_academic_year(
            &storage, school_b, "2024/2025", "2024-07-15", "2025-06-20", true,
        )
        .await;
        let grade_a = test_support::create_grade_level(&storage, school_a, "Kelas 7").await;
        let year_a = test_support::create_academic_year(
            &storage, school_a, "2024/2025", "2024-07-15", "2025-06-20", true,
        )
        .await;

        let request = |academic_year_id| CreateClassGroupRequest {
            academic_year_id,
            grade_level_id: grade_a,
            name: " 7B ".into(),
            homeroom_teacher_id: None,
            capacity: None,
        };

        let err = create(&storage, school_a, request(year_b), 30).await.unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        let group = create(&storage, school_a, request(year_a), 30).await.unwrap();
        assert_eq!(group.name, "7B");
        assert_eq!(group.capacity, 30);

        let mut with_teacher = request(year_a);
        with_teacher.homeroom_teacher_id = Some(4242);
        let err = create(&storage, school_a, with_teacher, 30).await.unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));
    }
}
