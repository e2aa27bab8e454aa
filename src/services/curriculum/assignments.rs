use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::config::AppConfig;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::{
        entities::TeachingAssignment,
        requests::{
            CreateTeachingAssignmentRequest, NewTeachingAssignment, TeachingAssignmentListParams,
        },
        responses::TeachingAssignmentListResponse,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;

pub(crate) async fn create(
    storage: &dyn Storage,
    school_id: i64,
    assignment: CreateTeachingAssignmentRequest,
    default_hours: i32,
) -> Result<TeachingAssignment> {
    let hours_per_week = assignment.hours_per_week.unwrap_or(default_hours);
    if hours_per_week < 1 {
        return Err(SISystemError::validation("Jam per minggu minimal 1"));
    }

    if storage
        .get_academic_year(school_id, assignment.academic_year_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Tahun ajaran tidak ditemukan"));
    }
    if storage
        .get_staff(school_id, assignment.teacher_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Guru tidak ditemukan"));
    }
    if storage
        .get_subject(school_id, assignment.subject_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Mata pelajaran tidak ditemukan"));
    }
    if storage
        .get_class_group(school_id, assignment.class_group_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Rombel tidak ditemukan"));
    }

    storage
        .create_teaching_assignment(
            school_id,
            NewTeachingAssignment {
                academic_year_id: assignment.academic_year_id,
                teacher_id: assignment.teacher_id,
                subject_id: assignment.subject_id,
                class_group_id: assignment.class_group_id,
                hours_per_week,
            },
        )
        .await
}

pub async fn list_teaching_assignments(
    service: &CurriculumService,
    query: TeachingAssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage
        .list_teaching_assignments(school_id, query.academic_year_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeachingAssignmentListResponse { items },
            "Daftar pembagian mengajar berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_teaching_assignment(
    service: &CurriculumService,
    assignment: CreateTeachingAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    let default_hours = AppConfig::get().school.default_hours_per_week;
    match create(storage.as_ref(), school_id, assignment, default_hours).await {
        Ok(assignment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            assignment,
            "Pembagian mengajar berhasil dibuat",
        ))),
        Err(e @ SISystemError::Validation(_)) => Ok(coded_error(&e, ErrorCode::CurriculumInvalid)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_teaching_assignment(
    service: &CurriculumService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.delete_teaching_assignment(school_id, id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Pembagian mengajar berhasil dihapus",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeachingAssignmentNotFound,
            "Pembagian mengajar tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::staff::{StaffRecord, StaffStatus};
    use crate::models::students::entities::Gender;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    fn teacher() -> StaffRecord {
        StaffRecord {
            nip: None,
            full_name: "Agus Salim".into(),
            gender: Gender::Male,
            position_id: None,
            email: None,
            phone: None,
            address: None,
            photo_url: None,
            join_date: "2018-07-16".into(),
            status: StaffStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_assignment_uses_default_hours_and_checks_tenant() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "ajar").await;
        let other_school = test_support::create_school(&storage, "ajar-lain").await;
        let (year_id, group_id) = test_support::create_class_setup(&storage, school_id, 30).await;
        let subject_id = test_support::create_subject(&storage, school_id, "MTK").await;
        let staff = storage.create_staff(school_id, teacher()).await.unwrap();
        let outsider = storage.create_staff(other_school, teacher()).await.unwrap();

        let request = |teacher_id, hours_per_week| CreateTeachingAssignmentRequest {
            academic_year_id: year_id,
            teacher_id,
            subject_id,
            class_group_id: group_id,
            hours_per_week,
        };

        let assignment = create(&storage, school_id, request(staff.id, None), 4)
            .await
            .unwrap();
        assert_eq!(assignment.hours_per_week, 4);
        assert_eq!(assignment.teacher_id, staff.id);

        let err = create(&storage, school_id, request(staff.id, Some(0)), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        // 其他学校的教职工视为不存在
        let err = create(&storage, school_id, request(outsider.id, Some(2)), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));
    }
}
