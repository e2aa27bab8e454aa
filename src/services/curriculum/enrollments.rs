use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::{
        entities::Enrollment, requests::AddEnrollmentRequest, responses::EnrollmentResponse,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::dates::{parse_date, today};

/// 分班失败的具体原因，便于映射到不同错误码
#[derive(Debug)]
pub(crate) enum EnrollmentError {
    ClassGroupNotFound,
    StudentNotFound,
    Full(i32),
    Other(SISystemError),
}

impl From<SISystemError> for EnrollmentError {
    fn from(err: SISystemError) -> Self {
        EnrollmentError::Other(err)
    }
}

pub(crate) async fn enroll(
    storage: &dyn Storage,
    school_id: i64,
    class_group_id: i64,
    enrollment: AddEnrollmentRequest,
) -> std::result::Result<Enrollment, EnrollmentError> {
    let enrollment_date = match enrollment.enrollment_date.as_deref() {
        Some(date) if !date.trim().is_empty() => parse_date(date)?,
        _ => today(),
    };

    let group = storage
        .get_class_group(school_id, class_group_id)
        .await?
        .ok_or(EnrollmentError::ClassGroupNotFound)?;
    if storage
        .get_student(school_id, enrollment.student_id)
        .await?
        .is_none()
    {
        return Err(EnrollmentError::StudentNotFound);
    }

    let enrolled = storage
        .count_active_enrollments(school_id, class_group_id)
        .await?;
    if enrolled >= group.capacity.max(0) as u64 {
        return Err(EnrollmentError::Full(group.capacity));
    }

    Ok(storage
        .create_enrollment(
            school_id,
            class_group_id,
            enrollment.student_id,
            enrollment_date.format("%Y-%m-%d").to_string(),
        )
        .await?)
}

pub(crate) async fn unenroll(
    storage: &dyn Storage,
    school_id: i64,
    class_group_id: i64,
    enrollment_id: i64,
) -> Result<bool> {
    storage
        .delete_enrollment(school_id, class_group_id, enrollment_id)
        .await
}

pub async fn add_enrollment(
    service: &CurriculumService,
    class_group_id: i64,
    enrollment: AddEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match enroll(storage.as_ref(), school_id, class_group_id, enrollment).await {
        Ok(enrollment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            EnrollmentResponse { enrollment },
            "Siswa berhasil dimasukkan ke rombel",
        ))),
        Err(EnrollmentError::ClassGroupNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::ClassGroupNotFound, "Rombel tidak ditemukan"),
        )),
        Err(EnrollmentError::StudentNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::StudentNotFound, "Siswa tidak ditemukan"),
        )),
        Err(EnrollmentError::Full(capacity)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::ClassGroupFull,
                format!("Rombel sudah penuh (kapasitas {capacity} siswa)"),
            ),
        )),
        Err(EnrollmentError::Other(e @ SISystemError::Conflict(_))) => {
            Ok(coded_error(&e, ErrorCode::EnrollmentExists))
        }
        Err(EnrollmentError::Other(e)) => Ok(error_response(&e)),
    }
}

pub async fn remove_enrollment(
    service: &CurriculumService,
    class_group_id: i64,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match unenroll(storage.as_ref(), school_id, class_group_id, enrollment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Siswa berhasil dikeluarkan dari rombel",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Data anggota rombel tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    fn add(student_id: i64) -> AddEnrollmentRequest {
        AddEnrollmentRequest {
            student_id,
            enrollment_date: Some("2024-07-15".into()),
        }
    }

    #[tokio::test]
    async fn test_capacity_and_duplicates() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "kapasitas").await;
        let (_, group_id) = test_support::create_class_setup(&storage, school_id, 1).await;

        let first = storage
            .create_student(school_id, test_support::student_record("3001", "Adi", 2024))
            .await
            .unwrap();
        let second = storage
            .create_student(school_id, test_support::student_record("3002", "Bela", 2024))
            .await
            .unwrap();

        let enrollment = enroll(&storage, school_id, group_id, add(first.id)).await.unwrap();
        assert_eq!(enrollment.enrollment_date, "2024-07-15");

        // 容量为 1，第二名学生进不来
        assert!(matches!(
            enroll(&storage, school_id, group_id, add(second.id)).await,
            Err(EnrollmentError::Full(1))
        ));

        assert!(unenroll(&storage, school_id, group_id, enrollment.id).await.unwrap());
        enroll(&storage, school_id, group_id, add(second.id)).await.unwrap();
    }

    #[tokio::test]
    async fn test_cross_tenant_references_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_a = test_support::create_school(&storage, "anggota-a").await;
        let school_b = test_support::create_school(&storage, "anggota-b").await;
        let (_, group_a) = test_support::create_class_setup(&storage, school_a, 30).await;
        let outsider = storage
            .create_student(school_b, test_support::student_record("3100", "Luar", 2024))
            .await
            .unwrap();

        assert!(matches!(
            enroll(&storage, school_a, group_a, add(outsider.id)).await,
            Err(EnrollmentError::StudentNotFound)
        ));
        assert!(matches!(
            enroll(&storage, school_b, group_a, add(outsider.id)).await,
            Err(EnrollmentError::ClassGroupNotFound)
        ));
    }
}
