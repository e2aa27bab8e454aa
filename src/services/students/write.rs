use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, form};
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    students::{entities::Student, requests::StudentPayload, responses::StudentResponse},
};
use crate::services::{coded_error, current_tenant, error_response, invalidate_dashboard};
use crate::storage::Storage;

pub(crate) async fn create(
    storage: &dyn Storage,
    school_id: i64,
    payload: StudentPayload,
) -> Result<Student> {
    let record = form::to_record(payload, None)?;
    storage.create_student(school_id, record).await
}

pub(crate) async fn update(
    storage: &dyn Storage,
    school_id: i64,
    id: i64,
    payload: StudentPayload,
) -> Result<Student> {
    let current = storage
        .get_student(school_id, id)
        .await?
        .ok_or_else(|| SISystemError::not_found("Siswa tidak ditemukan"))?;

    let record = form::to_record(payload, Some(current.status))?;
    storage
        .update_student(school_id, id, record)
        .await?
        .ok_or_else(|| SISystemError::not_found("Siswa tidak ditemukan"))
}

fn student_error(err: &SISystemError) -> HttpResponse {
    match err {
        SISystemError::NotFound(_) => coded_error(err, ErrorCode::StudentNotFound),
        SISystemError::Validation(_) | SISystemError::DateParse(_) | SISystemError::Conflict(_) => {
            coded_error(err, ErrorCode::StudentInvalid)
        }
        other => error_response(other),
    }
}

pub async fn create_student(
    service: &StudentService,
    payload: StudentPayload,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match create(storage.as_ref(), school_id, payload).await {
        Ok(student) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Siswa berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(student_error(&e)),
    }
}

pub async fn update_student(
    service: &StudentService,
    id: i64,
    payload: StudentPayload,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match update(storage.as_ref(), school_id, id, payload).await {
        Ok(student) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse { student },
                "Data siswa berhasil diperbarui",
            )))
        }
        Err(e) => Ok(student_error(&e)),
    }
}

pub async fn delete_student(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.delete_student(school_id, id).await {
        Ok(true) => {
            tracing::info!("用户 {} 删除了学生 {}", current_user.id, id);
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Siswa berhasil dihapus")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Siswa tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::{
        EnrollmentType, Gender, ParentType, StudentStatus,
    };
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    fn payload(nisn: &str) -> StudentPayload {
        StudentPayload {
            nisn: nisn.into(),
            nis: format!("NIS{nisn}"),
            full_name: "dewi lestari".into(),
            birth_date: "2012-01-20".into(),
            birth_place: "garut".into(),
            gender: Gender::Female,
            religion: "Islam".into(),
            address: None,
            phone: None,
            photo_url: None,
            status: None,
            admission_year: 2024,
            enrollment_type: EnrollmentType::New,
            nik: None,
            parent_type: ParentType::Parent,
            father_name: None,
            father_phone: None,
            mother_name: None,
            mother_phone: None,
            guardian_name: None,
            guardian_phone: None,
        }
    }

    #[tokio::test]
    async fn test_update_keeps_status_and_scopes_tenant() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_a = test_support::create_school(&storage, "siswa-a").await;
        let school_b = test_support::create_school(&storage, "siswa-b").await;

        let created = create(&storage, school_a, payload("1001")).await.unwrap();
        assert_eq!(created.full_name, "Dewi Lestari");
        assert_eq!(created.status, StudentStatus::Active);

        let mut moved = payload("1001");
        moved.status = Some(StudentStatus::Transferred);
        let updated = update(&storage, school_a, created.id, moved).await.unwrap();
        assert_eq!(updated.status, StudentStatus::Transferred);

        // 未带状态的编辑不会把学生改回 active
        let updated = update(&storage, school_a, created.id, payload("1001"))
            .await
            .unwrap();
        assert_eq!(updated.status, StudentStatus::Transferred);

        let err = update(&storage, school_b, created.id, payload("1001"))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::NotFound(_)));
    }
}
