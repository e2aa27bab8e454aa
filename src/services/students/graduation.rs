//! 按学段学制统计并批量办理毕业

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::StudentService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode, students::entities::graduation_admission_limit,
    students::responses::GraduationResponse,
};
use crate::services::{coded_error, current_tenant, error_response, invalidate_dashboard};
use crate::storage::Storage;
use crate::utils::dates::today;

async fn admission_limit(storage: &dyn Storage, school_id: i64, today: NaiveDate) -> Result<i32> {
    let school = storage
        .get_school(school_id)
        .await?
        .ok_or_else(|| SISystemError::not_found("Sekolah tidak ditemukan"))?;
    Ok(graduation_admission_limit(today, school.education_level))
}

pub(crate) async fn candidates(
    storage: &dyn Storage,
    school_id: i64,
    today: NaiveDate,
) -> Result<GraduationResponse> {
    let limit = admission_limit(storage, school_id, today).await?;
    let count = storage.count_graduation_candidates(school_id, limit).await?;
    Ok(GraduationResponse {
        admission_year_limit: limit,
        count,
    })
}

pub(crate) async fn graduate_eligible(
    storage: &dyn Storage,
    school_id: i64,
    today: NaiveDate,
) -> Result<GraduationResponse> {
    let limit = admission_limit(storage, school_id, today).await?;
    let count = storage.graduate_students(school_id, limit).await?;
    Ok(GraduationResponse {
        admission_year_limit: limit,
        count,
    })
}

fn graduation_error(err: &SISystemError) -> HttpResponse {
    match err {
        SISystemError::NotFound(_) => coded_error(err, ErrorCode::SchoolNotFound),
        other => error_response(other),
    }
}

pub async fn count_candidates(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match candidates(storage.as_ref(), school_id, today()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Jumlah siswa yang dapat diluluskan berhasil dihitung",
        ))),
        Err(e) => Ok(graduation_error(&e)),
    }
}

pub async fn graduate(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match graduate_eligible(storage.as_ref(), school_id, today()).await {
        Ok(response) => {
            tracing::info!(
                "用户 {} 为学校 {} 办理毕业 {} 人（入学年份 <= {}）",
                current_user.id,
                school_id,
                response.count,
                response.admission_year_limit
            );
            invalidate_dashboard(request, school_id).await;
            let message = format!("{} siswa berhasil diluluskan", response.count);
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Err(e) => Ok(graduation_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::StudentStatus;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    #[tokio::test]
    async fn test_graduates_only_eligible_active_students() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        // 测试学校为 SMP，学制 3 年
        let school_id = test_support::create_school(&storage, "lulus").await;

        let senior = storage
            .create_student(school_id, test_support::student_record("2001", "Senior", 2022))
            .await
            .unwrap();
        let junior = storage
            .create_student(school_id, test_support::student_record("2002", "Junior", 2023))
            .await
            .unwrap();
        let mut moved = test_support::student_record("2003", "Pindahan", 2020);
        moved.status = StudentStatus::Transferred;
        storage.create_student(school_id, moved).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let preview = candidates(&storage, school_id, today).await.unwrap();
        assert_eq!(preview.admission_year_limit, 2022);
        assert_eq!(preview.count, 1);

        let done = graduate_eligible(&storage, school_id, today).await.unwrap();
        assert_eq!(done.count, 1);

        let senior = storage.get_student(school_id, senior.id).await.unwrap().unwrap();
        let junior = storage.get_student(school_id, junior.id).await.unwrap().unwrap();
        assert_eq!(senior.status, StudentStatus::Graduated);
        assert_eq!(junior.status, StudentStatus::Active);

        // 再次执行没有新的应届生
        assert_eq!(candidates(&storage, school_id, today).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_unknown_school_is_not_found() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let err = candidates(&storage, 404, today).await.unwrap_err();
        assert!(matches!(err, SISystemError::NotFound(_)));
    }
}
