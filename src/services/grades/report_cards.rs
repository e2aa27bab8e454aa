//! 成绩单：生成草稿、查询与定稿

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::AttendanceSummary,
    grades::{
        GenerateReportCardRequest, ReportCard, ReportCardListQuery, ReportCardListResponse,
        ReportCardLookupQuery, ReportCardStatus, ReportCardUpsert, validate_semester,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::text::non_empty;

fn report_card_error(err: &SISystemError) -> HttpResponse {
    match err {
        SISystemError::Validation(_) => coded_error(err, ErrorCode::GradeInvalid),
        SISystemError::NotFound(_) => coded_error(err, ErrorCode::ReportCardNotFound),
        SISystemError::Conflict(_) => coded_error(err, ErrorCode::ReportCardFinalized),
        other => error_response(other),
    }
}

/// 按学年起止日期统计病假、事假、缺勤并写入草稿；已定稿的成绩单不可再生成
pub(crate) async fn generate(
    storage: &dyn Storage,
    school_id: i64,
    generate: GenerateReportCardRequest,
) -> Result<ReportCard> {
    validate_semester(generate.semester).map_err(SISystemError::validation)?;

    let year = storage
        .get_academic_year(school_id, generate.academic_year_id)
        .await?
        .ok_or_else(|| SISystemError::validation("Tahun ajaran tidak ditemukan"))?;
    if storage
        .get_student(school_id, generate.student_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Siswa tidak ditemukan"));
    }
    if storage
        .get_class_group(school_id, generate.class_group_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Rombel tidak ditemukan"));
    }

    if let Some(existing) = storage
        .get_report_card(
            school_id,
            generate.student_id,
            generate.academic_year_id,
            generate.semester,
        )
        .await?
        && existing.status != ReportCardStatus::Draft
    {
        return Err(SISystemError::conflict(
            "Rapor sudah difinalisasi dan tidak dapat diubah",
        ));
    }

    let attendance = storage
        .list_student_attendance_in_range(
            school_id,
            Some(generate.student_id),
            &year.start_date,
            &year.end_date,
        )
        .await?;
    let summary = AttendanceSummary::from_statuses(attendance.iter().map(|a| a.status));

    storage
        .upsert_report_card(
            school_id,
            ReportCardUpsert {
                academic_year_id: generate.academic_year_id,
                semester: generate.semester,
                student_id: generate.student_id,
                class_group_id: generate.class_group_id,
                total_sick_days: summary.sick as i32,
                total_permitted_days: summary.permitted as i32,
                total_absent_days: summary.absent as i32,
                homeroom_notes: non_empty(generate.homeroom_notes),
            },
        )
        .await
}

pub async fn list_report_cards(
    service: &GradeService,
    query: ReportCardListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    if let Err(msg) = validate_semester(query.semester) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }
    let storage = service.get_storage(request);

    match storage
        .list_report_cards(
            school_id,
            query.class_group_id,
            query.academic_year_id,
            query.semester,
        )
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ReportCardListResponse { items },
            "Daftar rapor berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_report_card(
    service: &GradeService,
    query: ReportCardLookupQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage
        .get_report_card(
            school_id,
            query.student_id,
            query.academic_year_id,
            query.semester,
        )
        .await
    {
        Ok(Some(card)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Rapor berhasil dimuat",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ReportCardNotFound,
            "Rapor belum dibuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn generate_report_card(
    service: &GradeService,
    generate_request: GenerateReportCardRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match generate(storage.as_ref(), school_id, generate_request).await {
        Ok(card) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Rapor berhasil dibuat",
        ))),
        Err(e) => Ok(report_card_error(&e)),
    }
}

pub async fn finalize_report_card(
    service: &GradeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage
        .finalize_report_card(school_id, id, current_user.id)
        .await
    {
        Ok(Some(card)) => {
            tracing::info!("用户 {} 定稿了成绩单 {}", current_user.id, id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                card,
                "Rapor berhasil difinalisasi",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ReportCardNotFound,
            "Rapor tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{AttendanceStatus, StudentAttendanceUpsert};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    #[tokio::test]
    async fn test_generate_counts_attendance_in_academic_year() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "rapor").await;
        // 学年 2024-07-15 ~ 2025-06-20
        let (year_id, group_id) = test_support::create_class_setup(&storage, school_id, 30).await;
        let student = storage
            .create_student(school_id, test_support::student_record("6001", "Gita", 2024))
            .await
            .unwrap();

        let mark = |date: &str, status| StudentAttendanceUpsert {
            student_id: student.id,
            class_group_id: Some(group_id),
            date: date.into(),
            status,
            check_in_time: None,
            notes: None,
            recorded_by: 1,
        };
        storage
            .upsert_student_attendance(
                school_id,
                vec![
                    mark("2024-08-01", AttendanceStatus::Sick),
                    mark("2024-08-02", AttendanceStatus::Sick),
                    mark("2024-09-10", AttendanceStatus::Permitted),
                    mark("2025-01-06", AttendanceStatus::Absent),
                    mark("2025-01-07", AttendanceStatus::Present),
                    // 学年之外
                    mark("2025-07-01", AttendanceStatus::Absent),
                ],
            )
            .await
            .unwrap();

        let request = GenerateReportCardRequest {
            student_id: student.id,
            academic_year_id: year_id,
            semester: 1,
            class_group_id: group_id,
            homeroom_notes: Some("Rajin".into()),
        };
        let card = generate(&storage, school_id, request.clone()).await.unwrap();
        assert_eq!(card.status, ReportCardStatus::Draft);
        assert_eq!(card.total_sick_days, 2);
        assert_eq!(card.total_permitted_days, 1);
        assert_eq!(card.total_absent_days, 1);

        storage
            .finalize_report_card(school_id, card.id, 1)
            .await
            .unwrap()
            .unwrap();
        let err = generate(&storage, school_id, request).await.unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));
    }
}
