//! 学生考勤

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::{AttendanceService, normalize_date, normalize_time};
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        AttendanceDateQuery, AttendanceRangeQuery, AttendanceSummary,
        BulkStudentAttendanceRequest, RecordStudentAttendanceRequest,
        StudentAttendanceListResponse, StudentAttendanceSummaryResponse, StudentAttendanceUpsert,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::dates::parse_date_range;
use crate::utils::text::non_empty;

fn attendance_error(err: &SISystemError) -> HttpResponse {
    match err {
        SISystemError::Validation(_) | SISystemError::DateParse(_) => {
            coded_error(err, ErrorCode::AttendanceInvalid)
        }
        SISystemError::NotFound(_) => coded_error(err, ErrorCode::StudentNotFound),
        other => error_response(other),
    }
}

pub(crate) async fn student_summary(
    storage: &dyn Storage,
    school_id: i64,
    student_id: i64,
    start_date: &str,
    end_date: &str,
) -> Result<StudentAttendanceSummaryResponse> {
    let (start, end) = parse_date_range(start_date, end_date)?;
    if storage.get_student(school_id, student_id).await?.is_none() {
        return Err(SISystemError::not_found("Siswa tidak ditemukan"));
    }

    let items = storage
        .list_student_attendance_in_range(school_id, Some(student_id), &start, &end)
        .await?;
    let summary = AttendanceSummary::from_statuses(items.iter().map(|item| item.status));
    Ok(StudentAttendanceSummaryResponse { items, summary })
}

pub(crate) async fn record_student(
    storage: &dyn Storage,
    school_id: i64,
    recorded_by: i64,
    record: RecordStudentAttendanceRequest,
) -> Result<u64> {
    let date = normalize_date(&record.date)?;
    let check_in_time = normalize_time(record.check_in_time)?;

    if storage.get_student(school_id, record.student_id).await?.is_none() {
        return Err(SISystemError::not_found("Siswa tidak ditemukan"));
    }
    if let Some(group_id) = record.class_group_id
        && storage.get_class_group(school_id, group_id).await?.is_none()
    {
        return Err(SISystemError::validation("Rombel tidak ditemukan"));
    }

    storage
        .upsert_student_attendance(
            school_id,
            vec![StudentAttendanceUpsert {
                student_id: record.student_id,
                class_group_id: record.class_group_id,
                date,
                status: record.status,
                check_in_time,
                notes: non_empty(record.notes),
                recorded_by,
            }],
        )
        .await
}

/// 整班录入，只接受该班在读学生
pub(crate) async fn record_class(
    storage: &dyn Storage,
    school_id: i64,
    recorded_by: i64,
    bulk: BulkStudentAttendanceRequest,
) -> Result<u64> {
    let date = normalize_date(&bulk.date)?;
    if bulk.records.is_empty() {
        return Err(SISystemError::validation("Data presensi tidak boleh kosong"));
    }
    if storage
        .get_class_group(school_id, bulk.class_group_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::validation("Rombel tidak ditemukan"));
    }

    let enrolled: HashSet<i64> = storage
        .list_enrolled_students(school_id, bulk.class_group_id)
        .await?
        .into_iter()
        .map(|s| s.student_id)
        .collect();
    if let Some(stranger) = bulk
        .records
        .iter()
        .find(|entry| !enrolled.contains(&entry.student_id))
    {
        return Err(SISystemError::validation(format!(
            "Siswa {} bukan anggota rombel ini",
            stranger.student_id
        )));
    }

    let records = bulk
        .records
        .into_iter()
        .map(|entry| StudentAttendanceUpsert {
            student_id: entry.student_id,
            class_group_id: Some(bulk.class_group_id),
            date: date.clone(),
            status: entry.status,
            check_in_time: None,
            notes: non_empty(entry.notes),
            recorded_by,
        })
        .collect();
    storage.upsert_student_attendance(school_id, records).await
}

pub async fn list_by_date(
    service: &AttendanceService,
    query: AttendanceDateQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let date = match normalize_date(&query.date) {
        Ok(date) => date,
        Err(e) => return Ok(attendance_error(&e)),
    };
    let storage = service.get_storage(request);

    match storage
        .list_student_attendance_by_date(school_id, &date, query.class_group_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentAttendanceListResponse { items },
            "Presensi siswa berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn summary(
    service: &AttendanceService,
    student_id: i64,
    query: AttendanceRangeQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match student_summary(
        storage.as_ref(),
        school_id,
        student_id,
        &query.start_date,
        &query.end_date,
    )
    .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Rekap presensi siswa berhasil dimuat",
        ))),
        Err(e) => Ok(attendance_error(&e)),
    }
}

pub async fn record_one(
    service: &AttendanceService,
    record: RecordStudentAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match record_student(storage.as_ref(), school_id, current_user.id, record).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Presensi siswa berhasil disimpan",
        ))),
        Err(e) => Ok(attendance_error(&e)),
    }
}

pub async fn record_bulk(
    service: &AttendanceService,
    bulk: BulkStudentAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match record_class(storage.as_ref(), school_id, current_user.id, bulk).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(format!(
            "Presensi {saved} siswa berhasil disimpan"
        )))),
        Err(e) => Ok(attendance_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{AttendanceStatus, BulkAttendanceEntry};
    use crate::models::curriculum::requests::AddEnrollmentRequest;
    use crate::services::curriculum::enrollments::enroll;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    fn entry(student_id: i64, status: AttendanceStatus) -> BulkAttendanceEntry {
        BulkAttendanceEntry {
            student_id,
            status,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_bulk_then_summary() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "presensi").await;
        let (_, group_id) = test_support::create_class_setup(&storage, school_id, 30).await;
        let student = storage
            .create_student(school_id, test_support::student_record("4001", "Citra", 2024))
            .await
            .unwrap();
        let outsider = storage
            .create_student(school_id, test_support::student_record("4002", "Dodi", 2024))
            .await
            .unwrap();
        enroll(
            &storage,
            school_id,
            group_id,
            AddEnrollmentRequest {
                student_id: student.id,
                enrollment_date: None,
            },
        )
        .await
        .unwrap();

        let bulk = |date: &str, status| BulkStudentAttendanceRequest {
            class_group_id: group_id,
            date: date.into(),
            records: vec![entry(student.id, status)],
        };
        record_class(&storage, school_id, 1, bulk("2025-01-06", AttendanceStatus::Present))
            .await
            .unwrap();
        record_class(&storage, school_id, 1, bulk("2025-01-07", AttendanceStatus::Present))
            .await
            .unwrap();
        // 同一天再次录入覆盖原记录
        record_class(&storage, school_id, 1, bulk("2025-01-07", AttendanceStatus::Sick))
            .await
            .unwrap();

        let err = record_class(
            &storage,
            school_id,
            1,
            BulkStudentAttendanceRequest {
                class_group_id: group_id,
                date: "2025-01-07".into(),
                records: vec![entry(outsider.id, AttendanceStatus::Absent)],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        let response = student_summary(&storage, school_id, student.id, "2025-01-01", "2025-01-31")
            .await
            .unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.summary.present, 1);
        assert_eq!(response.summary.sick, 1);
        assert_eq!(response.summary.total, 2);

        assert!(
            student_summary(&storage, school_id, student.id, "2025-02-01", "2025-01-01")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_record_one_checks_student_tenant() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_a = test_support::create_school(&storage, "hadir-a").await;
        let school_b = test_support::create_school(&storage, "hadir-b").await;
        let student = storage
            .create_student(school_b, test_support::student_record("4100", "Eka", 2024))
            .await
            .unwrap();

        let record = RecordStudentAttendanceRequest {
            student_id: student.id,
            class_group_id: None,
            date: "2025-01-06".into(),
            status: AttendanceStatus::Permitted,
            check_in_time: Some("07:05".into()),
            notes: None,
        };
        let err = record_student(&storage, school_a, 1, record.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::NotFound(_)));

        assert_eq!(record_student(&storage, school_b, 1, record).await.unwrap(), 1);
        let day = storage
            .list_student_attendance_by_date(school_b, "2025-01-06", None)
            .await
            .unwrap();
        assert_eq!(day[0].check_in_time.as_deref(), Some("07:05"));
    }
}
