//! 教职工考勤

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, normalize_date, normalize_time};
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        AttendanceDateQuery, RecordStaffAttendanceRequest, StaffAttendance,
        StaffAttendanceListResponse,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::text::non_empty;

pub(crate) async fn record_staff(
    storage: &dyn Storage,
    school_id: i64,
    record: RecordStaffAttendanceRequest,
) -> Result<StaffAttendance> {
    let date = normalize_date(&record.date)?;
    let check_in_time = normalize_time(record.check_in_time)?;
    let check_out_time = normalize_time(record.check_out_time)?;
    if let (Some(check_in), Some(check_out)) = (&check_in_time, &check_out_time)
        && check_in > check_out
    {
        return Err(SISystemError::validation(
            "Jam pulang tidak boleh sebelum jam masuk",
        ));
    }

    if storage.get_staff(school_id, record.staff_id).await?.is_none() {
        return Err(SISystemError::not_found("Pegawai tidak ditemukan"));
    }

    storage
        .upsert_staff_attendance(
            school_id,
            RecordStaffAttendanceRequest {
                staff_id: record.staff_id,
                date,
                status: record.status,
                check_in_time,
                check_out_time,
                notes: non_empty(record.notes),
            },
        )
        .await
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
        Err(e) => return Ok(coded_error(&e, ErrorCode::AttendanceInvalid)),
    };
    let storage = service.get_storage(request);

    match storage.list_staff_attendance_by_date(school_id, &date).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StaffAttendanceListResponse { items },
            "Presensi pegawai berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn record(
    service: &AttendanceService,
    record: RecordStaffAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match record_staff(storage.as_ref(), school_id, record).await {
        Ok(attendance) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            attendance,
            "Presensi pegawai berhasil disimpan",
        ))),
        Err(e @ (SISystemError::Validation(_) | SISystemError::DateParse(_))) => {
            Ok(coded_error(&e, ErrorCode::AttendanceInvalid))
        }
        Err(e @ SISystemError::NotFound(_)) => Ok(coded_error(&e, ErrorCode::StaffNotFound)),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::StaffAttendanceStatus;
    use crate::models::staff::{StaffRecord, StaffStatus};
    use crate::models::students::entities::Gender;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    #[tokio::test]
    async fn test_record_staff_validates_times() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "pegawai").await;
        let staff = storage
            .create_staff(
                school_id,
                StaffRecord {
                    nip: None,
                    full_name: "Pak Joko".into(),
                    gender: Gender::Male,
                    position_id: None,
                    email: None,
                    phone: None,
                    address: None,
                    photo_url: None,
                    join_date: "2015-07-01".into(),
                    status: StaffStatus::Active,
                },
            )
            .await
            .unwrap();

        let request = |check_in: &str, check_out: &str| RecordStaffAttendanceRequest {
            staff_id: staff.id,
            date: "2025-03-03".into(),
            status: StaffAttendanceStatus::Leave,
            check_in_time: Some(check_in.into()),
            check_out_time: Some(check_out.into()),
            notes: None,
        };

        let err = record_staff(&storage, school_id, request("15:00", "07:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        let saved = record_staff(&storage, school_id, request("07:00", "15:00"))
            .await
            .unwrap();
        assert_eq!(saved.status, StaffAttendanceStatus::Leave);

        let err = record_staff(&storage, school_id + 1, request("07:00", "15:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::NotFound(_)));
    }
}
