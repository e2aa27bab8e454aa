use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{AttendanceReport, AttendanceReportQuery, AttendanceReportType},
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::dates::parse_date_range;

pub(crate) async fn build_report(
    storage: &dyn Storage,
    school_id: i64,
    query: &AttendanceReportQuery,
) -> Result<AttendanceReport> {
    let (start, end) = parse_date_range(&query.start_date, &query.end_date)?;
    Ok(match query.report_type {
        AttendanceReportType::Student => AttendanceReport::Student(
            storage
                .list_student_attendance_in_range(school_id, None, &start, &end)
                .await?,
        ),
        AttendanceReportType::Staff => AttendanceReport::Staff(
            storage
                .list_staff_attendance_in_range(school_id, &start, &end)
                .await?,
        ),
    })
}

pub async fn report(
    service: &AttendanceService,
    query: AttendanceReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match build_report(storage.as_ref(), school_id, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Laporan presensi berhasil dimuat",
        ))),
        Err(e) if e.status_code() == actix_web::http::StatusCode::BAD_REQUEST => {
            Ok(coded_error(&e, ErrorCode::AttendanceInvalid))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
