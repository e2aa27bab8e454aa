pub mod report;
pub mod staff;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::{
    AttendanceDateQuery, AttendanceRangeQuery, AttendanceReportQuery,
    BulkStudentAttendanceRequest, RecordStaffAttendanceRequest, RecordStudentAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
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

    pub async fn list_students_by_date(
        &self,
        query: AttendanceDateQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_by_date(self, query, request).await
    }

    pub async fn student_summary(
        &self,
        student_id: i64,
        query: AttendanceRangeQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::summary(self, student_id, query, request).await
    }

    pub async fn record_student(
        &self,
        record: RecordStudentAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::record_one(self, record, request).await
    }

    pub async fn record_students_bulk(
        &self,
        bulk: BulkStudentAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::record_bulk(self, bulk, request).await
    }

    pub async fn list_staff_by_date(
        &self,
        query: AttendanceDateQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        staff::list_by_date(self, query, request).await
    }

    pub async fn record_staff(
        &self,
        record: RecordStaffAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        staff::record(self, record, request).await
    }

    pub async fn report(
        &self,
        query: AttendanceReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::report(self, query, request).await
    }
}

/// 日期与可选的 HH:MM 时间统一格式
pub(crate) fn normalize_date(value: &str) -> crate::errors::Result<String> {
    Ok(crate::utils::dates::parse_date(value)?
        .format("%Y-%m-%d")
        .to_string())
}

pub(crate) fn normalize_time(value: Option<String>) -> crate::errors::Result<Option<String>> {
    match crate::utils::text::non_empty(value) {
        Some(time) => Ok(Some(
            crate::utils::dates::parse_time(&time)?
                .format("%H:%M")
                .to_string(),
        )),
        None => Ok(None),
    }
}
