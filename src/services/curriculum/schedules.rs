use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::{
        entities::Schedule,
        requests::{CreateScheduleRequest, NewSchedule, ScheduleListParams},
        responses::ScheduleListResponse,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::dates::parse_time;
use crate::utils::text::non_empty;

/// 星期 1-7，时间 HH:MM 且开始早于结束
pub(crate) fn validate_schedule(schedule: CreateScheduleRequest) -> Result<NewSchedule> {
    if !(1..=7).contains(&schedule.day_of_week) {
        return Err(SISystemError::validation(format!(
            "Hari harus di antara 1 dan 7, diterima {}",
            schedule.day_of_week
        )));
    }
    let start = parse_time(&schedule.start_time)?;
    let end = parse_time(&schedule.end_time)?;
    if start >= end {
        return Err(SISystemError::validation(
            "Jam mulai harus lebih awal dari jam selesai",
        ));
    }

    Ok(NewSchedule {
        teaching_assignment_id: schedule.teaching_assignment_id,
        day_of_week: schedule.day_of_week,
        start_time: start.format("%H:%M").to_string(),
        end_time: end.format("%H:%M").to_string(),
        room: non_empty(schedule.room),
    })
}

pub(crate) async fn create(
    storage: &dyn Storage,
    school_id: i64,
    schedule: CreateScheduleRequest,
) -> Result<Schedule> {
    let schedule = validate_schedule(schedule)?;
    if storage
        .get_teaching_assignment(school_id, schedule.teaching_assignment_id)
        .await?
        .is_none()
    {
        return Err(SISystemError::not_found("Pembagian mengajar tidak ditemukan"));
    }
    storage.create_schedule(school_id, schedule).await
}

pub async fn list_schedules(
    service: &CurriculumService,
    query: ScheduleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.list_schedules(school_id, query.class_group_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items },
            "Jadwal pelajaran berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_schedule(
    service: &CurriculumService,
    schedule: CreateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match create(storage.as_ref(), school_id, schedule).await {
        Ok(schedule) => Ok(HttpResponse::Created().json(ApiResponse::success(
            schedule,
            "Jadwal berhasil ditambahkan",
        ))),
        Err(e @ (SISystemError::Validation(_) | SISystemError::DateParse(_))) => {
            Ok(coded_error(&e, ErrorCode::ScheduleInvalid))
        }
        Err(e @ SISystemError::NotFound(_)) => {
            Ok(coded_error(&e, ErrorCode::TeachingAssignmentNotFound))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_schedule(
    service: &CurriculumService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.delete_schedule(school_id, id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Jadwal berhasil dihapus")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleNotFound,
            "Jadwal tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(day: i32, start: &str, end: &str) -> CreateScheduleRequest {
        CreateScheduleRequest {
            teaching_assignment_id: 1,
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            room: Some(" Lab IPA ".into()),
        }
    }

    #[test]
    fn test_validate_schedule() {
        let valid = validate_schedule(schedule(1, "07:00", "08:30")).unwrap();
        assert_eq!(valid.start_time, "07:00");
        assert_eq!(valid.room.as_deref(), Some("Lab IPA"));

        assert!(validate_schedule(schedule(0, "07:00", "08:00")).is_err());
        assert!(validate_schedule(schedule(8, "07:00", "08:00")).is_err());
        assert!(validate_schedule(schedule(7, "09:00", "09:00")).is_err());
        assert!(matches!(
            validate_schedule(schedule(2, "9 pagi", "10:00")),
            Err(SISystemError::DateParse(_))
        ));
    }

    #[tokio::test]
    async fn test_schedule_requires_tenant_assignment() {
        use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "jadwal").await;
        let err = create(&storage, school_id, schedule(1, "07:00", "08:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::NotFound(_)));
    }
}
