use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    staff::{Staff, StaffPayload, StaffRecord, StaffResponse, StaffStatus},
};
use crate::services::{coded_error, current_tenant, error_response, invalidate_dashboard};
use crate::storage::Storage;
use crate::utils::dates::parse_date;
use crate::utils::text::{non_empty, title_case};
use crate::utils::validate::{normalize_email, validate_email};

/// 规范化表单并确认职位属于本校
async fn to_record(
    storage: &dyn Storage,
    school_id: i64,
    payload: StaffPayload,
    current_status: Option<StaffStatus>,
) -> Result<StaffRecord> {
    let full_name = title_case(payload.full_name.trim());
    if full_name.is_empty() {
        return Err(SISystemError::validation("Nama lengkap wajib diisi"));
    }
    let join_date = parse_date(&payload.join_date)?;

    let email = non_empty(payload.email).map(|e| normalize_email(&e));
    if let Some(email) = &email {
        validate_email(email).map_err(SISystemError::validation)?;
    }

    if let Some(position_id) = payload.position_id
        && storage.get_position(school_id, position_id).await?.is_none()
    {
        return Err(SISystemError::validation("Jabatan tidak ditemukan"));
    }

    let status = match current_status {
        Some(current) => payload.status.unwrap_or(current),
        None => StaffStatus::Active,
    };

    Ok(StaffRecord {
        nip: non_empty(payload.nip),
        full_name,
        gender: payload.gender,
        position_id: payload.position_id,
        email,
        phone: non_empty(payload.phone),
        address: non_empty(payload.address),
        photo_url: non_empty(payload.photo_url),
        join_date: join_date.format("%Y-%m-%d").to_string(),
        status,
    })
}

pub(crate) async fn create(
    storage: &dyn Storage,
    school_id: i64,
    payload: StaffPayload,
) -> Result<Staff> {
    let record = to_record(storage, school_id, payload, None).await?;
    storage.create_staff(school_id, record).await
}

pub(crate) async fn update(
    storage: &dyn Storage,
    school_id: i64,
    id: i64,
    payload: StaffPayload,
) -> Result<Staff> {
    let current = storage
        .get_staff(school_id, id)
        .await?
        .ok_or_else(|| SISystemError::not_found("Pegawai tidak ditemukan"))?;
    let record = to_record(storage, school_id, payload, Some(current.status)).await?;
    storage
        .update_staff(school_id, id, record)
        .await?
        .ok_or_else(|| SISystemError::not_found("Pegawai tidak ditemukan"))
}

fn staff_error(err: &SISystemError) -> HttpResponse {
    match err {
        SISystemError::NotFound(_) => coded_error(err, ErrorCode::StaffNotFound),
        SISystemError::Validation(_) | SISystemError::DateParse(_) => {
            coded_error(err, ErrorCode::StaffInvalid)
        }
        other => error_response(other),
    }
}

pub async fn create_staff(
    service: &StaffService,
    payload: StaffPayload,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match create(storage.as_ref(), school_id, payload).await {
        Ok(staff) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StaffResponse { staff },
                "Pegawai berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(staff_error(&e)),
    }
}

pub async fn update_staff(
    service: &StaffService,
    id: i64,
    payload: StaffPayload,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match update(storage.as_ref(), school_id, id, payload).await {
        Ok(staff) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StaffResponse { staff },
                "Data pegawai berhasil diperbarui",
            )))
        }
        Err(e) => Ok(staff_error(&e)),
    }
}

pub async fn delete_staff(
    service: &StaffService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.delete_staff(school_id, id).await {
        Ok(true) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Pegawai berhasil dihapus")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StaffNotFound,
            "Pegawai tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::positions::ActiveModel as PositionActiveModel;
    use crate::models::students::entities::Gender;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};
    use sea_orm::{ActiveModelTrait, Set};

    fn payload(position_id: Option<i64>) -> StaffPayload {
        StaffPayload {
            nip: Some("  ".into()),
            full_name: "rina marlina".into(),
            gender: Gender::Female,
            position_id,
            email: Some(" Rina@Sekolah.ID ".into()),
            phone: None,
            address: None,
            photo_url: None,
            join_date: "2019-07-15".into(),
            status: Some(StaffStatus::Retired),
        }
    }

    #[tokio::test]
    async fn test_position_must_belong_to_tenant() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_a = test_support::create_school(&storage, "staf-a").await;
        let school_b = test_support::create_school(&storage, "staf-b").await;
        let position = PositionActiveModel {
            school_id: Set(school_b),
            name: Set("Bendahara".into()),
            description: Set(None),
            created_at: Set(0),
            ..Default::default()
        }
        .insert(storage.connection())
        .await
        .unwrap();

        let err = create(&storage, school_a, payload(Some(position.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        let staff = create(&storage, school_b, payload(Some(position.id)))
            .await
            .unwrap();
        assert_eq!(staff.full_name, "Rina Marlina");
        assert_eq!(staff.email.as_deref(), Some("rina@sekolah.id"));
        assert_eq!(staff.nip, None);
        // 新建时忽略传入状态
        assert_eq!(staff.status, StaffStatus::Active);
        assert_eq!(staff.position_name.as_deref(), Some("Bendahara"));

        let updated = update(&storage, school_b, staff.id, payload(None)).await.unwrap();
        assert_eq!(updated.status, StaffStatus::Retired);
        assert_eq!(updated.position_id, None);
    }
}
