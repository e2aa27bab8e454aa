use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::errors::{Result, SISystemError};
use crate::models::schools::{SchoolResponse, UpdateSchoolRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_tenant, error_response};
use crate::utils::text::non_empty;
use crate::utils::validate::{normalize_email, validate_email};

fn school_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SchoolNotFound,
        "Sekolah tidak ditemukan",
    ))
}

/// 名称必填，其余字段空白视为清空
pub(crate) fn normalize_update(update: UpdateSchoolRequest) -> Result<UpdateSchoolRequest> {
    let name = update.name.trim().to_string();
    if name.is_empty() {
        return Err(SISystemError::validation("Nama sekolah wajib diisi"));
    }

    let email = non_empty(update.email).map(|e| normalize_email(&e));
    if let Some(email) = &email {
        validate_email(email).map_err(SISystemError::validation)?;
    }

    Ok(UpdateSchoolRequest {
        name,
        address: non_empty(update.address),
        phone: non_empty(update.phone),
        email,
    })
}

pub async fn get_school(
    service: &SchoolService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };

    match service.get_storage(request).get_school(school_id).await {
        Ok(Some(school)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SchoolResponse { school },
            "Profil sekolah berhasil dimuat",
        ))),
        Ok(None) => Ok(school_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_school(
    service: &SchoolService,
    update: UpdateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let update = match normalize_update(update) {
        Ok(update) => update,
        Err(e) => return Ok(error_response(&e)),
    };

    match service
        .get_storage(request)
        .update_school(school_id, update)
        .await
    {
        Ok(Some(school)) => {
            tracing::info!("用户 {} 更新了学校 {} 的资料", user.id, school_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SchoolResponse { school },
                "Profil sekolah berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(school_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        let update = UpdateSchoolRequest {
            name: "   ".into(),
            address: None,
            phone: None,
            email: None,
        };
        assert!(matches!(
            normalize_update(update),
            Err(SISystemError::Validation(_))
        ));
    }

    #[test]
    fn test_optional_fields_are_trimmed() {
        let update = normalize_update(UpdateSchoolRequest {
            name: " SMA Harapan ".into(),
            address: Some("  ".into()),
            phone: Some(" 0221234 ".into()),
            email: Some(" TU@Harapan.sch.id ".into()),
        })
        .unwrap();
        assert_eq!(update.name, "SMA Harapan");
        assert_eq!(update.address, None);
        assert_eq!(update.phone.as_deref(), Some("0221234"));
        assert_eq!(update.email.as_deref(), Some("tu@harapan.sch.id"));
    }
}
