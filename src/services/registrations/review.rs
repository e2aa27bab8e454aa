use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RegistrationService;
use crate::errors::SISystemError;
use crate::models::registrations::{
    entities::RegistrationLookup, responses::RegistrationResponse,
};
use crate::models::{ApiResponse, ErrorCode};

/// 审核接口的错误码
fn review_error(err: &SISystemError) -> HttpResponse {
    let code = match err {
        SISystemError::NotFound(_) => ErrorCode::RegistrationNotFound,
        SISystemError::Conflict(_) => ErrorCode::RegistrationAlreadyProcessed,
        SISystemError::IdentityProvider(_) => ErrorCode::IdentityProviderFailed,
        _ => ErrorCode::ProvisioningFailed,
    };
    HttpResponse::build(err.status_code()).json(ApiResponse::error_empty(code, err.message()))
}

pub async fn approve_registration(
    service: &RegistrationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .workflow(request)
        .approve(RegistrationLookup::Id(id))
        .await
    {
        Ok(credentials) => {
            tracing::info!(
                "注册申请 {} 审批通过，学校 id={}",
                id,
                credentials.school_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                credentials,
                "Pendaftaran disetujui dan akun sekolah telah dibuat",
            )))
        }
        Err(e) => Ok(review_error(&e)),
    }
}

pub async fn reject_registration(
    service: &RegistrationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .workflow(request)
        .reject(RegistrationLookup::Id(id))
        .await
    {
        Ok(registration) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RegistrationResponse { registration },
            "Pendaftaran ditolak",
        ))),
        Err(e) => Ok(review_error(&e)),
    }
}
