use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RegistrationService;
use crate::models::{ApiResponse, ErrorCode, registrations::requests::RegistrationListParams};

pub async fn list_registrations(
    service: &RegistrationService,
    query: RegistrationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    match storage.list_registrations(page, size, query.status).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Daftar pendaftaran berhasil dimuat",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Gagal memuat daftar pendaftaran: {}", e.message()),
            )),
        ),
    }
}
