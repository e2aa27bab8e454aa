use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::models::{
    ApiResponse, ErrorCode,
    staff::{StaffListResponse, StaffResponse},
};
use crate::services::{current_tenant, error_response};

pub async fn list_staff(
    service: &StaffService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.list_staff(school_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StaffListResponse { items },
            "Daftar pegawai berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_staff(
    service: &StaffService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.get_staff(school_id, id).await {
        Ok(Some(staff)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StaffResponse { staff },
            "Data pegawai berhasil dimuat",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StaffNotFound,
            "Pegawai tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 职位为只读主数据
pub async fn list_positions(
    service: &StaffService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.list_positions(school_id).await {
        Ok(positions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            positions,
            "Daftar jabatan berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
