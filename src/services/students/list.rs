use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{
        requests::{StudentListParams, StudentListQuery},
        responses::StudentResponse,
    },
};
use crate::services::{current_tenant, error_response};

pub async fn list_students(
    service: &StudentService,
    query: StudentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    let (page, size) = query.pagination.normalized();
    let list_query = StudentListQuery {
        page,
        size,
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    match storage.list_students(school_id, list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Daftar siswa berhasil dimuat",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Gagal memuat daftar siswa: {}", e.message()),
            )),
        ),
    }
}

pub async fn get_student(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.get_student(school_id, id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { student },
            "Data siswa berhasil dimuat",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Siswa tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
