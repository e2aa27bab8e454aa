use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserRole,
        requests::{UpdateUserRoleRequest, UpdateUserStatusRequest},
        responses::UserResponse,
    },
};
use crate::services::{current_tenant, error_response};

fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::UserNotFound,
        "Pengguna tidak ditemukan",
    ))
}

fn cannot_modify_self() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::UserUpdateFailed,
        "Tidak dapat mengubah peran atau status akun sendiri",
    ))
}

pub async fn update_role(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };

    if update_data.role == UserRole::SystemAdmin {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Peran system_admin tidak dapat diberikan",
        )));
    }
    if user_id == current_user.id {
        return Ok(cannot_modify_self());
    }

    let storage = service.get_storage(request);
    match storage
        .update_user_role(school_id, user_id, update_data.role)
        .await
    {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Peran pengguna berhasil diperbarui",
        ))),
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Gagal memperbarui peran: {}", e.message()),
            )),
        ),
    }
}

pub async fn update_status(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    if user_id == current_user.id {
        return Ok(cannot_modify_self());
    }

    let storage = service.get_storage(request);
    match storage
        .update_user_status(school_id, user_id, update_data.is_active)
        .await
    {
        Ok(Some(user)) => {
            tracing::info!(
                "用户 {} 将账号 {} 设为 {}",
                current_user.id,
                user_id,
                if user.is_active { "启用" } else { "停用" }
            );
            let message = if user.is_active {
                "Pengguna berhasil diaktifkan"
            } else {
                "Pengguna berhasil dinonaktifkan"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse { user }, message)))
        }
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Gagal memperbarui status: {}", e.message()),
            )),
        ),
    }
}
