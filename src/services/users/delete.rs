use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_identity, current_tenant, error_response};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };

    // 禁止删除当前用户
    if user_id == current_user.id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Tidak dapat menghapus akun sendiri",
        )));
    }

    let storage = service.get_storage(request);
    match storage.delete_user(school_id, user_id).await {
        Ok(true) => {
            // 资料已删除，账号删除失败只影响邮箱复用
            if let Err(e) = app_identity(request).delete_account(user_id).await {
                tracing::error!("删除身份账号 {} 失败，需要人工清理: {}", user_id, e);
            }
            tracing::info!("用户 {} 删除了账号 {}", current_user.id, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Pengguna berhasil dihapus")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Pengguna tidak ditemukan",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserDeleteFailed,
                format!("Gagal menghapus pengguna: {}", e.message()),
            )),
        ),
    }
}
