use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    CreateUserRequest, UpdateUserRoleRequest, UpdateUserStatusRequest, UserListParams,
};
use crate::services::UserService;
use crate::utils::SafeIDI64;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn update_role(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRoleRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_role(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn update_status(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserStatusRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_status(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

// 配置路由：仅学校超级管理员
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireRole::new_any(UserRole::owner_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}/role", web::put().to(update_role))
            .route("/{id}/status", web::put().to(update_status))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
