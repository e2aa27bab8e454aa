use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::letters::CreateLetterRequest;
use crate::models::staff::StaffPayload;
use crate::models::users::entities::UserRole;
use crate::services::{LetterService, StaffService};
use crate::utils::SafeIDI64;

static STAFF_SERVICE: Lazy<StaffService> = Lazy::new(StaffService::new_lazy);
static LETTER_SERVICE: Lazy<LetterService> = Lazy::new(LetterService::new_lazy);

pub async fn list_staff(req: HttpRequest) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.list_staff(&req).await
}

pub async fn get_staff(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.get_staff(id.0, &req).await
}

pub async fn create_staff(
    req: HttpRequest,
    body: web::Json<StaffPayload>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.create_staff(body.into_inner(), &req).await
}

pub async fn update_staff(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<StaffPayload>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .update_staff(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_staff(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.delete_staff(id.0, &req).await
}

pub async fn list_positions(req: HttpRequest) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.list_positions(&req).await
}

pub async fn list_letters(req: HttpRequest) -> ActixResult<HttpResponse> {
    LETTER_SERVICE.list_letters(&req).await
}

pub async fn create_letter(
    req: HttpRequest,
    body: web::Json<CreateLetterRequest>,
) -> ActixResult<HttpResponse> {
    LETTER_SERVICE.create_letter(body.into_inner(), &req).await
}

pub async fn delete_letter(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LETTER_SERVICE.delete_letter(id.0, &req).await
}

// 配置路由：教职工、职位与公文，仅学校管理员
pub fn configure_staff_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/staff")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_staff))
            .route("", web::post().to(create_staff))
            .route("/{id}", web::get().to(get_staff))
            .route("/{id}", web::put().to(update_staff))
            .route("/{id}", web::delete().to(delete_staff)),
    );
    cfg.service(
        web::scope("/api/v1/positions")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_positions)),
    );
    cfg.service(
        web::scope("/api/v1/letters")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_letters))
            .route("", web::post().to(create_letter))
            .route("/{id}", web::delete().to(delete_letter)),
    );
}
