use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::registrations::requests::{
    RegistrationListParams, RegistrationTokenQuery, SubmitRegistrationRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::RegistrationService;
use crate::utils::SafeIDI64;

static REGISTRATION_SERVICE: Lazy<RegistrationService> =
    Lazy::new(RegistrationService::new_lazy);

pub async fn submit_registration(
    req: HttpRequest,
    body: web::Json<SubmitRegistrationRequest>,
) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE.submit(body.into_inner(), &req).await
}

pub async fn list_registrations(
    req: HttpRequest,
    query: web::Query<RegistrationListParams>,
) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE.list(query.into_inner(), &req).await
}

pub async fn approve_registration(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE.approve(id.0, &req).await
}

pub async fn reject_registration(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE.reject(id.0, &req).await
}

// 邮件中的一键链接，返回 HTML
pub async fn approve_by_token(
    req: HttpRequest,
    query: web::Query<RegistrationTokenQuery>,
) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE
        .approve_by_token(query.into_inner().token, &req)
        .await
}

pub async fn reject_by_token(
    req: HttpRequest,
    query: web::Query<RegistrationTokenQuery>,
) -> ActixResult<HttpResponse> {
    REGISTRATION_SERVICE
        .reject_by_token(query.into_inner().token, &req)
        .await
}

// 配置路由
pub fn configure_registration_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/registrations")
            .service(
                web::resource("")
                    .route(
                        web::post()
                            .to(submit_registration)
                            .wrap(RateLimit::registration()),
                    )
                    .route(
                        web::get()
                            .to(list_registrations)
                            .wrap(middlewares::RequireRole::new_any(UserRole::system_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::system_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/{id}/approve", web::post().to(approve_registration))
                    .route("/{id}/reject", web::post().to(reject_registration)),
            ),
    );
    cfg.service(
        web::scope("/api/registrations")
            .route("/approve", web::get().to(approve_by_token))
            .route("/reject", web::get().to(reject_by_token)),
    );
}
