use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{
    ChangeInitialPasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn verify_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify_token(&request).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn change_initial_password(
    req: HttpRequest,
    body: web::Json<ChangeInitialPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .change_initial_password(body.into_inner(), &req)
        .await
}

pub async fn forgot_password(
    req: HttpRequest,
    body: web::Json<ForgotPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.forgot_password(body.into_inner(), &req).await
}

pub async fn reset_password(
    req: HttpRequest,
    body: web::Json<ResetPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.reset_password(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(
                web::resource("/forgot-password")
                    .wrap(RateLimit::password_recovery())
                    .route(web::post().to(forgot_password)),
            )
            .service(
                web::resource("/reset-password")
                    .wrap(RateLimit::password_recovery())
                    .route(web::post().to(reset_password)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/logout", web::post().to(logout))
                    .route("/verify-token", web::get().to(verify_token))
                    .route("/me", web::get().to(get_user))
                    .route(
                        "/change-initial-password",
                        web::post().to(change_initial_password),
                    ),
            ),
    );
}
