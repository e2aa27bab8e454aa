use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt;

use super::AuthService;

fn expired_session(message: &str) -> HttpResponse {
    // 清除无效的 refresh token cookie
    let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();
    HttpResponse::Unauthorized()
        .cookie(empty_cookie)
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

/// 用 refresh token 换新的 access token，角色与学校取最新资料
pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Silakan masuk terlebih dahulu",
        )));
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("refresh token 无效: {}", e);
            return Ok(expired_session(
                "Sesi telah berakhir, silakan masuk kembali",
            ));
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(expired_session("Sesi tidak valid, silakan masuk kembali"));
    };

    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(expired_session("Profil pengguna tidak ditemukan")),
        Err(e) => {
            tracing::error!("刷新令牌时读取用户 {} 失败: {}", user_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Gagal memperbarui sesi",
                )),
            );
        }
    };

    if !user.is_active {
        return Ok(HttpResponse::Forbidden()
            .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
            .json(ApiResponse::error_empty(
                ErrorCode::UserInactive,
                "Akun Anda tidak aktif. Hubungi administrator sekolah.",
            )));
    }

    match jwt::JwtUtils::generate_access_token(user.id, user.role.as_str(), user.school_id) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token berhasil diperbarui",
        ))),
        Err(e) => {
            tracing::error!("生成 access token 失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Gagal memperbarui sesi",
                )),
            )
        }
    }
}

pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "Profil pengguna berhasil dimuat",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Silakan masuk terlebih dahulu",
        ))),
    }
}
