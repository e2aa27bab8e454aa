use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::app_identity;
use crate::utils::jwt;
use crate::utils::validate::normalize_email;

use super::AuthService;

/// refresh token 有效期，勾选“记住我”时更长
pub(crate) fn refresh_expiry(config: &AppConfig, remember_me: bool) -> chrono::Duration {
    if remember_me {
        chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry)
    } else {
        chrono::Duration::days(config.jwt.refresh_token_expiry)
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let identity = app_identity(request);
    let config = service.get_config();
    let email = normalize_email(&login_request.email);

    // 1. 身份提供方校验凭据
    let account = match identity
        .verify_credentials(&email, &login_request.password)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Email atau password salah",
            )));
        }
        Err(e) => {
            tracing::error!("身份提供方校验失败: {}", e);
            return Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::IdentityProviderFailed,
                "Layanan autentikasi sedang bermasalah, silakan coba lagi",
            )));
        }
    };

    // 2. 读取学校内的用户资料
    let user = match storage.get_user_by_id(account.id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("账号 {} 没有用户资料", account.id);
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Akun Anda belum terhubung dengan sekolah mana pun",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login gagal: {}", e.message()),
                )),
            );
        }
    };

    if !user.is_active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserInactive,
            "Akun Anda tidak aktif. Hubungi administrator sekolah.",
        )));
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("更新用户 {} 最后登录时间失败: {}", user.id, e);
    }

    // 4. 生成令牌对
    let expiry = refresh_expiry(config, login_request.remember_me);
    match user.generate_token_pair(Some(expiry)) {
        Ok(token_pair) => {
            tracing::info!("用户 {} 登录成功", user.email);

            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
                must_change_password: user.must_change_password,
                user,
                created_at: chrono::Utc::now(),
            };
            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, expiry);

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login berhasil")))
        }
        Err(e) => {
            tracing::error!("生成 JWT 失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login gagal, token tidak dapat dibuat",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_me_extends_refresh_expiry() {
        let config = AppConfig::default();
        assert_eq!(refresh_expiry(&config, false), chrono::Duration::days(1));
        assert_eq!(refresh_expiry(&config, true), chrono::Duration::days(7));
    }
}
