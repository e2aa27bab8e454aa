//! 首次登录改密、找回密码与重置密码

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::{self, ObjectCache};
use crate::errors::{Result, SISystemError};
use crate::identity::IdentityProvider;
use crate::mailer::{Mailer, templates};
use crate::middlewares::require_jwt::{RequireJWT, bearer_token};
use crate::models::auth::requests::{
    ChangeInitialPasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_cache, app_identity, app_mailer, error_response};
use crate::storage::Storage;
use crate::utils::validate::{normalize_email, validate_email, validate_new_password};

use super::AuthService;

const FORGOT_PASSWORD_REPLY: &str =
    "Jika email terdaftar, tautan untuk mengatur ulang password telah dikirim";

pub(crate) async fn change_initial_password(
    storage: &dyn Storage,
    identity: &dyn IdentityProvider,
    user: &User,
    change_request: &ChangeInitialPasswordRequest,
) -> Result<()> {
    validate_new_password(&change_request.password, &change_request.confirm_password)
        .map_err(SISystemError::validation)?;

    identity
        .update_password(user.id, &change_request.password)
        .await?;
    storage.clear_must_change_password(user.id).await?;
    tracing::info!("用户 {} 已修改初始密码", user.id);
    Ok(())
}

/// 账号存在时签发令牌并发邮件；账号不存在不报错
pub(crate) async fn send_recovery_link(
    identity: &dyn IdentityProvider,
    mailer: &Mailer,
    email: &str,
) -> Result<bool> {
    let email = normalize_email(email);
    if validate_email(&email).is_err() {
        return Ok(false);
    }

    let Some(token) = identity.issue_recovery_token(&email).await? else {
        tracing::info!("找回密码：{} 没有对应账号", email);
        return Ok(false);
    };

    let config = crate::config::AppConfig::get();
    mailer
        .send(&templates::password_reset(
            config,
            &email,
            &token,
            config.identity.recovery_token_expiry_minutes,
        ))
        .await?;
    Ok(true)
}

pub(crate) async fn reset_password(
    identity: &dyn IdentityProvider,
    reset_request: &ResetPasswordRequest,
) -> Result<()> {
    validate_new_password(&reset_request.password, &reset_request.confirm_password)
        .map_err(SISystemError::validation)?;
    if reset_request.token.trim().is_empty() {
        return Err(SISystemError::validation(
            "Tautan reset password tidak valid atau sudah kedaluwarsa",
        ));
    }

    let account = identity
        .redeem_recovery_token(reset_request.token.trim(), &reset_request.password)
        .await?;
    tracing::info!("账号 {} 已通过找回令牌重置密码", account.id);
    Ok(())
}

pub async fn handle_change_initial_password(
    service: &AuthService,
    change_request: ChangeInitialPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Silakan masuk terlebih dahulu",
        )));
    };

    let storage = service.get_storage(request);
    let identity = app_identity(request);
    match change_initial_password(storage.as_ref(), identity.as_ref(), &user, &change_request)
        .await
    {
        Ok(()) => {
            // 资料缓存里的 must_change_password 已过期
            if let Some(token) = bearer_token(request) {
                app_cache(request).remove(&cache::user_key(token)).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password berhasil diperbarui",
            )))
        }
        Err(SISystemError::Validation(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn handle_forgot_password(
    _service: &AuthService,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = app_identity(request);
    let mailer = app_mailer(request);

    // 无论结果如何都返回成功，避免泄露邮箱是否注册
    if let Err(e) =
        send_recovery_link(identity.as_ref(), mailer.as_ref(), &forgot_request.email).await
    {
        tracing::error!("发送找回密码邮件失败: {}", e);
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(FORGOT_PASSWORD_REPLY)))
}

pub async fn handle_reset_password(
    _service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = app_identity(request);
    match reset_password(identity.as_ref(), &reset_request).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Password berhasil diatur ulang. Silakan masuk dengan password baru.",
        ))),
        Err(SISystemError::Validation(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::RecoveryTokenInvalid, msg),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::DatabaseIdentityProvider;
    use crate::mailer::testing::RecordingProvider;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_change_initial_password_clears_flag() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let identity = DatabaseIdentityProvider::new(storage.connection().clone());
        let school_id = test_support::create_school(&storage, "ganti").await;
        let user = test_support::create_profile(
            &storage,
            "guru@sekolah.id",
            Some(school_id),
            UserRole::Teacher,
        )
        .await;
        assert!(user.must_change_password);

        let mismatch = ChangeInitialPasswordRequest {
            password: "Baru2025ok".into(),
            confirm_password: "Lain2025ok".into(),
        };
        let err = change_initial_password(&storage, &identity, &user, &mismatch)
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        let valid = ChangeInitialPasswordRequest {
            password: "Baru2025ok".into(),
            confirm_password: "Baru2025ok".into(),
        };
        change_initial_password(&storage, &identity, &user, &valid)
            .await
            .unwrap();

        let reloaded = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(!reloaded.must_change_password);
        assert!(
            identity
                .verify_credentials("guru@sekolah.id", "Baru2025ok")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_recovery_link_round_trip() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let identity = DatabaseIdentityProvider::new(storage.connection().clone());
        identity
            .create_account("kepala@sekolah.id", "Lama2025ok", "Kepala")
            .await
            .unwrap();
        let outbox = Arc::new(RecordingProvider::default());
        let mailer = Mailer::new(Some(outbox.clone()), None);

        // 未注册邮箱静默成功，不发邮件
        assert!(
            !send_recovery_link(&identity, &mailer, "tidak@ada.id")
                .await
                .unwrap()
        );
        assert!(outbox.sent().is_empty());

        assert!(
            send_recovery_link(&identity, &mailer, " Kepala@Sekolah.id ")
                .await
                .unwrap()
        );
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        let token = sent[0]
            .text
            .split("token=")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .to_string();

        let reset = ResetPasswordRequest {
            token: token.clone(),
            password: "Baru2025ok".into(),
            confirm_password: "Baru2025ok".into(),
        };
        reset_password(&identity, &reset).await.unwrap();
        assert!(
            identity
                .verify_credentials("kepala@sekolah.id", "Baru2025ok")
                .await
                .unwrap()
                .is_some()
        );

        // 令牌只能用一次
        let err = reset_password(&identity, &reset).await.unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));
    }
}
