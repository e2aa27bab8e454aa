pub mod login;
pub mod logout;
pub mod password;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::requests::{
    ChangeInitialPasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    // 验证令牌
    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_verify_token(self, request).await
    }

    // 当前用户资料
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 首次登录修改密码
    pub async fn change_initial_password(
        &self,
        change_request: ChangeInitialPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_initial_password(self, change_request, request).await
    }

    pub async fn forgot_password(
        &self,
        forgot_request: ForgotPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_forgot_password(self, forgot_request, request).await
    }

    pub async fn reset_password(
        &self,
        reset_request: ResetPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_reset_password(self, reset_request, request).await
    }
}
