use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::{self, ObjectCache};
use crate::middlewares::require_jwt::bearer_token;
use crate::models::ApiResponse;
use crate::services::app_cache;
use crate::utils::jwt::JwtUtils;

/// 清除 refresh_token cookie，并丢弃当前访问令牌对应的资料缓存
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = bearer_token(request) {
        app_cache(request).remove(&cache::user_key(token)).await;
    }

    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Berhasil keluar")))
}
