/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，解析出用户资料并放入请求扩展。
 * 资料按 `user:{token}` 缓存；停用的账号返回 403。
 *
 * ```rust,ignore
 * web::scope("/api/v1/students")
 *     .wrap(RequireRole::new_any(UserRole::school_roles()))
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 取得当前用户，
 * 需要租户的接口统一经 `services::current_tenant` 取得用户与学校 id。
 */

use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因
#[derive(Debug)]
enum AuthRejection {
    Unauthorized(&'static str),
    Inactive,
}

impl AuthRejection {
    fn status(&self) -> StatusCode {
        match self {
            AuthRejection::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthRejection::Inactive => StatusCode::FORBIDDEN,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            AuthRejection::Unauthorized(_) => ErrorCode::Unauthorized,
            AuthRejection::Inactive => ErrorCode::UserInactive,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthRejection::Unauthorized(msg) => msg,
            AuthRejection::Inactive => "Akun Anda tidak aktif. Hubungi administrator sekolah.",
        }
    }
}

pub(crate) fn bearer_token(req: &actix_web::HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthRejection> {
    let token = bearer_token(req.request())
        .ok_or(AuthRejection::Unauthorized("Token akses tidak ditemukan"))?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("访问令牌校验失败: {}", err);
        AuthRejection::Unauthorized("Sesi tidak valid atau telah berakhir")
    })?;

    let object_cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let key = cache::user_key(token);
    let user = match cache::get_json::<User>(object_cache.as_ref(), &key).await {
        Some(user) => user,
        None => {
            let user_id = claims
                .user_id()
                .ok_or(AuthRejection::Unauthorized("Sesi tidak valid"))?;
            let storage = req
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone();

            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|e| {
                    info!("读取用户资料失败: {}", e);
                    AuthRejection::Unauthorized("Gagal memuat profil pengguna")
                })?
                .ok_or(AuthRejection::Unauthorized("Profil pengguna tidak ditemukan"))?;

            cache::insert_json(
                object_cache.as_ref(),
                key,
                &user,
                AppConfig::get().cache.default_ttl,
            )
            .await;
            user
        }
    };

    if !user.is_active {
        return Err(AuthRejection::Inactive);
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("用户 {} 认证通过", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(rejection) => {
                    info!("请求 {} 认证失败: {:?}", req.path(), rejection);
                    Ok(req.into_response(
                        create_error_response(
                            rejection.status(),
                            rejection.code(),
                            rejection.message(),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前用户，仅在挂载了 RequireJWT 的路由中可用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}
