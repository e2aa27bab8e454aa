/*!
 * 基于角色的访问控制
 *
 * 必须位于 RequireJWT 之内（actix 中后注册的 wrap 先执行，因此 RequireJWT 写在后面）。
 *
 * ```rust,ignore
 * web::scope("/api/v1/users")
 *     .wrap(RequireRole::new(&UserRole::SuperAdmin))
 *     .wrap(RequireJWT)
 * ```
 *
 * 除平台管理员外，所有学校角色还要求资料绑定了学校。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: Rc::from(vec![*role]),
        }
    }

    /// 任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| **r).collect(),
        }
    }
}

/// 角色匹配；学校角色还必须绑定学校
fn permits(allowed: &[UserRole], user: &User) -> bool {
    if !allowed.contains(&user.role) {
        return false;
    }
    user.role == UserRole::SystemAdmin || user.school_id.is_some()
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            let Some(user) = user else {
                info!("角色校验时未找到用户信息，请确认已挂载 RequireJWT");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Silakan masuk terlebih dahulu",
                    )
                    .map_into_right_body(),
                ));
            };

            if permits(&allowed, &user) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "用户 {}（角色 {}）无权访问 {}，允许的角色: {:?}",
                user.id,
                user.role,
                req.path(),
                allowed
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Anda tidak memiliki akses ke fitur ini",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, school_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            school_id,
            email: "u@sekolah.id".into(),
            full_name: "U".into(),
            role,
            avatar_url: None,
            is_active: true,
            must_change_password: false,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_school_role_without_school_is_denied() {
        let allowed = [UserRole::SuperAdmin, UserRole::Admin];
        assert!(permits(&allowed, &user(UserRole::Admin, Some(3))));
        assert!(!permits(&allowed, &user(UserRole::Admin, None)));
        assert!(!permits(&allowed, &user(UserRole::Teacher, Some(3))));
    }

    #[test]
    fn test_system_admin_needs_no_school() {
        assert!(permits(&[UserRole::SystemAdmin], &user(UserRole::SystemAdmin, None)));
    }
}
