/*!
 * 速率限制中间件
 *
 * 按 `前缀:ip` 计数的固定窗口限流，保护登录、学校注册与找回密码等公开接口。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 窗口计数：(窗口开始时间, 已用次数)
static RATE_LIMIT_WINDOWS: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(15 * 60))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            key_prefix,
        }
    }

    /// 5 次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 学校注册申请：3 次/10 分钟
    pub fn registration() -> Self {
        Self::new("registration", 3, 600)
    }

    /// 找回与重置密码：3 次/10 分钟
    pub fn password_recovery() -> Self {
        Self::new("password_recovery", 3, 600)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }
}

/// 窗口内计数，返回 Err(剩余等待秒数) 表示超限
fn consume(
    window_start: Instant,
    used: u32,
    now: Instant,
    limit: &RateLimit,
) -> Result<(Instant, u32), u64> {
    let elapsed = now.saturating_duration_since(window_start);
    if elapsed >= limit.window {
        return Ok((now, 1));
    }
    if used >= limit.max_requests {
        let wait = limit.window - elapsed;
        return Err(wait.as_secs().max(1));
    }
    Ok((window_start, used + 1))
}

/// 优先取连接信息中的地址，其次是代理头
fn client_ip(req: &ServiceRequest) -> String {
    let valid = |ip: &str| ip.trim().parse::<IpAddr>().is_ok();

    if let Some(ip) = req.connection_info().realip_remote_addr()
        && valid(ip)
    {
        return ip.trim().to_string();
    }

    if let Some(ip) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        && valid(ip)
    {
        return ip.trim().to_string();
    }

    "unknown".to_string()
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header((RETRY_AFTER, retry_after.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Terlalu banyak percobaan. Silakan coba lagi nanti.",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = format!("{}:{}", limit.key_prefix, client_ip(&req));
            let now = Instant::now();
            let (window_start, used) = RATE_LIMIT_WINDOWS.get(&key).await.unwrap_or((now, 0));

            match consume(window_start, used, now, &limit) {
                Ok(next) => {
                    RATE_LIMIT_WINDOWS.insert(key, next).await;
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(retry_after) => {
                    warn!("{} 触发限流，{} 秒后可重试", key, retry_after);
                    Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_blocks_after_limit_then_resets() {
        let limit = RateLimit::new("t", 2, 60);
        let start = Instant::now();

        let (s, used) = consume(start, 0, start, &limit).unwrap();
        let (s, used) = consume(s, used, start + Duration::from_secs(1), &limit).unwrap();
        assert_eq!(used, 2);

        let wait = consume(s, used, start + Duration::from_secs(10), &limit).unwrap_err();
        assert_eq!(wait, 50);

        let (_, used) = consume(s, used, start + Duration::from_secs(61), &limit).unwrap();
        assert_eq!(used, 1);
    }

    #[test]
    fn test_presets() {
        assert_eq!(RateLimit::login().max_requests, 5);
        assert_eq!(RateLimit::registration().window, Duration::from_secs(600));
        assert_eq!(RateLimit::password_recovery().key_prefix, "password_recovery");
    }
}
