pub mod attendance;
pub mod auth;
pub mod curriculum;
pub mod dashboard;
pub mod grades;
pub mod letters;
pub mod registrations;
pub mod school;
pub mod staff;
pub mod students;
pub mod users;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use curriculum::CurriculumService;
pub use dashboard::DashboardService;
pub use grades::GradeService;
pub use letters::LetterService;
pub use registrations::RegistrationService;
pub use school::SchoolService;
pub use staff::StaffService;
pub use students::StudentService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::cache::{self, ObjectCache};
use crate::errors::{Result, SISystemError};
use crate::identity::IdentityProvider;
use crate::mailer::Mailer;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::models::users::entities::User;

/// 业务错误转为统一响应
pub(crate) fn error_response(err: &SISystemError) -> HttpResponse {
    HttpResponse::build(err.status_code()).json(ApiResponse::<()>::from_error(err))
}

/// 保留错误对应的状态码，改用模块自己的业务错误码
pub(crate) fn coded_error(err: &SISystemError, code: ErrorCode) -> HttpResponse {
    HttpResponse::build(err.status_code()).json(ApiResponse::error_empty(code, err.message()))
}

/// 当前用户及其学校 id
pub(crate) fn current_tenant(request: &HttpRequest) -> Result<(User, i64)> {
    let user = RequireJWT::extract_user_claims(request)
        .ok_or_else(|| SISystemError::authentication("Silakan masuk terlebih dahulu"))?;
    let school_id = user
        .school_id
        .ok_or_else(|| SISystemError::authorization("Akun Anda belum terhubung dengan sekolah"))?;
    Ok((user, school_id))
}

pub(crate) fn app_identity(request: &HttpRequest) -> Arc<dyn IdentityProvider> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn IdentityProvider>>>()
        .expect("Identity provider not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_mailer(request: &HttpRequest) -> Arc<Mailer> {
    request
        .app_data::<actix_web::web::Data<Arc<Mailer>>>()
        .expect("Mailer not found in app data")
        .get_ref()
        .clone()
}

/// 学生、教职工、公文写入后让仪表盘重新统计
pub(crate) async fn invalidate_dashboard(request: &HttpRequest, school_id: i64) {
    app_cache(request)
        .remove(&cache::dashboard_key(school_id))
        .await;
}
