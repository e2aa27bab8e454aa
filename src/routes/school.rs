use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schools::UpdateSchoolRequest;
use crate::models::users::entities::UserRole;
use crate::services::{DashboardService, SchoolService};

static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn get_school(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school(&req).await
}

pub async fn update_school(
    req: HttpRequest,
    body: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.update_school(body.into_inner(), &req).await
}

pub async fn dashboard_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_stats(&req).await
}

pub async fn recent_activities(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.recent_activities(&req).await
}

// 配置路由
pub fn configure_school_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/school")
            .wrap(middlewares::RequireRole::new_any(UserRole::school_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(get_school))
                    .route(
                        web::put()
                            .to(update_school)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireRole::new_any(UserRole::school_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/stats", web::get().to(dashboard_stats))
            .route("/activities", web::get().to(recent_activities)),
    );
}
