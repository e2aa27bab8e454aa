use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::curriculum::requests::{
    AddEnrollmentRequest, ClassGroupListParams, CreateClassGroupRequest, CreateScheduleRequest,
    CreateTeachingAssignmentRequest, ScheduleListParams, TeachingAssignmentListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::CurriculumService;
use crate::utils::{SafeEnrollmentIdI64, SafeIDI64};

static CURRICULUM_SERVICE: Lazy<CurriculumService> = Lazy::new(CurriculumService::new_lazy);

pub async fn master_data(req: HttpRequest) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.master_data(&req).await
}

pub async fn list_class_groups(
    req: HttpRequest,
    query: web::Query<ClassGroupListParams>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .list_class_groups(query.into_inner(), &req)
        .await
}

pub async fn get_class_group(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_class_group(id.0, &req).await
}

pub async fn create_class_group(
    req: HttpRequest,
    body: web::Json<CreateClassGroupRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_class_group(body.into_inner(), &req)
        .await
}

pub async fn delete_class_group(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_class_group(id.0, &req).await
}

pub async fn add_enrollment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<AddEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .add_enrollment(id.0, body.into_inner(), &req)
        .await
}

pub async fn remove_enrollment(
    req: HttpRequest,
    id: SafeIDI64,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .remove_enrollment(id.0, enrollment_id.0, &req)
        .await
}

pub async fn list_teaching_assignments(
    req: HttpRequest,
    query: web::Query<TeachingAssignmentListParams>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .list_teaching_assignments(query.into_inner(), &req)
        .await
}

pub async fn create_teaching_assignment(
    req: HttpRequest,
    body: web::Json<CreateTeachingAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_teaching_assignment(body.into_inner(), &req)
        .await
}

pub async fn delete_teaching_assignment(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .delete_teaching_assignment(id.0, &req)
        .await
}

pub async fn list_schedules(
    req: HttpRequest,
    query: web::Query<ScheduleListParams>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .list_schedules(query.into_inner(), &req)
        .await
}

pub async fn create_schedule(
    req: HttpRequest,
    body: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_schedule(body.into_inner(), &req)
        .await
}

pub async fn delete_schedule(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_schedule(id.0, &req).await
}

// 配置路由：教师可查看，管理员可编排
pub fn configure_curriculum_routes(cfg: &mut web::ServiceConfig) {
    let admin = || middlewares::RequireRole::new_any(UserRole::admin_roles());

    cfg.service(
        web::scope("/api/v1/curriculum")
            .wrap(middlewares::RequireRole::new_any(UserRole::teaching_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/master-data", web::get().to(master_data))
            .service(
                web::resource("/class-groups")
                    .route(web::get().to(list_class_groups))
                    .route(web::post().to(create_class_group).wrap(admin())),
            )
            .service(
                web::resource("/class-groups/{id}")
                    .route(web::get().to(get_class_group))
                    .route(web::delete().to(delete_class_group).wrap(admin())),
            )
            .service(
                web::resource("/class-groups/{id}/enrollments")
                    .route(web::post().to(add_enrollment).wrap(admin())),
            )
            .service(
                web::resource("/class-groups/{id}/enrollments/{enrollment_id}")
                    .route(web::delete().to(remove_enrollment).wrap(admin())),
            )
            .service(
                web::resource("/teaching-assignments")
                    .route(web::get().to(list_teaching_assignments))
                    .route(web::post().to(create_teaching_assignment).wrap(admin())),
            )
            .service(
                web::resource("/teaching-assignments/{id}")
                    .route(web::delete().to(delete_teaching_assignment).wrap(admin())),
            )
            .service(
                web::resource("/schedules")
                    .route(web::get().to(list_schedules))
                    .route(web::post().to(create_schedule).wrap(admin())),
            )
            .service(
                web::resource("/schedules/{id}")
                    .route(web::delete().to(delete_schedule).wrap(admin())),
            ),
    );
}
