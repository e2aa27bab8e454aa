use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{StudentListParams, StudentPayload};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(id.0, &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<StudentPayload>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<StudentPayload>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(id.0, &req).await
}

pub async fn graduation_candidates(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.graduation_candidates(&req).await
}

pub async fn graduate_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.graduate_students(&req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    let admin = || middlewares::RequireRole::new_any(UserRole::admin_roles());

    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireRole::new_any(UserRole::teaching_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student).wrap(admin())),
            )
            // 应届毕业：GET 预览人数，POST 批量转为校友
            .service(
                web::resource("/graduation")
                    .route(web::get().to(graduation_candidates).wrap(admin()))
                    .route(web::post().to(graduate_students).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(web::put().to(update_student).wrap(admin()))
                    .route(web::delete().to(delete_student).wrap(admin())),
            ),
    );
}
