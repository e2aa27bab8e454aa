use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::{
    BulkSaveGradesRequest, ClassGradesQuery, GenerateReportCardRequest, ReportCardListQuery,
    ReportCardLookupQuery, SaveGradeRequest, StudentGradesQuery,
};
use crate::models::users::entities::UserRole;
use crate::services::GradeService;
use crate::utils::SafeIDI64;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn student_grades(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<StudentGradesQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .student_grades(id.0, query.into_inner(), &req)
        .await
}

pub async fn class_grades(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<ClassGradesQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .class_grades(id.0, query.into_inner(), &req)
        .await
}

pub async fn save_grade(
    req: HttpRequest,
    body: web::Json<SaveGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.save_grade(body.into_inner(), &req).await
}

pub async fn save_grades_bulk(
    req: HttpRequest,
    body: web::Json<BulkSaveGradesRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.save_grades_bulk(body.into_inner(), &req).await
}

pub async fn list_report_cards(
    req: HttpRequest,
    query: web::Query<ReportCardListQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_report_cards(query.into_inner(), &req)
        .await
}

pub async fn get_report_card(
    req: HttpRequest,
    query: web::Query<ReportCardLookupQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_report_card(query.into_inner(), &req).await
}

pub async fn generate_report_card(
    req: HttpRequest,
    body: web::Json<GenerateReportCardRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .generate_report_card(body.into_inner(), &req)
        .await
}

pub async fn finalize_report_card(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.finalize_report_card(id.0, &req).await
}

// 配置路由：教师录入成绩，定稿仅管理员
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireRole::new_any(UserRole::teaching_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(save_grade))
            .route("/bulk", web::post().to(save_grades_bulk))
            .route("/students/{id}", web::get().to(student_grades))
            .route("/class-groups/{id}", web::get().to(class_grades)),
    );
    cfg.service(
        web::scope("/api/v1/report-cards")
            .wrap(middlewares::RequireRole::new_any(UserRole::teaching_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_report_cards))
            .route("/lookup", web::get().to(get_report_card))
            .route("/generate", web::post().to(generate_report_card))
            .service(
                web::resource("/{id}/finalize").route(
                    web::post()
                        .to(finalize_report_card)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
