use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::{
    AttendanceDateQuery, AttendanceRangeQuery, AttendanceReportQuery,
    BulkStudentAttendanceRequest, RecordStaffAttendanceRequest, RecordStudentAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_students_by_date(
    req: HttpRequest,
    query: web::Query<AttendanceDateQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_students_by_date(query.into_inner(), &req)
        .await
}

pub async fn student_summary(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<AttendanceRangeQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_summary(id.0, query.into_inner(), &req)
        .await
}

pub async fn record_student(
    req: HttpRequest,
    body: web::Json<RecordStudentAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .record_student(body.into_inner(), &req)
        .await
}

pub async fn record_students_bulk(
    req: HttpRequest,
    body: web::Json<BulkStudentAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .record_students_bulk(body.into_inner(), &req)
        .await
}

pub async fn list_staff_by_date(
    req: HttpRequest,
    query: web::Query<AttendanceDateQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_staff_by_date(query.into_inner(), &req)
        .await
}

pub async fn record_staff(
    req: HttpRequest,
    body: web::Json<RecordStaffAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.record_staff(body.into_inner(), &req).await
}

pub async fn report(
    req: HttpRequest,
    query: web::Query<AttendanceReportQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.report(query.into_inner(), &req).await
}

// 配置路由：学生考勤教师可录入，教职工考勤与报表仅管理员
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    let admin = || middlewares::RequireRole::new_any(UserRole::admin_roles());

    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireRole::new_any(UserRole::teaching_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/students")
                    .route(web::get().to(list_students_by_date))
                    .route(web::post().to(record_student)),
            )
            .route("/students/bulk", web::post().to(record_students_bulk))
            .route("/students/{id}/summary", web::get().to(student_summary))
            .service(
                web::resource("/staff")
                    .route(web::get().to(list_staff_by_date).wrap(admin()))
                    .route(web::post().to(record_staff).wrap(admin())),
            )
            .service(web::resource("/report").route(web::get().to(report).wrap(admin()))),
    );
}
