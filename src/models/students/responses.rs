use serde::Serialize;
use ts_rs::TS;

use super::entities::Student;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentResponse {
    pub student: Student,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct GraduationResponse {
    /// 入学年份不晚于该值的在读学生可毕业
    pub admission_year_limit: i32,
    pub count: u64,
}
