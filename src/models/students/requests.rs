use serde::Deserialize;
use ts_rs::TS;

use super::entities::{EnrollmentType, Gender, ParentType, StudentStatus};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

// 新增/编辑学生共用的表单
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentPayload {
    pub nisn: String,
    pub nis: String,
    pub full_name: String,
    pub birth_date: String,
    pub birth_place: String,
    pub gender: Gender,
    pub religion: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    /// 编辑时可显式修改；新建时忽略
    pub status: Option<StudentStatus>,
    pub admission_year: i32,
    #[serde(default = "default_enrollment_type")]
    pub enrollment_type: EnrollmentType,
    pub nik: Option<String>,
    #[serde(default = "default_parent_type")]
    pub parent_type: ParentType,
    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

fn default_enrollment_type() -> EnrollmentType {
    EnrollmentType::New
}

fn default_parent_type() -> ParentType {
    ParentType::Parent
}

/// 存储层使用的学生写入数据（已规范化）
#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub nisn: String,
    pub nis: String,
    pub full_name: String,
    pub birth_date: String,
    pub birth_place: String,
    pub gender: Gender,
    pub religion: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub status: StudentStatus,
    pub admission_year: i32,
    pub enrollment_type: EnrollmentType,
    pub nik: Option<String>,
    pub parent_type: ParentType,
    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StudentListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}
