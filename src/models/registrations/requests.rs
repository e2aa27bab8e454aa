use serde::Deserialize;
use ts_rs::TS;

use super::entities::RegistrationStatus;
use crate::models::common::PaginationQuery;
use crate::models::schools::EducationLevel;

// 提交学校注册申请（公开）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct SubmitRegistrationRequest {
    pub school_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub education_level: EducationLevel,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct RegistrationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<RegistrationStatus>,
}

// 邮件链接回调参数
#[derive(Debug, Deserialize)]
pub struct RegistrationTokenQuery {
    pub token: Option<String>,
}

/// 存储层写入的注册申请
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub school_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub education_level: EducationLevel,
    pub token: String,
}
