use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::schools::EducationLevel;

define_string_enum! {
    // 注册申请状态，只能从 pending 单向流转
    #[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
    pub enum RegistrationStatus ("注册状态") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

// 待审核的学校注册申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct PendingRegistration {
    pub id: i64,
    pub school_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub education_level: EducationLevel,
    pub status: RegistrationStatus,
    #[serde(skip_serializing, default)] // 邮件链接令牌，不对外暴露
    #[ts(skip)]
    pub token: String,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PendingRegistration {
    pub fn is_pending(&self) -> bool {
        self.status == RegistrationStatus::Pending
    }
}

/// 定位一条注册申请的方式
#[derive(Debug, Clone)]
pub enum RegistrationLookup {
    Id(i64),
    Token(String),
}
