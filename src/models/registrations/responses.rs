use serde::Serialize;
use ts_rs::TS;

use super::entities::PendingRegistration;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct RegistrationResponse {
    pub registration: PendingRegistration,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct RegistrationListResponse {
    pub items: Vec<PendingRegistration>,
    pub pagination: PaginationInfo,
}

// 审批通过后交给管理员转发的登录凭据
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/registration.ts")]
pub struct ApprovalCredentials {
    pub email: String,
    pub password: String,
    pub phone: String,
    pub full_name: String,
    pub school_name: String,
    pub school_id: i64,
}
