use super::entities::UserRole;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

// 学校内创建账号请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: UserRole,
}

// 修改角色请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRoleRequest {
    pub role: UserRole,
}

// 启用/停用请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

/// 存储层写入的用户资料
#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub id: i64,
    pub school_id: Option<i64>,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub must_change_password: bool,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}
