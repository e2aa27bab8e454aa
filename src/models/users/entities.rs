use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 用户角色
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserRole ("用户角色") {
        SystemAdmin => "system_admin", // 平台管理员（不属于任何学校）
        SuperAdmin => "super_admin",   // 学校超级管理员
        Admin => "admin",
        Teacher => "teacher",
        Staff => "staff",
        Student => "student",
        Parent => "parent",
    }
}

impl UserRole {
    pub fn system_roles() -> &'static [&'static UserRole] {
        &[&Self::SystemAdmin]
    }
    pub fn owner_roles() -> &'static [&'static UserRole] {
        &[&Self::SuperAdmin]
    }
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::SuperAdmin, &Self::Admin]
    }
    pub fn teaching_roles() -> &'static [&'static UserRole] {
        &[&Self::SuperAdmin, &Self::Admin, &Self::Teacher]
    }
    pub fn school_roles() -> &'static [&'static UserRole] {
        &[
            &Self::SuperAdmin,
            &Self::Admin,
            &Self::Teacher,
            &Self::Staff,
            &Self::Student,
            &Self::Parent,
        ]
    }
}

// 用户实体（学校内的角色资料）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub school_id: Option<i64>,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            self.school_id,
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_storage_string() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(*role));
        }
    }

    #[test]
    fn test_system_admin_is_not_a_school_role() {
        assert!(
            !UserRole::school_roles()
                .iter()
                .any(|r| **r == UserRole::SystemAdmin)
        );
    }
}
