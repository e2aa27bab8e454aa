//! 用户资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// 与 auth_accounts.id 一致
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub school_id: Option<i64>,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::auth_accounts::Entity",
        from = "Column::Id",
        to = "super::auth_accounts::Column::Id"
    )]
    AuthAccount,
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::auth_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthAccount.def()
    }
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserRole};
        use chrono::{DateTime, Utc};

        User {
            id: self.id,
            school_id: self.school_id,
            email: self.email,
            full_name: self.full_name,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Staff),
            avatar_url: self.avatar_url,
            is_active: self.is_active,
            must_change_password: self.must_change_password,
            last_login: self
                .last_login
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
