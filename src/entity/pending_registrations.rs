//! 学校注册申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub education_level: String,
    pub status: String,
    #[sea_orm(unique)]
    pub token: String,
    pub processed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_registration(self) -> crate::models::registrations::entities::PendingRegistration {
        use crate::models::registrations::entities::{PendingRegistration, RegistrationStatus};
        use crate::models::schools::EducationLevel;
        use chrono::{DateTime, Utc};

        PendingRegistration {
            id: self.id,
            school_name: self.school_name,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            education_level: self
                .education_level
                .parse::<EducationLevel>()
                .unwrap_or(EducationLevel::Sd),
            status: self
                .status
                .parse::<RegistrationStatus>()
                .unwrap_or(RegistrationStatus::Pending),
            token: self.token,
            processed_at: self
                .processed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
