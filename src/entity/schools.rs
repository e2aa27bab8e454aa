//! 学校（租户）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub education_level: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    pub subscription_plan: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::students::Entity")]
    Students,
    #[sea_orm(has_many = "super::staff::Entity")]
    Staff,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_school(self) -> crate::models::schools::School {
        use crate::models::schools::{EducationLevel, School, SubscriptionPlan};
        use chrono::{DateTime, Utc};

        School {
            id: self.id,
            name: self.name,
            slug: self.slug,
            education_level: self
                .education_level
                .parse::<EducationLevel>()
                .unwrap_or(EducationLevel::Sd),
            address: self.address,
            phone: self.phone,
            email: self.email,
            logo_url: self.logo_url,
            subscription_plan: self
                .subscription_plan
                .parse::<SubscriptionPlan>()
                .unwrap_or(SubscriptionPlan::Free),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
