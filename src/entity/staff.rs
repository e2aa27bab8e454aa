//! 教职工实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub nip: Option<String>,
    pub full_name: String,
    pub gender: String,
    pub position_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub join_date: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(
        belongs_to = "super::positions::Entity",
        from = "Column::PositionId",
        to = "super::positions::Column::Id"
    )]
    Position,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::positions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_staff(self, position_name: Option<String>) -> crate::models::staff::Staff {
        use crate::models::staff::{Staff, StaffStatus};
        use crate::models::students::entities::Gender;
        use chrono::{DateTime, Utc};

        Staff {
            id: self.id,
            school_id: self.school_id,
            nip: self.nip,
            full_name: self.full_name,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Male),
            position_id: self.position_id,
            position_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            photo_url: self.photo_url,
            status: self
                .status
                .parse::<StaffStatus>()
                .unwrap_or(StaffStatus::Active),
            join_date: self.join_date,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
