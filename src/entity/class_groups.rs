//! 教学班（rombel）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub grade_level_id: i64,
    pub name: String,
    pub homeroom_teacher_id: Option<i64>,
    pub capacity: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::teaching_assignments::Entity")]
    TeachingAssignments,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::teaching_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeachingAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class_group(self) -> crate::models::curriculum::entities::ClassGroup {
        use chrono::{DateTime, Utc};

        crate::models::curriculum::entities::ClassGroup {
            id: self.id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            grade_level_id: self.grade_level_id,
            name: self.name,
            homeroom_teacher_id: self.homeroom_teacher_id,
            capacity: self.capacity,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
