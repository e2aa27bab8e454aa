//! 学生分班实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_group_id: i64,
    pub enrollment_date: String,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::class_groups::Entity",
        from = "Column::ClassGroupId",
        to = "super::class_groups::Column::Id"
    )]
    ClassGroup,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::class_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::curriculum::entities::Enrollment {
        use crate::models::curriculum::entities::{Enrollment, EnrollmentStatus};

        Enrollment {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            class_group_id: self.class_group_id,
            enrollment_date: self.enrollment_date,
            status: self
                .status
                .parse::<EnrollmentStatus>()
                .unwrap_or(EnrollmentStatus::Active),
        }
    }
}
