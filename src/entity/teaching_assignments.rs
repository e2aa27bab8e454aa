use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teaching_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_group_id: i64,
    pub hours_per_week: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_groups::Entity",
        from = "Column::ClassGroupId",
        to = "super::class_groups::Column::Id"
    )]
    ClassGroup,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
}

impl Related<super::class_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassGroup.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teaching_assignment(
        self,
    ) -> crate::models::curriculum::entities::TeachingAssignment {
        crate::models::curriculum::entities::TeachingAssignment {
            id: self.id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            teacher_id: self.teacher_id,
            subject_id: self.subject_id,
            class_group_id: self.class_group_id,
            hours_per_week: self.hours_per_week,
        }
    }
}
