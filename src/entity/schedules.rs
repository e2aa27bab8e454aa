use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub teaching_assignment_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teaching_assignments::Entity",
        from = "Column::TeachingAssignmentId",
        to = "super::teaching_assignments::Column::Id"
    )]
    TeachingAssignment,
}

impl Related<super::teaching_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeachingAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule(self) -> crate::models::curriculum::entities::Schedule {
        crate::models::curriculum::entities::Schedule {
            id: self.id,
            school_id: self.school_id,
            teaching_assignment_id: self.teaching_assignment_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            room: self.room,
        }
    }
}
