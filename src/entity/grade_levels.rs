use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_levels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade_level(self) -> crate::models::curriculum::entities::GradeLevel {
        crate::models::curriculum::entities::GradeLevel {
            id: self.id,
            school_id: self.school_id,
            name: self.name,
            sort_order: self.sort_order,
        }
    }
}
