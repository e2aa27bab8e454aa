//! 学生成绩实体，(student_id, subject_id, academic_year_id, semester) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
    pub student_id: i64,
    pub subject_id: i64,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    pub predicate: Option<String>,
    pub description: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student_grade(self) -> crate::models::grades::StudentGrade {
        use crate::models::grades::{Predicate, StudentGrade};

        StudentGrade {
            id: self.id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            semester: self.semester,
            student_id: self.student_id,
            subject_id: self.subject_id,
            score: self.score,
            predicate: self.predicate.and_then(|p| p.parse::<Predicate>().ok()),
            description: self.description,
            recorded_by: self.recorded_by,
        }
    }
}
