//! 成绩单实体，(student_id, academic_year_id, semester) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "report_cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
    pub student_id: i64,
    pub class_group_id: i64,
    pub total_sick_days: i32,
    pub total_permitted_days: i32,
    pub total_absent_days: i32,
    pub class_rank: Option<i32>,
    pub homeroom_notes: Option<String>,
    pub principal_notes: Option<String>,
    pub status: String,
    pub finalized_at: Option<i64>,
    pub finalized_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_report_card(self) -> crate::models::grades::ReportCard {
        use crate::models::grades::{ReportCard, ReportCardStatus};
        use chrono::{DateTime, Utc};

        ReportCard {
            id: self.id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            semester: self.semester,
            student_id: self.student_id,
            class_group_id: self.class_group_id,
            total_sick_days: self.total_sick_days,
            total_permitted_days: self.total_permitted_days,
            total_absent_days: self.total_absent_days,
            class_rank: self.class_rank,
            homeroom_notes: self.homeroom_notes,
            principal_notes: self.principal_notes,
            status: self
                .status
                .parse::<ReportCardStatus>()
                .unwrap_or(ReportCardStatus::Draft),
            finalized_at: self
                .finalized_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            finalized_by: self.finalized_by,
        }
    }
}
