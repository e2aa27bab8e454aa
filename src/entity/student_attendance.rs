//! 学生考勤实体，(student_id, date) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_group_id: Option<i64>,
    pub date: String,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student_attendance(self) -> crate::models::attendance::StudentAttendance {
        use crate::models::attendance::{AttendanceStatus, StudentAttendance};

        StudentAttendance {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            class_group_id: self.class_group_id,
            date: self.date,
            status: self
                .status
                .parse::<AttendanceStatus>()
                .unwrap_or(AttendanceStatus::Present),
            check_in_time: self.check_in_time,
            check_out_time: self.check_out_time,
            notes: self.notes,
            recorded_by: self.recorded_by,
        }
    }
}
