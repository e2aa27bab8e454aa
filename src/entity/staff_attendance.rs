//! 教职工考勤实体，(staff_id, date) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub staff_id: i64,
    pub date: String,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_staff_attendance(self) -> crate::models::attendance::StaffAttendance {
        use crate::models::attendance::{StaffAttendance, StaffAttendanceStatus};

        StaffAttendance {
            id: self.id,
            school_id: self.school_id,
            staff_id: self.staff_id,
            date: self.date,
            status: self
                .status
                .parse::<StaffAttendanceStatus>()
                .unwrap_or(StaffAttendanceStatus::Present),
            check_in_time: self.check_in_time,
            check_out_time: self.check_out_time,
            notes: self.notes,
        }
    }
}
