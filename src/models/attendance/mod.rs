//! 考勤模型

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
    pub enum AttendanceStatus ("学生考勤状态") {
        Present => "present",
        Sick => "sick",
        Permitted => "permitted",
        Absent => "absent",
    }
}

define_string_enum! {
    // 教职工多一个 leave（休假）
    #[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
    pub enum StaffAttendanceStatus ("教职工考勤状态") {
        Present => "present",
        Sick => "sick",
        Permitted => "permitted",
        Absent => "absent",
        Leave => "leave",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
    pub enum AttendanceReportType ("考勤报表类型") {
        Student => "student",
        Staff => "staff",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendance {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_group_id: Option<i64>,
    pub date: String,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StaffAttendance {
    pub id: i64,
    pub school_id: i64,
    pub staff_id: i64,
    pub date: String,
    pub status: StaffAttendanceStatus,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
}

/// 学生在一段日期内的考勤汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub present: u32,
    pub sick: u32,
    pub permitted: u32,
    pub absent: u32,
    pub total: u32,
}

impl AttendanceSummary {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut summary = Self::default();
        for status in statuses {
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Sick => summary.sick += 1,
                AttendanceStatus::Permitted => summary.permitted += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

// ==================== 请求 ====================

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceDateQuery {
    pub date: String,
    pub class_group_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceReportQuery {
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub report_type: AttendanceReportType,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordStudentAttendanceRequest {
    pub student_id: i64,
    pub class_group_id: Option<i64>,
    pub date: String,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkAttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkStudentAttendanceRequest {
    pub class_group_id: i64,
    pub date: String,
    pub records: Vec<BulkAttendanceEntry>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordStaffAttendanceRequest {
    pub staff_id: i64,
    pub date: String,
    pub status: StaffAttendanceStatus,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
}

/// 存储层使用的学生考勤写入数据
#[derive(Debug, Clone)]
pub struct StudentAttendanceUpsert {
    pub student_id: i64,
    pub class_group_id: Option<i64>,
    pub date: String,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: i64,
}

// ==================== 响应 ====================

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceListResponse {
    pub items: Vec<StudentAttendance>,
}

/// 单个学生在日期区间内的考勤明细与汇总
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceSummaryResponse {
    pub items: Vec<StudentAttendance>,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StaffAttendanceListResponse {
    pub items: Vec<StaffAttendance>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum AttendanceReport {
    Student(Vec<StudentAttendance>),
    Staff(Vec<StaffAttendance>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_each_status() {
        let summary = AttendanceSummary::from_statuses([
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Sick,
            AttendanceStatus::Absent,
        ]);
        assert_eq!(
            summary,
            AttendanceSummary {
                present: 2,
                sick: 1,
                permitted: 0,
                absent: 1,
                total: 4,
            }
        );
    }

    #[test]
    fn test_staff_status_accepts_leave() {
        assert_eq!(
            "leave".parse::<StaffAttendanceStatus>(),
            Ok(StaffAttendanceStatus::Leave)
        );
        assert!("leave".parse::<AttendanceStatus>().is_err());
    }
}
