use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

// 学年（只读主数据）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct GradeLevel {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Subject {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

// 教学班（rombel）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ClassGroup {
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub grade_level_id: i64,
    pub name: String,
    pub homeroom_teacher_id: Option<i64>,
    pub capacity: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
    pub enum EnrollmentStatus ("分班状态") {
        Active => "active",
        Moved => "moved",
        Completed => "completed",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Enrollment {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_group_id: i64,
    pub enrollment_date: String,
    pub status: EnrollmentStatus,
}

// 班内学生（教学班详情中使用）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct EnrolledStudent {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub full_name: String,
    pub nisn: String,
    pub photo_url: Option<String>,
}

// 任课安排
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct TeachingAssignment {
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_group_id: i64,
    pub hours_per_week: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Schedule {
    pub id: i64,
    pub school_id: i64,
    pub teaching_assignment_id: i64,
    /// 1 = 周一 ... 7 = 周日
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}
