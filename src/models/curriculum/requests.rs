use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ClassGroupListParams {
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateClassGroupRequest {
    pub academic_year_id: i64,
    pub grade_level_id: i64,
    pub name: String,
    pub homeroom_teacher_id: Option<i64>,
    /// 缺省时使用配置中的默认容量
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct AddEnrollmentRequest {
    pub student_id: i64,
    /// 缺省为当天
    pub enrollment_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct TeachingAssignmentListParams {
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateTeachingAssignmentRequest {
    pub academic_year_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_group_id: i64,
    pub hours_per_week: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ScheduleListParams {
    pub class_group_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateScheduleRequest {
    pub teaching_assignment_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

/// 存储层写入用的教学班数据
#[derive(Debug, Clone)]
pub struct NewClassGroup {
    pub academic_year_id: i64,
    pub grade_level_id: i64,
    pub name: String,
    pub homeroom_teacher_id: Option<i64>,
    pub capacity: i32,
}

#[derive(Debug, Clone)]
pub struct NewTeachingAssignment {
    pub academic_year_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_group_id: i64,
    pub hours_per_week: i32,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub teaching_assignment_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}
