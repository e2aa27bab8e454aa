use serde::Serialize;
use ts_rs::TS;

use super::entities::{
    AcademicYear, ClassGroup, EnrolledStudent, Enrollment, GradeLevel, Schedule, Subject,
    TeachingAssignment,
};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ClassGroupListResponse {
    pub items: Vec<ClassGroup>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ClassGroupDetailResponse {
    pub class_group: ClassGroup,
    pub students: Vec<EnrolledStudent>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct EnrollmentResponse {
    pub enrollment: Enrollment,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct TeachingAssignmentListResponse {
    pub items: Vec<TeachingAssignment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ScheduleListResponse {
    pub items: Vec<Schedule>,
}

// 主数据查询
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct MasterDataResponse {
    pub academic_years: Vec<AcademicYear>,
    pub grade_levels: Vec<GradeLevel>,
    pub subjects: Vec<Subject>,
}
