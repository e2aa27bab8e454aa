//! 成绩与成绩单模型

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 成绩等级
    #[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
    pub enum Predicate ("成绩等级") {
        A => "A",
        B => "B",
        C => "C",
        D => "D",
        E => "E",
    }
}

impl Predicate {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Predicate::A
        } else if score >= 80.0 {
            Predicate::B
        } else if score >= 70.0 {
            Predicate::C
        } else if score >= 60.0 {
            Predicate::D
        } else {
            Predicate::E
        }
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
    pub enum ReportCardStatus ("成绩单状态") {
        Draft => "draft",
        Finalized => "finalized",
        Printed => "printed",
    }
}

/// 学期只有 1、2
pub fn validate_semester(semester: i32) -> Result<(), String> {
    if semester == 1 || semester == 2 {
        Ok(())
    } else {
        Err(format!("Semester harus 1 atau 2, diterima {semester}"))
    }
}

pub fn validate_score(score: f64) -> Result<(), String> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(format!("Nilai harus di antara 0 dan 100, diterima {score}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentGrade {
    pub id: i64,
    pub school_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
    pub student_id: i64,
    pub subject_id: i64,
    pub score: Option<f64>,
    pub predicate: Option<Predicate>,
    pub description: Option<String>,
    pub recorded_by: Option<i64>,
}

// 班级成绩录入视图的一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ClassGradeRow {
    pub student_id: i64,
    pub full_name: String,
    pub nisn: String,
    pub grade: Option<StudentGrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCard {
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
    pub status: ReportCardStatus,
    pub finalized_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finalized_by: Option<i64>,
}

// ==================== 请求 ====================

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentGradesQuery {
    pub academic_year_id: i64,
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ClassGradesQuery {
    pub subject_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SaveGradeRequest {
    /// 带 id 时按 id 更新，否则按 (学生, 科目, 学年, 学期) 写入
    pub id: Option<i64>,
    pub academic_year_id: i64,
    pub semester: i32,
    pub student_id: i64,
    pub subject_id: i64,
    pub score: Option<f64>,
    pub predicate: Option<Predicate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkSaveGradesRequest {
    pub grades: Vec<SaveGradeRequest>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCardListQuery {
    pub class_group_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCardLookupQuery {
    pub student_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GenerateReportCardRequest {
    pub student_id: i64,
    pub academic_year_id: i64,
    pub semester: i32,
    pub class_group_id: i64,
    pub homeroom_notes: Option<String>,
}

/// 存储层使用的成绩写入数据
#[derive(Debug, Clone)]
pub struct GradeUpsert {
    pub academic_year_id: i64,
    pub semester: i32,
    pub student_id: i64,
    pub subject_id: i64,
    pub score: Option<f64>,
    pub predicate: Option<Predicate>,
    pub description: Option<String>,
    pub recorded_by: i64,
}

#[derive(Debug, Clone)]
pub struct ReportCardUpsert {
    pub academic_year_id: i64,
    pub semester: i32,
    pub student_id: i64,
    pub class_group_id: i64,
    pub total_sick_days: i32,
    pub total_permitted_days: i32,
    pub total_absent_days: i32,
    pub homeroom_notes: Option<String>,
}

// ==================== 响应 ====================

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentGradeListResponse {
    pub items: Vec<StudentGrade>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ClassGradesResponse {
    pub items: Vec<ClassGradeRow>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkSaveGradesResponse {
    pub saved: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCardListResponse {
    pub items: Vec<ReportCard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_boundaries() {
        assert_eq!(Predicate::from_score(100.0), Predicate::A);
        assert_eq!(Predicate::from_score(90.0), Predicate::A);
        assert_eq!(Predicate::from_score(89.99), Predicate::B);
        assert_eq!(Predicate::from_score(80.0), Predicate::B);
        assert_eq!(Predicate::from_score(70.0), Predicate::C);
        assert_eq!(Predicate::from_score(60.0), Predicate::D);
        assert_eq!(Predicate::from_score(59.5), Predicate::E);
        assert_eq!(Predicate::from_score(0.0), Predicate::E);
    }

    #[test]
    fn test_semester_and_score_ranges() {
        assert!(validate_semester(1).is_ok());
        assert!(validate_semester(2).is_ok());
        assert!(validate_semester(3).is_err());
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(100.0).is_ok());
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }
}
