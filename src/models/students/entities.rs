use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::schools::EducationLevel;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
    pub enum Gender ("性别") {
        Male => "male",
        Female => "female",
    }
}

define_string_enum! {
    // 学籍状态
    #[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
    pub enum StudentStatus ("学籍状态") {
        Active => "active",
        Graduated => "graduated",
        Transferred => "transferred",
        Dropped => "dropped",
    }
}

define_string_enum! {
    // 入学方式
    #[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
    pub enum EnrollmentType ("入学方式") {
        New => "new",
        Transfer => "transfer",
        Alumni => "alumni",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
    pub enum ParentType ("监护类型") {
        Parent => "parent",
        Guardian => "guardian",
    }
}

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    pub nisn: String,
    pub nis: String,
    pub full_name: String,
    pub birth_date: String,
    pub birth_place: String,
    pub gender: Gender,
    pub religion: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub status: StudentStatus,
    pub admission_year: i32,
    pub enrollment_type: EnrollmentType,
    pub nik: Option<String>,
    pub parent_type: ParentType,
    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学年起始年份，学年从每年 7 月开始
pub fn academic_start_year(today: NaiveDate) -> i32 {
    if today.month() >= 7 {
        today.year()
    } else {
        today.year() - 1
    }
}

/// 可毕业的最晚入学年份：入学年份不晚于该值的在读学生视为应届毕业
pub fn graduation_admission_limit(today: NaiveDate, level: EducationLevel) -> i32 {
    academic_start_year(today) - level.study_years()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_academic_year_starts_in_july() {
        assert_eq!(academic_start_year(date(2025, 6, 30)), 2024);
        assert_eq!(academic_start_year(date(2025, 7, 1)), 2025);
        assert_eq!(academic_start_year(date(2025, 1, 15)), 2024);
    }

    #[test]
    fn test_graduation_limit_by_level() {
        // 2025-08: 学年起始 2025
        assert_eq!(graduation_admission_limit(date(2025, 8, 1), EducationLevel::Sd), 2019);
        assert_eq!(graduation_admission_limit(date(2025, 8, 1), EducationLevel::Smp), 2022);
        // 2025-03: 学年起始 2024
        assert_eq!(graduation_admission_limit(date(2025, 3, 1), EducationLevel::Sma), 2021);
    }
}
