use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 学段
    #[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
    pub enum EducationLevel ("学段") {
        Sd => "sd",
        Smp => "smp",
        Sma => "sma",
        Smk => "smk",
    }
}

impl EducationLevel {
    /// 该学段的学制年数
    pub fn study_years(&self) -> i32 {
        match self {
            EducationLevel::Sd => 6,
            _ => 3,
        }
    }
}

define_string_enum! {
    // 订阅套餐
    #[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
    pub enum SubscriptionPlan ("订阅套餐") {
        Free => "free",
        Pro => "pro",
        Enterprise => "enterprise",
    }
}

// 学校（租户）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct School {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub education_level: EducationLevel,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    pub subscription_plan: SubscriptionPlan,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 新建学校（审批通过时）
#[derive(Debug, Clone)]
pub struct NewSchool {
    pub name: String,
    pub slug: String,
    pub education_level: EducationLevel,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// 更新学校资料
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct UpdateSchoolRequest {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolResponse {
    pub school: School,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_years() {
        assert_eq!(EducationLevel::Sd.study_years(), 6);
        assert_eq!(EducationLevel::Smp.study_years(), 3);
        assert_eq!(EducationLevel::Smk.study_years(), 3);
    }
}
