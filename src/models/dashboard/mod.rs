use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

/// 仪表盘统计（按学校缓存）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardStats {
    pub students: u64,
    pub staff: u64,
    pub letters: u64,
    pub active_academic_year: Option<String>,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
    pub enum ActivityKind ("动态类型") {
        StudentCreated => "student_created",
        StaffCreated => "staff_created",
        StaffUpdated => "staff_updated",
        LetterCreated => "letter_created",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RecentActivity {
    pub kind: ActivityKind,
    pub title: String,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// 合并多个来源的动态，按时间倒序取前 limit 条
pub fn merge_recent_activities(
    sources: Vec<Vec<RecentActivity>>,
    limit: usize,
) -> Vec<RecentActivity> {
    let mut merged: Vec<RecentActivity> = sources.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    merged.truncate(limit);
    merged
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RecentActivityResponse {
    pub items: Vec<RecentActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn activity(kind: ActivityKind, ts: i64) -> RecentActivity {
        RecentActivity {
            kind,
            title: format!("{kind}-{ts}"),
            occurred_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn test_merge_keeps_newest_first() {
        let merged = merge_recent_activities(
            vec![
                vec![
                    activity(ActivityKind::StudentCreated, 10),
                    activity(ActivityKind::StudentCreated, 50),
                ],
                vec![activity(ActivityKind::StaffUpdated, 30)],
                vec![
                    activity(ActivityKind::LetterCreated, 40),
                    activity(ActivityKind::LetterCreated, 20),
                    activity(ActivityKind::LetterCreated, 60),
                ],
            ],
            RECENT_ACTIVITY_LIMIT,
        );

        let stamps: Vec<i64> = merged.iter().map(|a| a.occurred_at.timestamp()).collect();
        assert_eq!(stamps, vec![60, 50, 40, 30, 20]);
    }
}
