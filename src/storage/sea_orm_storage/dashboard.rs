use super::{SeaOrmStorage, db_error};
use crate::entity::prelude::{Letters, Staff, Students};
use crate::entity::{letters, staff, students};
use crate::errors::Result;
use crate::models::dashboard::{
    ActivityKind, DashboardStats, RecentActivity, merge_recent_activities,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

fn activity(kind: ActivityKind, title: String, ts: i64) -> RecentActivity {
    RecentActivity {
        kind,
        title,
        occurred_at: DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default(),
    }
}

impl SeaOrmStorage {
    pub async fn dashboard_stats_impl(&self, school_id: i64) -> Result<DashboardStats> {
        let students = Students::find()
            .filter(students::Column::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(db_error("统计学生数量"))?;
        let staff = Staff::find()
            .filter(staff::Column::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(db_error("统计教职工数量"))?;
        let letters = Letters::find()
            .filter(letters::Column::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(db_error("统计公文数量"))?;
        let active_academic_year = self
            .get_active_academic_year_impl(school_id)
            .await?
            .map(|year| year.name);

        Ok(DashboardStats {
            students,
            staff,
            letters,
            active_academic_year,
        })
    }

    /// 各来源各取最新 limit 条再合并
    pub async fn recent_activities_impl(
        &self,
        school_id: i64,
        limit: u64,
    ) -> Result<Vec<RecentActivity>> {
        let new_students = Students::find()
            .filter(students::Column::SchoolId.eq(school_id))
            .order_by_desc(students::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_error("查询最新学生"))?
            .into_iter()
            .map(|s| activity(ActivityKind::StudentCreated, s.full_name, s.created_at))
            .collect();

        let staff_changes = Staff::find()
            .filter(staff::Column::SchoolId.eq(school_id))
            .order_by_desc(staff::Column::UpdatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_error("查询最新教职工"))?
            .into_iter()
            .map(|s| {
                let kind = if s.updated_at > s.created_at {
                    ActivityKind::StaffUpdated
                } else {
                    ActivityKind::StaffCreated
                };
                activity(kind, s.full_name, s.updated_at)
            })
            .collect();

        let new_letters = Letters::find()
            .filter(letters::Column::SchoolId.eq(school_id))
            .order_by_desc(letters::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_error("查询最新公文"))?
            .into_iter()
            .map(|l| activity(ActivityKind::LetterCreated, l.subject, l.created_at))
            .collect();

        Ok(merge_recent_activities(
            vec![new_students, staff_changes, new_letters],
            limit as usize,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_academic_year, create_school, student_record};
    use super::*;
    use crate::models::letters::{CreateLetterRequest, LetterType};
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_stats_and_activities_are_per_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = create_school(&storage, "a").await;
        let b = create_school(&storage, "b").await;
        create_academic_year(&storage, a, "2024/2025", "2024-07-15", "2025-06-20", true).await;

        storage
            .create_student(a, student_record("001", "Ahmad", 2024))
            .await
            .unwrap();
        storage
            .create_student(b, student_record("002", "Lain", 2024))
            .await
            .unwrap();
        storage
            .create_letter(
                a,
                CreateLetterRequest {
                    letter_number: "001/SK/2024".into(),
                    letter_type: LetterType::Outgoing,
                    subject: "Undangan Rapat".into(),
                    sender: None,
                    recipient: Some("Wali Murid".into()),
                    date: "2024-08-01".into(),
                    file_url: None,
                },
            )
            .await
            .unwrap();

        let stats = storage.dashboard_stats(a).await.unwrap();
        assert_eq!(stats.students, 1);
        assert_eq!(stats.staff, 0);
        assert_eq!(stats.letters, 1);
        assert_eq!(stats.active_academic_year.as_deref(), Some("2024/2025"));
        assert!(storage.dashboard_stats(b).await.unwrap().active_academic_year.is_none());

        let activities = storage.recent_activities(a, 5).await.unwrap();
        assert_eq!(activities.len(), 2);
        assert!(activities.iter().all(|act| act.title != "Lain"));
    }
}
