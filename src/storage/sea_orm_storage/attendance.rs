//! 学生与教职工考勤

use super::{SeaOrmStorage, db_error};
use crate::entity::prelude::{
    StaffAttendance as StaffAttendanceEntity, StaffAttendanceActiveModel,
    StudentAttendance as StudentAttendanceEntity, StudentAttendanceActiveModel,
};
use crate::entity::{staff_attendance, student_attendance};
use crate::errors::{Result, SISystemError};
use crate::models::attendance::{
    RecordStaffAttendanceRequest, StaffAttendance, StudentAttendance, StudentAttendanceUpsert,
};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    pub async fn list_student_attendance_by_date_impl(
        &self,
        school_id: i64,
        date: &str,
        class_group_id: Option<i64>,
    ) -> Result<Vec<StudentAttendance>> {
        let mut select = StudentAttendanceEntity::find()
            .filter(student_attendance::Column::SchoolId.eq(school_id))
            .filter(student_attendance::Column::Date.eq(date));
        if let Some(group) = class_group_id {
            select = select.filter(student_attendance::Column::ClassGroupId.eq(group));
        }

        let rows = select
            .order_by_asc(student_attendance::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(db_error("查询学生考勤"))?;

        Ok(rows.into_iter().map(|m| m.into_student_attendance()).collect())
    }

    /// 日期区间为闭区间，日期按 YYYY-MM-DD 字符串比较
    pub async fn list_student_attendance_in_range_impl(
        &self,
        school_id: i64,
        student_id: Option<i64>,
        start: &str,
        end: &str,
    ) -> Result<Vec<StudentAttendance>> {
        let mut select = StudentAttendanceEntity::find()
            .filter(student_attendance::Column::SchoolId.eq(school_id))
            .filter(student_attendance::Column::Date.between(start, end));
        if let Some(student) = student_id {
            select = select.filter(student_attendance::Column::StudentId.eq(student));
        }

        let rows = select
            .order_by_asc(student_attendance::Column::Date)
            .order_by_asc(student_attendance::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(db_error("查询学生考勤区间"))?;

        Ok(rows.into_iter().map(|m| m.into_student_attendance()).collect())
    }

    /// 按 (学生, 日期) 写入考勤，已有记录则覆盖
    pub async fn upsert_student_attendance_impl(
        &self,
        school_id: i64,
        records: Vec<StudentAttendanceUpsert>,
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;
        let mut written = 0;

        for record in records {
            let model = StudentAttendanceActiveModel {
                school_id: Set(school_id),
                student_id: Set(record.student_id),
                class_group_id: Set(record.class_group_id),
                date: Set(record.date),
                status: Set(record.status.to_string()),
                check_in_time: Set(record.check_in_time),
                check_out_time: Set(None),
                notes: Set(record.notes),
                recorded_by: Set(Some(record.recorded_by)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            StudentAttendanceEntity::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        student_attendance::Column::StudentId,
                        student_attendance::Column::Date,
                    ])
                    .update_columns([
                        student_attendance::Column::Status,
                        student_attendance::Column::ClassGroupId,
                        student_attendance::Column::CheckInTime,
                        student_attendance::Column::Notes,
                        student_attendance::Column::RecordedBy,
                        student_attendance::Column::UpdatedAt,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(db_error("写入学生考勤"))?;
            written += 1;
        }

        txn.commit().await.map_err(db_error("提交事务"))?;
        Ok(written)
    }

    pub async fn list_staff_attendance_by_date_impl(
        &self,
        school_id: i64,
        date: &str,
    ) -> Result<Vec<StaffAttendance>> {
        let rows = StaffAttendanceEntity::find()
            .filter(staff_attendance::Column::SchoolId.eq(school_id))
            .filter(staff_attendance::Column::Date.eq(date))
            .order_by_asc(staff_attendance::Column::StaffId)
            .all(&self.db)
            .await
            .map_err(db_error("查询教职工考勤"))?;

        Ok(rows.into_iter().map(|m| m.into_staff_attendance()).collect())
    }

    pub async fn list_staff_attendance_in_range_impl(
        &self,
        school_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Vec<StaffAttendance>> {
        let rows = StaffAttendanceEntity::find()
            .filter(staff_attendance::Column::SchoolId.eq(school_id))
            .filter(staff_attendance::Column::Date.between(start, end))
            .order_by_asc(staff_attendance::Column::Date)
            .order_by_asc(staff_attendance::Column::StaffId)
            .all(&self.db)
            .await
            .map_err(db_error("查询教职工考勤区间"))?;

        Ok(rows.into_iter().map(|m| m.into_staff_attendance()).collect())
    }

    pub async fn upsert_staff_attendance_impl(
        &self,
        school_id: i64,
        req: RecordStaffAttendanceRequest,
    ) -> Result<StaffAttendance> {
        let now = chrono::Utc::now().timestamp();
        let staff_id = req.staff_id;
        let date = req.date.clone();

        let model = StaffAttendanceActiveModel {
            school_id: Set(school_id),
            staff_id: Set(req.staff_id),
            date: Set(req.date),
            status: Set(req.status.to_string()),
            check_in_time: Set(req.check_in_time),
            check_out_time: Set(req.check_out_time),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        StaffAttendanceEntity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    staff_attendance::Column::StaffId,
                    staff_attendance::Column::Date,
                ])
                .update_columns([
                    staff_attendance::Column::Status,
                    staff_attendance::Column::CheckInTime,
                    staff_attendance::Column::CheckOutTime,
                    staff_attendance::Column::Notes,
                    staff_attendance::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error("写入教职工考勤"))?;

        let row = StaffAttendanceEntity::find()
            .filter(staff_attendance::Column::SchoolId.eq(school_id))
            .filter(staff_attendance::Column::StaffId.eq(staff_id))
            .filter(staff_attendance::Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(db_error("查询教职工考勤"))?
            .ok_or_else(|| SISystemError::database_operation("教职工考勤写入后未找到"))?;

        Ok(row.into_staff_attendance())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_class_setup, create_school, student_record};
    use super::*;
    use crate::models::attendance::{AttendanceStatus, StaffAttendanceStatus};
    use crate::models::staff::{StaffRecord, StaffStatus};
    use crate::models::students::entities::Gender;
    use crate::storage::Storage;

    fn entry(
        student_id: i64,
        class_group_id: i64,
        status: AttendanceStatus,
    ) -> StudentAttendanceUpsert {
        StudentAttendanceUpsert {
            student_id,
            class_group_id: Some(class_group_id),
            date: "2024-08-01".into(),
            status,
            check_in_time: None,
            notes: None,
            recorded_by: 1,
        }
    }

    #[tokio::test]
    async fn test_bulk_attendance_is_idempotent_per_day() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let (_, group) = create_class_setup(&storage, school, 30).await;
        let ahmad = storage
            .create_student(school, student_record("001", "Ahmad", 2024))
            .await
            .unwrap();
        let bayu = storage
            .create_student(school, student_record("002", "Bayu", 2024))
            .await
            .unwrap();

        let written = storage
            .upsert_student_attendance(
                school,
                vec![
                    entry(ahmad.id, group, AttendanceStatus::Present),
                    entry(bayu.id, group, AttendanceStatus::Sick),
                ],
            )
            .await
            .unwrap();
        assert_eq!(written, 2);

        // 同一天再次提交只覆盖状态
        storage
            .upsert_student_attendance(
                school,
                vec![entry(bayu.id, group, AttendanceStatus::Present)],
            )
            .await
            .unwrap();

        let day = storage
            .list_student_attendance_by_date(school, "2024-08-01", Some(group))
            .await
            .unwrap();
        assert_eq!(day.len(), 2);
        assert!(day.iter().all(|a| a.status == AttendanceStatus::Present));

        let range = storage
            .list_student_attendance_in_range(school, Some(ahmad.id), "2024-08-01", "2024-08-31")
            .await
            .unwrap();
        assert_eq!(range.len(), 1);
        assert!(
            storage
                .list_student_attendance_in_range(school, None, "2024-09-01", "2024-09-30")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_staff_attendance_overwrites_same_day() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let staff = storage
            .create_staff(
                school,
                StaffRecord {
                    nip: None,
                    full_name: "Bu Rina".into(),
                    gender: Gender::Female,
                    position_id: None,
                    email: None,
                    phone: None,
                    address: None,
                    photo_url: None,
                    join_date: "2018-01-02".into(),
                    status: StaffStatus::Active,
                },
            )
            .await
            .unwrap();

        let request = |status| RecordStaffAttendanceRequest {
            staff_id: staff.id,
            date: "2024-08-01".into(),
            status,
            check_in_time: Some("07:05".into()),
            check_out_time: None,
            notes: None,
        };

        let first = storage
            .upsert_staff_attendance(school, request(StaffAttendanceStatus::Present))
            .await
            .unwrap();
        let second = storage
            .upsert_staff_attendance(school, request(StaffAttendanceStatus::Leave))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, StaffAttendanceStatus::Leave);

        let day = storage
            .list_staff_attendance_by_date(school, "2024-08-01")
            .await
            .unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(
            storage
                .list_staff_attendance_in_range(school, "2024-07-01", "2024-08-31")
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
