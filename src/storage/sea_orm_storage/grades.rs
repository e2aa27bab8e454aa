use super::{SeaOrmStorage, db_error};
use crate::entity::prelude::{
    ReportCardActiveModel, ReportCards, StudentGradeActiveModel, StudentGrades,
};
use crate::entity::{report_cards, student_grades};
use crate::errors::{Result, SISystemError};
use crate::models::grades::{
    ClassGradeRow, GradeUpsert, ReportCard, ReportCardStatus, ReportCardUpsert, StudentGrade,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::OnConflict,
};
use std::collections::HashMap;

fn grade_model(school_id: i64, grade: GradeUpsert, now: i64) -> StudentGradeActiveModel {
    StudentGradeActiveModel {
        school_id: Set(school_id),
        academic_year_id: Set(grade.academic_year_id),
        semester: Set(grade.semester),
        student_id: Set(grade.student_id),
        subject_id: Set(grade.subject_id),
        score: Set(grade.score),
        predicate: Set(grade.predicate.map(|p| p.to_string())),
        description: Set(grade.description),
        recorded_by: Set(Some(grade.recorded_by)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// 按 (学生, 科目, 学年, 学期) 写入成绩
async fn upsert_grade_row<C: ConnectionTrait>(
    conn: &C,
    school_id: i64,
    grade: GradeUpsert,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    StudentGrades::insert(grade_model(school_id, grade, now))
        .on_conflict(
            OnConflict::columns([
                student_grades::Column::StudentId,
                student_grades::Column::SubjectId,
                student_grades::Column::AcademicYearId,
                student_grades::Column::Semester,
            ])
            .update_columns([
                student_grades::Column::Score,
                student_grades::Column::Predicate,
                student_grades::Column::Description,
                student_grades::Column::RecordedBy,
                student_grades::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(db_error("写入成绩"))?;

    Ok(())
}

impl SeaOrmStorage {
    pub async fn list_student_grades_impl(
        &self,
        school_id: i64,
        student_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<StudentGrade>> {
        let rows = StudentGrades::find()
            .filter(student_grades::Column::SchoolId.eq(school_id))
            .filter(student_grades::Column::StudentId.eq(student_id))
            .filter(student_grades::Column::AcademicYearId.eq(academic_year_id))
            .filter(student_grades::Column::Semester.eq(semester))
            .order_by_asc(student_grades::Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(db_error("查询学生成绩"))?;

        Ok(rows.into_iter().map(|m| m.into_student_grade()).collect())
    }

    /// 班级成绩录入视图：在读学生各一行，尚未录入的 grade 为空
    pub async fn list_class_grades_impl(
        &self,
        school_id: i64,
        class_group_id: i64,
        subject_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<ClassGradeRow>> {
        let students = self
            .list_enrolled_students_impl(school_id, class_group_id)
            .await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = students.iter().map(|s| s.student_id).collect();
        let mut grades: HashMap<i64, StudentGrade> = StudentGrades::find()
            .filter(student_grades::Column::SchoolId.eq(school_id))
            .filter(student_grades::Column::SubjectId.eq(subject_id))
            .filter(student_grades::Column::AcademicYearId.eq(academic_year_id))
            .filter(student_grades::Column::Semester.eq(semester))
            .filter(student_grades::Column::StudentId.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(db_error("查询班级成绩"))?
            .into_iter()
            .map(|m| (m.student_id, m.into_student_grade()))
            .collect();

        Ok(students
            .into_iter()
            .map(|s| ClassGradeRow {
                grade: grades.remove(&s.student_id),
                student_id: s.student_id,
                full_name: s.full_name,
                nisn: s.nisn,
            })
            .collect())
    }

    /// 按 id 更新，仅限本校
    pub async fn update_grade_impl(
        &self,
        school_id: i64,
        id: i64,
        grade: GradeUpsert,
    ) -> Result<Option<StudentGrade>> {
        let existing = StudentGrades::find_by_id(id)
            .filter(student_grades::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩"))?;
        if existing.is_none() {
            return Ok(None);
        }

        let model = StudentGradeActiveModel {
            id: Set(id),
            score: Set(grade.score),
            predicate: Set(grade.predicate.map(|p| p.to_string())),
            description: Set(grade.description),
            recorded_by: Set(Some(grade.recorded_by)),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新成绩"))?;

        Ok(Some(updated.into_student_grade()))
    }

    pub async fn upsert_grade_impl(
        &self,
        school_id: i64,
        grade: GradeUpsert,
    ) -> Result<StudentGrade> {
        let (student_id, subject_id, year, semester) = (
            grade.student_id,
            grade.subject_id,
            grade.academic_year_id,
            grade.semester,
        );
        upsert_grade_row(&self.db, school_id, grade).await?;

        let row = StudentGrades::find()
            .filter(student_grades::Column::SchoolId.eq(school_id))
            .filter(student_grades::Column::StudentId.eq(student_id))
            .filter(student_grades::Column::SubjectId.eq(subject_id))
            .filter(student_grades::Column::AcademicYearId.eq(year))
            .filter(student_grades::Column::Semester.eq(semester))
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩"))?
            .ok_or_else(|| SISystemError::database_operation("成绩写入后未找到"))?;

        Ok(row.into_student_grade())
    }

    /// 批量写入，全部成功或全部回滚
    pub async fn upsert_grades_impl(
        &self,
        school_id: i64,
        grades: Vec<GradeUpsert>,
    ) -> Result<u64> {
        if grades.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;
        let mut saved = 0;
        for grade in grades {
            upsert_grade_row(&txn, school_id, grade).await?;
            saved += 1;
        }
        txn.commit().await.map_err(db_error("提交事务"))?;

        Ok(saved)
    }

    pub async fn list_report_cards_impl(
        &self,
        school_id: i64,
        class_group_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<ReportCard>> {
        let rows = ReportCards::find()
            .filter(report_cards::Column::SchoolId.eq(school_id))
            .filter(report_cards::Column::ClassGroupId.eq(class_group_id))
            .filter(report_cards::Column::AcademicYearId.eq(academic_year_id))
            .filter(report_cards::Column::Semester.eq(semester))
            .order_by_asc(report_cards::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(db_error("查询成绩单列表"))?;

        Ok(rows.into_iter().map(|m| m.into_report_card()).collect())
    }

    pub async fn get_report_card_impl(
        &self,
        school_id: i64,
        student_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Option<ReportCard>> {
        let row = ReportCards::find()
            .filter(report_cards::Column::SchoolId.eq(school_id))
            .filter(report_cards::Column::StudentId.eq(student_id))
            .filter(report_cards::Column::AcademicYearId.eq(academic_year_id))
            .filter(report_cards::Column::Semester.eq(semester))
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩单"))?;

        Ok(row.map(|m| m.into_report_card()))
    }

    /// 生成或刷新成绩单草稿
    pub async fn upsert_report_card_impl(
        &self,
        school_id: i64,
        card: ReportCardUpsert,
    ) -> Result<ReportCard> {
        let now = chrono::Utc::now().timestamp();
        let (student_id, year, semester) = (card.student_id, card.academic_year_id, card.semester);

        let model = ReportCardActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(card.academic_year_id),
            semester: Set(card.semester),
            student_id: Set(card.student_id),
            class_group_id: Set(card.class_group_id),
            total_sick_days: Set(card.total_sick_days),
            total_permitted_days: Set(card.total_permitted_days),
            total_absent_days: Set(card.total_absent_days),
            class_rank: Set(None),
            homeroom_notes: Set(card.homeroom_notes),
            principal_notes: Set(None),
            status: Set(ReportCardStatus::Draft.to_string()),
            finalized_at: Set(None),
            finalized_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let affected = ReportCards::insert(model)
            .on_conflict(
                OnConflict::columns([
                    report_cards::Column::StudentId,
                    report_cards::Column::AcademicYearId,
                    report_cards::Column::Semester,
                ])
                .update_columns([
                    report_cards::Column::ClassGroupId,
                    report_cards::Column::TotalSickDays,
                    report_cards::Column::TotalPermittedDays,
                    report_cards::Column::TotalAbsentDays,
                    report_cards::Column::HomeroomNotes,
                    report_cards::Column::UpdatedAt,
                ])
                // 已定稿的成绩单不再覆盖
                .action_and_where(
                    report_cards::Column::Status.eq(ReportCardStatus::Draft.to_string()),
                )
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error("写入成绩单"))?;
        if affected == 0 {
            return Err(SISystemError::conflict(
                "Rapor sudah difinalisasi dan tidak dapat diubah",
            ));
        }

        self.get_report_card_impl(school_id, student_id, year, semester)
            .await?
            .ok_or_else(|| SISystemError::database_operation("成绩单写入后未找到"))
    }

    pub async fn finalize_report_card_impl(
        &self,
        school_id: i64,
        id: i64,
        finalized_by: i64,
    ) -> Result<Option<ReportCard>> {
        let existing = ReportCards::find_by_id(id)
            .filter(report_cards::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩单"))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let model = ReportCardActiveModel {
            id: Set(id),
            status: Set(ReportCardStatus::Finalized.to_string()),
            finalized_at: Set(Some(now)),
            finalized_by: Set(Some(finalized_by)),
            updated_at: Set(now),
            ..Default::default()
        };
        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("定稿成绩单"))?;

        Ok(Some(updated.into_report_card()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        create_class_setup, create_profile, create_school, create_subject, student_record,
    };
    use super::*;
    use crate::models::grades::Predicate;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;

    fn grade(year: i64, student_id: i64, subject_id: i64, score: f64) -> GradeUpsert {
        GradeUpsert {
            academic_year_id: year,
            semester: 1,
            student_id,
            subject_id,
            score: Some(score),
            predicate: Some(Predicate::from_score(score)),
            description: None,
            recorded_by: 1,
        }
    }

    #[tokio::test]
    async fn test_upsert_grade_keeps_one_row_per_key() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let (year, _) = create_class_setup(&storage, school, 30).await;
        let subject = create_subject(&storage, school, "IPA").await;
        let student = storage
            .create_student(school, student_record("001", "Ahmad", 2024))
            .await
            .unwrap();

        let first = storage
            .upsert_grade(school, grade(year, student.id, subject, 75.0))
            .await
            .unwrap();
        let second = storage
            .upsert_grade(school, grade(year, student.id, subject, 92.0))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.predicate, Some(Predicate::A));

        let list = storage
            .list_student_grades(school, student.id, year, 1)
            .await
            .unwrap();
        assert_eq!(list.len(), 1);
        assert!(
            storage
                .update_grade(school + 1, first.id, grade(year, student.id, subject, 10.0))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_class_grades_include_students_without_scores() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let (year, group) = create_class_setup(&storage, school, 30).await;
        let subject = create_subject(&storage, school, "IPS").await;
        let ahmad = storage
            .create_student(school, student_record("001", "Ahmad", 2024))
            .await
            .unwrap();
        let bayu = storage
            .create_student(school, student_record("002", "Bayu", 2024))
            .await
            .unwrap();
        for id in [ahmad.id, bayu.id] {
            storage
                .create_enrollment(school, group, id, "2024-07-15".into())
                .await
                .unwrap();
        }

        let saved = storage
            .upsert_grades(school, vec![grade(year, ahmad.id, subject, 85.0)])
            .await
            .unwrap();
        assert_eq!(saved, 1);

        let rows = storage
            .list_class_grades(school, group, subject, year, 1)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].full_name, "Ahmad");
        assert_eq!(rows[0].grade.as_ref().and_then(|g| g.score), Some(85.0));
        assert!(rows[1].grade.is_none());
    }

    #[tokio::test]
    async fn test_report_card_regenerate_then_finalize() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let (year, group) = create_class_setup(&storage, school, 30).await;
        let teacher = create_profile(&storage, "wali@a.id", Some(school), UserRole::Teacher).await;
        let student = storage
            .create_student(school, student_record("001", "Ahmad", 2024))
            .await
            .unwrap();

        let card = |sick| ReportCardUpsert {
            academic_year_id: year,
            semester: 1,
            student_id: student.id,
            class_group_id: group,
            total_sick_days: sick,
            total_permitted_days: 0,
            total_absent_days: 1,
            homeroom_notes: Some("Rajin".into()),
        };

        let draft = storage.upsert_report_card(school, card(2)).await.unwrap();
        assert_eq!(draft.status, ReportCardStatus::Draft);
        let refreshed = storage.upsert_report_card(school, card(3)).await.unwrap();
        assert_eq!(draft.id, refreshed.id);
        assert_eq!(refreshed.total_sick_days, 3);

        let finalized = storage
            .finalize_report_card(school, draft.id, teacher.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finalized.status, ReportCardStatus::Finalized);
        assert_eq!(finalized.finalized_by, Some(teacher.id));
        assert!(finalized.finalized_at.is_some());

        assert_eq!(
            storage
                .list_report_cards(school, group, year, 1)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_finalized_report_card_is_not_overwritten() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "rapor").await;
        let (year, group) = create_class_setup(&storage, school, 30).await;
        let student = storage
            .create_student(school, student_record("009", "Dewi", 2024))
            .await
            .unwrap();

        let card = |sick| ReportCardUpsert {
            academic_year_id: year,
            semester: 2,
            student_id: student.id,
            class_group_id: group,
            total_sick_days: sick,
            total_permitted_days: 0,
            total_absent_days: 0,
            homeroom_notes: Some(format!("sakit {sick}")),
        };

        let draft = storage.upsert_report_card(school, card(1)).await.unwrap();
        // 草稿可以重复生成
        let draft = storage.upsert_report_card(school, card(2)).await.unwrap();
        assert_eq!(draft.total_sick_days, 2);

        storage
            .finalize_report_card(school, draft.id, 1)
            .await
            .unwrap()
            .unwrap();

        let err = storage.upsert_report_card(school, card(5)).await.unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));

        let stored = storage
            .get_report_card(school, student.id, year, 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ReportCardStatus::Finalized);
        assert_eq!(stored.total_sick_days, 2);
        assert_eq!(stored.homeroom_notes.as_deref(), Some("sakit 2"));
    }
}
