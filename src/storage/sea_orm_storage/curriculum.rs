//! 教学班、分班、任课与课表

use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::prelude::{
    ClassGroupActiveModel, ClassGroups, EnrollmentActiveModel, Enrollments, ScheduleActiveModel,
    Schedules, Students, TeachingAssignmentActiveModel, TeachingAssignments,
};
use crate::entity::{class_groups, enrollments, schedules, students, teaching_assignments};
use crate::errors::Result;
use crate::models::curriculum::{
    entities::{
        ClassGroup, EnrolledStudent, Enrollment, EnrollmentStatus, Schedule, TeachingAssignment,
    },
    requests::{NewClassGroup, NewSchedule, NewTeachingAssignment},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn list_class_groups_impl(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<ClassGroup>> {
        let mut select = ClassGroups::find().filter(class_groups::Column::SchoolId.eq(school_id));
        if let Some(year) = academic_year_id {
            select = select.filter(class_groups::Column::AcademicYearId.eq(year));
        }

        let rows = select
            .order_by_asc(class_groups::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询教学班列表"))?;

        Ok(rows.into_iter().map(|m| m.into_class_group()).collect())
    }

    pub async fn get_class_group_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<ClassGroup>> {
        let row = ClassGroups::find_by_id(id)
            .filter(class_groups::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询教学班"))?;

        Ok(row.map(|m| m.into_class_group()))
    }

    pub async fn create_class_group_impl(
        &self,
        school_id: i64,
        group: NewClassGroup,
    ) -> Result<ClassGroup> {
        let model = ClassGroupActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(group.academic_year_id),
            grade_level_id: Set(group.grade_level_id),
            name: Set(group.name),
            homeroom_teacher_id: Set(group.homeroom_teacher_id),
            capacity: Set(group.capacity),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "Rombel dengan nama ini sudah ada", "创建教学班"))?;

        Ok(result.into_class_group())
    }

    pub async fn delete_class_group_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = ClassGroups::delete_many()
            .filter(class_groups::Column::Id.eq(id))
            .filter(class_groups::Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除教学班"))?;

        Ok(result.rows_affected > 0)
    }

    /// 班内在读学生
    pub async fn list_enrolled_students_impl(
        &self,
        school_id: i64,
        class_group_id: i64,
    ) -> Result<Vec<EnrolledStudent>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::SchoolId.eq(school_id))
            .filter(enrollments::Column::ClassGroupId.eq(class_group_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .find_also_related(Students)
            .order_by_asc(students::Column::FullName)
            .all(&self.db)
            .await
            .map_err(db_error("查询班级学生"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, student)| {
                student.map(|s| EnrolledStudent {
                    enrollment_id: enrollment.id,
                    student_id: s.id,
                    full_name: s.full_name,
                    nisn: s.nisn,
                    photo_url: s.photo_url,
                })
            })
            .collect())
    }

    pub async fn count_active_enrollments_impl(
        &self,
        school_id: i64,
        class_group_id: i64,
    ) -> Result<u64> {
        Enrollments::find()
            .filter(enrollments::Column::SchoolId.eq(school_id))
            .filter(enrollments::Column::ClassGroupId.eq(class_group_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("统计班级人数"))
    }

    pub async fn create_enrollment_impl(
        &self,
        school_id: i64,
        class_group_id: i64,
        student_id: i64,
        enrollment_date: String,
    ) -> Result<Enrollment> {
        let model = EnrollmentActiveModel {
            school_id: Set(school_id),
            student_id: Set(student_id),
            class_group_id: Set(class_group_id),
            enrollment_date: Set(enrollment_date),
            status: Set(EnrollmentStatus::Active.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            write_error(e, "Siswa sudah terdaftar di rombel ini", "添加分班")
        })?;

        Ok(result.into_enrollment())
    }

    pub async fn delete_enrollment_impl(
        &self,
        school_id: i64,
        class_group_id: i64,
        enrollment_id: i64,
    ) -> Result<bool> {
        let result = Enrollments::delete_many()
            .filter(enrollments::Column::Id.eq(enrollment_id))
            .filter(enrollments::Column::ClassGroupId.eq(class_group_id))
            .filter(enrollments::Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("移除分班"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_teaching_assignments_impl(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<TeachingAssignment>> {
        let mut select = TeachingAssignments::find()
            .filter(teaching_assignments::Column::SchoolId.eq(school_id));
        if let Some(year) = academic_year_id {
            select = select.filter(teaching_assignments::Column::AcademicYearId.eq(year));
        }

        let rows = select
            .order_by_asc(teaching_assignments::Column::ClassGroupId)
            .order_by_asc(teaching_assignments::Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(db_error("查询任课列表"))?;

        Ok(rows.into_iter().map(|m| m.into_teaching_assignment()).collect())
    }

    pub async fn get_teaching_assignment_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<TeachingAssignment>> {
        let row = TeachingAssignments::find_by_id(id)
            .filter(teaching_assignments::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询任课"))?;

        Ok(row.map(|m| m.into_teaching_assignment()))
    }

    pub async fn create_teaching_assignment_impl(
        &self,
        school_id: i64,
        assignment: NewTeachingAssignment,
    ) -> Result<TeachingAssignment> {
        let model = TeachingAssignmentActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(assignment.academic_year_id),
            teacher_id: Set(assignment.teacher_id),
            subject_id: Set(assignment.subject_id),
            class_group_id: Set(assignment.class_group_id),
            hours_per_week: Set(assignment.hours_per_week),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建任课"))?;

        Ok(result.into_teaching_assignment())
    }

    pub async fn delete_teaching_assignment_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = TeachingAssignments::delete_many()
            .filter(teaching_assignments::Column::Id.eq(id))
            .filter(teaching_assignments::Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除任课"))?;

        Ok(result.rows_affected > 0)
    }

    /// 课表，按星期、开始时间排序
    pub async fn list_schedules_impl(
        &self,
        school_id: i64,
        class_group_id: Option<i64>,
    ) -> Result<Vec<Schedule>> {
        let mut select = Schedules::find().filter(schedules::Column::SchoolId.eq(school_id));
        if let Some(group) = class_group_id {
            select = select
                .inner_join(TeachingAssignments)
                .filter(teaching_assignments::Column::ClassGroupId.eq(group));
        }

        let rows = select
            .order_by_asc(schedules::Column::DayOfWeek)
            .order_by_asc(schedules::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_error("查询课表"))?;

        Ok(rows.into_iter().map(|m| m.into_schedule()).collect())
    }

    pub async fn create_schedule_impl(
        &self,
        school_id: i64,
        schedule: NewSchedule,
    ) -> Result<Schedule> {
        let model = ScheduleActiveModel {
            school_id: Set(school_id),
            teaching_assignment_id: Set(schedule.teaching_assignment_id),
            day_of_week: Set(schedule.day_of_week),
            start_time: Set(schedule.start_time),
            end_time: Set(schedule.end_time),
            room: Set(schedule.room),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建课表"))?;

        Ok(result.into_schedule())
    }

    pub async fn delete_schedule_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Schedules::delete_many()
            .filter(schedules::Column::Id.eq(id))
            .filter(schedules::Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除课表"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        create_class_setup, create_school, create_subject, student_record,
    };
    use super::*;
    use crate::errors::SISystemError;
    use crate::models::staff::{StaffRecord, StaffStatus};
    use crate::models::students::entities::Gender;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let (_, group) = create_class_setup(&storage, school, 30).await;
        let student = storage
            .create_student(school, student_record("001", "Ahmad", 2024))
            .await
            .unwrap();

        storage
            .create_enrollment(school, group, student.id, "2024-07-15".into())
            .await
            .unwrap();
        let err = storage
            .create_enrollment(school, group, student.id, "2024-07-16".into())
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));

        assert_eq!(storage.count_active_enrollments(school, group).await.unwrap(), 1);
        let students = storage.list_enrolled_students(school, group).await.unwrap();
        assert_eq!(students[0].full_name, "Ahmad");

        assert!(
            storage
                .delete_enrollment(school, group, students[0].enrollment_id)
                .await
                .unwrap()
        );
        assert_eq!(storage.count_active_enrollments(school, group).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_schedules_filtered_by_class_and_sorted() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let (year, group) = create_class_setup(&storage, school, 30).await;
        let subject = create_subject(&storage, school, "MTK").await;
        let teacher = storage
            .create_staff(
                school,
                StaffRecord {
                    nip: None,
                    full_name: "Pak Guru".into(),
                    gender: Gender::Male,
                    position_id: None,
                    email: None,
                    phone: None,
                    address: None,
                    photo_url: None,
                    join_date: "2019-07-01".into(),
                    status: StaffStatus::Active,
                },
            )
            .await
            .unwrap();
        let assignment = storage
            .create_teaching_assignment(
                school,
                NewTeachingAssignment {
                    academic_year_id: year,
                    teacher_id: teacher.id,
                    subject_id: subject,
                    class_group_id: group,
                    hours_per_week: 4,
                },
            )
            .await
            .unwrap();

        for (day, start, end) in [
            (3, "08:00", "09:30"),
            (1, "10:00", "11:00"),
            (1, "07:00", "08:00"),
        ] {
            storage
                .create_schedule(
                    school,
                    NewSchedule {
                        teaching_assignment_id: assignment.id,
                        day_of_week: day,
                        start_time: start.into(),
                        end_time: end.into(),
                        room: None,
                    },
                )
                .await
                .unwrap();
        }

        let list = storage.list_schedules(school, Some(group)).await.unwrap();
        let order: Vec<_> = list
            .iter()
            .map(|s| (s.day_of_week, s.start_time.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "07:00"), (1, "10:00"), (3, "08:00")]);
        assert!(storage.list_schedules(school, Some(group + 1)).await.unwrap().is_empty());

        let assignments = storage.list_teaching_assignments(school, Some(year)).await.unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].hours_per_week, 4);
    }
}
