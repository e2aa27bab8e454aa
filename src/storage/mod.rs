use std::sync::Arc;

use crate::models::{
    attendance::{
        RecordStaffAttendanceRequest, StaffAttendance, StudentAttendance, StudentAttendanceUpsert,
    },
    curriculum::{
        entities::{
            AcademicYear, ClassGroup, EnrolledStudent, Enrollment, GradeLevel, Schedule, Subject,
            TeachingAssignment,
        },
        requests::{NewClassGroup, NewSchedule, NewTeachingAssignment},
    },
    dashboard::{DashboardStats, RecentActivity},
    grades::{ClassGradeRow, GradeUpsert, ReportCard, ReportCardUpsert, StudentGrade},
    letters::{CreateLetterRequest, Letter},
    registrations::{
        entities::{PendingRegistration, RegistrationLookup, RegistrationStatus},
        requests::NewRegistration,
        responses::RegistrationListResponse,
    },
    schools::{NewSchool, School, UpdateSchoolRequest},
    staff::{Position, Staff, StaffRecord},
    students::{
        entities::Student,
        requests::{StudentListQuery, StudentRecord},
        responses::StudentListResponse,
    },
    users::{
        entities::{User, UserRole},
        requests::{NewUserProfile, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;
use crate::identity::{DatabaseIdentityProvider, IdentityProvider};

pub mod sea_orm_storage;

/// 存储层
///
/// 除平台级操作（学校开通、注册申请、登录相关）外，所有方法的第一个参数都是
/// `school_id`，查询和写入都会带上该条件，跨租户的记录表现为不存在。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学校（租户）
    async fn get_school(&self, school_id: i64) -> Result<Option<School>>;
    async fn update_school(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>>;
    // 在同一事务中创建学校、写入管理员资料并把申请标记为 approved
    async fn provision_tenant(
        &self,
        registration_id: i64,
        school: NewSchool,
        profile: NewUserProfile,
    ) -> Result<School>;

    /// 注册申请
    async fn create_registration(&self, registration: NewRegistration)
    -> Result<PendingRegistration>;
    async fn get_registration(
        &self,
        lookup: RegistrationLookup,
    ) -> Result<Option<PendingRegistration>>;
    async fn list_registrations(
        &self,
        page: u64,
        size: u64,
        status: Option<RegistrationStatus>,
    ) -> Result<RegistrationListResponse>;
    async fn has_pending_registration(&self, email: &str) -> Result<bool>;
    // 仅 pending 状态会被更新，返回是否更新成功
    async fn reject_registration(&self, id: i64) -> Result<bool>;

    /// 用户资料
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn count_users(&self) -> Result<u64>;
    async fn create_user_profile(&self, profile: NewUserProfile) -> Result<User>;
    async fn list_users(&self, school_id: i64, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user_role(
        &self,
        school_id: i64,
        id: i64,
        role: UserRole,
    ) -> Result<Option<User>>;
    async fn update_user_status(
        &self,
        school_id: i64,
        id: i64,
        is_active: bool,
    ) -> Result<Option<User>>;
    async fn delete_user(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn clear_must_change_password(&self, id: i64) -> Result<bool>;

    /// 学生
    async fn list_students(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>>;
    async fn create_student(&self, school_id: i64, student: StudentRecord) -> Result<Student>;
    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        student: StudentRecord,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn count_graduation_candidates(
        &self,
        school_id: i64,
        admission_year_limit: i32,
    ) -> Result<u64>;
    // 批量转为 graduated，返回受影响人数
    async fn graduate_students(&self, school_id: i64, admission_year_limit: i32) -> Result<u64>;

    /// 教职工与职位
    async fn list_staff(&self, school_id: i64) -> Result<Vec<Staff>>;
    async fn get_staff(&self, school_id: i64, id: i64) -> Result<Option<Staff>>;
    async fn create_staff(&self, school_id: i64, staff: StaffRecord) -> Result<Staff>;
    async fn update_staff(
        &self,
        school_id: i64,
        id: i64,
        staff: StaffRecord,
    ) -> Result<Option<Staff>>;
    async fn delete_staff(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn list_positions(&self, school_id: i64) -> Result<Vec<Position>>;
    async fn get_position(&self, school_id: i64, id: i64) -> Result<Option<Position>>;

    /// 公文
    async fn list_letters(&self, school_id: i64) -> Result<Vec<Letter>>;
    async fn create_letter(&self, school_id: i64, letter: CreateLetterRequest) -> Result<Letter>;
    async fn delete_letter(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 只读主数据
    async fn list_academic_years(&self, school_id: i64) -> Result<Vec<AcademicYear>>;
    async fn get_academic_year(&self, school_id: i64, id: i64) -> Result<Option<AcademicYear>>;
    async fn get_active_academic_year(&self, school_id: i64) -> Result<Option<AcademicYear>>;
    async fn list_grade_levels(&self, school_id: i64) -> Result<Vec<GradeLevel>>;
    async fn get_grade_level(&self, school_id: i64, id: i64) -> Result<Option<GradeLevel>>;
    async fn list_subjects(&self, school_id: i64) -> Result<Vec<Subject>>;
    async fn get_subject(&self, school_id: i64, id: i64) -> Result<Option<Subject>>;

    /// 教学班与分班
    async fn list_class_groups(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<ClassGroup>>;
    async fn get_class_group(&self, school_id: i64, id: i64) -> Result<Option<ClassGroup>>;
    async fn create_class_group(&self, school_id: i64, group: NewClassGroup)
    -> Result<ClassGroup>;
    async fn delete_class_group(&self, school_id: i64, id: i64) -> Result<bool>;
    // 班内在读学生，按姓名排序
    async fn list_enrolled_students(
        &self,
        school_id: i64,
        class_group_id: i64,
    ) -> Result<Vec<EnrolledStudent>>;
    async fn count_active_enrollments(&self, school_id: i64, class_group_id: i64) -> Result<u64>;
    // 同一学生重复加入同一班级返回 Conflict
    async fn create_enrollment(
        &self,
        school_id: i64,
        class_group_id: i64,
        student_id: i64,
        enrollment_date: String,
    ) -> Result<Enrollment>;
    async fn delete_enrollment(
        &self,
        school_id: i64,
        class_group_id: i64,
        enrollment_id: i64,
    ) -> Result<bool>;

    /// 任课与课表
    async fn list_teaching_assignments(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<TeachingAssignment>>;
    async fn get_teaching_assignment(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<TeachingAssignment>>;
    async fn create_teaching_assignment(
        &self,
        school_id: i64,
        assignment: NewTeachingAssignment,
    ) -> Result<TeachingAssignment>;
    async fn delete_teaching_assignment(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn list_schedules(
        &self,
        school_id: i64,
        class_group_id: Option<i64>,
    ) -> Result<Vec<Schedule>>;
    async fn create_schedule(&self, school_id: i64, schedule: NewSchedule) -> Result<Schedule>;
    async fn delete_schedule(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 考勤
    async fn list_student_attendance_by_date(
        &self,
        school_id: i64,
        date: &str,
        class_group_id: Option<i64>,
    ) -> Result<Vec<StudentAttendance>>;
    // student_id 为空时返回全校记录
    async fn list_student_attendance_in_range(
        &self,
        school_id: i64,
        student_id: Option<i64>,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<StudentAttendance>>;
    // 按 (student_id, date) 覆盖写入，整批在一个事务中
    async fn upsert_student_attendance(
        &self,
        school_id: i64,
        records: Vec<StudentAttendanceUpsert>,
    ) -> Result<u64>;
    async fn list_staff_attendance_by_date(
        &self,
        school_id: i64,
        date: &str,
    ) -> Result<Vec<StaffAttendance>>;
    async fn list_staff_attendance_in_range(
        &self,
        school_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<StaffAttendance>>;
    async fn upsert_staff_attendance(
        &self,
        school_id: i64,
        record: RecordStaffAttendanceRequest,
    ) -> Result<StaffAttendance>;

    /// 成绩与成绩单
    async fn list_student_grades(
        &self,
        school_id: i64,
        student_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<StudentGrade>>;
    async fn list_class_grades(
        &self,
        school_id: i64,
        class_group_id: i64,
        subject_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<ClassGradeRow>>;
    async fn update_grade(
        &self,
        school_id: i64,
        id: i64,
        grade: GradeUpsert,
    ) -> Result<Option<StudentGrade>>;
    async fn upsert_grade(&self, school_id: i64, grade: GradeUpsert) -> Result<StudentGrade>;
    async fn upsert_grades(&self, school_id: i64, grades: Vec<GradeUpsert>) -> Result<u64>;
    async fn list_report_cards(
        &self,
        school_id: i64,
        class_group_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<ReportCard>>;
    async fn get_report_card(
        &self,
        school_id: i64,
        student_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Option<ReportCard>>;
    async fn upsert_report_card(&self, school_id: i64, card: ReportCardUpsert)
    -> Result<ReportCard>;
    async fn finalize_report_card(
        &self,
        school_id: i64,
        id: i64,
        finalized_by: i64,
    ) -> Result<Option<ReportCard>>;

    /// 仪表盘
    async fn dashboard_stats(&self, school_id: i64) -> Result<DashboardStats>;
    async fn recent_activities(&self, school_id: i64, limit: u64) -> Result<Vec<RecentActivity>>;
}

/// 创建存储层，以及共用同一连接池的本地身份提供方
pub async fn create_storage() -> Result<(Arc<dyn Storage>, Arc<dyn IdentityProvider>)> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    let identity = DatabaseIdentityProvider::new(storage.connection().clone());
    Ok((Arc::new(storage), Arc::new(identity)))
}
