//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod curriculum;
mod dashboard;
mod grades;
mod letters;
mod master_data;
mod registrations;
mod schools;
mod staff;
mod students;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{Result, SISystemError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 测试用内存数据库（单连接，保证所有查询落在同一个库上）
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SISystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SISystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    /// 底层连接，身份提供方与存储层共用
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| SISystemError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SISystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SISystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SISystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SISystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写入错误转换：唯一约束冲突转为 Conflict（消息面向用户），其余为数据库错误
pub(crate) fn write_error(err: DbErr, conflict_message: &str, operation: &str) -> SISystemError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => SISystemError::conflict(conflict_message),
        _ => SISystemError::database_operation(format!("{operation}失败: {err}")),
    }
}

pub(crate) fn db_error(operation: &str) -> impl Fn(DbErr) -> SISystemError + '_ {
    move |e| SISystemError::database_operation(format!("{operation}失败: {e}"))
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学校（租户）
    async fn get_school(&self, school_id: i64) -> Result<Option<School>> {
        self.get_school_impl(school_id).await
    }

    async fn update_school(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        self.update_school_impl(school_id, update).await
    }

    async fn provision_tenant(
        &self,
        registration_id: i64,
        school: NewSchool,
        profile: NewUserProfile,
    ) -> Result<School> {
        self.provision_tenant_impl(registration_id, school, profile).await
    }

    // 注册申请
    async fn create_registration(
        &self,
        registration: NewRegistration,
    ) -> Result<PendingRegistration> {
        self.create_registration_impl(registration).await
    }

    async fn get_registration(
        &self,
        lookup: RegistrationLookup,
    ) -> Result<Option<PendingRegistration>> {
        self.get_registration_impl(lookup).await
    }

    async fn list_registrations(
        &self,
        page: u64,
        size: u64,
        status: Option<RegistrationStatus>,
    ) -> Result<RegistrationListResponse> {
        self.list_registrations_impl(page, size, status).await
    }

    async fn has_pending_registration(&self, email: &str) -> Result<bool> {
        self.has_pending_registration_impl(email).await
    }

    async fn reject_registration(&self, id: i64) -> Result<bool> {
        self.reject_registration_impl(id).await
    }

    // 用户资料
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn create_user_profile(&self, profile: NewUserProfile) -> Result<User> {
        self.create_user_profile_impl(profile).await
    }

    async fn list_users(&self, school_id: i64, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_impl(school_id, query).await
    }

    async fn update_user_role(
        &self,
        school_id: i64,
        id: i64,
        role: UserRole,
    ) -> Result<Option<User>> {
        self.update_user_role_impl(school_id, id, role).await
    }

    async fn update_user_status(
        &self,
        school_id: i64,
        id: i64,
        is_active: bool,
    ) -> Result<Option<User>> {
        self.update_user_status_impl(school_id, id, is_active).await
    }

    async fn delete_user(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_user_impl(school_id, id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn clear_must_change_password(&self, id: i64) -> Result<bool> {
        self.clear_must_change_password_impl(id).await
    }

    // 学生
    async fn list_students(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_impl(school_id, query).await
    }

    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        self.get_student_impl(school_id, id).await
    }

    async fn create_student(&self, school_id: i64, student: StudentRecord) -> Result<Student> {
        self.create_student_impl(school_id, student).await
    }

    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        student: StudentRecord,
    ) -> Result<Option<Student>> {
        self.update_student_impl(school_id, id, student).await
    }

    async fn delete_student(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_student_impl(school_id, id).await
    }

    async fn count_graduation_candidates(
        &self,
        school_id: i64,
        admission_year_limit: i32,
    ) -> Result<u64> {
        self.count_graduation_candidates_impl(school_id, admission_year_limit).await
    }

    async fn graduate_students(&self, school_id: i64, admission_year_limit: i32) -> Result<u64> {
        self.graduate_students_impl(school_id, admission_year_limit).await
    }

    // 教职工与职位
    async fn list_staff(&self, school_id: i64) -> Result<Vec<Staff>> {
        self.list_staff_impl(school_id).await
    }

    async fn get_staff(&self, school_id: i64, id: i64) -> Result<Option<Staff>> {
        self.get_staff_impl(school_id, id).await
    }

    async fn create_staff(&self, school_id: i64, staff: StaffRecord) -> Result<Staff> {
        self.create_staff_impl(school_id, staff).await
    }

    async fn update_staff(
        &self,
        school_id: i64,
        id: i64,
        staff: StaffRecord,
    ) -> Result<Option<Staff>> {
        self.update_staff_impl(school_id, id, staff).await
    }

    async fn delete_staff(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_staff_impl(school_id, id).await
    }

    async fn list_positions(&self, school_id: i64) -> Result<Vec<Position>> {
        self.list_positions_impl(school_id).await
    }

    async fn get_position(&self, school_id: i64, id: i64) -> Result<Option<Position>> {
        self.get_position_impl(school_id, id).await
    }

    // 公文
    async fn list_letters(&self, school_id: i64) -> Result<Vec<Letter>> {
        self.list_letters_impl(school_id).await
    }

    async fn create_letter(&self, school_id: i64, letter: CreateLetterRequest) -> Result<Letter> {
        self.create_letter_impl(school_id, letter).await
    }

    async fn delete_letter(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_letter_impl(school_id, id).await
    }

    // 只读主数据
    async fn list_academic_years(&self, school_id: i64) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl(school_id).await
    }

    async fn get_academic_year(&self, school_id: i64, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_impl(school_id, id).await
    }

    async fn get_active_academic_year(&self, school_id: i64) -> Result<Option<AcademicYear>> {
        self.get_active_academic_year_impl(school_id).await
    }

    async fn list_grade_levels(&self, school_id: i64) -> Result<Vec<GradeLevel>> {
        self.list_grade_levels_impl(school_id).await
    }

    async fn get_grade_level(&self, school_id: i64, id: i64) -> Result<Option<GradeLevel>> {
        self.get_grade_level_impl(school_id, id).await
    }

    async fn list_subjects(&self, school_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_impl(school_id).await
    }

    async fn get_subject(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        self.get_subject_impl(school_id, id).await
    }

    // 教学班与分班
    async fn list_class_groups(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<ClassGroup>> {
        self.list_class_groups_impl(school_id, academic_year_id).await
    }

    async fn get_class_group(&self, school_id: i64, id: i64) -> Result<Option<ClassGroup>> {
        self.get_class_group_impl(school_id, id).await
    }

    async fn create_class_group(&self, school_id: i64, group: NewClassGroup) -> Result<ClassGroup> {
        self.create_class_group_impl(school_id, group).await
    }

    async fn delete_class_group(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_class_group_impl(school_id, id).await
    }

    async fn list_enrolled_students(
        &self,
        school_id: i64,
        class_group_id: i64,
    ) -> Result<Vec<EnrolledStudent>> {
        self.list_enrolled_students_impl(school_id, class_group_id).await
    }

    async fn count_active_enrollments(&self, school_id: i64, class_group_id: i64) -> Result<u64> {
        self.count_active_enrollments_impl(school_id, class_group_id).await
    }

    async fn create_enrollment(
        &self,
        school_id: i64,
        class_group_id: i64,
        student_id: i64,
        enrollment_date: String,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(school_id, class_group_id, student_id, enrollment_date).await
    }

    async fn delete_enrollment(
        &self,
        school_id: i64,
        class_group_id: i64,
        enrollment_id: i64,
    ) -> Result<bool> {
        self.delete_enrollment_impl(school_id, class_group_id, enrollment_id).await
    }

    // 任课与课表
    async fn list_teaching_assignments(
        &self,
        school_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<TeachingAssignment>> {
        self.list_teaching_assignments_impl(school_id, academic_year_id).await
    }

    async fn get_teaching_assignment(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<TeachingAssignment>> {
        self.get_teaching_assignment_impl(school_id, id).await
    }

    async fn create_teaching_assignment(
        &self,
        school_id: i64,
        assignment: NewTeachingAssignment,
    ) -> Result<TeachingAssignment> {
        self.create_teaching_assignment_impl(school_id, assignment).await
    }

    async fn delete_teaching_assignment(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_teaching_assignment_impl(school_id, id).await
    }

    async fn list_schedules(
        &self,
        school_id: i64,
        class_group_id: Option<i64>,
    ) -> Result<Vec<Schedule>> {
        self.list_schedules_impl(school_id, class_group_id).await
    }

    async fn create_schedule(&self, school_id: i64, schedule: NewSchedule) -> Result<Schedule> {
        self.create_schedule_impl(school_id, schedule).await
    }

    async fn delete_schedule(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_schedule_impl(school_id, id).await
    }

    // 考勤
    async fn list_student_attendance_by_date(
        &self,
        school_id: i64,
        date: &str,
        class_group_id: Option<i64>,
    ) -> Result<Vec<StudentAttendance>> {
        self.list_student_attendance_by_date_impl(school_id, date, class_group_id).await
    }

    async fn list_student_attendance_in_range(
        &self,
        school_id: i64,
        student_id: Option<i64>,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<StudentAttendance>> {
        self.list_student_attendance_in_range_impl(school_id, student_id, start_date, end_date)
            .await
    }

    async fn upsert_student_attendance(
        &self,
        school_id: i64,
        records: Vec<StudentAttendanceUpsert>,
    ) -> Result<u64> {
        self.upsert_student_attendance_impl(school_id, records).await
    }

    async fn list_staff_attendance_by_date(
        &self,
        school_id: i64,
        date: &str,
    ) -> Result<Vec<StaffAttendance>> {
        self.list_staff_attendance_by_date_impl(school_id, date).await
    }

    async fn list_staff_attendance_in_range(
        &self,
        school_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<StaffAttendance>> {
        self.list_staff_attendance_in_range_impl(school_id, start_date, end_date).await
    }

    async fn upsert_staff_attendance(
        &self,
        school_id: i64,
        record: RecordStaffAttendanceRequest,
    ) -> Result<StaffAttendance> {
        self.upsert_staff_attendance_impl(school_id, record).await
    }

    // 成绩与成绩单
    async fn list_student_grades(
        &self,
        school_id: i64,
        student_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<StudentGrade>> {
        self.list_student_grades_impl(school_id, student_id, academic_year_id, semester).await
    }

    async fn list_class_grades(
        &self,
        school_id: i64,
        class_group_id: i64,
        subject_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<ClassGradeRow>> {
        self.list_class_grades_impl(
            school_id,
            class_group_id,
            subject_id,
            academic_year_id,
            semester,
        )
        .await
    }

    async fn update_grade(
        &self,
        school_id: i64,
        id: i64,
        grade: GradeUpsert,
    ) -> Result<Option<StudentGrade>> {
        self.update_grade_impl(school_id, id, grade).await
    }

    async fn upsert_grade(&self, school_id: i64, grade: GradeUpsert) -> Result<StudentGrade> {
        self.upsert_grade_impl(school_id, grade).await
    }

    async fn upsert_grades(&self, school_id: i64, grades: Vec<GradeUpsert>) -> Result<u64> {
        self.upsert_grades_impl(school_id, grades).await
    }

    async fn list_report_cards(
        &self,
        school_id: i64,
        class_group_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Vec<ReportCard>> {
        self.list_report_cards_impl(school_id, class_group_id, academic_year_id, semester).await
    }

    async fn get_report_card(
        &self,
        school_id: i64,
        student_id: i64,
        academic_year_id: i64,
        semester: i32,
    ) -> Result<Option<ReportCard>> {
        self.get_report_card_impl(school_id, student_id, academic_year_id, semester).await
    }

    async fn upsert_report_card(
        &self,
        school_id: i64,
        card: ReportCardUpsert,
    ) -> Result<ReportCard> {
        self.upsert_report_card_impl(school_id, card).await
    }

    async fn finalize_report_card(
        &self,
        school_id: i64,
        id: i64,
        finalized_by: i64,
    ) -> Result<Option<ReportCard>> {
        self.finalize_report_card_impl(school_id, id, finalized_by).await
    }

    // 仪表盘
    async fn dashboard_stats(&self, school_id: i64) -> Result<DashboardStats> {
        self.dashboard_stats_impl(school_id).await
    }

    async fn recent_activities(&self, school_id: i64, limit: u64) -> Result<Vec<RecentActivity>> {
        self.recent_activities_impl(school_id, limit).await
    }
}
