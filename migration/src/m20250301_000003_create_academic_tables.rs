use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 课程编排 ====================
        manager
            .create_table(
                Table::create()
                    .table(ClassGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassGroups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassGroups::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ClassGroups::AcademicYearId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassGroups::GradeLevelId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassGroups::Name).string().not_null())
                    .col(
                        ColumnDef::new(ClassGroups::HomeroomTeacherId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassGroups::Capacity)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(ClassGroups::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassGroups::Table, ClassGroups::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassGroups::Table, ClassGroups::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassGroups::Table, ClassGroups::GradeLevelId)
                            .to(GradeLevels::Table, GradeLevels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassGroups::Table, ClassGroups::HomeroomTeacherId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::ClassGroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentDate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Enrollments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::ClassGroupId)
                            .to(ClassGroups::Table, ClassGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeachingAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeachingAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::AcademicYearId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::ClassGroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::HoursPerWeek)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(
                        ColumnDef::new(TeachingAssignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeachingAssignments::Table, TeachingAssignments::TeacherId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeachingAssignments::Table, TeachingAssignments::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TeachingAssignments::Table,
                                TeachingAssignments::ClassGroupId,
                            )
                            .to(ClassGroups::Table, ClassGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Schedules::TeachingAssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Schedules::DayOfWeek).integer().not_null())
                    .col(ColumnDef::new(Schedules::StartTime).string().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).string().not_null())
                    .col(ColumnDef::new(Schedules::Room).string().null())
                    .col(ColumnDef::new(Schedules::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Schedules::Table, Schedules::TeachingAssignmentId)
                            .to(TeachingAssignments::Table, TeachingAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考勤 ====================
        manager
            .create_table(
                Table::create()
                    .table(StudentAttendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentAttendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::ClassGroupId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(StudentAttendance::Date).string().not_null())
                    .col(ColumnDef::new(StudentAttendance::Status).string().not_null())
                    .col(ColumnDef::new(StudentAttendance::CheckInTime).string().null())
                    .col(
                        ColumnDef::new(StudentAttendance::CheckOutTime)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(StudentAttendance::Notes).text().null())
                    .col(
                        ColumnDef::new(StudentAttendance::RecordedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAttendance::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentAttendance::Table, StudentAttendance::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StaffAttendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffAttendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StaffAttendance::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffAttendance::StaffId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StaffAttendance::Date).string().not_null())
                    .col(ColumnDef::new(StaffAttendance::Status).string().not_null())
                    .col(ColumnDef::new(StaffAttendance::CheckInTime).string().null())
                    .col(ColumnDef::new(StaffAttendance::CheckOutTime).string().null())
                    .col(ColumnDef::new(StaffAttendance::Notes).text().null())
                    .col(
                        ColumnDef::new(StaffAttendance::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffAttendance::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StaffAttendance::Table, StaffAttendance::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 成绩与成绩单 ====================
        manager
            .create_table(
                Table::create()
                    .table(StudentGrades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentGrades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentGrades::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(StudentGrades::AcademicYearId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentGrades::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(StudentGrades::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentGrades::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentGrades::Score).double().null())
                    .col(ColumnDef::new(StudentGrades::Predicate).string().null())
                    .col(ColumnDef::new(StudentGrades::Description).text().null())
                    .col(ColumnDef::new(StudentGrades::RecordedBy).big_integer().null())
                    .col(
                        ColumnDef::new(StudentGrades::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentGrades::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentGrades::Table, StudentGrades::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentGrades::Table, StudentGrades::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReportCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportCards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportCards::SchoolId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ReportCards::AcademicYearId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReportCards::Semester).integer().not_null())
                    .col(ColumnDef::new(ReportCards::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ReportCards::ClassGroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportCards::TotalSickDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ReportCards::TotalPermittedDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ReportCards::TotalAbsentDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ReportCards::ClassRank).integer().null())
                    .col(ColumnDef::new(ReportCards::HomeroomNotes).text().null())
                    .col(ColumnDef::new(ReportCards::PrincipalNotes).text().null())
                    .col(
                        ColumnDef::new(ReportCards::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(ReportCards::FinalizedAt).big_integer().null())
                    .col(ColumnDef::new(ReportCards::FinalizedBy).big_integer().null())
                    .col(ColumnDef::new(ReportCards::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ReportCards::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReportCards::Table, ReportCards::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束（upsert 冲突目标）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_enrollments_student_class")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassGroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_student_attendance_student_date")
                    .table(StudentAttendance::Table)
                    .col(StudentAttendance::StudentId)
                    .col(StudentAttendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_staff_attendance_staff_date")
                    .table(StaffAttendance::Table)
                    .col(StaffAttendance::StaffId)
                    .col(StaffAttendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_student_grades_student_subject_term")
                    .table(StudentGrades::Table)
                    .col(StudentGrades::StudentId)
                    .col(StudentGrades::SubjectId)
                    .col(StudentGrades::AcademicYearId)
                    .col(StudentGrades::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_report_cards_student_term")
                    .table(ReportCards::Table)
                    .col(ReportCards::StudentId)
                    .col(ReportCards::AcademicYearId)
                    .col(ReportCards::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_attendance_school_date")
                    .table(StudentAttendance::Table)
                    .col(StudentAttendance::SchoolId)
                    .col(StudentAttendance::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staff_attendance_school_date")
                    .table(StaffAttendance::Table)
                    .col(StaffAttendance::SchoolId)
                    .col(StaffAttendance::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_groups_school_year")
                    .table(ClassGroups::Table)
                    .col(ClassGroups::SchoolId)
                    .col(ClassGroups::AcademicYearId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentGrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StaffAttendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentAttendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeachingAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassGroups::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AcademicYears {
    #[sea_orm(iden = "academic_years")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum GradeLevels {
    #[sea_orm(iden = "grade_levels")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Staff {
    #[sea_orm(iden = "staff")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ClassGroups {
    #[sea_orm(iden = "class_groups")]
    Table,
    Id,
    SchoolId,
    AcademicYearId,
    GradeLevelId,
    Name,
    HomeroomTeacherId,
    Capacity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    SchoolId,
    StudentId,
    ClassGroupId,
    EnrollmentDate,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeachingAssignments {
    #[sea_orm(iden = "teaching_assignments")]
    Table,
    Id,
    SchoolId,
    AcademicYearId,
    TeacherId,
    SubjectId,
    ClassGroupId,
    HoursPerWeek,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Schedules {
    #[sea_orm(iden = "schedules")]
    Table,
    Id,
    SchoolId,
    TeachingAssignmentId,
    DayOfWeek,
    StartTime,
    EndTime,
    Room,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudentAttendance {
    #[sea_orm(iden = "student_attendance")]
    Table,
    Id,
    SchoolId,
    StudentId,
    ClassGroupId,
    Date,
    Status,
    CheckInTime,
    CheckOutTime,
    Notes,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StaffAttendance {
    #[sea_orm(iden = "staff_attendance")]
    Table,
    Id,
    SchoolId,
    StaffId,
    Date,
    Status,
    CheckInTime,
    CheckOutTime,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentGrades {
    #[sea_orm(iden = "student_grades")]
    Table,
    Id,
    SchoolId,
    AcademicYearId,
    Semester,
    StudentId,
    SubjectId,
    Score,
    Predicate,
    Description,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ReportCards {
    #[sea_orm(iden = "report_cards")]
    Table,
    Id,
    SchoolId,
    AcademicYearId,
    Semester,
    StudentId,
    ClassGroupId,
    TotalSickDays,
    TotalPermittedDays,
    TotalAbsentDays,
    ClassRank,
    HomeroomNotes,
    PrincipalNotes,
    Status,
    FinalizedAt,
    FinalizedBy,
    CreatedAt,
    UpdatedAt,
}
