use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 主数据 ====================
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicYears::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicYears::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicYears::Name).string().not_null())
                    .col(ColumnDef::new(AcademicYears::StartDate).string().not_null())
                    .col(ColumnDef::new(AcademicYears::EndDate).string().not_null())
                    .col(
                        ColumnDef::new(AcademicYears::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AcademicYears::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicYears::Table, AcademicYears::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GradeLevels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeLevels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradeLevels::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(GradeLevels::Name).string().not_null())
                    .col(
                        ColumnDef::new(GradeLevels::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(GradeLevels::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeLevels::Table, GradeLevels::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Positions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Positions::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Positions::Name).string().not_null())
                    .col(ColumnDef::new(Positions::Description).text().null())
                    .col(ColumnDef::new(Positions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Positions::Table, Positions::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 学生 ====================
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Students::Nisn).string().not_null())
                    .col(ColumnDef::new(Students::Nis).string().not_null())
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(ColumnDef::new(Students::BirthDate).string().not_null())
                    .col(ColumnDef::new(Students::BirthPlace).string().not_null())
                    .col(ColumnDef::new(Students::Gender).string().not_null())
                    .col(ColumnDef::new(Students::Religion).string().not_null())
                    .col(ColumnDef::new(Students::Address).text().null())
                    .col(ColumnDef::new(Students::Phone).string().null())
                    .col(ColumnDef::new(Students::PhotoUrl).string().null())
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .col(ColumnDef::new(Students::AdmissionYear).integer().not_null())
                    .col(ColumnDef::new(Students::EnrollmentType).string().not_null())
                    .col(ColumnDef::new(Students::Nik).string().null())
                    .col(ColumnDef::new(Students::ParentType).string().not_null())
                    .col(ColumnDef::new(Students::FatherName).string().null())
                    .col(ColumnDef::new(Students::FatherPhone).string().null())
                    .col(ColumnDef::new(Students::MotherName).string().null())
                    .col(ColumnDef::new(Students::MotherPhone).string().null())
                    .col(ColumnDef::new(Students::GuardianName).string().null())
                    .col(ColumnDef::new(Students::GuardianPhone).string().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 教职工 ====================
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staff::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Staff::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Staff::Nip).string().null())
                    .col(ColumnDef::new(Staff::FullName).string().not_null())
                    .col(ColumnDef::new(Staff::Gender).string().not_null())
                    .col(ColumnDef::new(Staff::PositionId).big_integer().null())
                    .col(ColumnDef::new(Staff::Email).string().null())
                    .col(ColumnDef::new(Staff::Phone).string().null())
                    .col(ColumnDef::new(Staff::Address).text().null())
                    .col(ColumnDef::new(Staff::PhotoUrl).string().null())
                    .col(ColumnDef::new(Staff::Status).string().not_null())
                    .col(ColumnDef::new(Staff::JoinDate).string().not_null())
                    .col(ColumnDef::new(Staff::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Staff::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Staff::Table, Staff::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Staff::Table, Staff::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 公文 ====================
        manager
            .create_table(
                Table::create()
                    .table(Letters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Letters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Letters::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Letters::LetterNumber).string().not_null())
                    .col(ColumnDef::new(Letters::LetterType).string().not_null())
                    .col(ColumnDef::new(Letters::Subject).string().not_null())
                    .col(ColumnDef::new(Letters::Sender).string().null())
                    .col(ColumnDef::new(Letters::Recipient).string().null())
                    .col(ColumnDef::new(Letters::Date).string().not_null())
                    .col(ColumnDef::new(Letters::FileUrl).string().null())
                    .col(ColumnDef::new(Letters::Status).string().not_null())
                    .col(ColumnDef::new(Letters::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Letters::Table, Letters::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_school_status")
                    .table(Students::Table)
                    .col(Students::SchoolId)
                    .col(Students::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staff_school_id")
                    .table(Staff::Table)
                    .col(Staff::SchoolId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_letters_school_date")
                    .table(Letters::Table)
                    .col(Letters::SchoolId)
                    .col(Letters::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_academic_years_school_id")
                    .table(AcademicYears::Table)
                    .col(AcademicYears::SchoolId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Letters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeLevels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
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
    SchoolId,
    Name,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GradeLevels {
    #[sea_orm(iden = "grade_levels")]
    Table,
    Id,
    SchoolId,
    Name,
    SortOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    SchoolId,
    Name,
    Code,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Positions {
    #[sea_orm(iden = "positions")]
    Table,
    Id,
    SchoolId,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    SchoolId,
    Nisn,
    Nis,
    FullName,
    BirthDate,
    BirthPlace,
    Gender,
    Religion,
    Address,
    Phone,
    PhotoUrl,
    Status,
    AdmissionYear,
    EnrollmentType,
    Nik,
    ParentType,
    FatherName,
    FatherPhone,
    MotherName,
    MotherPhone,
    GuardianName,
    GuardianPhone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Staff {
    #[sea_orm(iden = "staff")]
    Table,
    Id,
    SchoolId,
    Nip,
    FullName,
    Gender,
    PositionId,
    Email,
    Phone,
    Address,
    PhotoUrl,
    Status,
    JoinDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Letters {
    #[sea_orm(iden = "letters")]
    Table,
    Id,
    SchoolId,
    LetterNumber,
    LetterType,
    Subject,
    Sender,
    Recipient,
    Date,
    FileUrl,
    Status,
    CreatedAt,
}
