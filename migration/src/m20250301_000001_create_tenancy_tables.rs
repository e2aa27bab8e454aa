use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 学校（租户）表
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schools::Name).string().not_null())
                    .col(
                        ColumnDef::new(Schools::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Schools::EducationLevel).string().not_null())
                    .col(ColumnDef::new(Schools::Address).text().null())
                    .col(ColumnDef::new(Schools::Phone).string().null())
                    .col(ColumnDef::new(Schools::Email).string().null())
                    .col(ColumnDef::new(Schools::LogoUrl).string().null())
                    .col(
                        ColumnDef::new(Schools::SubscriptionPlan)
                            .string()
                            .not_null()
                            .default("free"),
                    )
                    .col(ColumnDef::new(Schools::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Schools::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 身份账号表（登录凭据）
        manager
            .create_table(
                Table::create()
                    .table(AuthAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthAccounts::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AuthAccounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(AuthAccounts::FullName).string().not_null())
                    .col(ColumnDef::new(AuthAccounts::RecoveryToken).string().null())
                    .col(
                        ColumnDef::new(AuthAccounts::RecoveryExpiresAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AuthAccounts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthAccounts::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户资料表，id 与身份账号一致
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::SchoolId).big_integer().null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::MustChangePassword)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::Id)
                            .to(AuthAccounts::Table, AuthAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 待审核注册表
        manager
            .create_table(
                Table::create()
                    .table(PendingRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingRegistrations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::SchoolName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::FullName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::Email)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::Phone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::EducationLevel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::ProcessedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_school_id")
                    .table(Users::Table)
                    .col(Users::SchoolId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_auth_accounts_recovery_token")
                    .table(AuthAccounts::Table)
                    .col(AuthAccounts::RecoveryToken)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pending_registrations_email_status")
                    .table(PendingRegistrations::Table)
                    .col(PendingRegistrations::Email)
                    .col(PendingRegistrations::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingRegistrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    #[sea_orm(iden = "schools")]
    Table,
    Id,
    Name,
    Slug,
    EducationLevel,
    Address,
    Phone,
    Email,
    LogoUrl,
    SubscriptionPlan,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuthAccounts {
    #[sea_orm(iden = "auth_accounts")]
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    RecoveryToken,
    RecoveryExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    SchoolId,
    Email,
    FullName,
    Role,
    AvatarUrl,
    IsActive,
    MustChangePassword,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PendingRegistrations {
    #[sea_orm(iden = "pending_registrations")]
    Table,
    Id,
    SchoolName,
    FullName,
    Email,
    Phone,
    EducationLevel,
    Status,
    Token,
    ProcessedAt,
    CreatedAt,
    UpdatedAt,
}
