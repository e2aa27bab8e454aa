use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::pending_registrations::Column as RegistrationColumn;
use crate::entity::prelude::{
    PendingRegistrations, SchoolActiveModel, Schools, UserActiveModel, Users,
};
use crate::entity::users::Column as UserColumn;
use crate::errors::{Result, SISystemError};
use crate::models::{
    registrations::entities::RegistrationStatus,
    schools::{NewSchool, School, SubscriptionPlan, UpdateSchoolRequest},
    users::requests::NewUserProfile,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tracing::info;

impl SeaOrmStorage {
    pub async fn get_school_impl(&self, school_id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(school_id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学校"))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 更新学校资料
    pub async fn update_school_impl(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_impl(school_id).await?.is_none() {
            return Ok(None);
        }

        let model = SchoolActiveModel {
            id: Set(school_id),
            name: Set(update.name),
            address: Set(update.address),
            phone: Set(update.phone),
            email: Set(update.email),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新学校"))?;

        Ok(Some(updated.into_school()))
    }

    /// 开通租户
    ///
    /// 学校、管理员资料、申请状态三步在同一事务中完成。申请已不是 pending
    /// 时整体回滚并返回 Conflict，避免重复开通。
    pub async fn provision_tenant_impl(
        &self,
        registration_id: i64,
        school: NewSchool,
        profile: NewUserProfile,
    ) -> Result<School> {
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;
        let now = chrono::Utc::now().timestamp();

        let school_model = SchoolActiveModel {
            name: Set(school.name),
            slug: Set(school.slug),
            education_level: Set(school.education_level.to_string()),
            address: Set(None),
            phone: Set(school.phone),
            email: Set(school.email),
            logo_url: Set(None),
            subscription_plan: Set(SubscriptionPlan::Free.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error(e, "Slug sekolah sudah digunakan", "创建学校"))?;

        // 账号可能是复用的旧账号，资料按 id 覆盖
        let user = UserActiveModel {
            id: Set(profile.id),
            school_id: Set(Some(school_model.id)),
            email: Set(profile.email),
            full_name: Set(profile.full_name),
            role: Set(profile.role.to_string()),
            avatar_url: Set(None),
            is_active: Set(true),
            must_change_password: Set(profile.must_change_password),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Users::insert(user)
            .on_conflict(
                OnConflict::column(UserColumn::Id)
                    .update_columns([
                        UserColumn::SchoolId,
                        UserColumn::Email,
                        UserColumn::FullName,
                        UserColumn::Role,
                        UserColumn::IsActive,
                        UserColumn::MustChangePassword,
                        UserColumn::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(db_error("写入管理员资料"))?;

        let approved = PendingRegistrations::update_many()
            .col_expr(
                RegistrationColumn::Status,
                Expr::value(RegistrationStatus::Approved.to_string()),
            )
            .col_expr(RegistrationColumn::ProcessedAt, Expr::value(now))
            .col_expr(RegistrationColumn::UpdatedAt, Expr::value(now))
            .filter(RegistrationColumn::Id.eq(registration_id))
            .filter(RegistrationColumn::Status.eq(RegistrationStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(db_error("更新注册状态"))?;

        if approved.rows_affected == 0 {
            txn.rollback().await.map_err(db_error("回滚事务"))?;
            return Err(SISystemError::conflict(
                "Pendaftaran ini sudah diproses sebelumnya",
            ));
        }

        txn.commit().await.map_err(db_error("提交事务"))?;
        info!(
            "租户开通完成: school_id={}, registration_id={}",
            school_model.id, registration_id
        );

        Ok(school_model.into_school())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{DatabaseIdentityProvider, IdentityProvider};
    use crate::models::registrations::{entities::RegistrationLookup, requests::NewRegistration};
    use crate::models::schools::EducationLevel;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;

    async fn setup() -> (SeaOrmStorage, i64, i64) {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let identity = DatabaseIdentityProvider::new(storage.connection().clone());
        let account = identity
            .create_account("kepala@harapan.sch.id", "Rahasia123", "Kepala Sekolah")
            .await
            .unwrap();
        let registration = storage
            .create_registration(NewRegistration {
                school_name: "SMP Harapan".into(),
                full_name: "Kepala Sekolah".into(),
                email: "kepala@harapan.sch.id".into(),
                phone: "081234567890".into(),
                education_level: EducationLevel::Smp,
                token: "token-1".into(),
            })
            .await
            .unwrap();
        (storage, account.id, registration.id)
    }

    fn new_school(slug: &str) -> NewSchool {
        NewSchool {
            name: "SMP Harapan".into(),
            slug: slug.into(),
            education_level: EducationLevel::Smp,
            phone: Some("081234567890".into()),
            email: Some("kepala@harapan.sch.id".into()),
        }
    }

    fn profile(id: i64) -> NewUserProfile {
        NewUserProfile {
            id,
            school_id: None,
            email: "kepala@harapan.sch.id".into(),
            full_name: "Kepala Sekolah".into(),
            role: UserRole::SuperAdmin,
            must_change_password: true,
        }
    }

    #[tokio::test]
    async fn test_provision_creates_school_profile_and_approves() {
        let (storage, account_id, registration_id) = setup().await;

        let school = storage
            .provision_tenant(registration_id, new_school("smp-harapan-1"), profile(account_id))
            .await
            .unwrap();

        let user = storage.get_user_by_id(account_id).await.unwrap().unwrap();
        assert_eq!(user.school_id, Some(school.id));
        assert_eq!(user.role, UserRole::SuperAdmin);
        assert!(user.is_active);
        assert!(user.must_change_password);

        let registration = storage
            .get_registration(RegistrationLookup::Id(registration_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(registration.status, RegistrationStatus::Approved);
        assert!(registration.processed_at.is_some());
    }

    #[tokio::test]
    async fn test_second_provision_rolls_back() {
        let (storage, account_id, registration_id) = setup().await;
        storage
            .provision_tenant(registration_id, new_school("smp-harapan-1"), profile(account_id))
            .await
            .unwrap();

        let err = storage
            .provision_tenant(registration_id, new_school("smp-harapan-2"), profile(account_id))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));

        // 第二次插入的学校已随事务回滚
        let count = Schools::find().all(storage.connection()).await.unwrap().len();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_update_school_of_unknown_tenant() {
        let (storage, _, _) = setup().await;
        let result = storage
            .update_school(
                999,
                UpdateSchoolRequest {
                    name: "X".into(),
                    address: None,
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
