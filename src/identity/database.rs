use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info};

use super::{IdentityAccount, IdentityProvider};
use crate::config::AppConfig;
use crate::entity::auth_accounts::{ActiveModel, Column, Entity as AuthAccounts, Model};
use crate::errors::{Result, SISystemError};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::random_code::generate_recovery_token;
use crate::utils::validate::normalize_email;

/// 基于 auth_accounts 表的本地身份提供方
#[derive(Clone)]
pub struct DatabaseIdentityProvider {
    db: DatabaseConnection,
}

impl DatabaseIdentityProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model_by_email(&self, email: &str) -> Result<Option<Model>> {
        AuthAccounts::find()
            .filter(Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("查询身份账号失败: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for DatabaseIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<IdentityAccount> {
        let email = normalize_email(email);
        if self.find_model_by_email(&email).await?.is_some() {
            return Err(SISystemError::conflict(format!("账号已存在: {email}")));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(hash_password(password)?),
            full_name: Set(full_name.trim().to_string()),
            recovery_token: Set(None),
            recovery_expires_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            // 并发创建时由唯一约束兜底
            if msg.contains("UNIQUE") || msg.contains("unique") || msg.contains("Duplicate") {
                SISystemError::conflict(format!("账号已存在: {email}"))
            } else {
                SISystemError::identity_provider(format!("创建身份账号失败: {e}"))
            }
        })?;

        info!("身份账号已创建: id={}, email={}", created.id, created.email);
        Ok(created.into_account())
    }

    async fn list_accounts(&self, page: u64, per_page: u64) -> Result<Vec<IdentityAccount>> {
        let paginator = AuthAccounts::find()
            .order_by_asc(Column::Id)
            .paginate(&self.db, per_page.max(1));

        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("列出身份账号失败: {e}")))?;

        Ok(models.into_iter().map(Model::into_account).collect())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<IdentityAccount>> {
        Ok(self
            .find_model_by_email(email)
            .await?
            .map(Model::into_account))
    }

    async fn update_password(&self, id: i64, password: &str) -> Result<()> {
        let hash = hash_password(password)?;
        let result = AuthAccounts::update_many()
            .col_expr(Column::PasswordHash, sea_orm::sea_query::Expr::value(hash))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("更新密码失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(SISystemError::not_found(format!("身份账号不存在: {id}")));
        }
        Ok(())
    }

    async fn delete_account(&self, id: i64) -> Result<()> {
        let result = AuthAccounts::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("删除身份账号失败: {e}")))?;

        debug!("删除身份账号 id={}, rows={}", id, result.rows_affected);
        Ok(())
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<IdentityAccount>> {
        let Some(model) = self.find_model_by_email(email).await? else {
            return Ok(None);
        };

        if verify_password(password, &model.password_hash) {
            Ok(Some(model.into_account()))
        } else {
            Ok(None)
        }
    }

    async fn issue_recovery_token(&self, email: &str) -> Result<Option<String>> {
        let Some(model) = self.find_model_by_email(email).await? else {
            return Ok(None);
        };

        let token = generate_recovery_token();
        let now = chrono::Utc::now().timestamp();
        let expires_at = now + AppConfig::get().identity.recovery_token_expiry_minutes * 60;

        let mut active: ActiveModel = model.into();
        active.recovery_token = Set(Some(token.clone()));
        active.recovery_expires_at = Set(Some(expires_at));
        active.updated_at = Set(now);
        active
            .update(&self.db)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("保存找回令牌失败: {e}")))?;

        Ok(Some(token))
    }

    async fn redeem_recovery_token(&self, token: &str, password: &str) -> Result<IdentityAccount> {
        let now = chrono::Utc::now().timestamp();
        let model = AuthAccounts::find()
            .filter(Column::RecoveryToken.eq(token))
            .filter(Column::RecoveryExpiresAt.gte(now))
            .one(&self.db)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("查询找回令牌失败: {e}")))?
            .ok_or_else(|| {
                SISystemError::validation(
                    "Tautan reset password tidak valid atau sudah kedaluwarsa",
                )
            })?;

        let mut active: ActiveModel = model.into();
        active.password_hash = Set(hash_password(password)?);
        active.recovery_token = Set(None);
        active.recovery_expires_at = Set(None);
        active.updated_at = Set(now);
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| SISystemError::identity_provider(format!("重置密码失败: {e}")))?;

        Ok(updated.into_account())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn provider() -> DatabaseIdentityProvider {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        DatabaseIdentityProvider::new(storage.connection().clone())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let identity = provider().await;
        identity
            .create_account("Guru@Sekolah.id", "guru2025ok", "Guru")
            .await
            .unwrap();

        let err = identity
            .create_account("guru@sekolah.id", "lain2025ok", "Guru Lain")
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_verify_and_update_password() {
        let identity = provider().await;
        let account = identity
            .create_account("kepala@sekolah.id", "awal2025ok", "Kepala")
            .await
            .unwrap();

        assert!(
            identity
                .verify_credentials("KEPALA@sekolah.id", "awal2025ok")
                .await
                .unwrap()
                .is_some()
        );

        identity.update_password(account.id, "baru2025ok").await.unwrap();
        assert!(
            identity
                .verify_credentials("kepala@sekolah.id", "awal2025ok")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            identity
                .verify_credentials("kepala@sekolah.id", "baru2025ok")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_list_accounts_pages_by_id() {
        let identity = provider().await;
        for i in 0..3 {
            identity
                .create_account(&format!("user{i}@sekolah.id"), "guru2025ok", "User")
                .await
                .unwrap();
        }

        let first = identity.list_accounts(1, 2).await.unwrap();
        let second = identity.list_accounts(2, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].email, "user2@sekolah.id");
    }

    #[tokio::test]
    async fn test_recovery_token_is_single_use() {
        let identity = provider().await;
        identity
            .create_account("admin@sekolah.id", "awal2025ok", "Admin")
            .await
            .unwrap();

        assert!(
            identity
                .issue_recovery_token("missing@sekolah.id")
                .await
                .unwrap()
                .is_none()
        );

        let token = identity
            .issue_recovery_token("admin@sekolah.id")
            .await
            .unwrap()
            .unwrap();
        identity
            .redeem_recovery_token(&token, "pulih2025ok")
            .await
            .unwrap();

        assert!(
            identity
                .redeem_recovery_token(&token, "lagi2025ok")
                .await
                .is_err()
        );
        assert!(
            identity
                .verify_credentials("admin@sekolah.id", "pulih2025ok")
                .await
                .unwrap()
                .is_some()
        );
    }
}
