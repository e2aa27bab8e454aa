//! 身份提供方
//!
//! 登录凭据与学校内的用户资料分离：账号（邮箱 + 密码哈希）由身份提供方管理，
//! 用户资料（角色、所属学校）由 Storage 管理，两者以同一个 id 关联。

mod database;

pub use database::DatabaseIdentityProvider;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;

/// 身份账号（不含凭据）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityAccount {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 创建账号，邮箱已存在时返回 Conflict
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<IdentityAccount>;
    /// 分页列出账号（page 从 1 开始，按 id 升序）
    async fn list_accounts(&self, page: u64, per_page: u64) -> Result<Vec<IdentityAccount>>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<IdentityAccount>>;
    async fn update_password(&self, id: i64, password: &str) -> Result<()>;
    async fn delete_account(&self, id: i64) -> Result<()>;
    /// 邮箱和密码匹配时返回账号
    async fn verify_credentials(&self, email: &str, password: &str)
    -> Result<Option<IdentityAccount>>;
    /// 生成找回密码令牌，账号不存在时返回 None
    async fn issue_recovery_token(&self, email: &str) -> Result<Option<String>>;
    /// 使用找回令牌设置新密码，令牌一次有效
    async fn redeem_recovery_token(&self, token: &str, password: &str) -> Result<IdentityAccount>;
}
