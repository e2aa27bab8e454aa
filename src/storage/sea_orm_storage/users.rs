use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::prelude::{UserActiveModel, Users};
use crate::entity::users::Column;
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole},
        requests::{NewUserProfile, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 写入用户资料（id 与身份账号一致）
    pub async fn create_user_profile_impl(&self, profile: NewUserProfile) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = UserActiveModel {
            id: Set(profile.id),
            school_id: Set(profile.school_id),
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

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "Profil pengguna sudah ada", "创建用户资料"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询用户"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_error("查询用户"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(db_error("统计用户数量"))
    }

    /// 分页列出本校用户
    pub async fn list_users_impl(
        &self,
        school_id: i64,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find().filter(Column::SchoolId.eq(school_id));

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FullName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询用户总数"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询用户页数"))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询用户列表"))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    async fn find_school_user(&self, school_id: i64, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询用户"))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn update_user_role_impl(
        &self,
        school_id: i64,
        id: i64,
        role: UserRole,
    ) -> Result<Option<User>> {
        if self.find_school_user(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let model = UserActiveModel {
            id: Set(id),
            role: Set(role.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新用户角色"))?;

        Ok(Some(updated.into_user()))
    }

    pub async fn update_user_status_impl(
        &self,
        school_id: i64,
        id: i64,
        is_active: bool,
    ) -> Result<Option<User>> {
        if self.find_school_user(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let model = UserActiveModel {
            id: Set(id),
            is_active: Set(is_active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新用户状态"))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户资料
    pub async fn delete_user_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Users::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除用户"))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新最后登录时间"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn clear_must_change_password_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::MustChangePassword, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新改密标记"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_profile as profile_for, create_school as school};
    use super::*;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_list_is_scoped_to_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = school(&storage, "a").await;
        let b = school(&storage, "b").await;
        profile_for(&storage, "guru1@a.id", Some(a), UserRole::Teacher).await;
        profile_for(&storage, "guru2@a.id", Some(a), UserRole::Admin).await;
        profile_for(&storage, "guru@b.id", Some(b), UserRole::Teacher).await;

        let query = UserListQuery {
            page: Some(1),
            size: Some(10),
            role: None,
            search: None,
        };
        let list = storage.list_users(a, query.clone()).await.unwrap();
        assert_eq!(list.pagination.total, 2);

        let teachers = storage
            .list_users(
                a,
                UserListQuery {
                    role: Some(UserRole::Teacher),
                    ..query
                },
            )
            .await
            .unwrap();
        assert_eq!(teachers.items.len(), 1);
        assert_eq!(teachers.items[0].email, "guru1@a.id");
    }

    #[tokio::test]
    async fn test_cross_school_updates_are_not_found() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = school(&storage, "a").await;
        let b = school(&storage, "b").await;
        let user = profile_for(&storage, "guru@a.id", Some(a), UserRole::Teacher).await;

        assert!(
            storage
                .update_user_role(b, user.id, UserRole::Admin)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.delete_user(b, user.id).await.unwrap());

        let updated = storage
            .update_user_status(a, user.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_clear_must_change_password() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = profile_for(&storage, "admin@sis.id", None, UserRole::SystemAdmin).await;
        assert!(user.must_change_password);
        assert_eq!(storage.count_users().await.unwrap(), 1);

        storage.clear_must_change_password(user.id).await.unwrap();
        storage.update_last_login(user.id).await.unwrap();
        let reloaded = storage.get_user_by_email("admin@sis.id").await.unwrap().unwrap();
        assert!(!reloaded.must_change_password);
        assert!(reloaded.last_login.is_some());
    }
}
