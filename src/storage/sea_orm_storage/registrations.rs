use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::pending_registrations::Column;
use crate::entity::prelude::{PendingRegistrations, RegistrationActiveModel};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    registrations::{
        entities::{PendingRegistration, RegistrationLookup, RegistrationStatus},
        requests::NewRegistration,
        responses::RegistrationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 新建注册申请
    pub async fn create_registration_impl(
        &self,
        req: NewRegistration,
    ) -> Result<PendingRegistration> {
        let now = chrono::Utc::now().timestamp();

        let model = RegistrationActiveModel {
            school_name: Set(req.school_name),
            full_name: Set(req.full_name),
            email: Set(req.email),
            phone: Set(req.phone),
            education_level: Set(req.education_level.to_string()),
            status: Set(RegistrationStatus::Pending.to_string()),
            token: Set(req.token),
            processed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            write_error(e, "Pendaftaran dengan data ini sudah ada", "创建注册申请")
        })?;

        Ok(result.into_registration())
    }

    pub async fn get_registration_impl(
        &self,
        lookup: RegistrationLookup,
    ) -> Result<Option<PendingRegistration>> {
        let select = match lookup {
            RegistrationLookup::Id(id) => PendingRegistrations::find_by_id(id),
            RegistrationLookup::Token(token) => {
                PendingRegistrations::find().filter(Column::Token.eq(token))
            }
        };

        let result = select
            .one(&self.db)
            .await
            .map_err(db_error("查询注册申请"))?;

        Ok(result.map(|m| m.into_registration()))
    }

    /// 分页列出注册申请（最新在前）
    pub async fn list_registrations_impl(
        &self,
        page: u64,
        size: u64,
        status: Option<RegistrationStatus>,
    ) -> Result<RegistrationListResponse> {
        let mut select = PendingRegistrations::find();

        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询注册申请总数"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询注册申请页数"))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询注册申请列表"))?;

        Ok(RegistrationListResponse {
            items: items.into_iter().map(|m| m.into_registration()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn has_pending_registration_impl(&self, email: &str) -> Result<bool> {
        let count = PendingRegistrations::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Status.eq(RegistrationStatus::Pending.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("查询待审核申请"))?;

        Ok(count > 0)
    }

    /// 条件更新 pending -> rejected
    pub async fn reject_registration_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = PendingRegistrations::update_many()
            .col_expr(
                Column::Status,
                Expr::value(RegistrationStatus::Rejected.to_string()),
            )
            .col_expr(Column::ProcessedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RegistrationStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_error("拒绝注册申请"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schools::EducationLevel;
    use crate::storage::Storage;

    fn registration(email: &str, token: &str) -> NewRegistration {
        NewRegistration {
            school_name: "SD Pelita".into(),
            full_name: "Siti Aminah".into(),
            email: email.into(),
            phone: "0812000111".into(),
            education_level: EducationLevel::Sd,
            token: token.into(),
        }
    }

    #[tokio::test]
    async fn test_reject_is_one_way() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage
            .create_registration(registration("siti@pelita.sch.id", "t-1"))
            .await
            .unwrap();
        assert!(created.is_pending());
        assert!(storage.has_pending_registration("siti@pelita.sch.id").await.unwrap());

        assert!(storage.reject_registration(created.id).await.unwrap());
        // 已处理的申请不会再次更新
        assert!(!storage.reject_registration(created.id).await.unwrap());
        assert!(!storage.has_pending_registration("siti@pelita.sch.id").await.unwrap());

        let found = storage
            .get_registration(RegistrationLookup::Token("t-1".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.status, RegistrationStatus::Rejected);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let first = storage
            .create_registration(registration("a@pelita.sch.id", "t-a"))
            .await
            .unwrap();
        storage
            .create_registration(registration("b@pelita.sch.id", "t-b"))
            .await
            .unwrap();
        storage.reject_registration(first.id).await.unwrap();

        let all = storage.list_registrations(1, 10, None).await.unwrap();
        assert_eq!(all.pagination.total, 2);
        // 同一秒创建时按 id 倒序
        assert_eq!(all.items[0].email, "b@pelita.sch.id");

        let pending = storage
            .list_registrations(1, 10, Some(RegistrationStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.items.len(), 1);
        assert_eq!(pending.items[0].email, "b@pelita.sch.id");
    }

    #[tokio::test]
    async fn test_duplicate_token_is_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_registration(registration("a@pelita.sch.id", "same"))
            .await
            .unwrap();
        let err = storage
            .create_registration(registration("b@pelita.sch.id", "same"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::errors::SISystemError::Conflict(_)));
    }
}
