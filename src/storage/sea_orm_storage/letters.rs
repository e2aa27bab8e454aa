use super::{SeaOrmStorage, db_error};
use crate::entity::letters::Column;
use crate::entity::prelude::{LetterActiveModel, Letters};
use crate::errors::Result;
use crate::models::letters::{CreateLetterRequest, Letter, LetterStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 公文列表（按日期倒序）
    pub async fn list_letters_impl(&self, school_id: i64) -> Result<Vec<Letter>> {
        let rows = Letters::find()
            .filter(Column::SchoolId.eq(school_id))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询公文列表"))?;

        Ok(rows.into_iter().map(|m| m.into_letter()).collect())
    }

    pub async fn create_letter_impl(
        &self,
        school_id: i64,
        req: CreateLetterRequest,
    ) -> Result<Letter> {
        let model = LetterActiveModel {
            school_id: Set(school_id),
            letter_number: Set(req.letter_number),
            letter_type: Set(req.letter_type.to_string()),
            subject: Set(req.subject),
            sender: Set(req.sender),
            recipient: Set(req.recipient),
            date: Set(req.date),
            file_url: Set(req.file_url),
            status: Set(LetterStatus::Pending.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建公文"))?;

        Ok(result.into_letter())
    }

    pub async fn delete_letter_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Letters::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除公文"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::create_school;
    use super::*;
    use crate::models::letters::LetterType;
    use crate::storage::Storage;

    fn letter(number: &str, date: &str) -> CreateLetterRequest {
        CreateLetterRequest {
            letter_number: number.into(),
            letter_type: LetterType::Incoming,
            subject: "Undangan Rapat".into(),
            sender: Some("Dinas Pendidikan".into()),
            recipient: None,
            date: date.into(),
            file_url: None,
        }
    }

    #[tokio::test]
    async fn test_letters_newest_date_first_and_pending() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        storage
            .create_letter(school, letter("001/2025", "2025-01-10"))
            .await
            .unwrap();
        let latest = storage
            .create_letter(school, letter("002/2025", "2025-02-01"))
            .await
            .unwrap();
        assert_eq!(latest.status, LetterStatus::Pending);

        let list = storage.list_letters(school).await.unwrap();
        assert_eq!(list[0].letter_number, "002/2025");

        let other = create_school(&storage, "b").await;
        assert!(!storage.delete_letter(other, latest.id).await.unwrap());
        assert!(storage.delete_letter(school, latest.id).await.unwrap());
    }
}
