use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::prelude::{Positions, Staff as StaffEntity, StaffActiveModel};
use crate::entity::{positions, staff::Column};
use crate::errors::{Result, SISystemError};
use crate::models::staff::{Position, Staff, StaffRecord};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn apply_record(model: &mut StaffActiveModel, record: StaffRecord) {
    model.nip = Set(record.nip);
    model.full_name = Set(record.full_name);
    model.gender = Set(record.gender.to_string());
    model.position_id = Set(record.position_id);
    model.email = Set(record.email);
    model.phone = Set(record.phone);
    model.address = Set(record.address);
    model.photo_url = Set(record.photo_url);
    model.join_date = Set(record.join_date);
    model.status = Set(record.status.to_string());
}

impl SeaOrmStorage {
    /// 列出教职工（附带职位名称）
    pub async fn list_staff_impl(&self, school_id: i64) -> Result<Vec<Staff>> {
        let rows = StaffEntity::find()
            .filter(Column::SchoolId.eq(school_id))
            .find_also_related(Positions)
            .order_by_asc(Column::FullName)
            .all(&self.db)
            .await
            .map_err(db_error("查询教职工列表"))?;

        Ok(rows
            .into_iter()
            .map(|(staff, position)| staff.into_staff(position.map(|p| p.name)))
            .collect())
    }

    pub async fn get_staff_impl(&self, school_id: i64, id: i64) -> Result<Option<Staff>> {
        let row = StaffEntity::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .find_also_related(Positions)
            .one(&self.db)
            .await
            .map_err(db_error("查询教职工"))?;

        Ok(row.map(|(staff, position)| staff.into_staff(position.map(|p| p.name))))
    }

    pub async fn create_staff_impl(&self, school_id: i64, record: StaffRecord) -> Result<Staff> {
        let now = chrono::Utc::now().timestamp();
        let mut model = StaffActiveModel {
            school_id: Set(school_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_record(&mut model, record);

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "NIP sudah terdaftar", "创建教职工"))?;

        // 重新读取以带上职位名称
        self.get_staff_impl(school_id, created.id)
            .await?
            .ok_or_else(|| SISystemError::not_found("Data pegawai tidak ditemukan"))
    }

    pub async fn update_staff_impl(
        &self,
        school_id: i64,
        id: i64,
        record: StaffRecord,
    ) -> Result<Option<Staff>> {
        if self.get_staff_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = StaffActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        apply_record(&mut model, record);

        model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "NIP sudah terdaftar", "更新教职工"))?;

        self.get_staff_impl(school_id, id).await
    }

    pub async fn delete_staff_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = StaffEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除教职工"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_positions_impl(&self, school_id: i64) -> Result<Vec<Position>> {
        let rows = Positions::find()
            .filter(positions::Column::SchoolId.eq(school_id))
            .order_by_asc(positions::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询职位列表"))?;

        Ok(rows.into_iter().map(|m| m.into_position()).collect())
    }

    pub async fn get_position_impl(&self, school_id: i64, id: i64) -> Result<Option<Position>> {
        let row = Positions::find_by_id(id)
            .filter(positions::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询职位"))?;

        Ok(row.map(|m| m.into_position()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::create_school;
    use super::*;
    use crate::entity::positions::ActiveModel as PositionActiveModel;
    use crate::models::staff::StaffStatus;
    use crate::models::students::entities::Gender;
    use crate::storage::Storage;

    fn record(name: &str, position_id: Option<i64>) -> StaffRecord {
        StaffRecord {
            nip: None,
            full_name: name.into(),
            gender: Gender::Male,
            position_id,
            email: None,
            phone: None,
            address: None,
            photo_url: None,
            join_date: "2020-07-15".into(),
            status: StaffStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_staff_carries_position_name() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let position = PositionActiveModel {
            school_id: Set(school),
            name: Set("Guru Kelas".into()),
            description: Set(None),
            created_at: Set(0),
            ..Default::default()
        }
        .insert(storage.connection())
        .await
        .unwrap();

        let created = storage
            .create_staff(school, record("Budi", Some(position.id)))
            .await
            .unwrap();
        assert_eq!(created.position_name.as_deref(), Some("Guru Kelas"));

        storage.create_staff(school, record("Andi", None)).await.unwrap();
        let list = storage.list_staff(school).await.unwrap();
        assert_eq!(list[0].full_name, "Andi");
        assert!(list[0].position_name.is_none());

        let positions = storage.list_positions(school).await.unwrap();
        assert_eq!(positions.len(), 1);
        assert!(storage.get_position(school + 1, position.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        let created = storage.create_staff(school, record("Budi", None)).await.unwrap();

        let mut changed = record("Budi Santoso", None);
        changed.status = StaffStatus::Retired;
        let updated = storage
            .update_staff(school, created.id, changed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Budi Santoso");
        assert_eq!(updated.status, StaffStatus::Retired);
        assert!(storage.delete_staff(school, created.id).await.unwrap());
    }
}
