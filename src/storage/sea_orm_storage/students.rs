use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::prelude::{StudentActiveModel, Students};
use crate::entity::students::Column;
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    students::{
        entities::{Student, StudentStatus},
        requests::{StudentListQuery, StudentRecord},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set, sea_query::Expr,
};

const DUPLICATE_STUDENT: &str = "NISN atau NIS sudah terdaftar";

fn apply_record(model: &mut StudentActiveModel, record: StudentRecord) {
    model.nisn = Set(record.nisn);
    model.nis = Set(record.nis);
    model.full_name = Set(record.full_name);
    model.birth_date = Set(record.birth_date);
    model.birth_place = Set(record.birth_place);
    model.gender = Set(record.gender.to_string());
    model.religion = Set(record.religion);
    model.address = Set(record.address);
    model.phone = Set(record.phone);
    model.photo_url = Set(record.photo_url);
    model.status = Set(record.status.to_string());
    model.admission_year = Set(record.admission_year);
    model.enrollment_type = Set(record.enrollment_type.to_string());
    model.nik = Set(record.nik);
    model.parent_type = Set(record.parent_type.to_string());
    model.father_name = Set(record.father_name);
    model.father_phone = Set(record.father_phone);
    model.mother_name = Set(record.mother_name);
    model.mother_phone = Set(record.mother_phone);
    model.guardian_name = Set(record.guardian_name);
    model.guardian_phone = Set(record.guardian_phone);
}

/// 可毕业学生：在读且入学年份不晚于界限
fn graduation_candidates(
    school_id: i64,
    admission_year_limit: i32,
) -> Select<crate::entity::students::Entity> {
    Students::find()
        .filter(Column::SchoolId.eq(school_id))
        .filter(Column::Status.eq(StudentStatus::Active.to_string()))
        .filter(Column::AdmissionYear.lte(admission_year_limit))
}

impl SeaOrmStorage {
    /// 分页列出学生（按姓名排序）
    pub async fn list_students_impl(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let mut select = Students::find().filter(Column::SchoolId.eq(school_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::Nisn.contains(&escaped))
                    .add(Column::Nis.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::FullName)
            .paginate(&self.db, query.size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询学生总数"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询学生页数"))?;
        let students = paginator
            .fetch_page(query.page - 1)
            .await
            .map_err(db_error("查询学生列表"))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(query.page, query.size, total, pages),
        })
    }

    pub async fn get_student_impl(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询学生"))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn create_student_impl(
        &self,
        school_id: i64,
        record: StudentRecord,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let mut model = StudentActiveModel {
            school_id: Set(school_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_record(&mut model, record);

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, DUPLICATE_STUDENT, "创建学生"))?;

        Ok(result.into_student())
    }

    pub async fn update_student_impl(
        &self,
        school_id: i64,
        id: i64,
        record: StudentRecord,
    ) -> Result<Option<Student>> {
        if self.get_student_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = StudentActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        apply_record(&mut model, record);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, DUPLICATE_STUDENT, "更新学生"))?;

        Ok(Some(updated.into_student()))
    }

    pub async fn delete_student_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Students::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(db_error("删除学生"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_graduation_candidates_impl(
        &self,
        school_id: i64,
        admission_year_limit: i32,
    ) -> Result<u64> {
        graduation_candidates(school_id, admission_year_limit)
            .count(&self.db)
            .await
            .map_err(db_error("统计可毕业学生"))
    }

    /// 批量毕业
    pub async fn graduate_students_impl(
        &self,
        school_id: i64,
        admission_year_limit: i32,
    ) -> Result<u64> {
        let result = Students::update_many()
            .col_expr(
                Column::Status,
                Expr::value(StudentStatus::Graduated.to_string()),
            )
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(StudentStatus::Active.to_string()))
            .filter(Column::AdmissionYear.lte(admission_year_limit))
            .exec(&self.db)
            .await
            .map_err(db_error("批量更新学生毕业状态"))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{create_school, student_record};
    use super::*;
    use crate::storage::Storage;

    fn query() -> StudentListQuery {
        StudentListQuery {
            page: 1,
            size: 10,
            status: None,
            search: None,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_name_and_filters() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = create_school(&storage, "a").await;
        storage
            .create_student(school, student_record("003", "Citra", 2024))
            .await
            .unwrap();
        storage
            .create_student(school, student_record("001", "Ahmad", 2023))
            .await
            .unwrap();
        let mut graduated = student_record("002", "Bayu", 2020);
        graduated.status = StudentStatus::Graduated;
        storage.create_student(school, graduated).await.unwrap();

        let all = storage.list_students(school, query()).await.unwrap();
        let names: Vec<_> = all.items.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, vec!["Ahmad", "Bayu", "Citra"]);

        let active = storage
            .list_students(
                school,
                StudentListQuery {
                    status: Some(StudentStatus::Active),
                    ..query()
                },
            )
            .await
            .unwrap();
        assert_eq!(active.pagination.total, 2);

        let searched = storage
            .list_students(
                school,
                StudentListQuery {
                    search: Some("003".into()),
                    ..query()
                },
            )
            .await
            .unwrap();
        assert_eq!(searched.items[0].full_name, "Citra");
    }

    #[tokio::test]
    async fn test_other_school_cannot_read_or_delete() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = create_school(&storage, "a").await;
        let b = create_school(&storage, "b").await;
        let student = storage
            .create_student(a, student_record("001", "Ahmad", 2023))
            .await
            .unwrap();

        assert!(storage.get_student(b, student.id).await.unwrap().is_none());
        assert!(!storage.delete_student(b, student.id).await.unwrap());
        assert!(
            storage
                .update_student(b, student.id, student_record("001", "X", 2023))
                .await
                .unwrap()
                .is_none()
        );
        assert!(storage.delete_student(a, student.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_graduation_only_touches_eligible_active_students() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = create_school(&storage, "a").await;
        let b = create_school(&storage, "b").await;
        storage
            .create_student(a, student_record("001", "Lama", 2021))
            .await
            .unwrap();
        storage
            .create_student(a, student_record("002", "Baru", 2024))
            .await
            .unwrap();
        let mut moved = student_record("003", "Pindah", 2020);
        moved.status = StudentStatus::Transferred;
        storage.create_student(a, moved).await.unwrap();
        storage
            .create_student(b, student_record("004", "Lain", 2019))
            .await
            .unwrap();

        assert_eq!(storage.count_graduation_candidates(a, 2022).await.unwrap(), 1);
        assert_eq!(storage.graduate_students(a, 2022).await.unwrap(), 1);
        assert_eq!(storage.count_graduation_candidates(a, 2022).await.unwrap(), 0);
        // 其他学校不受影响
        assert_eq!(storage.count_graduation_candidates(b, 2022).await.unwrap(), 1);
    }
}
