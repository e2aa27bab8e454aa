//! 只读主数据：学年、年级、科目

use super::{SeaOrmStorage, db_error};
use crate::entity::prelude::{AcademicYears, GradeLevels, Subjects};
use crate::entity::{academic_years, grade_levels, subjects};
use crate::errors::Result;
use crate::models::curriculum::entities::{AcademicYear, GradeLevel, Subject};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn list_academic_years_impl(&self, school_id: i64) -> Result<Vec<AcademicYear>> {
        let rows = AcademicYears::find()
            .filter(academic_years::Column::SchoolId.eq(school_id))
            .order_by_desc(academic_years::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_error("查询学年列表"))?;

        Ok(rows.into_iter().map(|m| m.into_academic_year()).collect())
    }

    pub async fn get_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        let row = AcademicYears::find_by_id(id)
            .filter(academic_years::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询学年"))?;

        Ok(row.map(|m| m.into_academic_year()))
    }

    /// 当前启用的学年（有多个时取开始日期最晚的）
    pub async fn get_active_academic_year_impl(
        &self,
        school_id: i64,
    ) -> Result<Option<AcademicYear>> {
        let row = AcademicYears::find()
            .filter(academic_years::Column::SchoolId.eq(school_id))
            .filter(academic_years::Column::IsActive.eq(true))
            .order_by_desc(academic_years::Column::StartDate)
            .one(&self.db)
            .await
            .map_err(db_error("查询当前学年"))?;

        Ok(row.map(|m| m.into_academic_year()))
    }

    pub async fn list_grade_levels_impl(&self, school_id: i64) -> Result<Vec<GradeLevel>> {
        let rows = GradeLevels::find()
            .filter(grade_levels::Column::SchoolId.eq(school_id))
            .order_by_asc(grade_levels::Column::SortOrder)
            .all(&self.db)
            .await
            .map_err(db_error("查询年级列表"))?;

        Ok(rows.into_iter().map(|m| m.into_grade_level()).collect())
    }

    pub async fn get_grade_level_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<GradeLevel>> {
        let row = GradeLevels::find_by_id(id)
            .filter(grade_levels::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询年级"))?;

        Ok(row.map(|m| m.into_grade_level()))
    }

    pub async fn list_subjects_impl(&self, school_id: i64) -> Result<Vec<Subject>> {
        let rows = Subjects::find()
            .filter(subjects::Column::SchoolId.eq(school_id))
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询科目列表"))?;

        Ok(rows.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn get_subject_impl(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        let row = Subjects::find_by_id(id)
            .filter(subjects::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询科目"))?;

        Ok(row.map(|m| m.into_subject()))
    }
}
