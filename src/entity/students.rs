//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub nisn: String,
    pub nis: String,
    pub full_name: String,
    pub birth_date: String,
    pub birth_place: String,
    pub gender: String,
    pub religion: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub admission_year: i32,
    pub enrollment_type: String,
    pub nik: Option<String>,
    pub parent_type: String,
    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{
            EnrollmentType, Gender, ParentType, Student, StudentStatus,
        };
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            school_id: self.school_id,
            nisn: self.nisn,
            nis: self.nis,
            full_name: self.full_name,
            birth_date: self.birth_date,
            birth_place: self.birth_place,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Male),
            religion: self.religion,
            address: self.address,
            phone: self.phone,
            photo_url: self.photo_url,
            status: self
                .status
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Active),
            admission_year: self.admission_year,
            enrollment_type: self
                .enrollment_type
                .parse::<EnrollmentType>()
                .unwrap_or(EnrollmentType::New),
            nik: self.nik,
            parent_type: self
                .parent_type
                .parse::<ParentType>()
                .unwrap_or(ParentType::Parent),
            father_name: self.father_name,
            father_phone: self.father_phone,
            mother_name: self.mother_name,
            mother_phone: self.mother_phone,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
