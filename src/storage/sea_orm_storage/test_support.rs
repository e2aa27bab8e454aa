//! 存储层测试用的数据准备

use super::SeaOrmStorage;
use crate::entity::prelude::SchoolActiveModel;
use crate::identity::{DatabaseIdentityProvider, IdentityProvider};
use crate::models::students::entities::{EnrollmentType, Gender, ParentType, StudentStatus};
use crate::models::students::requests::StudentRecord;
use crate::models::users::{
    entities::{User, UserRole},
    requests::NewUserProfile,
};
use crate::storage::Storage;
use sea_orm::{ActiveModelTrait, Set};

pub async fn create_school(storage: &SeaOrmStorage, slug: &str) -> i64 {
    let now = chrono::Utc::now().timestamp();
    SchoolActiveModel {
        name: Set(format!("Sekolah {slug}")),
        slug: Set(slug.into()),
        education_level: Set("smp".into()),
        subscription_plan: Set("free".into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(storage.connection())
    .await
    .unwrap()
    .id
}

pub async fn create_profile(
    storage: &SeaOrmStorage,
    email: &str,
    school_id: Option<i64>,
    role: UserRole,
) -> User {
    let identity = DatabaseIdentityProvider::new(storage.connection().clone());
    let account = identity
        .create_account(email, "Rahasia123", "Pengguna Tes")
        .await
        .unwrap();
    storage
        .create_user_profile(NewUserProfile {
            id: account.id,
            school_id,
            email: account.email,
            full_name: account.full_name,
            role,
            must_change_password: true,
        })
        .await
        .unwrap()
}

pub fn student_record(nisn: &str, name: &str, admission_year: i32) -> StudentRecord {
    StudentRecord {
        nisn: nisn.into(),
        nis: format!("NIS-{nisn}"),
        full_name: name.into(),
        birth_date: "2012-05-01".into(),
        birth_place: "Bandung".into(),
        gender: Gender::Female,
        religion: "Islam".into(),
        address: None,
        phone: None,
        photo_url: None,
        status: StudentStatus::Active,
        admission_year,
        enrollment_type: EnrollmentType::New,
        nik: None,
        parent_type: ParentType::Parent,
        father_name: None,
        father_phone: None,
        mother_name: None,
        mother_phone: None,
        guardian_name: None,
        guardian_phone: None,
    }
}

pub async fn create_academic_year(
    storage: &SeaOrmStorage,
    school_id: i64,
    name: &str,
    start_date: &str,
    end_date: &str,
    is_active: bool,
) -> i64 {
    crate::entity::academic_years::ActiveModel {
        school_id: Set(school_id),
        name: Set(name.into()),
        start_date: Set(start_date.into()),
        end_date: Set(end_date.into()),
        is_active: Set(is_active),
        created_at: Set(0),
        ..Default::default()
    }
    .insert(storage.connection())
    .await
    .unwrap()
    .id
}

pub async fn create_grade_level(storage: &SeaOrmStorage, school_id: i64, name: &str) -> i64 {
    crate::entity::grade_levels::ActiveModel {
        school_id: Set(school_id),
        name: Set(name.into()),
        sort_order: Set(1),
        created_at: Set(0),
        ..Default::default()
    }
    .insert(storage.connection())
    .await
    .unwrap()
    .id
}

pub async fn create_subject(storage: &SeaOrmStorage, school_id: i64, code: &str) -> i64 {
    crate::entity::subjects::ActiveModel {
        school_id: Set(school_id),
        name: Set(format!("Mapel {code}")),
        code: Set(code.into()),
        description: Set(None),
        created_at: Set(0),
        ..Default::default()
    }
    .insert(storage.connection())
    .await
    .unwrap()
    .id
}

/// 学年 + 年级 + 教学班，返回 (academic_year_id, class_group_id)
pub async fn create_class_setup(
    storage: &SeaOrmStorage,
    school_id: i64,
    capacity: i32,
) -> (i64, i64) {
    use crate::models::curriculum::requests::NewClassGroup;

    let year = create_academic_year(
        storage,
        school_id,
        "2024/2025",
        "2024-07-15",
        "2025-06-20",
        true,
    )
    .await;
    let grade = create_grade_level(storage, school_id, "Kelas 7").await;
    let group = storage
        .create_class_group(
            school_id,
            NewClassGroup {
                academic_year_id: year,
                grade_level_id: grade,
                name: "7A".into(),
                homeroom_teacher_id: None,
                capacity,
            },
        )
        .await
        .unwrap();
    (year, group.id)
}
