use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::{Result, SISystemError};
use crate::identity::IdentityProvider;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, NewUserProfile},
        responses::UserResponse,
    },
};
use crate::services::{app_identity, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::text::title_case;
use crate::utils::validate::{normalize_email, validate_email, validate_password};

/// 创建身份账号与本校资料；资料写入失败时删除刚建的账号
pub(crate) async fn create_school_user(
    storage: &dyn Storage,
    identity: &dyn IdentityProvider,
    school_id: i64,
    user_data: CreateUserRequest,
) -> Result<User> {
    let email = normalize_email(&user_data.email);
    validate_email(&email).map_err(SISystemError::validation)?;

    let full_name = title_case(user_data.full_name.trim());
    if full_name.is_empty() {
        return Err(SISystemError::validation("Nama lengkap wajib diisi"));
    }
    if user_data.role == UserRole::SystemAdmin {
        return Err(SISystemError::validation(
            "Peran system_admin tidak dapat diberikan",
        ));
    }
    let password_check = validate_password(&user_data.password);
    if !password_check.is_valid {
        return Err(SISystemError::validation(password_check.error_message()));
    }

    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(SISystemError::conflict("Email sudah digunakan"));
    }

    let account = identity
        .create_account(&email, &user_data.password, &full_name)
        .await
        .map_err(|e| match e {
            SISystemError::Conflict(_) => SISystemError::conflict("Email sudah digunakan"),
            other => other,
        })?;

    let profile = NewUserProfile {
        id: account.id,
        school_id: Some(school_id),
        email,
        full_name,
        role: user_data.role,
        must_change_password: true,
    };

    match storage.create_user_profile(profile).await {
        Ok(user) => Ok(user),
        Err(e) => {
            tracing::error!("写入用户资料失败，回收身份账号 {}: {}", account.id, e);
            if let Err(cleanup) = identity.delete_account(account.id).await {
                tracing::error!("删除身份账号 {} 失败，需要人工清理: {}", account.id, cleanup);
            }
            Err(e)
        }
    }
}

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);
    let identity = app_identity(request);

    match create_school_user(storage.as_ref(), identity.as_ref(), school_id, user_data).await {
        Ok(user) => {
            tracing::info!(
                "用户 {} 在学校 {} 创建了账号 {}（{}）",
                current_user.id,
                school_id,
                user.id,
                user.role
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Pengguna berhasil dibuat",
            )))
        }
        Err(SISystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))),
        Err(SISystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::UserAlreadyExists, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserCreationFailed,
                format!("Gagal membuat pengguna: {}", e.message()),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::DatabaseIdentityProvider;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    fn request(email: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            full_name: "budi santoso".into(),
            password: "Guru2025ok".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_requires_fresh_email() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let identity = DatabaseIdentityProvider::new(storage.connection().clone());
        let school_id = test_support::create_school(&storage, "buat").await;

        let user = create_school_user(
            &storage,
            &identity,
            school_id,
            request("Budi@Sekolah.id", UserRole::Teacher),
        )
        .await
        .unwrap();
        assert_eq!(user.email, "budi@sekolah.id");
        assert_eq!(user.full_name, "Budi Santoso");
        assert_eq!(user.school_id, Some(school_id));
        assert!(user.must_change_password);

        let err = create_school_user(
            &storage,
            &identity,
            school_id,
            request("budi@sekolah.id", UserRole::Admin),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));

        let err = create_school_user(
            &storage,
            &identity,
            school_id,
            request("root@sekolah.id", UserRole::SystemAdmin),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));
    }

    #[tokio::test]
    async fn test_profile_failure_removes_account() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let identity = DatabaseIdentityProvider::new(storage.connection().clone());

        // 学校不存在，外键约束让资料写入失败
        create_school_user(
            &storage,
            &identity,
            9999,
            request("yatim@sekolah.id", UserRole::Teacher),
        )
        .await
        .unwrap_err();

        assert!(
            identity
                .find_account_by_email("yatim@sekolah.id")
                .await
                .unwrap()
                .is_none()
        );
    }
}
