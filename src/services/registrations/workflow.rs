//! 学校注册审核流程
//!
//! 审批：生成临时密码 -> 创建或复用身份账号 -> 事务内开通租户 -> 发送凭据邮件。
//! 开通事务失败且账号是本次新建的，删除该账号；复用的旧账号不动。

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::errors::{Result, SISystemError};
use crate::identity::IdentityProvider;
use crate::mailer::{Mailer, templates};
use crate::models::registrations::{
    entities::{PendingRegistration, RegistrationLookup, RegistrationStatus},
    requests::{NewRegistration, SubmitRegistrationRequest},
    responses::ApprovalCredentials,
};
use crate::models::schools::NewSchool;
use crate::models::users::{entities::UserRole, requests::NewUserProfile};
use crate::storage::Storage;
use crate::utils::random_code::generate_temporary_password;
use crate::utils::text::{slugify_school_name, title_case};
use crate::utils::validate::{normalize_email, validate_email};

const ALREADY_PROCESSED: &str = "Pendaftaran ini sudah diproses sebelumnya";

/// 审批时拿到的身份账号
struct ProvisionedAccount {
    id: i64,
    // 本次新建（开通失败时需要删除）
    created: bool,
}

pub struct RegistrationWorkflow {
    storage: Arc<dyn Storage>,
    identity: Arc<dyn IdentityProvider>,
    mailer: Arc<Mailer>,
}

impl RegistrationWorkflow {
    pub fn new(
        storage: Arc<dyn Storage>,
        identity: Arc<dyn IdentityProvider>,
        mailer: Arc<Mailer>,
    ) -> Self {
        Self {
            storage,
            identity,
            mailer,
        }
    }

    /// 提交注册申请，同一邮箱不能有待审核申请或已有账号
    pub async fn submit(&self, request: SubmitRegistrationRequest) -> Result<PendingRegistration> {
        let config = AppConfig::get();
        let registration = normalize_submission(request)?;

        if self
            .storage
            .has_pending_registration(&registration.email)
            .await?
        {
            return Err(SISystemError::conflict(
                "Email ini sudah memiliki pendaftaran yang menunggu verifikasi",
            ));
        }
        if self
            .storage
            .get_user_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(SISystemError::conflict(
                "Email ini sudah terdaftar. Silakan masuk atau gunakan email lain.",
            ));
        }

        let created = self.storage.create_registration(registration).await?;
        info!(
            "收到学校注册申请: id={}, school={}, email={}",
            created.id, created.school_name, created.email
        );

        let admin_email = config.email.admin_notify_email.trim();
        if admin_email.is_empty() {
            warn!("未配置 admin_notify_email，跳过新注册通知");
        } else {
            self.mailer
                .send_best_effort(&templates::registration_request(
                    config,
                    admin_email,
                    &created,
                ))
                .await;
        }
        self.mailer
            .send_best_effort(&templates::waiting_verification(&created.email))
            .await;

        Ok(created)
    }

    pub async fn approve(&self, lookup: RegistrationLookup) -> Result<ApprovalCredentials> {
        let registration = self.load_pending(lookup).await?;
        self.provision(registration).await
    }

    /// 条件更新 pending -> rejected，然后通知申请人
    pub async fn reject(&self, lookup: RegistrationLookup) -> Result<PendingRegistration> {
        let mut registration = self
            .storage
            .get_registration(lookup)
            .await?
            .ok_or_else(|| SISystemError::not_found("Pendaftaran tidak ditemukan"))?;

        if !self.storage.reject_registration(registration.id).await? {
            return Err(SISystemError::conflict(ALREADY_PROCESSED));
        }
        registration.status = RegistrationStatus::Rejected;
        info!("学校注册申请 {} 已拒绝", registration.id);

        self.mailer
            .send_best_effort(&templates::rejection(
                &registration.email,
                &registration.school_name,
            ))
            .await;

        Ok(registration)
    }

    async fn load_pending(&self, lookup: RegistrationLookup) -> Result<PendingRegistration> {
        let registration = self
            .storage
            .get_registration(lookup)
            .await?
            .ok_or_else(|| SISystemError::not_found("Pendaftaran tidak ditemukan"))?;

        if !registration.is_pending() {
            return Err(SISystemError::conflict(ALREADY_PROCESSED));
        }
        Ok(registration)
    }

    async fn provision(&self, registration: PendingRegistration) -> Result<ApprovalCredentials> {
        let config = AppConfig::get();
        let password = generate_temporary_password();
        let account = self.ensure_account(&registration, &password).await?;

        let school = NewSchool {
            name: registration.school_name.clone(),
            slug: slugify_school_name(
                &registration.school_name,
                chrono::Utc::now().timestamp_millis(),
            ),
            education_level: registration.education_level,
            phone: Some(registration.phone.clone()),
            email: Some(registration.email.clone()),
        };
        let profile = NewUserProfile {
            id: account.id,
            school_id: None,
            email: registration.email.clone(),
            full_name: registration.full_name.clone(),
            role: UserRole::SuperAdmin,
            must_change_password: true,
        };

        let school = match self
            .storage
            .provision_tenant(registration.id, school, profile)
            .await
        {
            Ok(school) => school,
            Err(e) => {
                error!("开通租户失败（申请 {}）: {}", registration.id, e);
                if account.created {
                    match self.identity.delete_account(account.id).await {
                        Ok(()) => warn!("已删除本次新建的身份账号 {}", account.id),
                        Err(cleanup) => error!(
                            "删除身份账号 {} 失败，需要人工清理: {}",
                            account.id, cleanup
                        ),
                    }
                }
                return Err(e);
            }
        };

        self.mailer
            .send_best_effort(&templates::approval(config, &registration.email, &password))
            .await;

        Ok(ApprovalCredentials {
            email: registration.email,
            password,
            phone: registration.phone,
            full_name: registration.full_name,
            school_name: school.name,
            school_id: school.id,
        })
    }

    /// 创建账号；邮箱已存在时在第一页账号中查找并重置密码
    async fn ensure_account(
        &self,
        registration: &PendingRegistration,
        password: &str,
    ) -> Result<ProvisionedAccount> {
        match self
            .identity
            .create_account(&registration.email, password, &registration.full_name)
            .await
        {
            Ok(account) => Ok(ProvisionedAccount {
                id: account.id,
                created: true,
            }),
            Err(SISystemError::Conflict(_)) => {
                let per_page = AppConfig::get().identity.list_page_size;
                // 只看第一页，找不到时交给管理员处理
                let existing = self
                    .identity
                    .list_accounts(1, per_page)
                    .await?
                    .into_iter()
                    .find(|account| account.email.eq_ignore_ascii_case(&registration.email))
                    .ok_or_else(|| {
                        SISystemError::identity_provider(format!(
                            "Akun {} sudah ada tetapi tidak dapat ditemukan. \
                             Hapus akun tersebut secara manual lalu setujui ulang.",
                            registration.email
                        ))
                    })?;

                self.identity.update_password(existing.id, password).await?;
                warn!("复用已存在的身份账号 {} 并重置密码", existing.id);
                Ok(ProvisionedAccount {
                    id: existing.id,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// 校验并规范化申请表单，生成邮件链接令牌
fn normalize_submission(request: SubmitRegistrationRequest) -> Result<NewRegistration> {
    let school_name = request.school_name.trim().to_string();
    let full_name = title_case(request.full_name.trim());
    let email = normalize_email(&request.email);
    let phone = request.phone.trim().to_string();

    if school_name.is_empty() || full_name.is_empty() || phone.is_empty() {
        return Err(SISystemError::validation("Semua kolom wajib diisi"));
    }
    validate_email(&email).map_err(SISystemError::validation)?;

    Ok(NewRegistration {
        school_name,
        full_name,
        email,
        phone,
        education_level: request.education_level,
        token: uuid::Uuid::new_v4().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::DatabaseIdentityProvider;
    use crate::mailer::testing::RecordingProvider;
    use crate::models::schools::EducationLevel;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support;

    struct Fixture {
        workflow: RegistrationWorkflow,
        db: SeaOrmStorage,
        storage: Arc<dyn Storage>,
        identity: Arc<dyn IdentityProvider>,
        outbox: Arc<RecordingProvider>,
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(DatabaseIdentityProvider::new(storage.connection().clone()));
        let db = storage.clone();
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let outbox = Arc::new(RecordingProvider::default());
        let mailer = Arc::new(Mailer::new(Some(outbox.clone()), None));

        Fixture {
            workflow: RegistrationWorkflow::new(storage.clone(), identity.clone(), mailer),
            db,
            storage,
            identity,
            outbox,
        }
    }

    fn request(email: &str) -> SubmitRegistrationRequest {
        SubmitRegistrationRequest {
            school_name: "SMP Negeri 1 Cimahi".into(),
            full_name: "  siti rahma ".into(),
            email: email.into(),
            phone: "0812-3456-7890".into(),
            education_level: EducationLevel::Smp,
        }
    }

    #[tokio::test]
    async fn test_submit_normalizes_and_blocks_duplicates() {
        let f = fixture().await;

        let created = f
            .workflow
            .submit(request("  Siti@Sekolah.ID "))
            .await
            .unwrap();
        assert_eq!(created.email, "siti@sekolah.id");
        assert_eq!(created.full_name, "Siti Rahma");
        assert!(created.is_pending());
        assert!(!created.token.is_empty());
        assert!(
            f.outbox
                .sent()
                .iter()
                .any(|mail| mail.to == "siti@sekolah.id")
        );

        let err = f
            .workflow
            .submit(request("siti@sekolah.id"))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_existing_profile_and_bad_email() {
        let f = fixture().await;
        let school_id = test_support::create_school(&f.db, "lama").await;
        test_support::create_profile(
            &f.db,
            "guru@sekolah.id",
            Some(school_id),
            UserRole::Teacher,
        )
        .await;

        let err = f
            .workflow
            .submit(request("guru@sekolah.id"))
            .await
            .unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));

        let err = f.workflow.submit(request("bukan-email")).await.unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));
    }

    #[tokio::test]
    async fn test_approve_provisions_tenant_once() {
        let f = fixture().await;
        let registration = f.workflow.submit(request("siti@sekolah.id")).await.unwrap();

        let credentials = f
            .workflow
            .approve(RegistrationLookup::Token(registration.token.clone()))
            .await
            .unwrap();
        assert_eq!(credentials.email, "siti@sekolah.id");
        assert_eq!(credentials.school_name, "SMP Negeri 1 Cimahi");

        let school = f
            .storage
            .get_school(credentials.school_id)
            .await
            .unwrap()
            .unwrap();
        assert!(school.slug.starts_with("smp-negeri-1-cimahi-"));

        let account = f
            .identity
            .verify_credentials("siti@sekolah.id", &credentials.password)
            .await
            .unwrap()
            .unwrap();
        let profile = f.storage.get_user_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(profile.role, UserRole::SuperAdmin);
        assert_eq!(profile.school_id, Some(credentials.school_id));
        assert!(profile.must_change_password);
        assert!(profile.is_active);

        assert!(
            f.outbox
                .sent()
                .iter()
                .any(|mail| mail.html.contains(&credentials.password))
        );

        // 不能重复审批，也不能在审批后拒绝
        let again = f
            .workflow
            .approve(RegistrationLookup::Id(registration.id))
            .await
            .unwrap_err();
        assert!(matches!(again, SISystemError::Conflict(_)));
        let reject = f
            .workflow
            .reject(RegistrationLookup::Id(registration.id))
            .await
            .unwrap_err();
        assert!(matches!(reject, SISystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_approve_reuses_existing_account() {
        let f = fixture().await;
        let existing = f
            .identity
            .create_account("Siti@Sekolah.id", "lama2024ok", "Siti")
            .await
            .unwrap();
        let registration = f.workflow.submit(request("siti@sekolah.id")).await.unwrap();

        let credentials = f
            .workflow
            .approve(RegistrationLookup::Id(registration.id))
            .await
            .unwrap();

        let account = f
            .identity
            .verify_credentials("siti@sekolah.id", &credentials.password)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.id, existing.id);
        assert!(
            f.identity
                .verify_credentials("siti@sekolah.id", "lama2024ok")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_failed_provisioning_deletes_new_account_only() {
        let f = fixture().await;
        let registration = f.workflow.submit(request("baru@sekolah.id")).await.unwrap();
        // 申请在数据库中已被拒绝，开通事务会失败
        f.storage
            .reject_registration(registration.id)
            .await
            .unwrap();

        let err = f.workflow.provision(registration).await.unwrap_err();
        assert!(matches!(err, SISystemError::Conflict(_)));
        assert!(
            f.identity
                .find_account_by_email("baru@sekolah.id")
                .await
                .unwrap()
                .is_none()
        );

        // 复用的旧账号保留
        f.identity
            .create_account("lama@sekolah.id", "lama2024ok", "Lama")
            .await
            .unwrap();
        let registration = f.workflow.submit(request("lama@sekolah.id")).await.unwrap();
        f.storage
            .reject_registration(registration.id)
            .await
            .unwrap();

        f.workflow.provision(registration).await.unwrap_err();
        assert!(
            f.identity
                .find_account_by_email("lama@sekolah.id")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_reject_is_one_way_and_notifies() {
        let f = fixture().await;
        let registration = f.workflow.submit(request("siti@sekolah.id")).await.unwrap();

        let rejected = f
            .workflow
            .reject(RegistrationLookup::Token(registration.token.clone()))
            .await
            .unwrap();
        assert_eq!(rejected.status, RegistrationStatus::Rejected);
        assert_eq!(
            f.outbox
                .sent()
                .iter()
                .filter(|mail| mail.to == "siti@sekolah.id")
                .count(),
            2
        );

        let again = f
            .workflow
            .reject(RegistrationLookup::Id(registration.id))
            .await
            .unwrap_err();
        assert!(matches!(again, SISystemError::Conflict(_)));

        let missing = f
            .workflow
            .approve(RegistrationLookup::Token("tidak-ada".into()))
            .await
            .unwrap_err();
        assert!(matches!(missing, SISystemError::NotFound(_)));
    }
}
