use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::SISystemError;
use crate::identity::IdentityProvider;
use crate::mailer::Mailer;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::NewUserProfile;
use crate::storage::Storage;
use crate::utils::random_code::generate_random_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub identity: Arc<dyn IdentityProvider>,
    pub cache: Arc<dyn ObjectCache>,
    pub mailer: Arc<Mailer>,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 没有任何用户资料时创建平台管理员（不属于任何学校）
async fn seed_system_admin(storage: &Arc<dyn Storage>, identity: &Arc<dyn IdentityProvider>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating system admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    // 上次启动可能只建了账号没写资料
    let account = match identity
        .create_account(&email, &password, "System Administrator")
        .await
    {
        Ok(account) => account,
        Err(SISystemError::Conflict(_)) => match identity.find_account_by_email(&email).await {
            Ok(Some(account)) => {
                warn!("Identity account {} already exists, reusing it", email);
                account
            }
            Ok(None) | Err(_) => {
                warn!("Failed to load existing identity account {}", email);
                return;
            }
        },
        Err(e) => {
            warn!("Failed to create admin identity account: {}", e);
            return;
        }
    };

    let profile = NewUserProfile {
        id: account.id,
        school_id: None,
        email: account.email.clone(),
        full_name: account.full_name.clone(),
        role: UserRole::SystemAdmin,
        must_change_password: false,
    };

    match storage.create_user_profile(profile).await {
        Ok(user) => {
            info!(
                "System admin account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create system admin profile: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、身份提供方、缓存和邮件通道
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let (storage, identity) = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_system_admin(&storage, &identity).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let mailer = Mailer::from_config(&AppConfig::get().email).expect("Failed to create mailer");
    if !mailer.is_configured() {
        warn!("No email provider configured, outgoing emails will fail");
    }

    StartupContext {
        storage,
        identity,
        cache,
        mailer: Arc::new(mailer),
    }
}
