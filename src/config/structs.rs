use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub argon2: Argon2Config,
    pub identity: IdentityConfig,
    pub email: EmailConfig,
    pub school: SchoolConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
    /// 对外访问地址，用于邮件中的链接
    pub url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            system_name: "Sistem Informasi Sekolah".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            url: "http://localhost:8080".to_string(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            unix_socket_path: String::new(),
            workers: 0,
            max_workers: 8,
            timeouts: TimeoutConfig::default(),
            limits: LimitConfig::default(),
        }
    }
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            client_request: 5000,
            client_disconnect: 1000,
            keep_alive: 30,
        }
    }
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_payload_size: 2 * 1024 * 1024,
        }
    }
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    #[serde(skip_serializing)] // 不序列化到JSON响应中
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub refresh_token_remember_me_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiry: 15,
            refresh_token_expiry: 1,
            refresh_token_remember_me_expiry: 7,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sisystem.db".to_string(),
            pool_size: 10,
            timeout: 30,
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: "moka".to_string(),
            default_ttl: 300,
            redis: RedisConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "sisystem:".to_string(),
            pool_size: 10,
        }
    }
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
            ],
            allowed_headers: vec!["*".to_string()],
            max_age: 3600,
        }
    }
}

/// Argon2 参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

/// 身份提供方配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// 账号列表默认分页大小
    pub list_page_size: u64,
    /// 找回密码令牌有效期（分钟）
    pub recovery_token_expiry_minutes: i64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            list_page_size: 50,
            recovery_token_expiry_minutes: 60,
        }
    }
}

/// 邮件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub sender_email: String,
    pub sender_name: String,
    /// 接收新注册通知的系统管理员邮箱
    pub admin_notify_email: String,
    pub timeout_secs: u64,
    pub mailjet: MailjetConfig,
    pub resend: ResendConfig,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender_email: "noreply@localhost".to_string(),
            sender_name: "Sistem Informasi Sekolah".to_string(),
            admin_notify_email: String::new(),
            timeout_secs: 10,
            mailjet: MailjetConfig::default(),
            resend: ResendConfig::default(),
        }
    }
}

/// Mailjet（主通道）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailjetConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    pub endpoint: String,
}

impl Default for MailjetConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            endpoint: "https://api.mailjet.com/v3.1/send".to_string(),
        }
    }
}

/// Resend（备用通道）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResendConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub endpoint: String,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.resend.com/emails".to_string(),
        }
    }
}

/// 学校业务默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    pub default_class_capacity: i32,
    pub default_hours_per_week: i32,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            default_class_capacity: 30,
            default_hours_per_week: 2,
        }
    }
}
