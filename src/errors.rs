//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_sisystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SISystemError {
            $($variant(String),)*
        }

        impl SISystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SISystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SISystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SISystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SISystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SISystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_sisystem_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Conflict Error"),
    IdentityProvider("E015", "Identity Provider Error"),
    EmailDelivery("E016", "Email Delivery Error"),
}

impl SISystemError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            SISystemError::Validation(_) | SISystemError::DateParse(_) => StatusCode::BAD_REQUEST,
            SISystemError::NotFound(_) => StatusCode::NOT_FOUND,
            SISystemError::Conflict(_) => StatusCode::CONFLICT,
            SISystemError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SISystemError::Authorization(_) => StatusCode::FORBIDDEN,
            SISystemError::IdentityProvider(_) | SISystemError::EmailDelivery(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的 API 错误码
    pub fn api_code(&self) -> crate::models::ErrorCode {
        use crate::models::ErrorCode;

        match self {
            SISystemError::Validation(_) | SISystemError::DateParse(_) => ErrorCode::BadRequest,
            SISystemError::NotFound(_) => ErrorCode::NotFound,
            SISystemError::Conflict(_) => ErrorCode::Conflict,
            SISystemError::Authentication(_) => ErrorCode::Unauthorized,
            SISystemError::Authorization(_) => ErrorCode::Forbidden,
            SISystemError::IdentityProvider(_) => ErrorCode::IdentityProviderFailed,
            SISystemError::EmailDelivery(_) => ErrorCode::EmailDeliveryFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for SISystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SISystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SISystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        SISystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SISystemError {
    fn from(err: std::io::Error) -> Self {
        SISystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SISystemError {
    fn from(err: serde_json::Error) -> Self {
        SISystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SISystemError {
    fn from(err: chrono::ParseError) -> Self {
        SISystemError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for SISystemError {
    fn from(err: reqwest::Error) -> Self {
        SISystemError::EmailDelivery(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SISystemError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_codes() {
        assert_eq!(SISystemError::cache_connection("test").code(), "E001");
        assert_eq!(SISystemError::database_config("test").code(), "E003");
        assert_eq!(SISystemError::validation("test").code(), "E007");
        assert_eq!(SISystemError::authentication("test").code(), "E012");
        assert_eq!(SISystemError::conflict("test").code(), "E014");
        assert_eq!(SISystemError::email_delivery("test").code(), "E016");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SISystemError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            SISystemError::identity_provider("test").error_type(),
            "Identity Provider Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SISystemError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = SISystemError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SISystemError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SISystemError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SISystemError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
