use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,            // 用户 ID（即身份账号 ID）
    pub role: String,           // 用户角色
    pub school_id: Option<i64>, // 所属学校，平台管理员为空
    pub token_type: String,     // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

// Token 对
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    fn sign(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
        token_type: &str,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            school_id,
            token_type: token_type.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::get_secret().as_ref()),
        )
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::sign(
            user_id,
            role,
            school_id,
            "access",
            chrono::Duration::minutes(minutes),
        )
    }

    // 生成 Access + Refresh Token
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        school_id: Option<i64>,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let refresh_expiry = refresh_token_expiry.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });

        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role, school_id)?,
            refresh_token: Self::sign(user_id, role, school_id, "refresh", refresh_expiry)?,
        })
    }

    // 校验签名、过期时间与 token 类型
    fn verify_token_type(
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(Self::get_secret().as_ref());
        let claims = decode::<Claims>(token, &decoding_key, &Validation::default())?.claims;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, "access")
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, "refresh")
    }

    /// 创建 Refresh Token Cookie，max_age 与 token 有效期一致
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age: chrono::Duration,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时下发的空 Cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}
