//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。同一套令牌服务同时给员工和
//! 客户签发令牌，`token_type` 区分两类主体。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::{Customer, Staff};
use thiserror::Error;

/// Staff token type
pub const TOKEN_TYPE_STAFF: &str = "staff";
/// Customer token type
pub const TOKEN_TYPE_CUSTOMER: &str = "customer";

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using generated key", e);
                    generate_printable_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7 * 24 * 60), // 默认 7 天
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ledger-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "ledger-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 主体 ID (Subject)
    pub sub: String,
    /// 显示名称
    pub name: String,
    /// 角色: admin | user | customer
    pub role: String,
    /// 主体类型: staff | customer
    pub token_type: String,
    /// 客户序列号 (仅客户令牌)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<i64>,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "LedgerServerDevelopmentSecureKey2024!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set! Generating secure temporary key for development."
                );
                Ok(generate_printable_jwt_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为员工签发令牌
    pub fn generate_staff_token(&self, staff: &Staff) -> Result<String, JwtError> {
        self.generate_token(staff.id, &staff.name, &staff.role, TOKEN_TYPE_STAFF, None)
    }

    /// 为客户签发令牌
    pub fn generate_customer_token(&self, customer: &Customer) -> Result<String, JwtError> {
        self.generate_token(
            customer.id,
            &customer.name,
            "customer",
            TOKEN_TYPE_CUSTOMER,
            Some(customer.serial_number),
        )
    }

    fn generate_token(
        &self,
        id: i64,
        name: &str,
        role: &str,
        token_type: &str,
        serial_number: Option<i64>,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            serial_number,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前主体上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求扩展。员工和客户共用同一结构，
/// `token_type` 区分。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    /// admin | user | customer
    pub role: String,
    /// staff | customer
    pub token_type: String,
    /// 客户序列号 (仅客户主体)
    pub serial_number: Option<i64>,
}

impl CurrentUser {
    pub fn is_staff(&self) -> bool {
        self.token_type == TOKEN_TYPE_STAFF
    }

    pub fn is_admin(&self) -> bool {
        self.is_staff() && self.role == "admin"
    }

    pub fn is_customer(&self) -> bool {
        self.token_type == TOKEN_TYPE_CUSTOMER
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("Bad subject: {}", claims.sub)))?;

        Ok(Self {
            id,
            name: claims.name,
            role: claims.role,
            token_type: claims.token_type,
            serial_number: claims.serial_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "ledger-server".into(),
            audience: "ledger-clients".into(),
        })
    }

    fn staff() -> Staff {
        Staff {
            id: 42,
            username: "admin".into(),
            name: "Administrator".into(),
            role: "admin".into(),
            hash_pass: String::new(),
            is_active: true,
            created_at: 0,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: 7,
            serial_number: 3,
            name: "Priya Sharma".into(),
            mobile: "9876543211".into(),
            address: String::new(),
            hash_pass: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn staff_token_roundtrip() {
        let service = test_service();
        let token = service.generate_staff_token(&staff()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.token_type, TOKEN_TYPE_STAFF);
        assert_eq!(claims.serial_number, None);

        let user = CurrentUser::try_from(claims).unwrap();
        assert!(user.is_staff());
        assert!(user.is_admin());
        assert!(!user.is_customer());
    }

    #[test]
    fn customer_token_carries_serial_number() {
        let service = test_service();
        let token = service.generate_customer_token(&customer()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.token_type, TOKEN_TYPE_CUSTOMER);
        assert_eq!(claims.serial_number, Some(3));

        let user = CurrentUser::try_from(claims).unwrap();
        assert!(user.is_customer());
        assert!(!user.is_staff());
        assert!(!user.is_admin());
    }

    #[test]
    fn tokens_from_other_secret_are_rejected() {
        let service = test_service();
        let other = JwtService::with_config(JwtConfig {
            secret: "ffffffffffffffffffffffffffffffff".into(),
            ..service.config.clone()
        });

        let token = other.generate_staff_token(&staff()).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
