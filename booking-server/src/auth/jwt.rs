//! JWT 令牌服务
//!
//! 令牌只携带会话快照 `{id, role}` (外加显示名)；权限与偏好在每次请求时
//! 从存储重新读取，参见 [`crate::auth::require_auth`]。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::client::SessionSnapshot;
use shared::models::{Role, User};
use thiserror::Error;

/// Minimum accepted secret length
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    /// 从环境变量读取；`JWT_SECRET` 缺失或过短时生成临时密钥
    /// (重启后所有会话失效)
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Ok(_) => {
                tracing::warn!(
                    "JWT_SECRET shorter than {} characters, using a temporary key",
                    MIN_SECRET_LEN
                );
                generate_secure_printable_jwt_secret()
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using a temporary key");
                generate_secure_printable_jwt_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "booking-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "booking-clients".to_string()),
        }
    }
}

impl JwtConfig {
    /// 使用固定密钥 (测试 / 嵌入场景)
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 1440,
            issuer: "booking-server".to_string(),
            audience: "booking-clients".to_string(),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 角色
    pub role: Role,
    /// 显示名 (仅用于日志)
    pub name: String,
    /// 令牌类型
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

impl Claims {
    /// 令牌中的会话快照
    pub fn snapshot(&self) -> Result<SessionSnapshot, JwtError> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("bad subject: {}", self.sub)))?;
        Ok(SessionSnapshot {
            id,
            role: self.role,
        })
    }
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
}

/// 生成可打印的安全 JWT 密钥 (64 字符)
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // 系统随机源不可用时退化为 uuid (同样来自 OS 随机源)
        return format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
    }
    bytes
        .iter()
        .map(|b| ALLOWED[*b as usize % ALLOWED.len()] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish_non_exhaustive()
    }
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

    /// 为用户生成新令牌
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            name: user.name.clone(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
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

    /// 获取距离过期的剩余秒数
    pub fn get_expiration_seconds(&self, claims: &Claims) -> i64 {
        let now = Utc::now().timestamp();
        (claims.exp - now).max(0)
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文
///
/// 由认证中间件根据令牌快照从存储重新构建，注入到请求处理函数
///
/// # 示例
///
/// ```ignore
/// async fn handler(Extension(user): Extension<CurrentUser>) -> Json<()> {
///     if user.has_permission("products:manage") {
///         // 有权限
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: i64,
    /// 显示名
    pub name: String,
    /// 角色
    pub role: Role,
    /// 权限列表
    pub permissions: Vec<String>,
    /// 关联的专业人员档案
    pub professional_id: Option<i64>,
}

impl CurrentUser {
    pub fn from_user(user: &User, professional_id: Option<i64>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            permissions: user.permissions.clone(),
            professional_id,
        }
    }

    /// 是否管理员
    ///
    /// 管理员角色拥有所有权限
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 是否属于指定角色之一
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// 检查是否拥有指定权限
    ///
    /// # 规则
    ///
    /// 1. 管理员拥有所有权限
    /// 2. 权限列表包含 `"all"` 则拥有所有权限
    /// 3. 精确匹配或前缀匹配 (`"products:*"` 匹配 `"products:manage"`)
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == "all" || p == permission {
                return true;
            }
            match p.strip_suffix(":*") {
                Some(prefix) => permission
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(':')),
                None => false,
            }
        })
    }

    /// 检查是否拥有任一指定权限
    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    /// 检查是否拥有所有指定权限
    pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.has_permission(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Preferences;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::with_secret(
            "test-secret-that-is-long-enough-for-hs256",
        ))
    }

    fn user(role: Role) -> User {
        User {
            id: 42,
            name: "Lucía".into(),
            email: "lucia@example.com".into(),
            phone: None,
            role,
            permissions: vec![],
            preferences: Preferences::default(),
            avatar: None,
            loyalty_points: 0,
            is_active: true,
            password_hash: String::new(),
            created_at: 0,
        }
    }

    fn current(role: Role, permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "john".to_string(),
            role,
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            professional_id: None,
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service.generate_token(&user(Role::Client)).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Client);
        assert_eq!(claims.token_type, "access");
        let snapshot = claims.snapshot().unwrap();
        assert_eq!(snapshot.id, 42);
        assert_eq!(snapshot.role, Role::Client);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = service().generate_token(&user(Role::Admin)).unwrap();
        let other = JwtService::with_config(JwtConfig::with_secret(
            "a-completely-different-secret-value-0123",
        ));
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = JwtConfig::with_secret("test-secret-that-is-long-enough-for-hs256");
        config.expiration_minutes = -10;
        let service = JwtService::with_config(config);
        let token = service.generate_token(&user(Role::Client)).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_current_user_permissions() {
        let user = current(Role::Professional, &["products:manage", "audit:*"]);

        assert!(user.has_permission("products:manage"));
        assert!(user.has_permission("audit:view"));
        assert!(!user.has_permission("auditor:view"));
        assert!(!user.has_permission("services:manage"));
        assert!(user.has_any_permission(&["services:manage", "audit:view"]));
        assert!(!user.has_all_permissions(&["services:manage", "audit:view"]));
    }

    #[test]
    fn test_admin_and_all_have_every_permission() {
        let admin = current(Role::Admin, &[]);
        assert!(admin.has_permission("users:manage"));
        assert!(admin.is_admin());

        let super_user = current(Role::Client, &["all"]);
        assert!(super_user.has_permission("branches:manage"));
        assert!(!super_user.is_admin());
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_secure_printable_jwt_secret();
        let b = generate_secure_printable_jwt_secret();
        assert_eq!(a.len(), 64);
        assert!(a.len() >= MIN_SECRET_LEN);
        assert_ne!(a, b);
    }
}
