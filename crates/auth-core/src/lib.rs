//! auth-core - 认证核心库
//!
//! JWT/Claims/角色检查核心逻辑

use chrono::{Duration, Utc};
use errors::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 管理员角色
pub const ROLE_ADMIN: &str = "ADMIN";

/// 普通用户角色
pub const ROLE_USER: &str = "USER";

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Roles
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    pub fn new(
        subject: &str,
        roles: Vec<String>,
        expires_in_secs: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            roles,
        }
    }

    /// 角色匹配忽略 `ROLE_` 前缀（`ROLE_ADMIN` 与 `ADMIN` 等价）
    pub fn has_role(&self, role: &str) -> bool {
        let wanted = normalize_role(role);
        self.roles.iter().any(|r| normalize_role(r) == wanted)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

fn normalize_role(role: &str) -> &str {
    role.strip_prefix("ROLE_").unwrap_or(role)
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(secret: &str, access_token_expires_in: i64, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            issuer,
            audience,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, subject: &str, roles: Vec<String>) -> AppResult<String> {
        let claims = Claims::new(
            subject,
            roles,
            self.access_token_expires_in,
            &self.issuer,
            &self.audience,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 验证令牌
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0; // 不允许时间偏差

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthenticated(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.jti.is_empty() {
            return Err(AppError::unauthenticated("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// 从 `Authorization` 头解析并验证 Bearer token
    pub fn validate_bearer(&self, header: Option<&str>) -> AppResult<Claims> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Missing bearer token"))?;

        self.validate_token(token)
    }
}
