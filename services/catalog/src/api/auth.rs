//! 管理员权限校验

use auth_core::{Claims, ROLE_ADMIN};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use errors::AppError;
use tracing::warn;

use super::routes::AppState;

/// 要求 `ADMIN` 角色的提取器
///
/// 缺少或无效的 Bearer token 返回 401，角色不足返回 403。
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let claims = state.token_service.validate_bearer(header)?;

        if !claims.is_admin() {
            warn!(subject = %claims.sub, "Admin role required");
            return Err(AppError::forbidden(format!("Missing role: {}", ROLE_ADMIN)));
        }

        Ok(Self(claims))
    }
}
