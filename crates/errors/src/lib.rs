//! errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 底层错误（驱动错误等）的装箱类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// 预留：更严格的过滤条件校验
    #[error("Invalid filter combination: {0}")]
    InvalidFilterCombination(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// 存储层的任何失败（连接、SQL、约束、解码），保留原始错误
    #[error("Persistence failure: {context}")]
    PersistenceFailure {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_filter_combination(msg: impl Into<String>) -> Self {
        Self::InvalidFilterCombination(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn persistence(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::PersistenceFailure {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::PersistenceFailure { .. })
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::InvalidFilterCombination(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Internal(_) => 500,
            Self::PersistenceFailure { .. } => 500,
            Self::Configuration(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.public_detail(),
            instance: None,
        }
    }

    // 存储层错误不向客户端暴露驱动信息
    fn public_detail(&self) -> String {
        match self {
            Self::PersistenceFailure { .. } | Self::Internal(_) | Self::Configuration(_) => {
                "Oops... our bad.".to_string()
            }
            other => other.to_string(),
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::InvalidFilterCombination(_) => "invalid-filter-combination",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::Internal(_) => "internal",
            Self::PersistenceFailure { .. } => "persistence",
            Self::Configuration(_) => "configuration",
        };
        format!("https://api.easyshop.dev/problems/{}", slug)
    }

    fn problem_title(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource Not Found".to_string(),
            Self::Validation(_) => "Validation Error".to_string(),
            Self::InvalidFilterCombination(_) => "Invalid Filter Combination".to_string(),
            Self::Unauthenticated(_) => "Unauthenticated".to_string(),
            Self::Forbidden(_) => "Forbidden".to_string(),
            Self::Internal(_) => "Internal Server Error".to_string(),
            Self::PersistenceFailure { .. } => "Persistence Failure".to_string(),
            Self::Configuration(_) => "Configuration Error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status_code() >= 500 {
            tracing::error!(error = %self, cause = ?std::error::Error::source(&self), "Request failed");
        }
        let problem = self.to_problem_details();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem)).into_response()
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
