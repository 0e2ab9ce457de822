//! HTTP API

mod auth;
mod params;
mod routes;

use std::sync::Arc;

use auth_core::TokenService;
use sqlx::PgPool;

use crate::application::CatalogHandler;
use crate::infrastructure::persistence::{PostgresCategoryRepository, PostgresProductRepository};

pub use auth::RequireAdmin;
pub use params::ProductSearchParams;
pub use routes::{AppState, router};

/// 使用 PostgreSQL 仓储装配完整路由
pub fn build_router(pool: PgPool, token_service: Arc<TokenService>) -> axum::Router {
    let product_repo = Arc::new(PostgresProductRepository::new(pool.clone()));
    let category_repo = Arc::new(PostgresCategoryRepository::new(pool));
    let handler = Arc::new(CatalogHandler::new(product_repo, category_repo));

    router(AppState::new(handler, token_service))
}
