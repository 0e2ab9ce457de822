//! 路由与 HTTP 处理函数

use std::sync::Arc;

use auth_core::TokenService;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use errors::AppResult;
use tower_http::cors::CorsLayer;

use crate::application::CatalogHandler;
use crate::domain::{Category, Product};

use super::auth::RequireAdmin;
use super::params::ProductSearchParams;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<CatalogHandler>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(handler: Arc<CatalogHandler>, token_service: Arc<TokenService>) -> Self {
        Self {
            handler,
            token_service,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(search_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/categories/{id}/products", get(list_products_in_category))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ========== 商品 ==========

async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.handler.search_products(params.into()).await?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.handler.get_product(id).await?))
}

async fn create_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let created = state.handler.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(product): Json<Product>,
) -> AppResult<StatusCode> {
    state.handler.update_product(id, product).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.handler.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== 分类 ==========

async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.handler.list_categories().await?))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.handler.get_category(id).await?))
}

async fn list_products_in_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.handler.list_products_in_category(id).await?))
}

async fn create_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(category): Json<Category>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let created = state.handler.create_category(category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(category): Json<Category>,
) -> AppResult<StatusCode> {
    state.handler.update_category(id, category).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.handler.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
