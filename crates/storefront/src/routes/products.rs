//! Product route handlers.
//!
//! Reads are public. Writes require an admin token.

use axum::{Json, extract::State, http::StatusCode};

use apex_core::ProductId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductInput};
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// GET /api/products
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).get(id).await?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.pool()).create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).update(id, input).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    CatalogService::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
