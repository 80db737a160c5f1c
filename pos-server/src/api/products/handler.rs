//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::api::SearchQuery;
use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub product_id: String,
    pub description: String,
}

/// GET /api/products?q= - 获取商品 (按名称搜索)
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let tenant = ctx.tenant()?;
    let products = state
        .catalog
        .list_products(tenant, query.q.as_deref())
        .await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.catalog.get_product(ctx.tenant()?, &id).await?))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.catalog.add_product(ctx.tenant()?, payload).await?))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    Ok(Json(
        state
            .catalog
            .update_product(ctx.tenant()?, &id, payload)
            .await?,
    ))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.remove_product(ctx.tenant()?, &id).await?;
    Ok(Json(true))
}

/// POST /api/products/:id/description - AI 生成商品描述 (不自动保存)
pub async fn generate_description(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<DescriptionResponse>> {
    let product = state.catalog.get_product(ctx.tenant()?, &id).await?;
    let description = state
        .enrichment
        .product_description(&product.name, &product.category)
        .await;
    Ok(Json(DescriptionResponse {
        product_id: product.id,
        description,
    }))
}
