//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// GET /api/categories - 分类列表
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.catalog.list_categories(ctx.tenant()?).await?))
}

/// POST /api/categories - 新增分类, 返回最新列表
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(
        state
            .catalog
            .add_category(ctx.tenant()?, &payload.name)
            .await?,
    ))
}

/// DELETE /api/categories/:name - 删除分类, 返回最新列表
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.catalog.remove_category(ctx.tenant()?, &name).await?))
}
