//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{User, UserCreate, UserUpdate};

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/users - 当前作用域内的账号
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.list(&ctx.scope).await?))
}

/// POST /api/users - 新建账号
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.create(&ctx.actor, &ctx.scope, payload).await?))
}

/// PUT /api/users/:username - 更新账号
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(username): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    Ok(Json(
        state
            .users
            .update(&ctx.actor, &ctx.scope, &username, payload)
            .await?,
    ))
}

/// DELETE /api/users/:username - 删除账号
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(username): Path<String>,
) -> AppResult<Json<bool>> {
    state.users.delete(&ctx.actor, &ctx.scope, &username).await?;
    Ok(Json(true))
}
