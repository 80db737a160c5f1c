//! Saved Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::SavedOrder;

use crate::auth::RequestContext;
use crate::checkout::CartSummary;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/saved-orders - 挂单列表
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<SavedOrder>>> {
    Ok(Json(state.parking.list(ctx.tenant()?).await?))
}

/// POST /api/saved-orders/:id/resume - 取单到当前收银会话
pub async fn resume(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let tenant = ctx.tenant()?;
    let session = state.sessions.session(&ctx.actor.username, tenant.tenant_id());
    let mut session = session.lock().await;
    state.parking.load(tenant, &mut session, &id).await?;
    Ok(Json(state.checkout.summary(tenant, &session).await?))
}
