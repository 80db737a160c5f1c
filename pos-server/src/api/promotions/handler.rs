//! Promotion API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{CartItem, Promotion, PromotionCreate, PromotionUpdate};

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::promotion::AppliedPromotion;
use crate::utils::AppResult;
use crate::utils::validation::validate_cart_lines;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub code: String,
    /// 待试算的购物车; 省略时使用当前收银会话
    pub items: Option<Vec<CartItem>>,
}

/// GET /api/promotions - 促销列表
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<Promotion>>> {
    Ok(Json(state.promotions.list(ctx.tenant()?).await?))
}

/// POST /api/promotions/evaluate - 试算促销码 (不修改会话)
///
/// 满足条件时返回折扣, 否则返回拒绝原因对应的错误码
pub async fn evaluate(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<EvaluateRequest>,
) -> AppResult<Json<AppliedPromotion>> {
    let tenant = ctx.tenant()?;
    let items = match req.items {
        Some(items) => {
            validate_cart_lines(&items)?;
            items
        }
        None => {
            let session = state.sessions.session(&ctx.actor.username, tenant.tenant_id());
            let session = session.lock().await;
            session.items().to_vec()
        }
    };
    Ok(Json(
        state.promotions.apply_code(tenant, &req.code, &items).await?,
    ))
}

/// POST /api/promotions - 创建促销
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<PromotionCreate>,
) -> AppResult<Json<Promotion>> {
    Ok(Json(state.promotions.create(ctx.tenant()?, payload).await?))
}

/// PUT /api/promotions/:id - 更新促销
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<PromotionUpdate>,
) -> AppResult<Json<Promotion>> {
    Ok(Json(
        state.promotions.update(ctx.tenant()?, &id, payload).await?,
    ))
}

/// DELETE /api/promotions/:id - 删除促销
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.promotions.delete(ctx.tenant()?, &id).await?;
    Ok(Json(true))
}

/// POST /api/promotions/:id/toggle - 启用/停用
pub async fn toggle(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<Promotion>> {
    Ok(Json(state.promotions.toggle(ctx.tenant()?, &id).await?))
}
