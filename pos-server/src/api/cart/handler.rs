//! Cart API Handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{OrderType, SavedOrder, Transaction};
use tokio::sync::Mutex;

use crate::auth::RequestContext;
use crate::checkout::{CartSummary, CheckoutRequest, CheckoutSession, PaymentMethod};
use crate::core::ServerState;
use crate::tenancy::TenantScope;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsRequest {
    /// 手填客户名或桌号
    pub customer_name: Option<String>,
    pub order_type: Option<OrderType>,
    /// 关联已有客户
    pub customer_id: Option<String>,
    /// 取消关联客户
    #[serde(default)]
    pub detach_customer: bool,
}

#[derive(Debug, Deserialize)]
pub struct PromotionRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
}

fn session_of(
    state: &ServerState,
    ctx: &RequestContext,
) -> AppResult<(TenantScope, Arc<Mutex<CheckoutSession>>)> {
    let tenant = ctx.tenant()?.clone();
    let session = state
        .sessions
        .session(&ctx.actor.username, tenant.tenant_id());
    Ok((tenant, session))
}

async fn summarize(
    state: &ServerState,
    tenant: &TenantScope,
    session: &CheckoutSession,
) -> AppResult<Json<CartSummary>> {
    Ok(Json(state.checkout.summary(tenant, session).await?))
}

/// GET /api/cart - 当前会话与金额汇总
pub async fn summary(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let session = session.lock().await;
    summarize(&state, &tenant, &session).await
}

/// DELETE /api/cart - 清空会话
pub async fn clear(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    session.clear()?;
    summarize(&state, &tenant, &session).await
}

/// POST /api/cart/items - 加入一件商品
pub async fn add_item(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    state
        .checkout
        .add_to_cart(&tenant, &mut session, &req.product_id)
        .await?;
    summarize(&state, &tenant, &session).await
}

/// PUT /api/cart/items/:product_id - 修改数量
pub async fn update_item(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(product_id): Path<String>,
    Json(req): Json<QuantityRequest>,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    state
        .checkout
        .update_quantity(&tenant, &mut session, &product_id, req.quantity)
        .await?;
    summarize(&state, &tenant, &session).await
}

/// DELETE /api/cart/items/:product_id - 删除行
pub async fn remove_item(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(product_id): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    session.remove_item(&product_id)?;
    summarize(&state, &tenant, &session).await
}

/// PUT /api/cart/details - 客户名、订单类型、关联客户
pub async fn update_details(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<DetailsRequest>,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    if let Some(customer_id) = req.customer_id {
        state
            .checkout
            .attach_customer(&tenant, &mut session, &customer_id)
            .await?;
    } else if req.detach_customer {
        session.detach_customer()?;
    }
    session.set_details(req.customer_name, req.order_type)?;
    summarize(&state, &tenant, &session).await
}

/// POST /api/cart/promotion - 使用促销码 (满足条件才会记录)
pub async fn apply_promotion(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<PromotionRequest>,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    state
        .checkout
        .apply_promotion(&tenant, &mut session, &req.code)
        .await?;
    summarize(&state, &tenant, &session).await
}

/// DELETE /api/cart/promotion - 取消促销码
pub async fn remove_promotion(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    session.set_promotion(None)?;
    summarize(&state, &tenant, &session).await
}

/// POST /api/cart/payment - 选择支付方式, 进入待支付
pub async fn begin_payment(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<PaymentRequest>,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    session.begin_payment(req.method)?;
    summarize(&state, &tenant, &session).await
}

/// DELETE /api/cart/payment - 取消支付, 回到购物车
pub async fn cancel_payment(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<CartSummary>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    session.cancel_payment()?;
    summarize(&state, &tenant, &session).await
}

/// POST /api/cart/checkout - 结账
pub async fn checkout(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<Transaction>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    Ok(Json(
        state.checkout.checkout(&tenant, &mut session, req).await?,
    ))
}

/// POST /api/cart/park - 挂单
pub async fn park(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<SavedOrder>> {
    let (tenant, session) = session_of(&state, &ctx)?;
    let mut session = session.lock().await;
    Ok(Json(state.parking.save(&tenant, &mut session).await?))
}
