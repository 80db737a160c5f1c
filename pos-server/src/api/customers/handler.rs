//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

use crate::api::SearchQuery;
use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct QuickCustomer {
    pub name: String,
    pub phone: String,
}

/// GET /api/customers?q= - 客户列表 (姓名或手机号搜索)
pub async fn list(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(
        state
            .customers
            .list(ctx.tenant()?, query.q.as_deref())
            .await?,
    ))
}

/// GET /api/customers/:id - 获取顾客详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<Customer>> {
    Ok(Json(state.customers.get(ctx.tenant()?, &id).await?))
}

/// POST /api/customers - 新建客户
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    Ok(Json(state.customers.create(ctx.tenant()?, payload).await?))
}

/// POST /api/customers/quick - 快速建档并关联到当前收银会话
pub async fn quick_create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<QuickCustomer>,
) -> AppResult<Json<Customer>> {
    let tenant = ctx.tenant()?;
    let session = state.sessions.session(&ctx.actor.username, tenant.tenant_id());
    let mut session = session.lock().await;
    let customer = state
        .customers
        .quick_create(tenant, &mut session, payload.name, payload.phone)
        .await?;
    Ok(Json(customer))
}

/// PUT /api/customers/:id - 更新客户资料
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    Ok(Json(
        state.customers.update(ctx.tenant()?, &id, payload).await?,
    ))
}

/// DELETE /api/customers/:id - 删除顾客
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.customers.delete(ctx.tenant()?, &id).await?;
    Ok(Json(true))
}
