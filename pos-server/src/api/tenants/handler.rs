//! Tenant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::models::{RemovalPolicy, Tenant, TenantCreate, TenantSummary, TenantUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct RemovalQuery {
    #[serde(default)]
    pub policy: RemovalPolicy,
}

#[derive(Debug, Serialize)]
pub struct RemovalResponse {
    pub tenant_id: String,
    pub policy: RemovalPolicy,
    /// 一并删除的商户记录数
    pub purged_records: usize,
}

/// GET /api/tenants - 商户列表 (含订阅状态)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TenantSummary>>> {
    let today = Utc::now().date_naive();
    Ok(Json(state.directory.list_tenants(today).await?))
}

/// POST /api/tenants - 新建商户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TenantCreate>,
) -> AppResult<Json<Tenant>> {
    Ok(Json(state.directory.add_tenant(payload).await?))
}

/// PUT /api/tenants/:id - 更新商户
///
/// 状态改为停用时与 deactivate 相同, 丢弃该商户的收银会话
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TenantUpdate>,
) -> AppResult<Json<Tenant>> {
    let tenant = state.directory.update_tenant(&id, payload).await?;
    if !tenant.is_active() {
        state.sessions.discard_tenant(&tenant.id);
    }
    Ok(Json(tenant))
}

/// POST /api/tenants/:id/deactivate - 停用商户
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Tenant>> {
    let tenant = state.directory.deactivate_tenant(&id).await?;
    state.sessions.discard_tenant(&tenant.id);
    Ok(Json(tenant))
}

/// DELETE /api/tenants/:id?policy=restrict|cascade - 删除商户
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<RemovalQuery>,
) -> AppResult<Json<RemovalResponse>> {
    let purged_records = state.directory.remove_tenant(&id, query.policy).await?;
    state.sessions.discard_tenant(&id);
    Ok(Json(RemovalResponse {
        tenant_id: id,
        policy: query.policy,
        purged_records,
    }))
}
