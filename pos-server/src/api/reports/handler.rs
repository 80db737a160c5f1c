//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use shared::models::Transaction;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::services::{DateRange, SalesSummary};
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub removed: usize,
}

/// GET /api/transactions?from=&to= - 交易记录 (新的在前)
pub async fn list_transactions(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<Transaction>>> {
    Ok(Json(
        state.reports.list_transactions(ctx.tenant()?, range).await?,
    ))
}

/// DELETE /api/transactions - 清空本商户交易记录
pub async fn reset(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<ResetResponse>> {
    let removed = state.reports.reset(ctx.tenant()?).await?;
    Ok(Json(ResetResponse { removed }))
}

/// GET /api/reports/summary?from=&to= - 销售汇总
pub async fn summary(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(range): Query<DateRange>,
) -> AppResult<Json<SalesSummary>> {
    Ok(Json(state.reports.summary(ctx.tenant()?, range).await?))
}

/// GET /api/reports/insight?from=&to= - AI 销售分析
pub async fn insight(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(range): Query<DateRange>,
) -> AppResult<Json<InsightResponse>> {
    let insight = state.reports.insight(ctx.tenant()?, range).await?;
    Ok(Json(InsightResponse { insight }))
}
