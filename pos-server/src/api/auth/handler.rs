//! Authentication Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::{Tenant, User};

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::tenancy::{AccessScope, Actor};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// 令牌有效期 (秒)
    pub expires_in: i64,
    pub user: User,
    /// 账号绑定的商户; super_admin 为空
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    /// 本次请求解析出的商户 (super_admin 通过 X-Tenant-Id 进入)
    pub tenant: Option<Tenant>,
}

async fn resolved_tenant(state: &ServerState, scope: &AccessScope) -> AppResult<Option<Tenant>> {
    match scope.tenant() {
        Some(tenant) => Ok(Some(state.directory.get_tenant(tenant.tenant_id()).await?)),
        None => Ok(None),
    }
}

/// POST /api/auth/login - 登录
///
/// 用户名不存在与密码错误返回同一个错误; 商户已删除或停用时拒绝登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = match state.users.authenticate(&req.username, &req.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(username = %req.username, "Login failed - invalid credentials");
            return Err(e);
        }
    };

    let actor = Actor {
        username: user.username.clone(),
        role: user.role,
        vendor_id: user.vendor_id.clone(),
    };
    let scope = state.directory.resolve_active_tenant(&actor, None).await?;
    let tenant = resolved_tenant(&state, &scope).await?;

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(&actor, &user.name)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        username = %user.username,
        role = user.role.as_str(),
        vendor_id = ?user.vendor_id,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.expires_in_seconds(),
        user,
        tenant,
    }))
}

/// GET /api/auth/me - 当前用户与当前商户
pub async fn me(State(state): State<ServerState>, ctx: RequestContext) -> AppResult<Json<MeResponse>> {
    let user = state
        .users
        .get(&AccessScope::Global, &ctx.actor.username)
        .await?;
    let tenant = resolved_tenant(&state, &ctx.scope).await?;
    Ok(Json(MeResponse { user, tenant }))
}
