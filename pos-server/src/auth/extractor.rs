//! Request context extractor
//!
//! 每个请求都从令牌重建 [`Actor`] 并重新解析其所属商户,
//! 商户被删除或停用后立即生效

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::tenancy::{AccessScope, Actor, TenantScope};
use crate::utils::{AppError, AppResult};

/// 超级管理员进入商户时使用的请求头
pub const TENANT_HEADER: &str = "x-tenant-id";

/// 已认证的操作者及其访问范围
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor: Actor,
    pub scope: AccessScope,
}

impl RequestContext {
    /// 商户内操作; 全局范围下返回 `TenantNotSelected`
    pub fn tenant(&self) -> AppResult<&TenantScope> {
        self.scope.require_tenant()
    }
}

fn actor_from_parts(parts: &Parts, state: &ServerState) -> Result<Actor, AppError> {
    // 由 `require_auth` 写入
    if let Some(actor) = parts.extensions.get::<Actor>() {
        return Ok(actor.clone());
    }

    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::not_authenticated());
        }
    };

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => Ok(Actor::from(claims)),
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

impl FromRequestParts<ServerState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts, state)
    }
}

impl FromRequestParts<ServerState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        let actor = actor_from_parts(parts, state)?;
        let requested = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|h| h.to_str().ok());

        if requested.is_some() && !actor.is_super_admin() {
            tracing::debug!(
                username = %actor.username,
                "Ignoring tenant header from a tenant-bound actor"
            );
        }

        let scope = match state.directory.resolve_active_tenant(&actor, requested).await {
            Ok(scope) => scope,
            Err(e) => {
                security_log!(
                    "WARN",
                    "tenant_resolution_failed",
                    username = actor.username.clone(),
                    role = actor.role.as_str(),
                    error = e.message.clone()
                );
                return Err(e);
            }
        };

        let ctx = RequestContext { actor, scope };
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
