//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录与当前用户
//! - [`tenants`] - 商户管理 (super_admin)
//! - [`users`] - 账号管理
//! - [`products`] - 商品管理
//! - [`categories`] - 分类管理
//! - [`promotions`] - 促销管理与试算
//! - [`customers`] - 客户管理
//! - [`cart`] - 收银会话 (购物车、支付、结账、挂单)
//! - [`saved_orders`] - 挂单列表与取单
//! - [`reports`] - 交易记录与报表

pub mod auth;
pub mod cart;
pub mod categories;
pub mod customers;
pub mod health;
pub mod products;
pub mod promotions;
pub mod reports;
pub mod saved_orders;
pub mod tenants;
pub mod users;

use axum::Router;
use axum::middleware;
use http::{HeaderName, HeaderValue};
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

pub use crate::utils::AppResult;

/// `?q=` 搜索参数
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());

    response
}

/// 注册全部路由 (无中间件, 无状态)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(tenants::router())
        .merge(users::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(promotions::router())
        .merge(customers::router())
        .merge(cart::router())
        .merge(saved_orders::router())
        .merge(reports::router())
}

/// 完整应用: 路由 + 认证 + Tower HTTP 中间件
///
/// HTTP 服务器与集成测试 (`oneshot`) 共用
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static("x-request-id");

    build_router()
        // JWT 认证 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}
