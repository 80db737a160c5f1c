//! Category API 模块
//!
//! 分类是商户内的名称列表, 以名称为路径参数

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::permissions::CATALOG_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new().route("/api/categories", get(handler::list));

    let write_routes = Router::new()
        .route("/api/categories", post(handler::create))
        .route("/api/categories/{name}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission(CATALOG_MANAGE)));

    read_routes.merge(write_routes)
}
