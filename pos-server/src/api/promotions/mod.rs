//! Promotion API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::PROMOTIONS_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new().nest("/api/promotions", read_routes());

    let write_routes = Router::new()
        .nest("/api/promotions", write_routes())
        .layer(middleware::from_fn(require_permission(PROMOTIONS_MANAGE)));

    read_routes.merge(write_routes)
}

fn read_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/evaluate", post(handler::evaluate))
}

fn write_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/toggle", post(handler::toggle))
}
