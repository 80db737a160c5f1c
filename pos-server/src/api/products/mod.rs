//! Product API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::CATALOG_MANAGE;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new().nest("/api/products", read_routes());

    let write_routes = Router::new()
        .nest("/api/products", write_routes())
        .layer(middleware::from_fn(require_permission(CATALOG_MANAGE)));

    read_routes.merge(write_routes)
}

fn read_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}

fn write_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/description", post(handler::generate_description))
}
