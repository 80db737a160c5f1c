//! Saved order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/saved-orders", get(handler::list))
        .route("/api/saved-orders/{id}/resume", post(handler::resume))
}
