//! Transaction / Report API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/transactions | GET | 所有角色 |
//! | /api/transactions | DELETE | reports:reset |
//! | /api/reports/summary | GET | reports:view |
//! | /api/reports/insight | GET | reports:view |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::permissions::{REPORTS_RESET, REPORTS_VIEW};
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let history = Router::new().route("/api/transactions", get(handler::list_transactions));

    let reset = Router::new()
        .route("/api/transactions", delete(handler::reset))
        .layer(middleware::from_fn(require_permission(REPORTS_RESET)));

    let reports = Router::new()
        .route("/api/reports/summary", get(handler::summary))
        .route("/api/reports/insight", get(handler::insight))
        .layer(middleware::from_fn(require_permission(REPORTS_VIEW)));

    history.merge(reset).merge(reports)
}
