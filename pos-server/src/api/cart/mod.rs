//! Cart API 模块
//!
//! 每个账号在每个商户下各有一个收银会话。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/cart | GET | 当前会话与金额汇总 |
//! | /api/cart | DELETE | 清空会话 |
//! | /api/cart/items | POST | 加入一件商品 |
//! | /api/cart/items/{product_id} | PUT / DELETE | 修改数量 / 删除行 |
//! | /api/cart/details | PUT | 客户名、订单类型、关联客户 |
//! | /api/cart/promotion | POST / DELETE | 使用 / 取消促销码 |
//! | /api/cart/payment | POST / DELETE | 选择支付方式 / 取消支付 |
//! | /api/cart/checkout | POST | 结账 |
//! | /api/cart/park | POST | 挂单 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::summary).delete(handler::clear))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{product_id}",
            put(handler::update_item).delete(handler::remove_item),
        )
        .route("/details", put(handler::update_details))
        .route(
            "/promotion",
            post(handler::apply_promotion).delete(handler::remove_promotion),
        )
        .route(
            "/payment",
            post(handler::begin_payment).delete(handler::cancel_payment),
        )
        .route("/checkout", post(handler::checkout))
        .route("/park", post(handler::park))
}
