//! Orders API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders/create | POST | 下单 |
//! | /api/orders/update-status | POST | 推进/回退订单状态 |
//! | /api/orders/mark-paid | POST | 设置支付标记 |
//! | /api/orders/delete | POST | 删除订单 |
//! | /api/orders/reorder | POST | 再来一单 |
//! | /api/orders/list | GET | 订单列表 (新→旧，可按 user_id 过滤) |
//! | /api/orders/get | GET | 单个订单 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/update-status", post(handler::update_status))
        .route("/mark-paid", post(handler::mark_paid))
        .route("/delete", post(handler::delete))
        .route("/reorder", post(handler::reorder))
        .route("/list", get(handler::list))
        .route("/get", get(handler::get_by_id))
}
