//! Order Packs API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/packs/save | POST | 保存购物车为订单包 |
//! | /api/packs/list | GET | 账户的订单包 (需 user_id) |
//! | /api/packs/delete | POST | 删除订单包 |
//! | /api/packs/order | POST | 用订单包下单 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/packs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/save", post(handler::save))
        .route("/list", get(handler::list))
        .route("/delete", post(handler::delete))
        .route("/order", post(handler::order))
}
