//! Inventory API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/admin/inventory | GET | 全部库存记录 |
//! | /api/admin/inventory | POST | 修改单个商品库存 |
//! | /api/admin/inventory/low-stock | GET | 低库存记录 |
//! | /api/admin/inventory/initialize | POST | 从菜单目录播种库存 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::update_stock))
        .route("/low-stock", get(handler::list_low_stock))
        .route("/initialize", post(handler::initialize))
}
