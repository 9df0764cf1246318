//! Stats API 模块 (管理后台统计)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/stats", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::get_stats))
}
