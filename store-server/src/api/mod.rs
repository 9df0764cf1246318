//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 下单、状态流转、支付标记、删除、再来一单
//! - [`packs`] - 常用订单包
//! - [`inventory`] - 库存管理 (管理后台)
//! - [`stats`] - 经营统计 (管理后台)
//! - [`menu`] - 菜单目录

pub mod health;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod packs;
pub mod stats;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Merge every API router (state not yet applied)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Storefront APIs
        .merge(menu::router())
        .merge(orders::router())
        .merge(packs::router())
        // Admin APIs
        .merge(inventory::router())
        .merge(stats::router())
}

/// Build a fully configured application with middleware and state
///
/// Used by both the HTTP server and oneshot calls in tests.
pub fn build_app(state: ServerState) -> Router {
    health::mark_started();
    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
