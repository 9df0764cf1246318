//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 (含存储模式) |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "backend": "redb",
//!   "demo_mode": false,
//!   "degraded": false,
//!   "environment": "development",
//!   "uptime_seconds": 42
//! }
//! ```

use std::time::SystemTime;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    /// 主存储名称
    backend: &'static str,
    /// 未配置持久化后端，数据只在内存中
    demo_mode: bool,
    /// 已配置的主存储曾经不可用并降级到演示存储
    degraded: bool,
    environment: String,
    uptime_seconds: u64,
}

// 服务器启动时间 (首次访问时记录)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

pub(crate) fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    // 演示模式本来就只有内存存储，不算降级
    let degraded = state.store.has_degraded() && !state.is_demo_mode();
    Json(HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        version: env!("CARGO_PKG_VERSION"),
        backend: state.store.primary_name(),
        demo_mode: state.is_demo_mode(),
        degraded,
        environment: state.config.environment.clone(),
        uptime_seconds: uptime_seconds(),
    })
}
