//! Stats API Handlers

use axum::{Json, extract::State};
use shared::AppResult;
use shared::models::StatsReport;

use crate::core::ServerState;
use crate::stats::compute_stats;

/// GET /api/admin/stats
///
/// Recomputed from every stored order on each call.
pub async fn get_stats(State(state): State<ServerState>) -> AppResult<Json<StatsReport>> {
    let orders = state.orders.list_orders(None).await?;
    let report = compute_stats(&orders, state.now());
    tracing::debug!(orders = orders.len(), "Stats computed");
    Ok(Json(report))
}
