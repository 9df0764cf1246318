//! Menu API Handlers

use axum::{Json, extract::State};
use shared::AppResult;
use shared::models::MenuItem;

use crate::core::ServerState;

/// GET /api/menu/list
///
/// Sorted by category, then name. Seeds demo inventory on first call.
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    state.ensure_demo_inventory().await?;
    Ok(Json(state.menu.items().to_vec()))
}
