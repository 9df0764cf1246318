//! Inventory API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use shared::models::{InventoryEnvelope, InventoryRecord, InventorySeeded, UpdateStockRequest};
use shared::{AppError, AppResult};

use crate::core::ServerState;
use crate::utils::json_body;
use crate::utils::validation::require_field;

/// GET /api/admin/inventory
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryRecord>>> {
    state.ensure_demo_inventory().await?;
    Ok(Json(state.inventory.list().await?))
}

/// POST /api/admin/inventory
pub async fn update_stock(
    State(state): State<ServerState>,
    payload: Result<Json<UpdateStockRequest>, JsonRejection>,
) -> AppResult<Json<InventoryEnvelope>> {
    let req = json_body(payload)?;
    let id = require_field(req.id, "id")?;
    let stock = req
        .stock
        .ok_or_else(|| AppError::required("stock", "stock is required"))?;

    state.ensure_demo_inventory().await?;
    let inventory = state.inventory.set_stock(&id, stock).await?;
    Ok(Json(InventoryEnvelope { inventory }))
}

/// GET /api/admin/inventory/low-stock
pub async fn list_low_stock(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<InventoryRecord>>> {
    state.ensure_demo_inventory().await?;
    Ok(Json(state.inventory.list_low_stock().await?))
}

/// POST /api/admin/inventory/initialize
pub async fn initialize(State(state): State<ServerState>) -> AppResult<Json<InventorySeeded>> {
    let created = state.inventory.initialize(state.menu.items()).await?;
    Ok(Json(InventorySeeded { created }))
}
