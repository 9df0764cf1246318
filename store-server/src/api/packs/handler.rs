//! Order Packs API Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use shared::models::{
    DeleteResult, OrderCreated, OrderPack, PackEnvelope, PackIdRequest, PackOrderRequest,
    SavePackRequest,
};
use shared::AppResult;

use crate::core::ServerState;
use crate::utils::json_body;
use crate::utils::validation::require_field;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
}

/// POST /api/packs/save
pub async fn save(
    State(state): State<ServerState>,
    payload: Result<Json<SavePackRequest>, JsonRejection>,
) -> AppResult<Json<PackEnvelope>> {
    let req = json_body(payload)?;
    let pack = state.packs.save_pack(req).await?;
    Ok(Json(PackEnvelope { pack }))
}

/// GET /api/packs/list
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderPack>>> {
    Ok(Json(state.packs.list_packs(query.user_id).await?))
}

/// POST /api/packs/delete
pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<PackIdRequest>, JsonRejection>,
) -> AppResult<Json<DeleteResult>> {
    let req = json_body(payload)?;
    let id = require_field(req.id, "id")?;

    state.packs.delete_pack(req.user_id, &id).await?;
    Ok(Json(DeleteResult { success: true }))
}

/// POST /api/packs/order
pub async fn order(
    State(state): State<ServerState>,
    payload: Result<Json<PackOrderRequest>, JsonRejection>,
) -> AppResult<Json<OrderCreated>> {
    let mut req = json_body(payload)?;
    req.id = Some(require_field(req.id.take(), "id")?);

    let order = state.packs.order_from_pack(req).await?;
    Ok(Json(OrderCreated { id: order.id }))
}
