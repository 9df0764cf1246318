//! Order API Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use shared::models::{
    CreateOrderRequest, DeleteResult, MarkPaidRequest, Order, OrderCreated, OrderEnvelope,
    OrderIdRequest, UpdateStatusRequest,
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

#[derive(Debug, Deserialize)]
pub struct GetQuery {
    pub id: Option<String>,
}

/// POST /api/orders/create
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<Json<OrderCreated>> {
    let req = json_body(payload)?;
    let order = state.orders.create_order(req).await?;
    Ok(Json(OrderCreated { id: order.id }))
}

/// POST /api/orders/update-status
pub async fn update_status(
    State(state): State<ServerState>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<OrderEnvelope>> {
    let req = json_body(payload)?;
    let id = require_field(req.id, "id")?;
    let status = require_field(req.status, "status")?;

    // 完成订单要扣库存，演示模式下先确保库存已播种
    state.ensure_demo_inventory().await?;
    let order = state.orders.update_status(&id, &status).await?;
    Ok(Json(OrderEnvelope { order }))
}

/// POST /api/orders/mark-paid
pub async fn mark_paid(
    State(state): State<ServerState>,
    payload: Result<Json<MarkPaidRequest>, JsonRejection>,
) -> AppResult<Json<OrderEnvelope>> {
    let req = json_body(payload)?;
    let id = require_field(req.id, "id")?;

    let order = state.orders.set_paid(&id, req.paid.unwrap_or(true)).await?;
    Ok(Json(OrderEnvelope { order }))
}

/// POST /api/orders/delete
pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<OrderIdRequest>, JsonRejection>,
) -> AppResult<Json<DeleteResult>> {
    let req = json_body(payload)?;
    let id = require_field(req.id, "id")?;

    state.orders.delete_order(&id).await?;
    Ok(Json(DeleteResult { success: true }))
}

/// POST /api/orders/reorder
pub async fn reorder(
    State(state): State<ServerState>,
    payload: Result<Json<OrderIdRequest>, JsonRejection>,
) -> AppResult<Json<OrderCreated>> {
    let req = json_body(payload)?;
    let id = require_field(req.id, "id")?;

    let order = state.orders.reorder(&id).await?;
    Ok(Json(OrderCreated { id: order.id }))
}

/// GET /api/orders/list
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let user_id = query.user_id.filter(|u| !u.trim().is_empty());
    let orders = state.orders.list_orders(user_id.as_deref()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/get
pub async fn get_by_id(
    State(state): State<ServerState>,
    Query(query): Query<GetQuery>,
) -> AppResult<Json<Order>> {
    let id = require_field(query.id, "id")?;
    let order = state.orders.get_order(&id).await?;
    Ok(Json(order))
}
