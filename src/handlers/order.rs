//! Line items and income of the calling farmer.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::CurrentFarmer;
use crate::model::{IncomeEntry, OrderLineView};
use crate::response::{success_many, success_one_ok};
use crate::service::{OrderService, StatusChange, StatusUpdateRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/order/farmer",
    tag = "order",
    security(("bearer" = [])),
    responses((status = 200, description = "Own line items with product details", body = Vec<OrderLineView>))
)]
pub async fn farmer_lines(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(OrderService::lines(&state, &auth).await?))
}

#[utoipa::path(
    patch,
    path = "/order/{order_product_id}/status",
    tag = "order",
    security(("bearer" = [])),
    params(("order_product_id" = i64, Path, description = "Line item id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status changed", body = StatusChange),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Line item belongs to another farmer"),
        (status = 404, description = "Unknown line item"),
        (status = 409, description = "Transition not allowed"),
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Path(id_str): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(OrderService::transition(&state, &auth, id, &body.status).await?))
}

#[utoipa::path(
    get,
    path = "/order/income",
    tag = "order",
    security(("bearer" = [])),
    responses((status = 200, description = "Own income ledger", body = Vec<IncomeEntry>))
)]
pub async fn income(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(OrderService::income(&state, &auth).await?))
}
