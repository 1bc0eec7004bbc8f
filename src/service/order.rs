//! Line-item status changes and the farmer's income ledger.

use crate::auth::AuthFarmer;
use crate::error::AppError;
use crate::model::{IncomeEntry, OrderLineView, OrderProduct, OrderProductId, OrderProductStatus};
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// Target status; legacy labels such as `hazırlandı` are accepted.
    pub status: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct StatusChange {
    pub line: OrderProduct,
    /// Present when the move booked income.
    pub income: Option<IncomeEntry>,
    pub remaining_stock: Option<i32>,
}

pub struct OrderService;

impl OrderService {
    pub async fn lines(state: &AppState, auth: &AuthFarmer) -> Result<Vec<OrderLineView>, AppError> {
        state.store.lines_for_farmer(auth.farmer_id).await
    }

    pub async fn income(state: &AppState, auth: &AuthFarmer) -> Result<Vec<IncomeEntry>, AppError> {
        state.store.income_for_farmer(auth.farmer_id).await
    }

    /// Move a line item to `target`. A forward move that enters or skips past the prepared stage
    /// also books income and takes the quantity out of stock.
    pub async fn transition(
        state: &AppState,
        auth: &AuthFarmer,
        id: OrderProductId,
        target: &str,
    ) -> Result<StatusChange, AppError> {
        let next = OrderProductStatus::parse(target)
            .ok_or_else(|| AppError::BadRequest(format!("unknown order status: {}", target)))?;
        let line = state
            .store
            .line_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order product {}", id)))?;
        if line.farmer_id != auth.farmer_id {
            return Err(AppError::Forbidden(format!("order product {} belongs to another farmer", id)));
        }
        let current = line.order_product_status;
        if !current.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "cannot move order product {} from {} to {}",
                id,
                current.as_str(),
                next.as_str()
            )));
        }

        let change = if current.books_income_on(next) {
            let prepared = state.store.complete_preparation(&line, next).await?;
            tracing::info!(
                order_product_id = id,
                income = %prepared.income.product_income,
                remaining_stock = ?prepared.remaining_stock,
                "line prepared, income booked"
            );
            StatusChange {
                line: prepared.line,
                income: Some(prepared.income),
                remaining_stock: prepared.remaining_stock,
            }
        } else {
            let updated = state
                .store
                .set_line_status(id, next)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("order product {}", id)))?;
            StatusChange {
                line: updated,
                income: None,
                remaining_stock: None,
            }
        };
        tracing::info!(order_product_id = id, from = current.as_str(), to = next.as_str(), "status changed");
        Ok(change)
    }
}
