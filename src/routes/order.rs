use crate::handlers::order::{farmer_lines, income, update_status};
use crate::state::AppState;
use axum::{
    routing::{get, patch},
    Router,
};

pub fn order_routes(state: AppState) -> Router {
    Router::new()
        .route("/order/farmer", get(farmer_lines))
        .route("/order/income", get(income))
        .route("/order/:order_product_id/status", patch(update_status))
        .with_state(state)
}
