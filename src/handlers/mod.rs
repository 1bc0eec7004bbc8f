//! HTTP handlers for auth, farmer, product and order routes.

pub mod auth;
pub mod farmer;
pub mod order;
pub mod product;

use crate::error::AppError;

pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}
