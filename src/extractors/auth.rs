//! Resolve the calling farmer from the `Authorization` header.

use crate::auth::{build_auth_context, AuthFarmer};
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Extractor for routes that require an active farmer. Rejects with 401 or 403.
#[derive(Clone, Debug)]
pub struct CurrentFarmer(pub AuthFarmer);

#[async_trait]
impl FromRequestParts<AppState> for CurrentFarmer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let farmer = build_auth_context(state.store.as_ref(), header).await?;
        tracing::debug!(farmer_id = farmer.farmer_id, "request authenticated");
        Ok(CurrentFarmer(farmer))
    }
}
