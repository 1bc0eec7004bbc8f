use crate::handlers::auth::{login, password_reset, register};
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/password-reset", post(password_reset))
        .with_state(state)
}
