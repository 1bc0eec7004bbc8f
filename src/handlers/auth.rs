//! Registration, login and password reset.

use crate::docs::RegisterForm;
use crate::error::AppError;
use crate::response::{success_one, success_one_ok, success_with_message};
use crate::service::{AuthService, LoginRequest, LoginResponse, MultipartForm, PasswordResetRequest, Registration};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Farmer registered", body = Registration),
        (status = 400, description = "Invalid field or file"),
        (status = 409, description = "E-mail already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = MultipartForm::read(multipart).await?;
    let registration = AuthService::register(&state, form).await?;
    Ok(success_one(registration))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account not active"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthService::login(&state, &body).await?;
    Ok(success_one_ok(session))
}

#[utoipa::path(
    post,
    path = "/auth/password-reset",
    tag = "auth",
    request_body = PasswordResetRequest,
    responses((status = 200, description = "Reset mail requested"))
)]
pub async fn password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    AuthService::request_password_reset(&state, &body).await?;
    Ok(success_with_message(
        serde_json::json!({ "email": body.email.trim() }),
        "password reset mail sent",
    ))
}
