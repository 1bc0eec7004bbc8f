//! Product catalog of the calling farmer.

use super::parse_id;
use crate::docs::ProductForm;
use crate::error::AppError;
use crate::extractors::CurrentFarmer;
use crate::model::Product;
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::{MultipartForm, ProductService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/product",
    tag = "product",
    security(("bearer" = [])),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid field or file"),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = MultipartForm::read(multipart).await?;
    Ok(success_one(ProductService::create(&state, &auth, form).await?))
}

#[utoipa::path(
    get,
    path = "/product",
    tag = "product",
    security(("bearer" = [])),
    responses((status = 200, description = "Own products, newest first", body = Vec<Product>))
)]
pub async fn list(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(ProductService::list(&state, &auth).await?))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "product",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 403, description = "Product belongs to another farmer"),
        (status = 404, description = "Unknown product"),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(ProductService::get(&state, &auth, id).await?))
}

#[utoipa::path(
    patch,
    path = "/product/{id}",
    tag = "product",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Product id")),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 403, description = "Product belongs to another farmer"),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Path(id_str): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let form = MultipartForm::read(multipart).await?;
    Ok(success_one_ok(ProductService::update(&state, &auth, id, form).await?))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "product",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product and its images deleted"),
        (status = 403, description = "Product belongs to another farmer"),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    ProductService::delete(&state, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
