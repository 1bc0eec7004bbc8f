//! Own profile and store, plus the public farmer and storefront views.

use super::parse_id;
use crate::docs::UploadForm;
use crate::error::AppError;
use crate::extractors::CurrentFarmer;
use crate::model::{AttachmentKind, Farmer, FarmerCertificate, FarmerChanges, FarmerImage, PublicFarmer, StoreInfo};
use crate::response::{success_one, success_one_ok};
use crate::service::{BiographyRequest, FarmerService, MultipartForm, StoreActivityRequest};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/farmer/profile",
    tag = "farmer",
    security(("bearer" = [])),
    responses((status = 200, description = "Own profile", body = Farmer))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(FarmerService::profile(&state, &auth).await?))
}

#[utoipa::path(
    put,
    path = "/farmer/profile",
    tag = "farmer",
    security(("bearer" = [])),
    request_body = FarmerChanges,
    responses(
        (status = 200, description = "Updated profile", body = Farmer),
        (status = 400, description = "Invalid field"),
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Json(changes): Json<FarmerChanges>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(FarmerService::update_profile(&state, &auth, &changes).await?))
}

#[utoipa::path(
    delete,
    path = "/farmer/profile",
    tag = "farmer",
    security(("bearer" = [])),
    responses((status = 204, description = "Farmer and identity user deleted"))
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    FarmerService::delete_profile(&state, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/farmer/{id}",
    tag = "farmer",
    params(("id" = i64, Path, description = "Farmer id")),
    responses(
        (status = 200, description = "Public profile", body = PublicFarmer),
        (status = 404, description = "Unknown or inactive farmer"),
    )
)]
pub async fn public_profile(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(FarmerService::public_profile(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/farmer/store",
    tag = "store",
    security(("bearer" = [])),
    responses((status = 200, description = "Own store", body = StoreInfo))
)]
pub async fn store_info(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(FarmerService::store_info(&state, &auth).await?))
}

#[utoipa::path(
    put,
    path = "/farmer/store/biography",
    tag = "store",
    security(("bearer" = [])),
    request_body = BiographyRequest,
    responses((status = 200, description = "Store with new biography", body = StoreInfo))
)]
pub async fn set_biography(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Json(body): Json<BiographyRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(FarmerService::set_biography(&state, &auth, &body).await?))
}

#[utoipa::path(
    put,
    path = "/farmer/store/activity",
    tag = "store",
    security(("bearer" = [])),
    request_body = StoreActivityRequest,
    responses(
        (status = 200, description = "Store with new activity", body = StoreInfo),
        (status = 400, description = "Unknown activity value"),
    )
)]
pub async fn set_store_activity(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Json(body): Json<StoreActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(FarmerService::set_store_activity(&state, &auth, &body).await?))
}

#[utoipa::path(
    post,
    path = "/farmer/store/images",
    tag = "store",
    security(("bearer" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = FarmerImage),
        (status = 400, description = "Missing, empty, oversized or unsupported file"),
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = MultipartForm::read(multipart).await?;
    Ok(success_one(FarmerService::upload_image(&state, &auth, form).await?))
}

#[utoipa::path(
    delete,
    path = "/farmer/store/images/{id}",
    tag = "store",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Image id")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 403, description = "Image belongs to another farmer"),
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    FarmerService::delete_attachment(&state, &auth, AttachmentKind::Image, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/farmer/store/certificates",
    tag = "store",
    security(("bearer" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Certificate stored", body = FarmerCertificate),
        (status = 400, description = "Missing, empty, oversized or unsupported file"),
    )
)]
pub async fn upload_certificate(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = MultipartForm::read(multipart).await?;
    Ok(success_one(FarmerService::upload_certificate(&state, &auth, form).await?))
}

#[utoipa::path(
    delete,
    path = "/farmer/store/certificates/{id}",
    tag = "store",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Certificate id")),
    responses(
        (status = 204, description = "Certificate deleted"),
        (status = 403, description = "Certificate belongs to another farmer"),
    )
)]
pub async fn delete_certificate(
    State(state): State<AppState>,
    CurrentFarmer(auth): CurrentFarmer,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    FarmerService::delete_attachment(&state, &auth, AttachmentKind::Certificate, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/store/{farmer_id}",
    tag = "store",
    params(("farmer_id" = i64, Path, description = "Farmer id")),
    responses(
        (status = 200, description = "Public storefront", body = StoreInfo),
        (status = 404, description = "Unknown farmer or closed store"),
    )
)]
pub async fn public_store(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(FarmerService::public_store(&state, id).await?))
}
