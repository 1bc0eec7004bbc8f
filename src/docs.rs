//! Generated OpenAPI document.

use crate::handlers;
use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Multipart fields of `POST /auth/register`.
#[derive(ToSchema)]
pub struct RegisterForm {
    pub farmer_name: String,
    pub farmer_last_name: String,
    pub farmer_age: i32,
    pub farmer_address: String,
    pub farmer_city: String,
    pub farmer_town: String,
    pub farmer_neighbourhood: String,
    pub farmer_phone_number: String,
    pub farmer_mail: String,
    pub farmer_password: String,
    pub farm_name: String,
    pub farmer_tc_no: String,
    /// `Active` or `NonActive`; defaults to `NonActive`.
    pub farmer_activity_status: Option<String>,
    pub imgurl: Option<String>,
    #[schema(format = Binary)]
    pub certificate: Option<String>,
}

/// Multipart fields of the product create and update routes. All optional on update.
#[derive(ToSchema)]
pub struct ProductForm {
    pub product_name: String,
    pub product_katalog_name: String,
    pub farmer_price: f64,
    pub stock_quantity: i32,
    #[schema(format = Binary)]
    pub file: Option<String>,
}

/// Single-file upload.
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(format = Binary)]
    pub file: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Tarladan API", description = "Farmer marketplace backend"),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::password_reset,
        handlers::farmer::get_profile,
        handlers::farmer::update_profile,
        handlers::farmer::delete_profile,
        handlers::farmer::public_profile,
        handlers::farmer::store_info,
        handlers::farmer::set_biography,
        handlers::farmer::set_store_activity,
        handlers::farmer::upload_image,
        handlers::farmer::delete_image,
        handlers::farmer::upload_certificate,
        handlers::farmer::delete_certificate,
        handlers::farmer::public_store,
        handlers::product::create,
        handlers::product::list,
        handlers::product::read,
        handlers::product::update,
        handlers::product::delete,
        handlers::order::farmer_lines,
        handlers::order::update_status,
        handlers::order::income,
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "farmer", description = "Farmer profiles"),
        (name = "store", description = "Storefront, farm images and certificates"),
        (name = "product", description = "Product catalog"),
        (name = "order", description = "Line items and income"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
