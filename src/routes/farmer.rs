//! Farmer profile and store routes. Static segments win over `/farmer/:id`.

use crate::handlers::farmer::{
    delete_certificate, delete_image, delete_profile, get_profile, public_profile, public_store,
    set_biography, set_store_activity, store_info, update_profile, upload_certificate, upload_image,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn farmer_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/farmer/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/farmer/store", get(store_info))
        .route("/farmer/store/biography", put(set_biography))
        .route("/farmer/store/activity", put(set_store_activity))
        .route("/farmer/store/images", post(upload_image))
        .route("/farmer/store/images/:id", delete(delete_image))
        .route("/farmer/store/certificates", post(upload_certificate))
        .route("/farmer/store/certificates/:id", delete(delete_certificate))
        .route("/farmer/:id", get(public_profile))
        .route("/store/:farmer_id", get(public_store))
        .with_state(state)
}
