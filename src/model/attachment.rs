//! Files a farmer attaches to their store: farm photos and certificates.

use super::farmer::{FarmerId, StoreActivity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct FarmerImage {
    pub id: i64,
    pub farmer_id: FarmerId,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct FarmerCertificate {
    pub id: i64,
    pub farmer_id: FarmerId,
    #[serde(skip_serializing)]
    pub file_path: String,
    /// Presigned link; refreshed whenever the certificate is read.
    pub certificate_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Certificate,
}

impl AttachmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Certificate => "certificate",
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct StoreInfo {
    pub farmer_id: FarmerId,
    pub farm_name: String,
    pub farmer_biografi: Option<String>,
    pub store_activity: StoreActivity,
    pub images: Vec<FarmerImage>,
    pub certificates: Vec<FarmerCertificate>,
}
