//! Clients for the hosted identity provider and object storage.

pub mod identity;
pub mod storage;

pub use identity::{GoTrueClient, IdentityProvider, IdentityUser, Session};
pub use storage::{
    ObjectStorage, S3Storage, FARMER_DOCUMENTS_BUCKET, FARMER_IMAGES_BUCKET, PRODUCT_IMAGES_BUCKET,
};
