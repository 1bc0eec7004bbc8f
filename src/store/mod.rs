//! Table access for the marketplace. `PgStore` talks to the hosted Postgres;
//! services only see the traits so they can be exercised without a database.

mod pg;
mod schema;

pub use pg::PgStore;
pub use schema::{ensure_database_exists, ensure_schema};

use crate::error::AppError;
use crate::model::{
    FarmerCertificate, FarmerChanges, FarmerId, FarmerImage, Farmer, IncomeEntry, NewFarmer,
    NewProduct, OrderLineView, OrderProduct, OrderProductId, OrderProductStatus, Preparation,
    Product, ProductChanges, ProductId, StoreActivity,
};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait FarmerRepo: Send + Sync {
    async fn insert_farmer(&self, new: &NewFarmer) -> Result<Farmer, AppError>;
    async fn farmer_by_id(&self, id: FarmerId) -> Result<Option<Farmer>, AppError>;
    async fn farmer_by_auth_id(&self, auth_id: Uuid) -> Result<Option<Farmer>, AppError>;
    async fn update_farmer(&self, id: FarmerId, changes: &FarmerChanges) -> Result<Option<Farmer>, AppError>;
    async fn set_biography(&self, id: FarmerId, biography: &str) -> Result<Option<Farmer>, AppError>;
    async fn set_store_activity(&self, id: FarmerId, activity: StoreActivity) -> Result<Option<Farmer>, AppError>;
    /// Hard delete. Returns whether a row was removed.
    async fn delete_farmer(&self, id: FarmerId) -> Result<bool, AppError>;

    async fn insert_image(&self, farmer_id: FarmerId, file_path: &str, image_url: &str) -> Result<FarmerImage, AppError>;
    async fn images_for(&self, farmer_id: FarmerId) -> Result<Vec<FarmerImage>, AppError>;
    async fn image_by_id(&self, id: i64) -> Result<Option<FarmerImage>, AppError>;
    async fn delete_image(&self, id: i64) -> Result<bool, AppError>;

    async fn insert_certificate(
        &self,
        farmer_id: FarmerId,
        file_path: &str,
        certificate_url: &str,
    ) -> Result<FarmerCertificate, AppError>;
    async fn certificates_for(&self, farmer_id: FarmerId) -> Result<Vec<FarmerCertificate>, AppError>;
    async fn certificate_by_id(&self, id: i64) -> Result<Option<FarmerCertificate>, AppError>;
    async fn delete_certificate(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn insert_product(&self, new: &NewProduct) -> Result<Product, AppError>;
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, AppError>;
    /// Newest first.
    async fn products_by_farmer(&self, farmer_id: FarmerId) -> Result<Vec<Product>, AppError>;
    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> Result<Option<Product>, AppError>;
    async fn delete_product(&self, id: ProductId) -> Result<bool, AppError>;
}

#[async_trait]
pub trait OrderRepo: Send + Sync {
    /// Line items for one farmer, newest order first, with product image and catalog name.
    async fn lines_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<OrderLineView>, AppError>;
    async fn line_by_id(&self, id: OrderProductId) -> Result<Option<OrderProduct>, AppError>;
    async fn set_line_status(
        &self,
        id: OrderProductId,
        status: OrderProductStatus,
    ) -> Result<Option<OrderProduct>, AppError>;
    /// Write `status`, append the income row and decrement stock (clamped at zero) for `line`.
    async fn complete_preparation(
        &self,
        line: &OrderProduct,
        status: OrderProductStatus,
    ) -> Result<Preparation, AppError>;
    async fn income_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<IncomeEntry>, AppError>;
}

/// Everything the HTTP layer needs from the hosted tables.
#[async_trait]
pub trait MarketStore: FarmerRepo + ProductRepo + OrderRepo {
    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
