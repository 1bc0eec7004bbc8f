//! Product catalog of the calling farmer, with the single stored image per product.

use super::upload::{
    product_id_from_key, product_key_prefix, product_object_key, MultipartForm, UploadedFile, IMAGE_POLICY,
};
use super::validation::RequestValidator;
use crate::auth::AuthFarmer;
use crate::error::AppError;
use crate::model::{NewProduct, Product, ProductChanges, ProductId};
use crate::platform::{ObjectStorage, PRODUCT_IMAGES_BUCKET};
use crate::state::AppState;
use crate::store::MarketStore;
use serde::Serialize;

/// Outcome of a bulk image relink.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelinkReport {
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

pub struct ProductService;

impl ProductService {
    /// Create from a multipart form. The row is kept even when the optional image fails to upload.
    pub async fn create(state: &AppState, auth: &AuthFarmer, mut form: MultipartForm) -> Result<Product, AppError> {
        let new = Self::new_product(auth, &form)?;
        let file = form.take_file("file");
        if let Some(f) = &file {
            IMAGE_POLICY.check(f)?;
        }

        let product = state.store.insert_product(&new).await?;
        tracing::info!(product_id = product.id, farmer_id = auth.farmer_id, "product created");

        let Some(file) = file else {
            return Ok(product);
        };
        match Self::store_image(state, product.id, file).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                tracing::warn!(product_id = product.id, error = %e, "product saved without image");
                Ok(product)
            }
        }
    }

    pub async fn list(state: &AppState, auth: &AuthFarmer) -> Result<Vec<Product>, AppError> {
        state.store.products_by_farmer(auth.farmer_id).await
    }

    pub async fn get(state: &AppState, auth: &AuthFarmer, id: ProductId) -> Result<Product, AppError> {
        Self::owned(state, auth, id).await
    }

    /// Partial update from a multipart form; a new image replaces the stored one. The image is
    /// uploaded before the row is written, so a storage failure leaves the record untouched.
    pub async fn update(
        state: &AppState,
        auth: &AuthFarmer,
        id: ProductId,
        mut form: MultipartForm,
    ) -> Result<Product, AppError> {
        Self::owned(state, auth, id).await?;
        let mut changes = Self::changes(&form)?;
        let file = form.take_file("file");
        if changes.is_empty() && file.is_none() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        if let Some(file) = file {
            changes.image_url = Some(Self::put_image(state, id, file).await?);
        }

        let product = state
            .store
            .update_product(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", id)))?;
        tracing::info!(product_id = id, farmer_id = auth.farmer_id, "product updated");
        Ok(product)
    }

    /// Delete the row and every stored image of the product. Storage cleanup is best effort.
    pub async fn delete(state: &AppState, auth: &AuthFarmer, id: ProductId) -> Result<(), AppError> {
        Self::owned(state, auth, id).await?;
        match state.storage.list(PRODUCT_IMAGES_BUCKET, &product_key_prefix(id)).await {
            Ok(keys) if !keys.is_empty() => {
                if let Err(e) = state.storage.remove(PRODUCT_IMAGES_BUCKET, &keys).await {
                    tracing::warn!(product_id = id, error = %e, "product images not removed");
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(product_id = id, error = %e, "product images not listed"),
        }
        if !state.store.delete_product(id).await? {
            return Err(AppError::NotFound(format!("product {}", id)));
        }
        tracing::info!(product_id = id, farmer_id = auth.farmer_id, "product deleted");
        Ok(())
    }

    /// Point every product that has a stored image at that image's public URL.
    pub async fn relink_images(store: &dyn MarketStore, storage: &dyn ObjectStorage) -> Result<RelinkReport, AppError> {
        let keys = storage.list(PRODUCT_IMAGES_BUCKET, "").await?;
        let mut report = RelinkReport::default();
        for key in keys {
            let Some(product_id) = product_id_from_key(&key) else {
                tracing::debug!(key = %key, "not a product image key");
                report.skipped += 1;
                continue;
            };
            let changes = ProductChanges {
                image_url: Some(storage.public_url(PRODUCT_IMAGES_BUCKET, &key)),
                ..Default::default()
            };
            match store.update_product(product_id, &changes).await {
                Ok(Some(_)) => report.updated += 1,
                Ok(None) => {
                    tracing::debug!(product_id, "no product for image");
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(product_id, error = %e, "image relink failed");
                    report.errors += 1;
                }
            }
        }
        Ok(report)
    }

    async fn owned(state: &AppState, auth: &AuthFarmer, id: ProductId) -> Result<Product, AppError> {
        let product = state
            .store
            .product_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", id)))?;
        if product.farmer_id != auth.farmer_id {
            return Err(AppError::Forbidden(format!("product {} belongs to another farmer", id)));
        }
        Ok(product)
    }

    async fn store_image(state: &AppState, id: ProductId, file: UploadedFile) -> Result<Product, AppError> {
        let changes = ProductChanges {
            image_url: Some(Self::put_image(state, id, file).await?),
            ..Default::default()
        };
        state
            .store
            .update_product(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", id)))
    }

    /// Upload to `{id}.{ext}` and drop images stored under another extension. Returns the public URL.
    async fn put_image(state: &AppState, id: ProductId, file: UploadedFile) -> Result<String, AppError> {
        let ext = IMAGE_POLICY.check(&file)?;
        let key = product_object_key(id, ext);
        state
            .storage
            .upload(PRODUCT_IMAGES_BUCKET, &key, file.bytes, &file.content_type)
            .await?;

        match state.storage.list(PRODUCT_IMAGES_BUCKET, &product_key_prefix(id)).await {
            Ok(keys) => {
                let stale: Vec<String> = keys.into_iter().filter(|k| *k != key).collect();
                if !stale.is_empty() {
                    if let Err(e) = state.storage.remove(PRODUCT_IMAGES_BUCKET, &stale).await {
                        tracing::warn!(product_id = id, error = %e, "stale product images kept");
                    }
                }
            }
            Err(e) => tracing::warn!(product_id = id, error = %e, "product images not listed"),
        }
        Ok(state.storage.public_url(PRODUCT_IMAGES_BUCKET, &key))
    }

    fn new_product(auth: &AuthFarmer, form: &MultipartForm) -> Result<NewProduct, AppError> {
        let product_name = RequestValidator::required("product_name", form.text("product_name"))?;
        let product_katalog_name =
            RequestValidator::required("product_katalog_name", form.text("product_katalog_name"))?;
        let farmer_price =
            RequestValidator::price("farmer_price", RequestValidator::required("farmer_price", form.text("farmer_price"))?)?;
        let stock_quantity = RequestValidator::non_negative_int(
            "stock_quantity",
            RequestValidator::required("stock_quantity", form.text("stock_quantity"))?,
        )?;
        let new = NewProduct {
            farmer_id: auth.farmer_id,
            product_name: product_name.to_string(),
            product_katalog_name: product_katalog_name.to_string(),
            farmer_price,
            stock_quantity,
        };
        new.tarladan_price()?;
        Ok(new)
    }

    fn changes(form: &MultipartForm) -> Result<ProductChanges, AppError> {
        let changes = ProductChanges {
            product_name: form.text("product_name").map(str::to_string),
            product_katalog_name: form.text("product_katalog_name").map(str::to_string),
            farmer_price: form
                .text("farmer_price")
                .map(|v| RequestValidator::price("farmer_price", v))
                .transpose()?,
            stock_quantity: form
                .text("stock_quantity")
                .map(|v| RequestValidator::non_negative_int("stock_quantity", v))
                .transpose()?,
            image_url: None,
        };
        changes.tarladan_price()?;
        Ok(changes)
    }
}
