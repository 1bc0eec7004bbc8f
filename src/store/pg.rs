//! Store traits over a sqlx `PgPool`.

use super::{FarmerRepo, MarketStore, OrderRepo, ProductRepo};
use crate::error::AppError;
use crate::model::{
    commission_percent, Farmer, FarmerCertificate, FarmerChanges, FarmerId, FarmerImage,
    IncomeEntry, NewFarmer, NewProduct, OrderLineView, OrderProduct, OrderProductId,
    OrderProductStatus, Preparation, Product, ProductChanges, ProductId, StoreActivity,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const FARMER_COLUMNS: &str = "farmer_id, auth_id, farmer_name, farmer_last_name, farmer_age, \
    farmer_address, farmer_city, farmer_town, farmer_neighbourhood, farmer_phone_number, \
    farmer_mail, farmer_activity_status, farm_name, farmer_tc_no, imgurl, farmer_biografi, \
    store_activity, created_at";

const PRODUCT_COLUMNS: &str = "id, farmer_id, product_name, product_katalog_name, farmer_price, \
    tarladan_commission, tarladan_price, stock_quantity, image_url, created_at, updated_at";

const LINE_COLUMNS: &str = "order_product_id, order_id, product_id, farmer_id, farmer_name, \
    unit_quantity, unit_price, total_product_price, order_product_rate, delivery_address_id, \
    product_name, order_product_status, created_at";

const INCOME_COLUMNS: &str = "income_id, order_prduct_id, product_id, farmer_id, farmer_name, \
    product_name, product_quantity, product_income, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FarmerRepo for PgStore {
    async fn insert_farmer(&self, new: &NewFarmer) -> Result<Farmer, AppError> {
        let sql = format!(
            "INSERT INTO farmer (auth_id, farmer_name, farmer_last_name, farmer_age, farmer_address, \
             farmer_city, farmer_town, farmer_neighbourhood, farmer_phone_number, farmer_mail, \
             farmer_activity_status, farm_name, farmer_tc_no, imgurl, store_activity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING {}",
            FARMER_COLUMNS
        );
        tracing::debug!(sql = %sql, auth_id = %new.auth_id, "query");
        let farmer = sqlx::query_as::<_, Farmer>(&sql)
            .bind(new.auth_id)
            .bind(&new.farmer_name)
            .bind(&new.farmer_last_name)
            .bind(new.farmer_age)
            .bind(&new.farmer_address)
            .bind(&new.farmer_city)
            .bind(&new.farmer_town)
            .bind(&new.farmer_neighbourhood)
            .bind(&new.farmer_phone_number)
            .bind(&new.farmer_mail)
            .bind(new.farmer_activity_status.as_str())
            .bind(&new.farm_name)
            .bind(&new.farmer_tc_no)
            .bind(&new.imgurl)
            .bind(StoreActivity::Nonactive.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(farmer)
    }

    async fn farmer_by_id(&self, id: FarmerId) -> Result<Option<Farmer>, AppError> {
        let sql = format!("SELECT {} FROM farmer WHERE farmer_id = $1", FARMER_COLUMNS);
        tracing::debug!(sql = %sql, farmer_id = id, "query");
        Ok(sqlx::query_as::<_, Farmer>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn farmer_by_auth_id(&self, auth_id: Uuid) -> Result<Option<Farmer>, AppError> {
        let sql = format!("SELECT {} FROM farmer WHERE auth_id = $1", FARMER_COLUMNS);
        tracing::debug!(sql = %sql, auth_id = %auth_id, "query");
        Ok(sqlx::query_as::<_, Farmer>(&sql).bind(auth_id).fetch_optional(&self.pool).await?)
    }

    async fn update_farmer(&self, id: FarmerId, changes: &FarmerChanges) -> Result<Option<Farmer>, AppError> {
        let sql = format!(
            "UPDATE farmer SET \
             farmer_name = COALESCE($2, farmer_name), \
             farmer_last_name = COALESCE($3, farmer_last_name), \
             farmer_age = COALESCE($4, farmer_age), \
             farmer_address = COALESCE($5, farmer_address), \
             farmer_city = COALESCE($6, farmer_city), \
             farmer_town = COALESCE($7, farmer_town), \
             farmer_neighbourhood = COALESCE($8, farmer_neighbourhood), \
             farmer_phone_number = COALESCE($9, farmer_phone_number), \
             farm_name = COALESCE($10, farm_name), \
             imgurl = COALESCE($11, imgurl) \
             WHERE farmer_id = $1 RETURNING {}",
            FARMER_COLUMNS
        );
        tracing::debug!(sql = %sql, farmer_id = id, "query");
        Ok(sqlx::query_as::<_, Farmer>(&sql)
            .bind(id)
            .bind(&changes.farmer_name)
            .bind(&changes.farmer_last_name)
            .bind(changes.farmer_age)
            .bind(&changes.farmer_address)
            .bind(&changes.farmer_city)
            .bind(&changes.farmer_town)
            .bind(&changes.farmer_neighbourhood)
            .bind(&changes.farmer_phone_number)
            .bind(&changes.farm_name)
            .bind(&changes.imgurl)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_biography(&self, id: FarmerId, biography: &str) -> Result<Option<Farmer>, AppError> {
        let sql = format!(
            "UPDATE farmer SET farmer_biografi = $2 WHERE farmer_id = $1 RETURNING {}",
            FARMER_COLUMNS
        );
        Ok(sqlx::query_as::<_, Farmer>(&sql)
            .bind(id)
            .bind(biography)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_store_activity(&self, id: FarmerId, activity: StoreActivity) -> Result<Option<Farmer>, AppError> {
        let sql = format!(
            "UPDATE farmer SET store_activity = $2 WHERE farmer_id = $1 RETURNING {}",
            FARMER_COLUMNS
        );
        Ok(sqlx::query_as::<_, Farmer>(&sql)
            .bind(id)
            .bind(activity.as_str())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_farmer(&self, id: FarmerId) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM farmer WHERE farmer_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn insert_image(&self, farmer_id: FarmerId, file_path: &str, image_url: &str) -> Result<FarmerImage, AppError> {
        Ok(sqlx::query_as::<_, FarmerImage>(
            "INSERT INTO farmer_images (farmer_id, file_path, image_url) VALUES ($1, $2, $3) \
             RETURNING id, farmer_id, file_path, image_url, created_at",
        )
        .bind(farmer_id)
        .bind(file_path)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn images_for(&self, farmer_id: FarmerId) -> Result<Vec<FarmerImage>, AppError> {
        Ok(sqlx::query_as::<_, FarmerImage>(
            "SELECT id, farmer_id, file_path, image_url, created_at FROM farmer_images \
             WHERE farmer_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn image_by_id(&self, id: i64) -> Result<Option<FarmerImage>, AppError> {
        Ok(sqlx::query_as::<_, FarmerImage>(
            "SELECT id, farmer_id, file_path, image_url, created_at FROM farmer_images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_image(&self, id: i64) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM farmer_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn insert_certificate(
        &self,
        farmer_id: FarmerId,
        file_path: &str,
        certificate_url: &str,
    ) -> Result<FarmerCertificate, AppError> {
        Ok(sqlx::query_as::<_, FarmerCertificate>(
            "INSERT INTO farmer_certificate (farmer_id, file_path, certificate_url) VALUES ($1, $2, $3) \
             RETURNING id, farmer_id, file_path, certificate_url, created_at",
        )
        .bind(farmer_id)
        .bind(file_path)
        .bind(certificate_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn certificates_for(&self, farmer_id: FarmerId) -> Result<Vec<FarmerCertificate>, AppError> {
        Ok(sqlx::query_as::<_, FarmerCertificate>(
            "SELECT id, farmer_id, file_path, certificate_url, created_at FROM farmer_certificate \
             WHERE farmer_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn certificate_by_id(&self, id: i64) -> Result<Option<FarmerCertificate>, AppError> {
        Ok(sqlx::query_as::<_, FarmerCertificate>(
            "SELECT id, farmer_id, file_path, certificate_url, created_at FROM farmer_certificate WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_certificate(&self, id: i64) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM farmer_certificate WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl ProductRepo for PgStore {
    async fn insert_product(&self, new: &NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (farmer_id, product_name, product_katalog_name, farmer_price, \
             tarladan_commission, tarladan_price, stock_quantity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let tarladan_price = new.tarladan_price()?;
        tracing::debug!(sql = %sql, farmer_id = new.farmer_id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(new.farmer_id)
            .bind(&new.product_name)
            .bind(&new.product_katalog_name)
            .bind(new.farmer_price)
            .bind(commission_percent())
            .bind(tarladan_price)
            .bind(new.stock_quantity)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        tracing::debug!(sql = %sql, product_id = id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn products_by_farmer(&self, farmer_id: FarmerId) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {} FROM products WHERE farmer_id = $1 ORDER BY created_at DESC, id DESC",
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, farmer_id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql).bind(farmer_id).fetch_all(&self.pool).await?)
    }

    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET \
             product_name = COALESCE($2, product_name), \
             product_katalog_name = COALESCE($3, product_katalog_name), \
             farmer_price = COALESCE($4, farmer_price), \
             tarladan_price = COALESCE($5, tarladan_price), \
             stock_quantity = COALESCE($6, stock_quantity), \
             image_url = COALESCE($7, image_url), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let tarladan_price = changes.tarladan_price()?;
        tracing::debug!(sql = %sql, product_id = id, "query");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&changes.product_name)
            .bind(&changes.product_katalog_name)
            .bind(changes.farmer_price)
            .bind(tarladan_price)
            .bind(changes.stock_quantity)
            .bind(&changes.image_url)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepo for PgStore {
    async fn lines_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<OrderLineView>, AppError> {
        let columns = LINE_COLUMNS
            .split(',')
            .map(|c| format!("op.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {}, p.image_url AS product_image_url, p.product_katalog_name AS product_description \
             FROM order_product op LEFT JOIN products p ON p.id = op.product_id \
             WHERE op.farmer_id = $1 ORDER BY op.order_id DESC, op.order_product_id DESC",
            columns
        );
        tracing::debug!(sql = %sql, farmer_id, "query");
        Ok(sqlx::query_as::<_, OrderLineView>(&sql).bind(farmer_id).fetch_all(&self.pool).await?)
    }

    async fn line_by_id(&self, id: OrderProductId) -> Result<Option<OrderProduct>, AppError> {
        let sql = format!("SELECT {} FROM order_product WHERE order_product_id = $1", LINE_COLUMNS);
        tracing::debug!(sql = %sql, order_product_id = id, "query");
        Ok(sqlx::query_as::<_, OrderProduct>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn set_line_status(
        &self,
        id: OrderProductId,
        status: OrderProductStatus,
    ) -> Result<Option<OrderProduct>, AppError> {
        let sql = format!(
            "UPDATE order_product SET order_product_status = $2 WHERE order_product_id = $1 RETURNING {}",
            LINE_COLUMNS
        );
        tracing::debug!(sql = %sql, order_product_id = id, status = status.as_str(), "query");
        Ok(sqlx::query_as::<_, OrderProduct>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn complete_preparation(
        &self,
        line: &OrderProduct,
        status: OrderProductStatus,
    ) -> Result<Preparation, AppError> {
        let mut tx = self.pool.begin().await?;

        // Re-check under a row lock so a concurrent request cannot book the income twice.
        let locked = sqlx::query_as::<_, OrderProduct>(&format!(
            "SELECT {} FROM order_product WHERE order_product_id = $1 FOR UPDATE",
            LINE_COLUMNS
        ))
        .bind(line.order_product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order product {}", line.order_product_id)))?;
        let from = locked.order_product_status;
        if !from.can_transition_to(status) || !from.books_income_on(status) {
            return Err(AppError::Conflict(format!(
                "order product {} is already {}",
                locked.order_product_id,
                locked.order_product_status.as_str()
            )));
        }

        let updated = sqlx::query_as::<_, OrderProduct>(&format!(
            "UPDATE order_product SET order_product_status = $2 WHERE order_product_id = $1 RETURNING {}",
            LINE_COLUMNS
        ))
        .bind(locked.order_product_id)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let income = sqlx::query_as::<_, IncomeEntry>(&format!(
            "INSERT INTO farmer_product_income (order_prduct_id, product_id, farmer_id, farmer_name, \
             product_name, product_quantity, product_income, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING {}",
            INCOME_COLUMNS
        ))
        .bind(locked.order_product_id)
        .bind(locked.product_id)
        .bind(locked.farmer_id)
        .bind(&locked.farmer_name)
        .bind(&locked.product_name)
        .bind(locked.unit_quantity)
        .bind(locked.total_product_price)
        .fetch_one(&mut *tx)
        .await?;

        let remaining: Option<(i32,)> = sqlx::query_as(
            "UPDATE products SET stock_quantity = GREATEST(stock_quantity - $2, 0), updated_at = NOW() \
             WHERE id = $1 RETURNING stock_quantity",
        )
        .bind(locked.product_id)
        .bind(locked.unit_quantity)
        .fetch_optional(&mut *tx)
        .await?;
        if remaining.is_none() {
            tracing::warn!(product_id = locked.product_id, "product missing, stock not decremented");
        }

        tx.commit().await?;
        Ok(Preparation {
            line: updated,
            income,
            remaining_stock: remaining.map(|(s,)| s),
        })
    }

    async fn income_for_farmer(&self, farmer_id: FarmerId) -> Result<Vec<IncomeEntry>, AppError> {
        let sql = format!(
            "SELECT {} FROM farmer_product_income WHERE farmer_id = $1 ORDER BY created_at DESC, income_id DESC",
            INCOME_COLUMNS
        );
        tracing::debug!(sql = %sql, farmer_id, "query");
        Ok(sqlx::query_as::<_, IncomeEntry>(&sql).bind(farmer_id).fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl MarketStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
