//! Catalog product and the marketplace price rule.

use super::farmer::FarmerId;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type ProductId = i64;

/// Marketplace commission, in percent of the farmer price.
pub const COMMISSION_PERCENT: i64 = 5;

pub fn commission_percent() -> Decimal {
    Decimal::from(COMMISSION_PERCENT)
}

/// Largest amount the `NUMERIC(10, 2)` price columns hold.
pub fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("marketplace price for {0} does not fit a NUMERIC(10, 2) column")]
pub struct PriceOutOfRange(pub Decimal);

/// Price shown to consumers: farmer price plus commission, rounded to cents.
pub fn marketplace_price(farmer_price: Decimal) -> Result<Decimal, PriceOutOfRange> {
    let multiplier = Decimal::ONE + Decimal::new(COMMISSION_PERCENT, 2);
    farmer_price
        .checked_mul(multiplier)
        .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .filter(|p| *p <= max_price())
        .ok_or(PriceOutOfRange(farmer_price))
}

#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub farmer_id: FarmerId,
    pub product_name: String,
    pub product_katalog_name: String,
    pub farmer_price: Decimal,
    pub tarladan_commission: Decimal,
    pub tarladan_price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub farmer_id: FarmerId,
    pub product_name: String,
    pub product_katalog_name: String,
    pub farmer_price: Decimal,
    pub stock_quantity: i32,
}

impl NewProduct {
    pub fn tarladan_price(&self) -> Result<Decimal, PriceOutOfRange> {
        marketplace_price(self.farmer_price)
    }
}

/// Partial product update. A new farmer price always carries its derived marketplace price.
#[derive(Clone, Debug, Default)]
pub struct ProductChanges {
    pub product_name: Option<String>,
    pub product_katalog_name: Option<String>,
    pub farmer_price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.product_katalog_name.is_none()
            && self.farmer_price.is_none()
            && self.stock_quantity.is_none()
            && self.image_url.is_none()
    }

    pub fn tarladan_price(&self) -> Result<Option<Decimal>, PriceOutOfRange> {
        self.farmer_price.map(marketplace_price).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn marketplace_price_adds_five_percent() {
        assert_eq!(marketplace_price(Decimal::from(100)).unwrap(), Decimal::from_str("105.00").unwrap());
        assert_eq!(
            marketplace_price(Decimal::from_str("19.99").unwrap()).unwrap(),
            Decimal::from_str("20.99").unwrap()
        );
    }

    #[test]
    fn marketplace_price_rounds_half_away_from_zero() {
        // 0.10 * 1.05 = 0.105
        assert_eq!(
            marketplace_price(Decimal::from_str("0.10").unwrap()).unwrap(),
            Decimal::from_str("0.11").unwrap()
        );
    }

    #[test]
    fn marketplace_price_must_fit_the_column() {
        // 95238095.24 * 1.05 = 100000000.002
        let over = Decimal::from_str("95238095.24").unwrap();
        assert_eq!(marketplace_price(over), Err(PriceOutOfRange(over)));
        assert_eq!(
            marketplace_price(Decimal::from_str("95238095.23").unwrap()).unwrap(),
            Decimal::from_str("99999999.99").unwrap()
        );
        assert!(marketplace_price(Decimal::MAX).is_err());
    }

    #[test]
    fn price_change_carries_marketplace_price() {
        let changes = ProductChanges {
            farmer_price: Some(Decimal::from(40)),
            ..Default::default()
        };
        assert_eq!(changes.tarladan_price(), Ok(Some(Decimal::from(42))));
        assert_eq!(ProductChanges::default().tarladan_price(), Ok(None));
    }
}
