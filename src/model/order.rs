//! Order line items, their status vocabulary and the income ledger.

use super::farmer::{FarmerId, UnknownVariant};
use super::product::ProductId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type OrderProductId = i64;

/// Line-item status. `Preparing` is the "prepared" stage that books income.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderProductStatus {
    Pending,
    Confirmed,
    Preparing,
    InDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderProductStatus::Pending => "pending",
            OrderProductStatus::Confirmed => "confirmed",
            OrderProductStatus::Preparing => "preparing",
            OrderProductStatus::InDelivery => "in_delivery",
            OrderProductStatus::Delivered => "delivered",
            OrderProductStatus::Cancelled => "cancelled",
            OrderProductStatus::Returned => "returned",
        }
    }

    /// Accepts the enum vocabulary and the legacy Turkish labels.
    pub fn parse(value: &str) -> Option<Self> {
        let status = match value.trim() {
            "pending" => OrderProductStatus::Pending,
            "confirmed" | "onaylandı" => OrderProductStatus::Confirmed,
            "preparing" | "hazırlandı" => OrderProductStatus::Preparing,
            "in_delivery" => OrderProductStatus::InDelivery,
            "delivered" => OrderProductStatus::Delivered,
            "cancelled" | "iptal edildi" => OrderProductStatus::Cancelled,
            "returned" => OrderProductStatus::Returned,
            _ => return None,
        };
        Some(status)
    }

    /// Position on the forward path; `None` for the terminal side states.
    fn stage(&self) -> Option<u8> {
        match self {
            OrderProductStatus::Pending => Some(0),
            OrderProductStatus::Confirmed => Some(1),
            OrderProductStatus::Preparing => Some(2),
            OrderProductStatus::InDelivery => Some(3),
            OrderProductStatus::Delivered => Some(4),
            OrderProductStatus::Cancelled | OrderProductStatus::Returned => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderProductStatus::Cancelled | OrderProductStatus::Returned
        )
    }

    pub fn can_transition_to(&self, next: OrderProductStatus) -> bool {
        use OrderProductStatus::*;
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            Cancelled => matches!(self, Pending | Confirmed | Preparing),
            Returned => matches!(self, InDelivery | Delivered),
            _ => match (self.stage(), next.stage()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }

    /// True when moving from `self` to `next` enters or passes the prepared stage. Such a move
    /// books income and takes stock, whichever forward status it lands on.
    pub fn books_income_on(&self, next: OrderProductStatus) -> bool {
        let prepared = OrderProductStatus::Preparing.stage();
        matches!(
            (self.stage(), next.stage()),
            (Some(from), Some(to)) if Some(from) < prepared && Some(to) >= prepared
        )
    }
}

impl TryFrom<String> for OrderProductStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OrderProductStatus::parse(&value).ok_or(UnknownVariant {
            kind: "order product status",
            value,
        })
    }
}

#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct OrderProduct {
    pub order_product_id: OrderProductId,
    pub order_id: i64,
    pub product_id: ProductId,
    pub farmer_id: FarmerId,
    pub farmer_name: String,
    pub unit_quantity: i32,
    pub unit_price: Decimal,
    pub total_product_price: Decimal,
    pub order_product_rate: Option<i32>,
    pub delivery_address_id: Option<i64>,
    pub product_name: String,
    #[sqlx(try_from = "String")]
    pub order_product_status: OrderProductStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item as shown to its farmer, with product details joined in.
#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct OrderLineView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub line: OrderProduct,
    pub product_image_url: Option<String>,
    pub product_description: Option<String>,
}

/// Append-only revenue row booked when a line item is prepared.
#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct IncomeEntry {
    pub income_id: i64,
    /// Column name as the hosted table spells it.
    pub order_prduct_id: OrderProductId,
    pub product_id: ProductId,
    pub farmer_id: FarmerId,
    pub farmer_name: String,
    pub product_name: String,
    pub product_quantity: i32,
    pub product_income: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Result of moving a line item into the prepared stage.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Preparation {
    pub line: OrderProduct,
    pub income: IncomeEntry,
    /// Stock after the decrement; `None` when the product no longer exists.
    pub remaining_stock: Option<i32>,
}

/// Stock left after selling `sold` units; never negative.
pub fn remaining_stock(current: i32, sold: i32) -> i32 {
    current.saturating_sub(sold).max(0)
}
