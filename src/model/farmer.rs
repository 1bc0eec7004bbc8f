//! Farmer account, its status flags and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub type FarmerId = i64;

#[derive(Error, Debug)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Account status. Only `Active` farmers may log in or be shown publicly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ActivityStatus {
    Active,
    NonActive,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Active => "Active",
            ActivityStatus::NonActive => "NonActive",
        }
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Active" => Ok(ActivityStatus::Active),
            // Older rows carry "Inactive"; anything else is a data error.
            "NonActive" | "Inactive" => Ok(ActivityStatus::NonActive),
            _ => Err(UnknownVariant {
                kind: "activity status",
                value,
            }),
        }
    }
}

/// Storefront visibility, independent of the account status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreActivity {
    Active,
    Nonactive,
}

impl StoreActivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreActivity::Active => "active",
            StoreActivity::Nonactive => "nonactive",
        }
    }
}

impl TryFrom<String> for StoreActivity {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "active" => Ok(StoreActivity::Active),
            "nonactive" | "inactive" => Ok(StoreActivity::Nonactive),
            _ => Err(UnknownVariant {
                kind: "store activity",
                value,
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct Farmer {
    pub farmer_id: FarmerId,
    pub auth_id: Uuid,
    pub farmer_name: String,
    pub farmer_last_name: String,
    pub farmer_age: i32,
    pub farmer_address: String,
    pub farmer_city: String,
    pub farmer_town: String,
    pub farmer_neighbourhood: String,
    pub farmer_phone_number: String,
    pub farmer_mail: String,
    #[sqlx(try_from = "String")]
    pub farmer_activity_status: ActivityStatus,
    pub farm_name: String,
    pub farmer_tc_no: String,
    pub imgurl: Option<String>,
    pub farmer_biografi: Option<String>,
    #[sqlx(try_from = "String")]
    pub store_activity: StoreActivity,
    pub created_at: DateTime<Utc>,
}

impl Farmer {
    pub fn is_active(&self) -> bool {
        self.farmer_activity_status == ActivityStatus::Active
    }

    pub fn public_profile(&self) -> PublicFarmer {
        PublicFarmer {
            farmer_id: self.farmer_id,
            farmer_name: self.farmer_name.clone(),
            farmer_last_name: self.farmer_last_name.clone(),
            farmer_city: self.farmer_city.clone(),
            farmer_town: self.farmer_town.clone(),
            farm_name: self.farm_name.clone(),
            imgurl: self.imgurl.clone(),
            farmer_biografi: self.farmer_biografi.clone(),
        }
    }
}

/// What anonymous visitors may see of a farmer.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PublicFarmer {
    pub farmer_id: FarmerId,
    pub farmer_name: String,
    pub farmer_last_name: String,
    pub farmer_city: String,
    pub farmer_town: String,
    pub farm_name: String,
    pub imgurl: Option<String>,
    pub farmer_biografi: Option<String>,
}

/// Row written on registration, after the identity sign-up succeeded.
#[derive(Clone, Debug)]
pub struct NewFarmer {
    pub auth_id: Uuid,
    pub farmer_name: String,
    pub farmer_last_name: String,
    pub farmer_age: i32,
    pub farmer_address: String,
    pub farmer_city: String,
    pub farmer_town: String,
    pub farmer_neighbourhood: String,
    pub farmer_phone_number: String,
    pub farmer_mail: String,
    pub farmer_activity_status: ActivityStatus,
    pub farm_name: String,
    pub farmer_tc_no: String,
    pub imgurl: Option<String>,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct FarmerChanges {
    pub farmer_name: Option<String>,
    pub farmer_last_name: Option<String>,
    pub farmer_age: Option<i32>,
    pub farmer_address: Option<String>,
    pub farmer_city: Option<String>,
    pub farmer_town: Option<String>,
    pub farmer_neighbourhood: Option<String>,
    pub farmer_phone_number: Option<String>,
    pub farm_name: Option<String>,
    pub imgurl: Option<String>,
}

impl FarmerChanges {
    pub fn is_empty(&self) -> bool {
        self.farmer_name.is_none()
            && self.farmer_last_name.is_none()
            && self.farmer_age.is_none()
            && self.farmer_address.is_none()
            && self.farmer_city.is_none()
            && self.farmer_town.is_none()
            && self.farmer_neighbourhood.is_none()
            && self.farmer_phone_number.is_none()
            && self.farm_name.is_none()
            && self.imgurl.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_inactive_reads_as_non_active() {
        let s = ActivityStatus::try_from("Inactive".to_string()).unwrap();
        assert_eq!(s, ActivityStatus::NonActive);
        assert!(ActivityStatus::try_from("active".to_string()).is_err());
    }

    #[test]
    fn store_activity_is_case_insensitive() {
        assert_eq!(
            StoreActivity::try_from("Active".to_string()).unwrap(),
            StoreActivity::Active
        );
        assert_eq!(StoreActivity::Nonactive.as_str(), "nonactive");
    }
}
