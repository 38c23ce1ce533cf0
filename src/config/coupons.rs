//! Seed coupons from config.toml
//!
//! The `[[coupons]]` entries in config.toml are created on start-up when no coupon
//! with the same code exists yet. Existing coupons are never overwritten, so edits
//! made through the API survive restarts.

use crate::{
    core::{CouponEngine, CouponType, NewCoupon},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

const fn default_active() -> bool {
    true
}

/// One `[[coupons]]` entry
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CouponSeed {
    /// Redemption code, any case
    pub code: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// "percentage" or "fixed"
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    /// Percentage points or flat amount
    pub value: Decimal,
    /// Smallest qualifying order amount
    #[serde(default)]
    pub min_amount: Decimal,
    /// Cap on percentage discounts
    pub max_discount: Option<Decimal>,
    /// Last usable day, "YYYY-MM-DD"
    pub expiry_date: NaiveDate,
    /// Maximum number of redemptions
    pub usage_limit: u32,
    /// Whether the coupon starts active
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<CouponSeed> for NewCoupon {
    fn from(seed: CouponSeed) -> Self {
        Self {
            code: seed.code,
            name: seed.name,
            description: seed.description,
            coupon_type: seed.coupon_type,
            value: seed.value,
            min_amount: seed.min_amount,
            max_discount: seed.max_discount,
            expiry_date: seed.expiry_date,
            usage_limit: seed.usage_limit,
            is_active: seed.is_active,
        }
    }
}

/// Creates every seed whose code is not taken yet and returns how many were created.
///
/// # Errors
/// Returns an error if a seed breaks a coupon invariant or the store fails.
pub async fn seed_coupons(engine: &CouponEngine, seeds: &[CouponSeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        match engine.create(seed.clone().into()).await {
            Ok(_) => created += 1,
            Err(Error::DuplicateCode { code }) => {
                debug!("Seed coupon {} already present, skipping", code);
            }
            Err(e) => return Err(e),
        }
    }
    info!("Seeded {} of {} configured coupons", created, seeds.len());
    Ok(created)
}
