//! Coupon domain types - the record itself, its inputs, and validation outcomes.
//!
//! These types are storage-agnostic. The SeaORM entity in [`crate::entities::coupon`]
//! converts to and from [`Coupon`]; the in-memory store keeps [`Coupon`] values directly.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a coupon's `value` is applied to an order amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// `value` is a percentage of the order amount, in [0, 100]
    Percentage,
    /// `value` is a flat amount taken off the order
    Fixed,
}

impl CouponType {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for CouponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(Error::invalid_input(
                "Type must be either \"percentage\" or \"fixed\"",
            )),
        }
    }
}

/// A stored discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Store-assigned identifier, never changes
    pub id: i64,
    /// Redemption code, always uppercase
    pub code: String,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Percentage or fixed discount
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    /// Percentage points or flat amount, depending on `coupon_type`
    pub value: Decimal,
    /// Smallest order amount the coupon applies to
    pub min_amount: Decimal,
    /// Cap on percentage discounts
    pub max_discount: Option<Decimal>,
    /// Last calendar day the coupon can be used
    pub expiry_date: NaiveDate,
    /// Maximum number of redemptions
    pub usage_limit: u32,
    /// Redemptions recorded so far
    pub used_count: u32,
    /// Manual on/off switch
    pub is_active: bool,
    /// When the coupon was created
    pub created_at: DateTime<Utc>,
    /// When the coupon was last modified
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// True once `today` is past the expiry date. The expiry day itself is still usable.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// True when no redemptions are left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.used_count >= self.usage_limit
    }

    /// Discount this coupon grants on `order_amount`, ignoring eligibility.
    ///
    /// Percentage discounts are clamped to `max_discount` when one is set; a cap
    /// of zero is a real cap. Returns `None` when the amount is too large for
    /// decimal arithmetic.
    #[must_use]
    pub fn discount_for(&self, order_amount: Decimal) -> Option<Decimal> {
        match self.coupon_type {
            CouponType::Fixed => Some(self.value),
            CouponType::Percentage => {
                let discount = order_amount
                    .checked_mul(self.value)?
                    .checked_div(Decimal::ONE_HUNDRED)?;
                Some(match self.max_discount {
                    Some(cap) if discount > cap => cap,
                    _ => discount,
                })
            }
        }
    }
}

/// Input for creating a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    /// Requested code, any case
    pub code: String,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Percentage or fixed discount
    pub coupon_type: CouponType,
    /// Percentage points or flat amount
    pub value: Decimal,
    /// Smallest qualifying order amount
    pub min_amount: Decimal,
    /// Cap on percentage discounts
    pub max_discount: Option<Decimal>,
    /// Last usable day
    pub expiry_date: NaiveDate,
    /// Maximum number of redemptions
    pub usage_limit: u32,
    /// Initial on/off state
    pub is_active: bool,
}

/// Partial update. `None` leaves the field untouched.
///
/// `max_discount` is doubly optional so a patch can clear the cap with
/// `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponPatch {
    /// New code, any case
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New discount kind
    pub coupon_type: Option<CouponType>,
    /// New value
    pub value: Option<Decimal>,
    /// New minimum order amount
    pub min_amount: Option<Decimal>,
    /// New cap, or `Some(None)` to remove it
    pub max_discount: Option<Option<Decimal>>,
    /// New expiry date
    pub expiry_date: Option<NaiveDate>,
    /// New redemption limit
    pub usage_limit: Option<u32>,
    /// New on/off state
    pub is_active: Option<bool>,
}

impl CouponPatch {
    /// Copies every provided field onto `coupon`. The code is taken as given;
    /// normalization happens in the engine before this is called.
    pub fn apply_to(self, coupon: &mut Coupon) {
        if let Some(code) = self.code {
            coupon.code = code;
        }
        if let Some(name) = self.name {
            coupon.name = name;
        }
        if let Some(description) = self.description {
            coupon.description = description;
        }
        if let Some(coupon_type) = self.coupon_type {
            coupon.coupon_type = coupon_type;
        }
        if let Some(value) = self.value {
            coupon.value = value;
        }
        if let Some(min_amount) = self.min_amount {
            coupon.min_amount = min_amount;
        }
        if let Some(max_discount) = self.max_discount {
            coupon.max_discount = max_discount;
        }
        if let Some(expiry_date) = self.expiry_date {
            coupon.expiry_date = expiry_date;
        }
        if let Some(usage_limit) = self.usage_limit {
            coupon.usage_limit = usage_limit;
        }
        if let Some(is_active) = self.is_active {
            coupon.is_active = is_active;
        }
    }
}

/// Typed list filter. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponFilter {
    /// Only coupons with this active flag
    pub is_active: Option<bool>,
    /// Only coupons of this type
    pub coupon_type: Option<CouponType>,
    /// Case-insensitive substring of the code or name
    pub search: Option<String>,
}

impl CouponFilter {
    /// Whether `coupon` passes every condition of the filter.
    #[must_use]
    pub fn matches(&self, coupon: &Coupon) -> bool {
        if self.is_active.is_some_and(|active| coupon.is_active != active) {
            return false;
        }
        if self.coupon_type.is_some_and(|kind| coupon.coupon_type != kind) {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            let term = term.to_lowercase();
            return coupon.code.to_lowercase().contains(&term)
                || coupon.name.to_lowercase().contains(&term);
        }
        true
    }
}

/// Why a coupon cannot be applied to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// No coupon carries this code
    NotFound,
    /// The coupon is switched off
    Inactive,
    /// The expiry date is in the past
    Expired,
    /// Every redemption has been used
    UsageLimitReached,
    /// The order is smaller than the coupon's minimum
    BelowMinimum {
        /// The minimum the order has to reach
        min_amount: Decimal,
    },
    /// The order amount overflows decimal arithmetic
    AmountOutOfRange,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("Coupon not found"),
            Self::Inactive => f.write_str("Coupon is not active"),
            Self::Expired => f.write_str("Coupon has expired"),
            Self::UsageLimitReached => f.write_str("Coupon usage limit reached"),
            Self::BelowMinimum { min_amount } => {
                write!(f, "Minimum order amount is ${}", min_amount.normalize())
            }
            Self::AmountOutOfRange => f.write_str("Order amount is out of range"),
        }
    }
}

/// A successful quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    /// The coupon that was applied
    pub coupon: Coupon,
    /// Amount taken off the order
    pub discount: Decimal,
    /// Order amount after the discount, not floored at zero
    pub final_amount: Decimal,
}

/// Outcome of validating a code against an order amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The coupon applies
    Valid(AppliedDiscount),
    /// The coupon does not apply, and why
    Invalid(InvalidReason),
}

impl Validation {
    /// True for [`Validation::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}
