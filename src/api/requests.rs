//! Request bodies and query strings, and their conversion into engine inputs.
//!
//! Bodies are deserialized with every field optional so that a missing field
//! produces a specific "`<field>` is required" message instead of a generic
//! parse failure.

use crate::{
    core::{
        CouponFilter, CouponPatch, CouponType, NewCoupon,
        validation::{check_expiry_in_future, check_terms},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

fn missing(field: &str) -> Error {
    Error::invalid_input(format!("{field} is required"))
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing(field))
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/coupons`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    /// Redemption code
    pub code: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// "percentage" or "fixed"
    #[serde(rename = "type")]
    pub coupon_type: Option<String>,
    /// Percentage points or flat amount
    pub value: Option<Decimal>,
    /// Defaults to 0
    pub min_amount: Option<Decimal>,
    /// Cap on percentage discounts
    pub max_discount: Option<Decimal>,
    /// Must be after today
    pub expiry_date: Option<NaiveDate>,
    /// Maximum number of redemptions
    pub usage_limit: Option<u32>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

impl CreateCouponRequest {
    /// Checks required fields, type, value range and expiry, in that order.
    pub fn into_new_coupon(self, today: NaiveDate) -> Result<NewCoupon> {
        let code = required_text(self.code, "code")?;
        let name = required_text(self.name, "name")?;
        let description = required_text(self.description, "description")?;
        let coupon_type_raw = required_text(self.coupon_type, "type")?;
        let value = self.value.ok_or_else(|| missing("value"))?;
        let expiry_date = self.expiry_date.ok_or_else(|| missing("expiryDate"))?;
        let usage_limit = self.usage_limit.ok_or_else(|| missing("usageLimit"))?;

        let coupon_type: CouponType = coupon_type_raw.parse()?;
        let min_amount = self.min_amount.unwrap_or_default();
        check_terms(coupon_type, value, min_amount, self.max_discount, usage_limit)?;
        check_expiry_in_future(expiry_date, today)?;

        Ok(NewCoupon {
            code,
            name,
            description,
            coupon_type,
            value,
            min_amount,
            max_discount: self.max_discount,
            expiry_date,
            usage_limit,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

/// Body of `PUT /api/coupons/:id`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponRequest {
    /// New code
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New type
    #[serde(rename = "type")]
    pub coupon_type: Option<String>,
    /// New value
    pub value: Option<Decimal>,
    /// New minimum order amount
    pub min_amount: Option<Decimal>,
    /// New cap; `null` removes it
    #[serde(default, deserialize_with = "double_option")]
    pub max_discount: Option<Option<Decimal>>,
    /// New expiry date, must be after today
    pub expiry_date: Option<NaiveDate>,
    /// New redemption limit
    pub usage_limit: Option<u32>,
    /// New active flag
    pub is_active: Option<bool>,
}

impl UpdateCouponRequest {
    /// Validates the fields that are present. Range checks that depend on the
    /// stored record (a percentage value under a new type) run in the engine.
    pub fn into_patch(self, today: NaiveDate) -> Result<CouponPatch> {
        let coupon_type = self
            .coupon_type
            .map(|raw| raw.parse::<CouponType>())
            .transpose()?;
        if let Some(expiry_date) = self.expiry_date {
            check_expiry_in_future(expiry_date, today)?;
        }

        Ok(CouponPatch {
            code: self.code,
            name: self.name,
            description: self.description,
            coupon_type,
            value: self.value,
            min_amount: self.min_amount,
            max_discount: self.max_discount,
            expiry_date: self.expiry_date,
            usage_limit: self.usage_limit,
            is_active: self.is_active,
        })
    }
}

/// Body of `POST /api/coupons/validate`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    /// Code to check
    pub code: Option<String>,
    /// Order total before discount
    pub order_amount: Option<Decimal>,
}

impl ValidateCouponRequest {
    /// Returns the code and a positive order amount.
    pub fn into_parts(self) -> Result<(String, Decimal)> {
        let required = || Error::invalid_input("Coupon code and order amount are required");
        let code = self
            .code
            .filter(|code| !code.trim().is_empty())
            .ok_or_else(required)?;
        let order_amount = self
            .order_amount
            .filter(|amount| !amount.is_zero())
            .ok_or_else(required)?;
        if order_amount < Decimal::ZERO {
            return Err(Error::invalid_input("Order amount cannot be negative"));
        }
        Ok((code, order_amount))
    }
}

/// Query string of `GET /api/coupons`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCouponsQuery {
    /// "true" selects active coupons, any other value inactive ones
    pub is_active: Option<String>,
    /// "percentage" or "fixed"
    #[serde(rename = "type")]
    pub coupon_type: Option<String>,
    /// Substring of code or name
    pub search: Option<String>,
}

impl ListCouponsQuery {
    /// Builds the typed filter. Empty parameters are ignored.
    pub fn into_filter(self) -> Result<CouponFilter> {
        let coupon_type = self
            .coupon_type
            .filter(|raw| !raw.is_empty())
            .map(|raw| raw.parse::<CouponType>())
            .transpose()?;
        Ok(CouponFilter {
            is_active: self.is_active.map(|raw| raw == "true"),
            coupon_type,
            search: self.search.filter(|term| !term.trim().is_empty()),
        })
    }
}
