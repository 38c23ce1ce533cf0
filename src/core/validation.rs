//! Field rules shared by the engine and the HTTP layer.
//!
//! The engine enforces the structural rules ([`normalize_code`], [`check_terms`]) on
//! every write. The expiry rule ([`check_expiry_in_future`]) only applies when a client
//! submits a date, so the HTTP layer calls it directly.

use crate::{
    core::coupon::CouponType,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trims and uppercases a coupon code, rejecting blank codes.
///
/// Stored codes and lookup keys both go through this, so equality on the
/// result is the case-insensitive comparison.
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::invalid_input("code is required"));
    }
    Ok(code.to_uppercase())
}

/// Checks the numeric invariants of a coupon's terms.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if:
/// - `value`, `min_amount` or `max_discount` is negative
/// - a percentage `value` is above 100
/// - `usage_limit` is zero
pub fn check_terms(
    coupon_type: CouponType,
    value: Decimal,
    min_amount: Decimal,
    max_discount: Option<Decimal>,
    usage_limit: u32,
) -> Result<()> {
    let percentage_range = Decimal::ZERO..=Decimal::ONE_HUNDRED;
    if coupon_type == CouponType::Percentage && !percentage_range.contains(&value) {
        return Err(Error::invalid_input(
            "Percentage value must be between 0 and 100",
        ));
    }
    if value < Decimal::ZERO {
        return Err(Error::invalid_input("Value cannot be negative"));
    }
    if min_amount < Decimal::ZERO {
        return Err(Error::invalid_input("Minimum amount cannot be negative"));
    }
    if max_discount.is_some_and(|cap| cap < Decimal::ZERO) {
        return Err(Error::invalid_input("Maximum discount cannot be negative"));
    }
    if usage_limit == 0 {
        return Err(Error::invalid_input("Usage limit must be at least 1"));
    }
    Ok(())
}

/// Rejects expiry dates that are not strictly after `today`.
pub fn check_expiry_in_future(expiry_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if expiry_date <= today {
        return Err(Error::invalid_input("Expiry date must be in the future"));
    }
    Ok(())
}
