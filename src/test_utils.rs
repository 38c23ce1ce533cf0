//! Shared test utilities for the coupon service.
//!
//! This module provides helpers for setting up engines over either store and
//! for building coupon inputs with sensible defaults.

use crate::{
    core::{Coupon, CouponEngine, CouponType, NewCoupon},
    errors::Result,
    store::{MemoryCouponStore, SeaOrmCouponStore},
};
use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An engine over an empty in-memory store.
pub fn setup_memory_engine() -> CouponEngine {
    CouponEngine::new(Arc::new(MemoryCouponStore::new()))
}

/// An engine over an empty in-memory `SQLite` database.
pub async fn setup_sqlite_engine() -> Result<CouponEngine> {
    let db = setup_test_db().await?;
    Ok(CouponEngine::new(Arc::new(SeaOrmCouponStore::new(db))))
}

/// Coupon input with sensible defaults.
///
/// # Defaults
/// * `type`: percentage, `value`: 10
/// * `min_amount`: 0, no `max_discount`
/// * `expiry_date`: 30 days from today
/// * `usage_limit`: 100, active
pub fn new_coupon(code: &str) -> NewCoupon {
    let today = Utc::now().date_naive();
    NewCoupon {
        code: code.to_string(),
        name: format!("{code} coupon"),
        description: "Test coupon".to_string(),
        coupon_type: CouponType::Percentage,
        value: Decimal::from(10),
        min_amount: Decimal::ZERO,
        max_discount: None,
        expiry_date: today.checked_add_days(Days::new(30)).unwrap_or(today),
        usage_limit: 100,
        is_active: true,
    }
}

/// Creates a coupon with the defaults of [`new_coupon`].
pub async fn create_test_coupon(engine: &CouponEngine, code: &str) -> Result<Coupon> {
    engine.create(new_coupon(code)).await
}
