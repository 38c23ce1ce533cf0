//! Coupon storage capability and its backends.
//!
//! The engine only talks to [`CouponStore`]. Backends:
//! - [`memory::MemoryCouponStore`] - a vector behind a mutex, the default
//! - [`database::SeaOrmCouponStore`] - `SQLite` through `SeaORM`, with a unique index on `code`
//!
//! Stores do not normalize codes or check business rules; the engine does that
//! before calling in. Both backends still refuse a second row with the same code.

pub mod database;
pub mod memory;

use crate::{
    core::coupon::{Coupon, CouponFilter, NewCoupon},
    errors::Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use database::SeaOrmCouponStore;
pub use memory::MemoryCouponStore;

/// Storage operations the coupon engine needs.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// All coupons passing `filter`, ordered by id.
    async fn list(&self, filter: &CouponFilter) -> Result<Vec<Coupon>>;

    /// The coupon with this id, if any.
    async fn find_by_id(&self, id: i64) -> Result<Option<Coupon>>;

    /// The coupon whose code equals `code`, ignoring case.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>>;

    /// Stores a new coupon with `used_count = 0` and both timestamps set to `now`,
    /// assigning a fresh id.
    ///
    /// # Errors
    /// [`crate::errors::Error::DuplicateCode`] if the code is already stored.
    async fn insert(&self, coupon: NewCoupon, now: DateTime<Utc>) -> Result<Coupon>;

    /// Overwrites the stored coupon with the same id. Returns false if it no longer exists.
    async fn replace(&self, coupon: &Coupon) -> Result<bool>;

    /// Deletes the coupon. Returns false if it was already absent.
    async fn remove(&self, id: i64) -> Result<bool>;
}
