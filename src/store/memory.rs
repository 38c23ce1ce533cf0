//! In-process coupon store.

use super::CouponStore;
use crate::{
    core::coupon::{Coupon, CouponFilter, NewCoupon},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[derive(Debug)]
struct Inner {
    coupons: Vec<Coupon>,
    next_id: i64,
}

/// Coupons kept in a `Vec`, ids handed out from a counter that never goes back.
#[derive(Debug)]
pub struct MemoryCouponStore {
    inner: Mutex<Inner>,
}

impl MemoryCouponStore {
    /// Creates an empty store whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                coupons: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryCouponStore {
    fn default() -> Self {
        Self::new()
    }
}

fn same_code(stored: &str, code: &str) -> bool {
    stored.to_uppercase() == code.to_uppercase()
}

#[async_trait]
impl CouponStore for MemoryCouponStore {
    async fn list(&self, filter: &CouponFilter) -> Result<Vec<Coupon>> {
        let inner = self.inner.lock();
        Ok(inner
            .coupons
            .iter()
            .filter(|coupon| filter.matches(coupon))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Coupon>> {
        let inner = self.inner.lock();
        Ok(inner.coupons.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>> {
        let inner = self.inner.lock();
        Ok(inner
            .coupons
            .iter()
            .find(|c| same_code(&c.code, code))
            .cloned())
    }

    async fn insert(&self, coupon: NewCoupon, now: DateTime<Utc>) -> Result<Coupon> {
        let mut inner = self.inner.lock();
        if inner.coupons.iter().any(|c| same_code(&c.code, &coupon.code)) {
            return Err(Error::DuplicateCode { code: coupon.code });
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let stored = Coupon {
            id,
            code: coupon.code,
            name: coupon.name,
            description: coupon.description,
            coupon_type: coupon.coupon_type,
            value: coupon.value,
            min_amount: coupon.min_amount,
            max_discount: coupon.max_discount,
            expiry_date: coupon.expiry_date,
            usage_limit: coupon.usage_limit,
            used_count: 0,
            is_active: coupon.is_active,
            created_at: now,
            updated_at: now,
        };
        inner.coupons.push(stored.clone());
        Ok(stored)
    }

    async fn replace(&self, coupon: &Coupon) -> Result<bool> {
        let mut inner = self.inner.lock();
        if inner
            .coupons
            .iter()
            .any(|c| c.id != coupon.id && same_code(&c.code, &coupon.code))
        {
            return Err(Error::DuplicateCode {
                code: coupon.code.clone(),
            });
        }

        match inner.coupons.iter_mut().find(|c| c.id == coupon.id) {
            Some(slot) => {
                *slot = coupon.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock();
        let before = inner.coupons.len();
        inner.coupons.retain(|c| c.id != id);
        Ok(inner.coupons.len() != before)
    }
}
