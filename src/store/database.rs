//! `SQLite`-backed coupon store using `SeaORM`.

use super::CouponStore;
use crate::{
    core::coupon::{Coupon, CouponFilter, NewCoupon},
    entities::{CouponEntity, coupon},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, QueryOrder, SqlErr, prelude::*};
use tracing::debug;

/// Coupon store over a `SeaORM` connection. Tables must already exist,
/// see [`crate::config::database::create_tables`].
#[derive(Debug, Clone)]
pub struct SeaOrmCouponStore {
    db: DatabaseConnection,
}

impl SeaOrmCouponStore {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_coupons(models: Vec<coupon::Model>) -> Result<Vec<Coupon>> {
    models.into_iter().map(Coupon::try_from).collect()
}

/// Turns a unique index violation into [`Error::DuplicateCode`].
fn map_write_error(err: DbErr, code: &str) -> Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        Error::DuplicateCode {
            code: code.to_string(),
        }
    } else {
        Error::Database(err)
    }
}

#[async_trait]
impl CouponStore for SeaOrmCouponStore {
    async fn list(&self, filter: &CouponFilter) -> Result<Vec<Coupon>> {
        let mut query = CouponEntity::find().order_by_asc(coupon::Column::Id);

        if let Some(is_active) = filter.is_active {
            query = query.filter(coupon::Column::IsActive.eq(is_active));
        }
        if let Some(kind) = filter.coupon_type {
            query = query.filter(coupon::Column::CouponType.eq(coupon::DiscountKind::from(kind)));
        }

        // Search runs in Rust: LIKE treats `%` and `_` as wildcards and folds ASCII only
        let coupons = to_coupons(query.all(&self.db).await?)?;
        Ok(coupons
            .into_iter()
            .filter(|coupon| filter.matches(coupon))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Coupon>> {
        CouponEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Coupon::try_from)
            .transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>> {
        // Stored codes are uppercase
        CouponEntity::find()
            .filter(coupon::Column::Code.eq(code.to_uppercase()))
            .one(&self.db)
            .await?
            .map(Coupon::try_from)
            .transpose()
    }

    async fn insert(&self, new: NewCoupon, now: DateTime<Utc>) -> Result<Coupon> {
        let code = new.code.clone();
        debug!("Inserting coupon {}", code);
        let model = coupon::new_active_model(new, now)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &code))?;
        Coupon::try_from(model)
    }

    async fn replace(&self, coupon: &Coupon) -> Result<bool> {
        if CouponEntity::find_by_id(coupon.id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Ok(false);
        }

        coupon::ActiveModel::from(coupon)
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, &coupon.code))?;
        Ok(true)
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let result = CouponEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
