//! Coupon entity - the `coupons` table.
//!
//! `SQLite` has no exact decimal column type, so money fields are stored as
//! canonical decimal strings and parsed back into [`Decimal`] when a row is
//! turned into a domain [`Coupon`].

use crate::{
    core::coupon::{Coupon, CouponType, NewCoupon},
    errors::Error as AppError,
};
use rust_decimal::Decimal;
use sea_orm::{Set, entity::prelude::*};
use std::str::FromStr;

/// Stored form of [`CouponType`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DiscountKind {
    /// Percentage of the order amount
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// Flat amount
    #[sea_orm(string_value = "fixed")]
    Fixed,
}

impl From<CouponType> for DiscountKind {
    fn from(value: CouponType) -> Self {
        match value {
            CouponType::Percentage => Self::Percentage,
            CouponType::Fixed => Self::Fixed,
        }
    }
}

impl From<DiscountKind> for CouponType {
    fn from(value: DiscountKind) -> Self {
        match value {
            DiscountKind::Percentage => Self::Percentage,
            DiscountKind::Fixed => Self::Fixed,
        }
    }
}

/// Coupon database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    /// Unique identifier for the coupon
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Uppercased redemption code
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Percentage or fixed
    pub coupon_type: DiscountKind,
    /// Decimal string
    pub value: String,
    /// Decimal string
    pub min_amount: String,
    /// Decimal string, NULL when uncapped
    pub max_discount: Option<String>,
    /// Last usable day
    pub expiry_date: Date,
    /// Maximum number of redemptions
    pub usage_limit: i64,
    /// Redemptions recorded so far
    pub used_count: i64,
    /// Manual on/off switch
    pub is_active: bool,
    /// When the coupon was created
    pub created_at: DateTimeUtc,
    /// When the coupon was last modified
    pub updated_at: DateTimeUtc,
}

/// Coupons have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_money(field: &str, raw: &str) -> std::result::Result<Decimal, AppError> {
    Decimal::from_str(raw).map_err(|e| AppError::CorruptRecord {
        message: format!("{field} = {raw:?}: {e}"),
    })
}

fn parse_count(field: &str, raw: i64) -> std::result::Result<u32, AppError> {
    u32::try_from(raw).map_err(|e| AppError::CorruptRecord {
        message: format!("{field} = {raw}: {e}"),
    })
}

impl TryFrom<Model> for Coupon {
    type Error = AppError;

    fn try_from(model: Model) -> std::result::Result<Self, AppError> {
        Ok(Self {
            id: model.id,
            value: parse_money("value", &model.value)?,
            min_amount: parse_money("min_amount", &model.min_amount)?,
            max_discount: model
                .max_discount
                .as_deref()
                .map(|raw| parse_money("max_discount", raw))
                .transpose()?,
            usage_limit: parse_count("usage_limit", model.usage_limit)?,
            used_count: parse_count("used_count", model.used_count)?,
            code: model.code,
            name: model.name,
            description: model.description,
            coupon_type: model.coupon_type.into(),
            expiry_date: model.expiry_date,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Builds an insertable row; the id is left for the database to assign.
#[must_use]
pub fn new_active_model(coupon: NewCoupon, now: DateTimeUtc) -> ActiveModel {
    ActiveModel {
        code: Set(coupon.code),
        name: Set(coupon.name),
        description: Set(coupon.description),
        coupon_type: Set(coupon.coupon_type.into()),
        value: Set(coupon.value.to_string()),
        min_amount: Set(coupon.min_amount.to_string()),
        max_discount: Set(coupon.max_discount.map(|cap| cap.to_string())),
        expiry_date: Set(coupon.expiry_date),
        usage_limit: Set(i64::from(coupon.usage_limit)),
        used_count: Set(0),
        is_active: Set(coupon.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl From<&Coupon> for ActiveModel {
    fn from(coupon: &Coupon) -> Self {
        Self {
            id: Set(coupon.id),
            code: Set(coupon.code.clone()),
            name: Set(coupon.name.clone()),
            description: Set(coupon.description.clone()),
            coupon_type: Set(coupon.coupon_type.into()),
            value: Set(coupon.value.to_string()),
            min_amount: Set(coupon.min_amount.to_string()),
            max_discount: Set(coupon.max_discount.map(|cap| cap.to_string())),
            expiry_date: Set(coupon.expiry_date),
            usage_limit: Set(i64::from(coupon.usage_limit)),
            used_count: Set(i64::from(coupon.used_count)),
            is_active: Set(coupon.is_active),
            created_at: Set(coupon.created_at),
            updated_at: Set(coupon.updated_at),
        }
    }
}
