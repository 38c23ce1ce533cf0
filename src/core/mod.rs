//! Core business logic - framework-agnostic coupon rules and the engine that enforces them.

/// Coupon record, inputs, filters, and validation outcomes
pub mod coupon;
/// The coupon engine
pub mod engine;
/// Field rules shared by the engine and the HTTP layer
pub mod validation;

pub use coupon::{
    AppliedDiscount, Coupon, CouponFilter, CouponPatch, CouponType, InvalidReason, NewCoupon,
    Validation,
};
pub use engine::CouponEngine;
