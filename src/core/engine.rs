//! Coupon engine - the only path through which coupons are created, changed, or redeemed.
//!
//! Writes (create, update, toggle, delete, consume) hold the write side of a gate
//! so that a uniqueness check and the insert that follows it cannot interleave
//! with another write. Reads (get, list, validate) share the read side.

use crate::{
    core::{
        coupon::{
            AppliedDiscount, Coupon, CouponFilter, CouponPatch, InvalidReason, NewCoupon,
            Validation,
        },
        validation::{check_terms, normalize_code},
    },
    errors::{Error, Result},
    store::CouponStore,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Owns the coupon collection through an injected [`CouponStore`].
pub struct CouponEngine {
    store: Arc<dyn CouponStore>,
    gate: RwLock<()>,
}

impl std::fmt::Debug for CouponEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouponEngine").finish_non_exhaustive()
    }
}

impl CouponEngine {
    /// Creates an engine over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CouponStore>) -> Self {
        Self {
            store,
            gate: RwLock::new(()),
        }
    }

    /// Lists coupons matching `filter`, ordered by id.
    pub async fn list(&self, filter: &CouponFilter) -> Result<Vec<Coupon>> {
        let _read = self.gate.read().await;
        self.store.list(filter).await
    }

    /// Fetches a single coupon.
    pub async fn get(&self, id: i64) -> Result<Option<Coupon>> {
        let _read = self.gate.read().await;
        self.store.find_by_id(id).await
    }

    /// Creates a coupon with an uppercased code and no recorded usage.
    ///
    /// # Errors
    /// - [`Error::DuplicateCode`] if any coupon, active or not, has the same code ignoring case
    /// - [`Error::InvalidInput`] if the code is blank or the terms break a numeric invariant
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create(&self, mut input: NewCoupon) -> Result<Coupon> {
        input.code = normalize_code(&input.code)?;
        check_terms(
            input.coupon_type,
            input.value,
            input.min_amount,
            input.max_discount,
            input.usage_limit,
        )?;

        let _write = self.gate.write().await;
        if self.store.find_by_code(&input.code).await?.is_some() {
            warn!("Rejected duplicate coupon code {}", input.code);
            return Err(Error::DuplicateCode { code: input.code });
        }

        let coupon = self.store.insert(input, Utc::now()).await?;
        info!("Created coupon {} ({})", coupon.code, coupon.id);
        Ok(coupon)
    }

    /// Applies a partial update. Returns `None` if no coupon has this id.
    ///
    /// A new code is checked for uniqueness against every other coupon; the
    /// coupon's own current code never counts as a collision.
    ///
    /// # Errors
    /// - [`Error::DuplicateCode`] if the new code belongs to a different coupon
    /// - [`Error::InvalidInput`] if the merged terms break a numeric invariant
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, mut patch: CouponPatch) -> Result<Option<Coupon>> {
        let _write = self.gate.write().await;
        let Some(mut coupon) = self.store.find_by_id(id).await? else {
            debug!("Coupon {} not found for update", id);
            return Ok(None);
        };

        if let Some(raw) = patch.code.take() {
            let code = normalize_code(&raw)?;
            if let Some(existing) = self.store.find_by_code(&code).await? {
                if existing.id != id {
                    warn!("Rejected code change to {} held by coupon {}", code, existing.id);
                    return Err(Error::DuplicateCode { code });
                }
            }
            patch.code = Some(code);
        }

        patch.apply_to(&mut coupon);
        check_terms(
            coupon.coupon_type,
            coupon.value,
            coupon.min_amount,
            coupon.max_discount,
            coupon.usage_limit,
        )?;
        coupon.updated_at = Utc::now();

        self.save(coupon).await
    }

    /// Flips the active flag. Returns `None` if no coupon has this id.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: i64) -> Result<Option<Coupon>> {
        let _write = self.gate.write().await;
        let Some(mut coupon) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        coupon.is_active = !coupon.is_active;
        coupon.updated_at = Utc::now();
        info!(
            "Coupon {} is now {}",
            coupon.code,
            if coupon.is_active { "active" } else { "inactive" }
        );
        self.save(coupon).await
    }

    /// Removes a coupon. Returns false if it was already gone.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let _write = self.gate.write().await;
        let removed = self.store.remove(id).await?;
        if removed {
            info!("Deleted coupon {}", id);
        }
        Ok(removed)
    }

    /// Records one redemption. Returns `None` if no coupon has this id.
    ///
    /// This is the only operation that moves `used_count`; validation is quote-only.
    ///
    /// # Errors
    /// - [`Error::CouponUnavailable`] if the coupon is inactive or expired
    /// - [`Error::UsageLimitReached`] if the coupon has no redemptions left
    #[instrument(skip(self))]
    pub async fn consume(&self, id: i64) -> Result<Option<Coupon>> {
        let today = Utc::now().date_naive();
        let _write = self.gate.write().await;
        let Some(mut coupon) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        let unavailable = if !coupon.is_active {
            Some(InvalidReason::Inactive)
        } else if coupon.is_expired_on(today) {
            Some(InvalidReason::Expired)
        } else {
            None
        };
        if let Some(reason) = unavailable {
            return Err(Error::CouponUnavailable {
                code: coupon.code,
                reason,
            });
        }
        if coupon.is_exhausted() {
            return Err(Error::UsageLimitReached { code: coupon.code });
        }

        coupon.used_count += 1;
        coupon.updated_at = Utc::now();
        info!(
            "Redeemed coupon {} ({}/{})",
            coupon.code, coupon.used_count, coupon.usage_limit
        );
        self.save(coupon).await
    }

    /// Checks whether `code` applies to an order of `order_amount` today.
    ///
    /// Business rejections are returned as [`Validation::Invalid`]; only storage
    /// faults are errors.
    pub async fn validate(&self, code: &str, order_amount: Decimal) -> Result<Validation> {
        self.validate_on(code, order_amount, Utc::now().date_naive())
            .await
    }

    /// Same as [`Self::validate`] with the calendar day supplied by the caller.
    ///
    /// Checks run in a fixed order and the first failure wins: existence,
    /// active flag, expiry, usage limit, minimum amount.
    #[instrument(skip(self))]
    pub async fn validate_on(
        &self,
        code: &str,
        order_amount: Decimal,
        today: NaiveDate,
    ) -> Result<Validation> {
        let coupon = match normalize_code(code) {
            Ok(code) => {
                let _read = self.gate.read().await;
                self.store.find_by_code(&code).await?
            }
            Err(_) => None,
        };

        let Some(coupon) = coupon else {
            return Ok(Validation::Invalid(InvalidReason::NotFound));
        };
        if !coupon.is_active {
            return Ok(Validation::Invalid(InvalidReason::Inactive));
        }
        if coupon.is_expired_on(today) {
            return Ok(Validation::Invalid(InvalidReason::Expired));
        }
        if coupon.is_exhausted() {
            return Ok(Validation::Invalid(InvalidReason::UsageLimitReached));
        }
        if order_amount < coupon.min_amount {
            return Ok(Validation::Invalid(InvalidReason::BelowMinimum {
                min_amount: coupon.min_amount,
            }));
        }

        let Some((discount, final_amount)) = coupon
            .discount_for(order_amount)
            .and_then(|discount| Some((discount, order_amount.checked_sub(discount)?)))
        else {
            warn!("Order amount {} overflows coupon {}", order_amount, coupon.code);
            return Ok(Validation::Invalid(InvalidReason::AmountOutOfRange));
        };
        debug!("Coupon {} grants {} on {}", coupon.code, discount, order_amount);
        Ok(Validation::Valid(AppliedDiscount {
            coupon,
            discount,
            final_amount,
        }))
    }

    async fn save(&self, coupon: Coupon) -> Result<Option<Coupon>> {
        if self.store.replace(&coupon).await? {
            Ok(Some(coupon))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::{
        core::coupon::CouponType,
        test_utils::{new_coupon, setup_memory_engine, setup_sqlite_engine},
    };
    use chrono::Days;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn percentage_coupon(code: &str) -> NewCoupon {
        NewCoupon {
            coupon_type: CouponType::Percentage,
            value: dec(20),
            min_amount: dec(100),
            max_discount: Some(dec(50)),
            ..new_coupon(code)
        }
    }

    fn fixed_coupon(code: &str) -> NewCoupon {
        NewCoupon {
            coupon_type: CouponType::Fixed,
            value: dec(50),
            min_amount: dec(200),
            max_discount: None,
            ..new_coupon(code)
        }
    }

    fn expect_valid(validation: Validation) -> AppliedDiscount {
        match validation {
            Validation::Valid(applied) => applied,
            Validation::Invalid(reason) => panic!("expected a valid coupon, got {reason}"),
        }
    }

    #[tokio::test]
    async fn test_create_uppercases_code_and_starts_unused() -> Result<()> {
        let engine = setup_memory_engine();
        let coupon = engine.create(new_coupon("summer20")).await?;

        assert_eq!(coupon.code, "SUMMER20");
        assert_eq!(coupon.used_count, 0);
        assert!(coupon.is_active);
        assert_eq!(coupon.created_at, coupon.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_codes_differing_only_by_case() -> Result<()> {
        for engine in [setup_memory_engine(), setup_sqlite_engine().await?] {
            engine.create(new_coupon("Save10")).await?;

            let result = engine.create(new_coupon("sAVE10")).await;
            assert!(matches!(result, Err(Error::DuplicateCode { code }) if code == "SAVE10"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_checks_inactive_coupons_too() -> Result<()> {
        let engine = setup_memory_engine();
        let coupon = engine.create(new_coupon("SAVE10")).await?;
        engine.toggle_active(coupon.id).await?;

        let result = engine.create(new_coupon("save10")).await;
        assert!(matches!(result, Err(Error::DuplicateCode { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_percentage() {
        let engine = setup_memory_engine();
        let mut input = percentage_coupon("HUGE");
        input.value = dec(120);

        let result = engine.create(input).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() -> Result<()> {
        let engine = setup_memory_engine();
        let created = engine.create(percentage_coupon("SUMMER20")).await?;

        let updated = engine
            .update(
                created.id,
                CouponPatch {
                    name: Some("Late Summer".to_string()),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();

        assert_eq!(updated.name, "Late Summer");
        assert_eq!(updated.code, created.code);
        assert_eq!(updated.value, created.value);
        assert_eq!(updated.max_discount, created.max_discount);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let stored = engine.get(created.id).await?.unwrap();
        assert_eq!(stored, updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_code_uniqueness_excludes_self() -> Result<()> {
        for engine in [setup_memory_engine(), setup_sqlite_engine().await?] {
            let first = engine.create(new_coupon("FIRST")).await?;
            engine.create(new_coupon("SECOND")).await?;

            // Re-submitting its own code in another case is fine
            let same = engine
                .update(
                    first.id,
                    CouponPatch {
                        code: Some("first".to_string()),
                        ..Default::default()
                    },
                )
                .await?
                .unwrap();
            assert_eq!(same.code, "FIRST");

            let clash = engine
                .update(
                    first.id,
                    CouponPatch {
                        code: Some("second".to_string()),
                        ..Default::default()
                    },
                )
                .await;
            assert!(matches!(clash, Err(Error::DuplicateCode { .. })));

            let renamed = engine
                .update(
                    first.id,
                    CouponPatch {
                        code: Some("third".to_string()),
                        ..Default::default()
                    },
                )
                .await?
                .unwrap();
            assert_eq!(renamed.code, "THIRD");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rechecks_merged_terms() -> Result<()> {
        let engine = setup_memory_engine();
        let mut input = fixed_coupon("BIGFIXED");
        input.value = dec(150);
        let created = engine.create(input).await?;

        let result = engine
            .update(
                created.id,
                CouponPatch {
                    coupon_type: Some(CouponType::Percentage),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let unchanged = engine.get(created.id).await?.unwrap();
        assert_eq!(unchanged.coupon_type, CouponType::Fixed);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_ids_are_none_not_errors() -> Result<()> {
        let engine = setup_memory_engine();
        assert!(engine.get(42).await?.is_none());
        assert!(engine.update(42, CouponPatch::default()).await?.is_none());
        assert!(engine.toggle_active(42).await?.is_none());
        assert!(engine.consume(42).await?.is_none());
        assert!(!engine.delete(42).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_hides_coupon() -> Result<()> {
        let engine = setup_memory_engine();
        let coupon = engine.create(fixed_coupon("GONE")).await?;

        assert!(engine.delete(coupon.id).await?);
        assert!(!engine.delete(coupon.id).await?);

        let validation = engine.validate("GONE", dec(500)).await?;
        assert_eq!(validation, Validation::Invalid(InvalidReason::NotFound));
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_unknown_code() -> Result<()> {
        let engine = setup_memory_engine();
        let validation = engine.validate("NOPE", dec(100)).await?;
        assert_eq!(validation, Validation::Invalid(InvalidReason::NotFound));

        let blank = engine.validate("   ", dec(100)).await?;
        assert_eq!(blank, Validation::Invalid(InvalidReason::NotFound));
        Ok(())
    }

    #[tokio::test]
    async fn test_percentage_discount_and_clamp() -> Result<()> {
        for engine in [setup_memory_engine(), setup_sqlite_engine().await?] {
            engine.create(percentage_coupon("SUMMER20")).await?;

            let at_minimum = expect_valid(engine.validate("summer20", dec(100)).await?);
            assert_eq!(at_minimum.discount, dec(20));
            assert_eq!(at_minimum.final_amount, dec(80));

            let clamped = expect_valid(engine.validate("SUMMER20", dec(1000)).await?);
            assert_eq!(clamped.discount, dec(50));
            assert_eq!(clamped.final_amount, dec(950));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fixed_discount_and_minimum() -> Result<()> {
        let engine = setup_memory_engine();
        engine.create(fixed_coupon("WELCOME50")).await?;

        let below = engine.validate("WELCOME50", dec(150)).await?;
        match below {
            Validation::Invalid(reason @ InvalidReason::BelowMinimum { .. }) => {
                assert_eq!(
                    reason,
                    InvalidReason::BelowMinimum {
                        min_amount: dec(200)
                    }
                );
                assert!(reason.to_string().contains("200"));
            }
            other => panic!("expected minimum amount rejection, got {other:?}"),
        }

        let applied = expect_valid(engine.validate("WELCOME50", dec(200)).await?);
        assert_eq!(applied.discount, dec(50));
        assert_eq!(applied.final_amount, dec(150));
        Ok(())
    }

    #[tokio::test]
    async fn test_fixed_discount_can_exceed_order() -> Result<()> {
        let engine = setup_memory_engine();
        let mut input = fixed_coupon("BIGFIXED");
        input.value = dec(80);
        input.min_amount = Decimal::ZERO;
        engine.create(input).await?;

        let applied = expect_valid(engine.validate("BIGFIXED", dec(30)).await?);
        assert_eq!(applied.discount, dec(80));
        assert_eq!(applied.final_amount, dec(-50));
        Ok(())
    }

    #[tokio::test]
    async fn test_usage_limit_wins_over_other_fields() -> Result<()> {
        let engine = setup_memory_engine();
        let mut input = fixed_coupon("ONCE");
        input.usage_limit = 1;
        let coupon = engine.create(input).await?;

        let consumed = engine.consume(coupon.id).await?.unwrap();
        assert_eq!(consumed.used_count, 1);

        for amount in [dec(10), dec(200), dec(10_000)] {
            let validation = engine.validate("ONCE", amount).await?;
            assert_eq!(
                validation,
                Validation::Invalid(InvalidReason::UsageLimitReached)
            );
        }

        let again = engine.consume(coupon.id).await;
        assert!(matches!(again, Err(Error::UsageLimitReached { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_expiry_boundary() -> Result<()> {
        let engine = setup_memory_engine();
        let mut input = fixed_coupon("TODAY");
        input.expiry_date = today();
        engine.create(input).await?;

        let mut input = fixed_coupon("YESTERDAY");
        input.expiry_date = today().checked_sub_days(Days::new(1)).unwrap();
        engine.create(input).await?;

        assert!(engine.validate("TODAY", dec(500)).await?.is_valid());
        assert_eq!(
            engine.validate("YESTERDAY", dec(500)).await?,
            Validation::Invalid(InvalidReason::Expired)
        );

        // Pinning the day makes the boundary explicit
        let day = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        let mut input = fixed_coupon("AUGUST");
        input.expiry_date = day;
        engine.create(input).await?;
        assert!(engine.validate_on("AUGUST", dec(500), day).await?.is_valid());
        assert_eq!(
            engine
                .validate_on("AUGUST", dec(500), day.succ_opt().unwrap())
                .await?,
            Validation::Invalid(InvalidReason::Expired)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_checks_run_in_order() -> Result<()> {
        let engine = setup_memory_engine();
        let mut input = fixed_coupon("EVERYTHING");
        input.usage_limit = 1;
        input.expiry_date = today().checked_sub_days(Days::new(3)).unwrap();
        input.is_active = false;
        let coupon = engine.create(input).await?;
        engine.consume(coupon.id).await?;

        // Inactive beats expired, exhausted, and below minimum
        assert_eq!(
            engine.validate("EVERYTHING", dec(1)).await?,
            Validation::Invalid(InvalidReason::Inactive)
        );

        // Once active again the remaining checks are evaluated, not skipped
        engine.toggle_active(coupon.id).await?;
        assert_eq!(
            engine.validate("EVERYTHING", dec(1)).await?,
            Validation::Invalid(InvalidReason::Expired)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_reevaluates_remaining_checks() -> Result<()> {
        let engine = setup_memory_engine();
        let mut input = fixed_coupon("PAUSED");
        input.is_active = false;
        let coupon = engine.create(input).await?;

        assert_eq!(
            engine.validate("PAUSED", dec(100)).await?,
            Validation::Invalid(InvalidReason::Inactive)
        );

        let toggled = engine.toggle_active(coupon.id).await?.unwrap();
        assert!(toggled.is_active);
        assert!(toggled.updated_at >= coupon.updated_at);

        assert_eq!(
            engine.validate("PAUSED", dec(100)).await?,
            Validation::Invalid(InvalidReason::BelowMinimum {
                min_amount: dec(200)
            })
        );
        assert!(engine.validate("PAUSED", dec(250)).await?.is_valid());
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_is_idempotent() -> Result<()> {
        let engine = setup_memory_engine();
        let coupon = engine.create(percentage_coupon("REPEAT")).await?;

        let first = engine.validate("REPEAT", dec(300)).await?;
        let second = engine.validate("REPEAT", dec(300)).await?;
        assert_eq!(first, second);

        let stored = engine.get(coupon.id).await?.unwrap();
        assert_eq!(stored.used_count, 0);
        assert_eq!(stored.updated_at, coupon.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_huge_order_amount_is_reported_not_panicked() -> Result<()> {
        for engine in [setup_memory_engine(), setup_sqlite_engine().await?] {
            engine.create(percentage_coupon("BIG")).await?;
            engine.create(fixed_coupon("FLAT")).await?;

            let validation = engine.validate("BIG", Decimal::MAX).await?;
            assert_eq!(
                validation,
                Validation::Invalid(InvalidReason::AmountOutOfRange)
            );

            let flat = expect_valid(engine.validate("FLAT", Decimal::MAX).await?);
            assert_eq!(flat.discount, dec(50));
            assert_eq!(flat.final_amount, Decimal::MAX - dec(50));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_tiny_order_amount_stays_within_scale() -> Result<()> {
        let engine = setup_memory_engine();
        engine
            .create(NewCoupon {
                value: Decimal::new(125, 1),
                min_amount: Decimal::ZERO,
                ..percentage_coupon("TINY")
            })
            .await?;

        let amount = Decimal::new(1, 28);
        let applied = expect_valid(engine.validate("TINY", amount).await?);
        assert!(applied.discount >= Decimal::ZERO);
        assert!(applied.final_amount <= amount);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_is_literal_on_both_stores() -> Result<()> {
        for engine in [setup_memory_engine(), setup_sqlite_engine().await?] {
            engine.create(new_coupon("SUMMER20")).await?;
            engine
                .create(NewCoupon {
                    name: "Été special".to_string(),
                    ..new_coupon("ete10")
                })
                .await?;

            let search = |term: &str| CouponFilter {
                search: Some(term.to_string()),
                ..CouponFilter::default()
            };
            for wildcard in ["%", "_", "S%R"] {
                assert!(engine.list(&search(wildcard)).await?.is_empty());
            }

            let summer = engine.list(&search("summer")).await?;
            assert_eq!(summer.len(), 1);
            assert_eq!(summer[0].code, "SUMMER20");

            let accented = engine.list(&search("ÉTÉ SPECIAL")).await?;
            assert_eq!(accented.len(), 1);
            assert_eq!(accented[0].code, "ETE10");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_consume_refuses_inactive_and_expired() -> Result<()> {
        let engine = setup_memory_engine();
        let paused = engine.create(new_coupon("PAUSED")).await?;
        engine.toggle_active(paused.id).await?;

        let result = engine.consume(paused.id).await;
        assert!(matches!(
            result,
            Err(Error::CouponUnavailable {
                reason: InvalidReason::Inactive,
                ..
            })
        ));

        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        let old = engine
            .create(NewCoupon {
                expiry_date: yesterday,
                ..new_coupon("OLD")
            })
            .await?;
        let result = engine.consume(old.id).await;
        assert!(matches!(
            result,
            Err(Error::CouponUnavailable {
                reason: InvalidReason::Expired,
                ..
            })
        ));

        assert_eq!(engine.get(paused.id).await?.unwrap().used_count, 0);
        assert_eq!(engine.get(old.id).await?.unwrap().used_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_id_wins_over_bad_code() -> Result<()> {
        let engine = setup_memory_engine();
        let blank = || CouponPatch {
            code: Some("   ".to_string()),
            ..CouponPatch::default()
        };
        assert!(engine.update(42, blank()).await?.is_none());

        let coupon = engine.create(new_coupon("KEEP")).await?;
        let result = engine.update(coupon.id, blank()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_one_code() -> Result<()> {
        let engine = Arc::new(setup_memory_engine());
        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = Arc::clone(&engine);
            let code = if i % 2 == 0 { "RACE" } else { "race" };
            handles.push(tokio::spawn(async move {
                engine.create(new_coupon(code)).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        Ok(())
    }
}
