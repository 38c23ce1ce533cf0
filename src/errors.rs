//! Unified error type for the coupon service.
//!
//! Business-rule rejections that callers are expected to surface to clients
//! (duplicate codes, bad input, exhausted coupons) live next to genuine system
//! faults (database, configuration, I/O) so that the HTTP layer can map each
//! kind to the right status code in one place.

use crate::core::InvalidReason;
use thiserror::Error;

/// All errors produced by the coupon service.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage backend failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored row could not be turned back into a coupon
    #[error("Corrupt coupon record: {message}")]
    CorruptRecord {
        /// Which field failed to convert
        message: String,
    },

    /// I/O failure (socket binding, file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Another coupon already uses this code (compared case-insensitively)
    #[error("Coupon code already exists")]
    DuplicateCode {
        /// The rejected code, uppercased
        code: String,
    },

    /// Input failed field validation
    #[error("{message}")]
    InvalidInput {
        /// Client-facing description of the problem
        message: String,
    },

    /// The coupon has no redemptions left
    #[error("Coupon usage limit reached")]
    UsageLimitReached {
        /// Code of the exhausted coupon
        code: String,
    },

    /// The coupon is inactive or expired and cannot be redeemed
    #[error("{reason}")]
    CouponUnavailable {
        /// Code of the coupon
        code: String,
        /// Why it cannot be used
        reason: InvalidReason,
    },

    /// No coupon with this id
    #[error("Coupon not found")]
    CouponNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Request carried no usable credentials
    #[error("{message}")]
    Unauthorized {
        /// Client-facing reason
        message: String,
    },

    /// Credentials were valid but the role is not allowed
    #[error("{message}")]
    Forbidden {
        /// Client-facing reason
        message: String,
    },
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns true for faults on our side rather than the caller's.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Database(_) | Self::CorruptRecord { .. } | Self::Io(_)
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
