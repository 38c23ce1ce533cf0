//! Bearer-token role guard.
//!
//! Handlers that need a caller take an [`AuthUser`] argument; those that need a
//! particular role call [`AuthUser::require`] first.

use super::AppState;
use crate::{
    config::Role,
    errors::{Error, Result},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Roles allowed to create and change coupons.
pub const COUPON_WRITERS: &[Role] = &[Role::Admin, Role::Manager];

/// Roles allowed to delete coupons.
pub const COUPON_ADMINS: &[Role] = &[Role::Admin];

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// Role granted by the presented token
    pub role: Role,
}

impl AuthUser {
    /// Fails with [`Error::Forbidden`] unless the caller's role is in `allowed`.
    pub fn require(&self, allowed: &[Role]) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::Forbidden {
                message: "Insufficient permissions".to_string(),
            })
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts).ok_or_else(|| Error::Unauthorized {
            message: "Access token required".to_string(),
        })?;

        let role = state.tokens.role_for(token).ok_or_else(|| Error::Forbidden {
            message: "Invalid or expired token".to_string(),
        })?;

        Ok(Self { role })
    }
}
