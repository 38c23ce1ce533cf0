//! API token configuration loaded from environment variables.
//!
//! This is a placeholder access scheme: each role gets one static bearer token,
//! read from `ADMIN_API_TOKEN`, `MANAGER_API_TOKEN` and `STAFF_API_TOKEN`. Roles
//! without a configured token simply cannot authenticate.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Access level attached to a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including deletion
    Admin,
    /// Can create and change coupons
    Manager,
    /// Read and validate only
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        })
    }
}

const TOKEN_VARS: [(&str, Role); 3] = [
    ("ADMIN_API_TOKEN", Role::Admin),
    ("MANAGER_API_TOKEN", Role::Manager),
    ("STAFF_API_TOKEN", Role::Staff),
];

/// Maps bearer tokens to roles.
#[derive(Debug, Clone, Default)]
pub struct ApiTokens {
    tokens: HashMap<String, Role>,
}

impl ApiTokens {
    /// Builds the table from explicit pairs. Empty tokens are ignored.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Role)>,
        S: Into<String>,
    {
        let tokens = pairs
            .into_iter()
            .map(|(token, role)| (token.into(), role))
            .filter(|(token, _)| !token.trim().is_empty())
            .collect();
        Self { tokens }
    }

    /// Reads the token for each role from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            TOKEN_VARS
                .iter()
                .filter_map(|(var, role)| std::env::var(var).ok().map(|token| (token, *role))),
        )
    }

    /// The role for `token`, if it is known.
    #[must_use]
    pub fn role_for(&self, token: &str) -> Option<Role> {
        self.tokens.get(token).copied()
    }

    /// Number of configured tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no token is configured and every protected route will refuse access.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
