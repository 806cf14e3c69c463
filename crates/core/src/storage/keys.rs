//! Storage key layout.
//!
//! Per-user collections live under the namespace `user:<id>`; the mock
//! account record lives under a shared `auth` namespace. Every mutation
//! rewrites the full collection value (full-overwrite, never a patch).

/// Namespace holding the signed-in mock account record.
pub const AUTH_NAMESPACE: &str = "auth";

/// Key of the account record inside [`AUTH_NAMESPACE`].
pub const USER_KEY: &str = "user";

/// Serialized watchlist id set.
pub const WATCHLIST_KEY: &str = "watchlist";

/// Serialized position collection.
pub const PORTFOLIO_KEY: &str = "portfolio";

/// Serialized alert collection.
pub const ALERTS_KEY: &str = "alerts";

/// The storage namespace for a user's collections.
#[must_use]
pub fn user_namespace(user_id: &str) -> String {
    format!("user:{user_id}")
}
