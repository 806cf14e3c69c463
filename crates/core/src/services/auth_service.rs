use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::user::User;
use crate::storage::keys;
use crate::storage::kv::KeyValueStore;

/// Mock identity provider. Accounts are client-only records with no
/// credential storage and no security guarantees — "signing in" simply
/// mints a stable user id that namespaces persisted state.
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Create a mock account and sign it in.
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, CoreError> {
        Self::validate_credentials(email, password)?;
        if display_name.trim().len() < 2 {
            return Err(CoreError::Validation(
                "Display name must be at least 2 characters".into(),
            ));
        }

        let user = User::new(email, display_name.trim());
        self.persist(&user)?;
        Ok(user)
    }

    /// Sign in as a mock account. No password check beyond format
    /// validation — there is no stored credential to verify against.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User, CoreError> {
        Self::validate_credentials(email, password)?;

        let display_name = email.split('@').next().unwrap_or(email);
        let user = User::new(email, display_name);
        self.persist(&user)?;
        Ok(user)
    }

    /// The currently signed-in user, if any. A corrupt stored record
    /// reads as signed-out.
    pub fn current_user(&self) -> Result<Option<User>, CoreError> {
        match self.store.get(keys::AUTH_NAMESPACE, keys::USER_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).ok()),
            None => Ok(None),
        }
    }

    /// Sign out: remove the account record and clear the user's watchlist
    /// and portfolio. Alerts are left in place and reappear on the next
    /// sign-in under the same namespace.
    pub fn sign_out(&self) -> Result<(), CoreError> {
        if let Some(user) = self.current_user()? {
            let namespace = keys::user_namespace(&user.id);
            self.store.remove(&namespace, keys::WATCHLIST_KEY)?;
            self.store.remove(&namespace, keys::PORTFOLIO_KEY)?;
        }
        self.store.remove(keys::AUTH_NAMESPACE, keys::USER_KEY)
    }

    fn validate_credentials(email: &str, password: &str) -> Result<(), CoreError> {
        if !email.contains('@') {
            return Err(CoreError::Validation(
                "Please enter a valid email address".into(),
            ));
        }
        if password.len() < 6 {
            return Err(CoreError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }

    fn persist(&self, user: &User) -> Result<(), CoreError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.store.set(keys::AUTH_NAMESPACE, keys::USER_KEY, &raw)
    }
}
