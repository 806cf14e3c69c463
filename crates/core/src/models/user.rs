use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client-only mock account record. Carries no credentials and no
/// security guarantees; its only job is to yield a stable identifier
/// that namespaces the user's persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier used as the storage namespace
    pub id: String,

    pub email: String,

    pub display_name: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }
}
