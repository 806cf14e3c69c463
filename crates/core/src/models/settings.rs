use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Market feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Quote currency for all prices (e.g., "usd")
    pub vs_currency: String,

    /// How many instruments to request, ranked by market cap
    pub per_page: u32,

    /// Seconds between scheduled refreshes
    pub refresh_interval_secs: u64,
}

impl FeedConfig {
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            per_page: 100,
            refresh_interval_secs: 60,
        }
    }
}
