use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::instrument::{Instrument, Snapshot};

use super::traits::MarketDataProvider;

/// Holds the latest market snapshot and its refresh status.
///
/// A refresh replaces the entire snapshot atomically on success — never a
/// partial merge. On failure the previous snapshot stays available
/// (stale-but-usable) and the error is recorded; there is no internal
/// retry beyond the caller's next scheduled tick.
///
/// The fetch and the swap are separate steps (`provider()` + `apply`) so
/// a caller can run the slow network fetch without holding whatever lock
/// guards the feed. `refresh()` does both for convenience.
pub struct PriceFeed {
    provider: Arc<dyn MarketDataProvider>,
    snapshot: Snapshot,
    last_refreshed: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl PriceFeed {
    #[must_use]
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            snapshot: Snapshot::default(),
            last_refreshed: None,
            last_error: None,
        }
    }

    /// A shared handle to the provider, for fetching outside the feed.
    #[must_use]
    pub fn provider(&self) -> Arc<dyn MarketDataProvider> {
        Arc::clone(&self.provider)
    }

    /// Fetch a fresh market table and swap it in.
    pub async fn refresh(&mut self) -> Result<&Snapshot, CoreError> {
        let fetched = self.provider.fetch_markets().await;
        self.apply(fetched)
    }

    /// Record the outcome of a fetch: swap in the new table, or keep the
    /// previous snapshot and remember the error.
    pub fn apply(
        &mut self,
        fetched: Result<Vec<Instrument>, CoreError>,
    ) -> Result<&Snapshot, CoreError> {
        match fetched {
            Ok(instruments) => {
                debug!(
                    provider = self.provider.name(),
                    instruments = instruments.len(),
                    "market snapshot refreshed"
                );
                self.snapshot = Snapshot::new(instruments);
                self.last_refreshed = Some(Utc::now());
                self.last_error = None;
                Ok(&self.snapshot)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "market refresh failed; keeping previous snapshot"
                );
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The most recently completed snapshot (possibly stale after a failed
    /// refresh, empty before the first successful one).
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// The error from the most recent refresh attempt, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
