pub mod errors;
pub mod feed;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use errors::CoreError;
use feed::price_feed::PriceFeed;
use feed::traits::MarketDataProvider;
use models::alert::{AlertCondition, PriceAlert};
use models::instrument::{Instrument, Snapshot};
use models::position::Position;
use models::summary::PortfolioSummary;
use models::watchlist::Watchlist;
use notify::{Notification, NotificationSink};
use services::alert_service::AlertService;
use services::portfolio_service::{PortfolioService, SellNotice};
use services::watchlist_service::WatchlistService;
use storage::keys;
use storage::kv::KeyValueStore;

pub use feed::scheduler::{spawn_refresh_loop, RefreshHandle};

/// One user's tracking session: the market feed, the three persisted
/// collections (watchlist, portfolio, alerts), and the services that
/// operate on them.
///
/// Constructed at sign-in and dropped at sign-out; nothing here is a
/// global. All persisted state lives under the user's storage namespace
/// and is written back in full after every mutation.
#[must_use]
pub struct TrackerSession {
    user_id: String,
    namespace: String,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn NotificationSink>,
    feed: PriceFeed,
    watchlist: Watchlist,
    positions: Vec<Position>,
    alerts: Vec<PriceAlert>,
    watchlist_service: WatchlistService,
    portfolio_service: PortfolioService,
    alert_service: AlertService,
}

impl std::fmt::Debug for TrackerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSession")
            .field("user_id", &self.user_id)
            .field("instruments", &self.feed.snapshot().len())
            .field("watchlist", &self.watchlist.len())
            .field("positions", &self.positions.len())
            .field("alerts", &self.alerts.len())
            .finish()
    }
}

impl TrackerSession {
    /// Start a session for `user_id`, loading whatever state the store
    /// holds for that user. Missing or corrupt stored collections start
    /// empty rather than failing the session.
    pub fn start(
        user_id: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn NotificationSink>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Result<Self, CoreError> {
        let user_id = user_id.into();
        let namespace = keys::user_namespace(&user_id);

        let watchlist_service = WatchlistService::new(Arc::clone(&store));
        let watchlist = watchlist_service.load(&namespace)?;
        let positions: Vec<Position> =
            Self::load_collection(store.as_ref(), &namespace, keys::PORTFOLIO_KEY)?;
        let alerts: Vec<PriceAlert> =
            Self::load_collection(store.as_ref(), &namespace, keys::ALERTS_KEY)?;

        debug!(
            user_id = %user_id,
            watchlist = watchlist.len(),
            positions = positions.len(),
            alerts = alerts.len(),
            "session started"
        );

        Ok(Self {
            user_id,
            namespace,
            store,
            sink,
            feed: PriceFeed::new(provider),
            watchlist,
            positions,
            alerts,
            watchlist_service,
            portfolio_service: PortfolioService::new(),
            alert_service: AlertService::new(),
        })
    }

    // ── Feed ────────────────────────────────────────────────────────

    /// Refresh the market snapshot, then re-derive portfolio valuation and
    /// alert state from it and persist both.
    ///
    /// On fetch failure the previous snapshot stays in place, an error
    /// notification is emitted, and nothing else changes — the next
    /// scheduled tick retries.
    ///
    /// The scheduled loop does not call this: it fetches through
    /// [`TrackerSession::market_provider`] without holding the session and
    /// hands the result to [`TrackerSession::apply_refresh`], so other
    /// mutations are never stuck behind a slow fetch.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let fetched = self.feed.provider().fetch_markets().await;
        self.apply_refresh(fetched)
    }

    /// A shared handle to the market data provider, for fetching outside
    /// the session.
    #[must_use]
    pub fn market_provider(&self) -> Arc<dyn MarketDataProvider> {
        self.feed.provider()
    }

    /// Apply the outcome of a market fetch: swap in the snapshot, then
    /// re-derive portfolio valuation and alert state and persist both.
    pub fn apply_refresh(
        &mut self,
        fetched: Result<Vec<Instrument>, CoreError>,
    ) -> Result<(), CoreError> {
        if let Err(e) = self.feed.apply(fetched) {
            self.sink
                .notify(Notification::error("Failed to fetch market data"));
            return Err(e);
        }

        self.portfolio_service
            .revalue(&mut self.positions, self.feed.snapshot());
        self.persist(keys::PORTFOLIO_KEY, &self.positions)?;

        let triggers = self
            .alert_service
            .evaluate(&mut self.alerts, self.feed.snapshot());
        self.persist(keys::ALERTS_KEY, &self.alerts)?;

        for trigger in &triggers {
            self.sink.notify(Notification::success(format!(
                "Alert triggered! {} is {} ${}",
                trigger.symbol.to_uppercase(),
                trigger.condition,
                trigger.target_price
            )));
        }

        Ok(())
    }

    /// The most recently completed market snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        self.feed.snapshot()
    }

    /// Look up an instrument in the current snapshot.
    #[must_use]
    pub fn instrument(&self, id: &str) -> Option<&Instrument> {
        self.feed.snapshot().get(id)
    }

    /// Case-insensitive search over instrument names and symbols.
    #[must_use]
    pub fn search_instruments(&self, query: &str) -> Vec<&Instrument> {
        let q = query.to_lowercase();
        self.feed
            .snapshot()
            .instruments()
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&q) || i.symbol.to_lowercase().contains(&q))
            .collect()
    }

    /// The error from the most recent refresh attempt, if it failed.
    #[must_use]
    pub fn feed_error(&self) -> Option<&str> {
        self.feed.last_error()
    }

    // ── Watchlist ───────────────────────────────────────────────────

    /// Add an instrument to the watchlist. Idempotent; returns whether
    /// the set changed.
    pub fn add_to_watchlist(&mut self, instrument_id: &str) -> Result<bool, CoreError> {
        let added =
            self.watchlist_service
                .add(&mut self.watchlist, &self.namespace, instrument_id)?;
        if added {
            self.sink.notify(Notification::success("Added to watchlist"));
        }
        Ok(added)
    }

    /// Remove an instrument from the watchlist. Idempotent; returns
    /// whether the set changed.
    pub fn remove_from_watchlist(&mut self, instrument_id: &str) -> Result<bool, CoreError> {
        let removed =
            self.watchlist_service
                .remove(&mut self.watchlist, &self.namespace, instrument_id)?;
        if removed {
            self.sink
                .notify(Notification::success("Removed from watchlist"));
        }
        Ok(removed)
    }

    #[must_use]
    pub fn watchlist_contains(&self, instrument_id: &str) -> bool {
        self.watchlist.contains(instrument_id)
    }

    #[must_use]
    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Record a simulated buy of an instrument from the current snapshot.
    /// `amount` and `price` must be positive; the instrument must exist
    /// in the snapshot.
    pub fn buy(&mut self, instrument_id: &str, amount: f64, price: f64) -> Result<(), CoreError> {
        let instrument = self
            .feed
            .snapshot()
            .get(instrument_id)
            .cloned()
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown instrument: {instrument_id}"))
            })?;

        self.portfolio_service
            .buy(&mut self.positions, &instrument, amount, price)?;
        self.persist(keys::PORTFOLIO_KEY, &self.positions)?;
        self.sink.notify(Notification::success("Added to portfolio"));
        Ok(())
    }

    /// Acknowledge a simulated sell. Validated against current holdings
    /// but does not reduce them; only a notice is emitted.
    pub fn sell(&mut self, instrument_id: &str, amount: f64) -> Result<SellNotice, CoreError> {
        let notice = self
            .portfolio_service
            .sell(&self.positions, instrument_id, amount)?;
        self.sink.notify(Notification::info(format!(
            "Simulated sell: {} {} for ~${:.2}",
            notice.amount,
            notice.symbol.to_uppercase(),
            notice.estimated_proceeds
        )));
        Ok(notice)
    }

    /// Delete a position entirely. Returns whether one existed.
    pub fn remove_position(&mut self, instrument_id: &str) -> Result<bool, CoreError> {
        let removed = self.portfolio_service.remove(&mut self.positions, instrument_id);
        if removed {
            self.persist(keys::PORTFOLIO_KEY, &self.positions)?;
            self.sink
                .notify(Notification::success("Removed from portfolio"));
        }
        Ok(removed)
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Aggregate totals across all positions.
    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        self.portfolio_service.summary(&self.positions)
    }

    // ── Alerts ──────────────────────────────────────────────────────

    /// Create a price alert on an instrument from the current snapshot.
    pub fn create_alert(
        &mut self,
        instrument_id: &str,
        target_price: f64,
        condition: AlertCondition,
    ) -> Result<uuid::Uuid, CoreError> {
        let instrument = self
            .feed
            .snapshot()
            .get(instrument_id)
            .cloned()
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown instrument: {instrument_id}"))
            })?;

        let id = self
            .alert_service
            .create(&mut self.alerts, &instrument, target_price, condition)?;
        self.persist(keys::ALERTS_KEY, &self.alerts)?;
        self.sink
            .notify(Notification::success("Price alert created"));
        Ok(id)
    }

    /// Manually flip an alert between active and inactive. Returns the new
    /// state, or `None` for an unknown id (no-op).
    pub fn toggle_alert(&mut self, alert_id: uuid::Uuid) -> Result<Option<bool>, CoreError> {
        let new_state = self.alert_service.toggle(&mut self.alerts, alert_id);
        if new_state.is_some() {
            self.persist(keys::ALERTS_KEY, &self.alerts)?;
            self.sink
                .notify(Notification::success("Alert status updated"));
        }
        Ok(new_state)
    }

    /// Delete an alert. Returns whether one existed.
    pub fn delete_alert(&mut self, alert_id: uuid::Uuid) -> Result<bool, CoreError> {
        let deleted = self.alert_service.delete(&mut self.alerts, alert_id);
        if deleted {
            self.persist(keys::ALERTS_KEY, &self.alerts)?;
            self.sink.notify(Notification::success("Alert deleted"));
        }
        Ok(deleted)
    }

    #[must_use]
    pub fn alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    // ── Session ─────────────────────────────────────────────────────

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // ── Internal ────────────────────────────────────────────────────

    fn load_collection<T>(
        store: &dyn KeyValueStore,
        namespace: &str,
        key: &str,
    ) -> Result<T, CoreError>
    where
        T: DeserializeOwned + Default,
    {
        match store.get(namespace, key)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_default()),
            None => Ok(T::default()),
        }
    }

    fn persist<T: Serialize>(&self, key: &str, collection: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(collection)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.store.set(&self.namespace, key, &raw)
    }
}
