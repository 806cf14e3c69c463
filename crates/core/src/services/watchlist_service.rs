use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::watchlist::Watchlist;
use crate::storage::keys;
use crate::storage::kv::KeyValueStore;

/// Manages the watchlist set and its persistence.
///
/// Both mutations are idempotent; every successful mutation writes the
/// full serialized set back to the store (not batched).
pub struct WatchlistService {
    store: Arc<dyn KeyValueStore>,
}

impl WatchlistService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted watchlist for a namespace. Missing or corrupt
    /// stored data yields an empty set.
    pub fn load(&self, namespace: &str) -> Result<Watchlist, CoreError> {
        match self.store.get(namespace, keys::WATCHLIST_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_default()),
            None => Ok(Watchlist::new()),
        }
    }

    /// Add an id. Returns `true` if the set changed (and was persisted);
    /// adding a present id is a no-op.
    pub fn add(
        &self,
        watchlist: &mut Watchlist,
        namespace: &str,
        instrument_id: &str,
    ) -> Result<bool, CoreError> {
        if !watchlist.insert(instrument_id) {
            return Ok(false);
        }
        self.persist(watchlist, namespace)?;
        Ok(true)
    }

    /// Remove an id. Returns `true` if the set changed (and was persisted);
    /// removing an absent id is a no-op.
    pub fn remove(
        &self,
        watchlist: &mut Watchlist,
        namespace: &str,
        instrument_id: &str,
    ) -> Result<bool, CoreError> {
        if !watchlist.remove(instrument_id) {
            return Ok(false);
        }
        self.persist(watchlist, namespace)?;
        Ok(true)
    }

    fn persist(&self, watchlist: &Watchlist, namespace: &str) -> Result<(), CoreError> {
        let raw = serde_json::to_string(watchlist)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.store.set(namespace, keys::WATCHLIST_KEY, &raw)
    }
}
