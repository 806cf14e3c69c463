use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The set of instrument ids the user wants to track.
///
/// Set semantics with O(1) membership, but insertion order is preserved so
/// the list renders in the order items were added. Serializes as a plain
/// JSON array of ids; duplicates in stored data are dropped on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Watchlist {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl Watchlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id. Returns `false` (and changes nothing) if already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.index.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.ids.push(id);
        true
    }

    /// Remove an id. Returns `false` (and changes nothing) if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.ids.retain(|existing| existing != id);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Watchlist {
    fn from(ids: Vec<String>) -> Self {
        let mut watchlist = Watchlist::new();
        for id in ids {
            watchlist.insert(id);
        }
        watchlist
    }
}

impl From<Watchlist> for Vec<String> {
    fn from(watchlist: Watchlist) -> Self {
        watchlist.ids
    }
}
