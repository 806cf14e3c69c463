use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tracked tradable asset as reported by the market feed.
///
/// Field names match the CoinGecko `/coins/markets` payload so that a feed
/// row deserializes directly. The core treats every instrument as read-only:
/// a new refresh replaces the whole snapshot, it never patches individual
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Feed-assigned identifier (e.g., "bitcoin")
    pub id: String,

    /// Ticker symbol as reported by the feed (e.g., "btc")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Latest price in the quote currency
    pub current_price: f64,

    /// Market capitalization in the quote currency
    #[serde(default)]
    pub market_cap: f64,

    /// Rank by market capitalization (None for unranked assets)
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// Traded volume over the last 24 hours
    #[serde(default)]
    pub total_volume: f64,

    /// Price change over the last 24 hours, in percent (None when the feed
    /// has no 24h history for the asset)
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl Instrument {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price,
            market_cap: 0.0,
            market_cap_rank: None,
            total_volume: 0.0,
            price_change_percentage_24h: None,
        }
    }
}

/// The full set of instruments as of the most recent successful feed refresh.
///
/// Keeps the feed's ranking order and an id index for O(1) lookup.
/// Duplicate ids (malformed feed response) keep the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    instruments: Vec<Instrument>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    #[must_use]
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut index = HashMap::with_capacity(instruments.len());
        let mut deduped = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            if !index.contains_key(&instrument.id) {
                index.insert(instrument.id.clone(), deduped.len());
                deduped.push(instrument);
            }
        }
        Self {
            instruments: deduped,
            index,
        }
    }

    /// Look up an instrument by its feed identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.index.get(id).map(|&idx| &self.instruments[idx])
    }

    /// All instruments in feed order (ranked by market cap).
    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
