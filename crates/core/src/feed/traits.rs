use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::instrument::Instrument;

/// Trait abstraction for the market data source.
///
/// The production implementation talks to CoinGecko; tests substitute a
/// scripted provider. If the API changes or gets swapped out, only the one
/// implementation moves — the feed, services, and session are untouched.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full ranked market table in one read-only call.
    /// A successful result is always a complete snapshot, never a delta.
    async fn fetch_markets(&self) -> Result<Vec<Instrument>, CoreError>;
}
