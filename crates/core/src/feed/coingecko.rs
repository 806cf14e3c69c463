use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::instrument::Instrument;
use crate::models::settings::FeedConfig;

use super::traits::MarketDataProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko market data provider.
///
/// - **Free**: no API key required for the public markets endpoint.
/// - **Endpoint**: `/coins/markets` — up to `per_page` instruments ranked
///   by market cap, priced in `vs_currency`, no sparkline history.
pub struct CoinGeckoProvider {
    client: Client,
    config: FeedConfig,
}

impl CoinGeckoProvider {
    #[must_use]
    pub fn new(config: FeedConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    fn markets_url(&self) -> String {
        format!(
            "{BASE_URL}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.config.vs_currency, self.config.per_page
        )
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

// ── CoinGecko API response types ────────────────────────────────────

/// One row of the `/coins/markets` payload. Several numeric fields are
/// nullable for thinly traded assets; secondary stats default to zero /
/// unranked, but a row with a null price is dropped entirely rather than
/// quoted at $0 (see [`instruments_from_rows`]).
#[derive(Deserialize)]
pub struct MarketRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

impl From<MarketRow> for Instrument {
    fn from(row: MarketRow) -> Self {
        Instrument {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            current_price: row.current_price.unwrap_or(0.0),
            market_cap: row.market_cap.unwrap_or(0.0),
            market_cap_rank: row.market_cap_rank,
            total_volume: row.total_volume.unwrap_or(0.0),
            price_change_percentage_24h: row.price_change_percentage_24h,
        }
    }
}

/// Convert raw market rows to instruments, dropping any row without a
/// price. A null price would otherwise flow into valuations and alert
/// checks as a real $0 quote.
#[must_use]
pub fn instruments_from_rows(rows: Vec<MarketRow>) -> Vec<Instrument> {
    rows.into_iter()
        .filter(|row| {
            if row.current_price.is_none() {
                debug!(id = %row.id, "dropping market row without a price");
                return false;
            }
            true
        })
        .map(Instrument::from)
        .collect()
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn fetch_markets(&self) -> Result<Vec<Instrument>, CoreError> {
        let url = self.markets_url();
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("markets request failed with status {}", response.status()),
            });
        }

        let rows: Vec<MarketRow> = response.json().await.map_err(|e| CoreError::Api {
            provider: "CoinGecko".into(),
            message: format!("failed to parse markets response: {e}"),
        })?;

        Ok(instruments_from_rows(rows))
    }
}
