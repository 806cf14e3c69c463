pub mod coingecko;
pub mod price_feed;
pub mod scheduler;
pub mod traits;
