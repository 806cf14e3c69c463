use serde::{Deserialize, Serialize};

/// Aggregate view of the whole portfolio, recomputed on demand from the
/// current positions. All monetary values are in the feed's quote currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of position total values
    pub total_value: f64,

    /// Sum of position cost bases (amount × average price)
    pub total_invested: f64,

    /// Sum of position profit/losses
    pub total_profit_loss: f64,

    /// total_profit_loss / total_invested × 100; defined as 0 when nothing
    /// is invested, to avoid a NaN leaking into dashboards
    pub total_return_percentage: f64,

    /// Number of open positions
    pub position_count: usize,
}

impl Default for PortfolioSummary {
    fn default() -> Self {
        Self {
            total_value: 0.0,
            total_invested: 0.0,
            total_profit_loss: 0.0,
            total_return_percentage: 0.0,
            position_count: 0,
        }
    }
}
