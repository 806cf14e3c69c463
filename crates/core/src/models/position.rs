use serde::{Deserialize, Serialize};

use super::instrument::Instrument;

/// A simulated holding of one instrument, with a cost basis.
///
/// `amount` and `average_price` are the stored facts; the remaining four
/// fields are derived and recomputed on every revalue pass. At most one
/// position exists per instrument id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument identifier this position tracks
    pub id: String,

    /// Ticker symbol (denormalized for display)
    pub symbol: String,

    /// Human-readable name (denormalized for display)
    pub name: String,

    /// Quantity held, always > 0
    pub amount: f64,

    /// Weighted-average cost per unit, always > 0
    pub average_price: f64,

    /// Latest known price, copied from the snapshot on revalue
    pub current_price: f64,

    /// amount × current_price
    pub total_value: f64,

    /// total_value − amount × average_price
    pub profit_loss: f64,

    /// (current_price − average_price) / average_price × 100
    pub profit_loss_percentage: f64,
}

impl Position {
    /// Open a new position from a first buy. Derived fields are computed
    /// from the instrument's current price at creation time.
    #[must_use]
    pub fn open(instrument: &Instrument, amount: f64, price: f64) -> Self {
        let mut position = Self {
            id: instrument.id.clone(),
            symbol: instrument.symbol.clone(),
            name: instrument.name.clone(),
            amount,
            average_price: price,
            current_price: instrument.current_price,
            total_value: 0.0,
            profit_loss: 0.0,
            profit_loss_percentage: 0.0,
        };
        position.revalue(instrument.current_price);
        position
    }

    /// Merge an additional buy into this position using weighted-average
    /// cost basis:
    /// `new_avg = (old_amount·old_avg + added·price) / (old_amount + added)`
    pub fn merge_buy(&mut self, amount: f64, price: f64) {
        let total_amount = self.amount + amount;
        let total_cost = self.amount * self.average_price + amount * price;
        self.average_price = total_cost / total_amount;
        self.amount = total_amount;
        self.revalue(self.current_price);
    }

    /// Recompute the derived fields against a new current price.
    /// Idempotent: the same price always yields the same derived values.
    pub fn revalue(&mut self, current_price: f64) {
        self.current_price = current_price;
        self.total_value = self.amount * current_price;
        self.profit_loss = self.total_value - self.amount * self.average_price;
        self.profit_loss_percentage =
            (current_price - self.average_price) / self.average_price * 100.0;
    }

    /// Total cost basis of this position (amount × average price).
    #[must_use]
    pub fn invested(&self) -> f64 {
        self.amount * self.average_price
    }
}
