use crate::errors::CoreError;
use crate::models::instrument::{Instrument, Snapshot};
use crate::models::position::Position;
use crate::models::summary::PortfolioSummary;

/// Record of a simulated sell, returned for display only.
///
/// Sells do not reduce stored holdings in this design: the operation is
/// validated and acknowledged, but the position keeps its amount and cost
/// basis. Partial reduction and realized P/L tracking are a product
/// decision that hasn't been made yet.
#[derive(Debug, Clone, PartialEq)]
pub struct SellNotice {
    pub instrument_id: String,
    pub symbol: String,
    pub amount: f64,
    /// Proceeds at the position's last known price
    pub estimated_proceeds: f64,
}

/// Manages the simulated position collection and its derived valuation.
///
/// Pure business logic — no I/O. The caller owns the `Vec<Position>` and
/// persists it after each successful mutation.
pub struct PortfolioService;

impl PortfolioService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Record a buy. Merges into an existing position for the same
    /// instrument using weighted-average cost basis, or opens a new one.
    ///
    /// Rejects non-positive (or non-finite) amount/price with a validation
    /// error and no state change.
    pub fn buy(
        &self,
        positions: &mut Vec<Position>,
        instrument: &Instrument,
        amount: f64,
        price: f64,
    ) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::Validation(
                "Buy amount must be a positive number".into(),
            ));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::Validation(
                "Buy price must be a positive number".into(),
            ));
        }

        match positions.iter_mut().find(|p| p.id == instrument.id) {
            Some(position) => {
                position.merge_buy(amount, price);
                // The merge revalues against the position's cached price;
                // pick up the instrument's latest quote as well.
                position.revalue(instrument.current_price);
            }
            None => positions.push(Position::open(instrument, amount, price)),
        }

        Ok(())
    }

    /// Validate and acknowledge a simulated sell. Holdings are not mutated.
    pub fn sell(
        &self,
        positions: &[Position],
        instrument_id: &str,
        amount: f64,
    ) -> Result<SellNotice, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::Validation(
                "Sell amount must be a positive number".into(),
            ));
        }

        let position = positions
            .iter()
            .find(|p| p.id == instrument_id)
            .ok_or_else(|| CoreError::NotFound(format!("No position for {instrument_id}")))?;

        if amount > position.amount {
            return Err(CoreError::Validation(format!(
                "Cannot sell {} {} — only {} held",
                amount, position.symbol, position.amount
            )));
        }

        Ok(SellNotice {
            instrument_id: position.id.clone(),
            symbol: position.symbol.clone(),
            amount,
            estimated_proceeds: amount * position.current_price,
        })
    }

    /// Delete a position entirely. Returns `false` if none existed
    /// (idempotent — deleting twice is a no-op, not an error).
    pub fn remove(&self, positions: &mut Vec<Position>, instrument_id: &str) -> bool {
        let before = positions.len();
        positions.retain(|p| p.id != instrument_id);
        positions.len() != before
    }

    /// Recompute derived fields for every position from a snapshot.
    ///
    /// Positions whose instrument is missing from the snapshot keep their
    /// previous derived values (stale, corrected by a later refresh).
    /// Idempotent: revaluing twice against the same snapshot yields
    /// identical values.
    pub fn revalue(&self, positions: &mut [Position], snapshot: &Snapshot) {
        for position in positions.iter_mut() {
            if let Some(instrument) = snapshot.get(&position.id) {
                position.revalue(instrument.current_price);
            }
        }
    }

    /// Aggregate totals across all positions.
    #[must_use]
    pub fn summary(&self, positions: &[Position]) -> PortfolioSummary {
        let total_value: f64 = positions.iter().map(|p| p.total_value).sum();
        let total_invested: f64 = positions.iter().map(Position::invested).sum();
        let total_profit_loss: f64 = positions.iter().map(|p| p.profit_loss).sum();

        // Guard against 0/0 → NaN when nothing is invested yet.
        let total_return_percentage = if total_invested > 0.0 {
            total_profit_loss / total_invested * 100.0
        } else {
            0.0
        };

        PortfolioSummary {
            total_value,
            total_invested,
            total_profit_loss,
            total_return_percentage,
            position_count: positions.len(),
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
