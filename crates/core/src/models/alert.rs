use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::instrument::Instrument;

/// Direction of a price alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    /// Fires when the price reaches or exceeds the target
    Above,
    /// Fires when the price reaches or falls below the target
    Below,
}

impl AlertCondition {
    /// Whether `price` satisfies this condition against `target`.
    /// Boundary is inclusive in both directions.
    #[must_use]
    pub fn satisfied_by(self, price: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => price >= target,
            AlertCondition::Below => price <= target,
        }
    }
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCondition::Above => write!(f, "above"),
            AlertCondition::Below => write!(f, "below"),
        }
    }
}

/// A user-defined price threshold on one instrument.
///
/// State machine: created `Active`; flips to inactive exactly once when an
/// evaluation pass observes a satisfied condition. A manual toggle is the
/// only way back to active, after which it may fire again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    /// Unique identifier
    pub id: Uuid,

    /// Target instrument's feed identifier
    pub instrument_id: String,

    /// Ticker symbol (denormalized for display)
    pub symbol: String,

    /// Human-readable name (denormalized for display)
    pub name: String,

    /// Threshold price, always > 0
    pub target_price: f64,

    /// Last observed price, refreshed on every evaluation pass
    pub current_price: f64,

    /// Trigger direction
    pub condition: AlertCondition,

    /// `false` once triggered (or manually disabled)
    pub is_active: bool,

    /// When the alert was created
    pub created_at: DateTime<Utc>,
}

impl PriceAlert {
    #[must_use]
    pub fn new(instrument: &Instrument, target_price: f64, condition: AlertCondition) -> Self {
        Self {
            id: Uuid::new_v4(),
            instrument_id: instrument.id.clone(),
            symbol: instrument.symbol.clone(),
            name: instrument.name.clone(),
            target_price,
            current_price: instrument.current_price,
            condition,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// One-time payload emitted when an alert transitions `Active → Inactive`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertTrigger {
    pub alert_id: Uuid,
    pub symbol: String,
    pub condition: AlertCondition,
    pub target_price: f64,
    /// The observed price that satisfied the condition
    pub price: f64,
}
