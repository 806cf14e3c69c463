use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::alert::{AlertCondition, AlertTrigger, PriceAlert};
use crate::models::instrument::{Instrument, Snapshot};

/// Manages the price alert collection and its evaluation against each
/// new market snapshot.
///
/// Pure business logic — no I/O. The caller owns the `Vec<PriceAlert>`
/// and persists it after each mutation or evaluation pass.
pub struct AlertService;

impl AlertService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Create a new alert, initially active. Requires a strictly positive,
    /// finite target price.
    pub fn create(
        &self,
        alerts: &mut Vec<PriceAlert>,
        instrument: &Instrument,
        target_price: f64,
        condition: AlertCondition,
    ) -> Result<Uuid, CoreError> {
        if !target_price.is_finite() || target_price <= 0.0 {
            return Err(CoreError::Validation(
                "Alert target price must be a positive number".into(),
            ));
        }

        let alert = PriceAlert::new(instrument, target_price, condition);
        let id = alert.id;
        alerts.push(alert);
        Ok(id)
    }

    /// Manually flip an alert between active and inactive. Does not
    /// evaluate the condition and never emits a trigger. Returns the new
    /// state, or `None` when the id is unknown (no-op).
    pub fn toggle(&self, alerts: &mut [PriceAlert], alert_id: Uuid) -> Option<bool> {
        let alert = alerts.iter_mut().find(|a| a.id == alert_id)?;
        alert.is_active = !alert.is_active;
        Some(alert.is_active)
    }

    /// Delete an alert unconditionally. Returns `false` if none existed.
    pub fn delete(&self, alerts: &mut Vec<PriceAlert>, alert_id: Uuid) -> bool {
        let before = alerts.len();
        alerts.retain(|a| a.id != alert_id);
        alerts.len() != before
    }

    /// Evaluate every alert against a snapshot.
    ///
    /// For each alert with a matching instrument, the denormalized current
    /// price is refreshed regardless of state; then, only while still
    /// active, the condition is tested and a satisfied one flips the alert
    /// to inactive exactly once, producing a trigger. Alerts whose
    /// instrument dropped out of the feed are left untouched. Safe to call
    /// with an empty or unchanged snapshot: an inactive alert never
    /// re-fires, so there are no duplicate triggers.
    pub fn evaluate(&self, alerts: &mut [PriceAlert], snapshot: &Snapshot) -> Vec<AlertTrigger> {
        let mut triggers = Vec::new();

        for alert in alerts.iter_mut() {
            let Some(instrument) = snapshot.get(&alert.instrument_id) else {
                continue;
            };

            alert.current_price = instrument.current_price;

            if alert.is_active
                && alert
                    .condition
                    .satisfied_by(instrument.current_price, alert.target_price)
            {
                alert.is_active = false;
                triggers.push(AlertTrigger {
                    alert_id: alert.id,
                    symbol: alert.symbol.clone(),
                    condition: alert.condition,
                    target_price: alert.target_price,
                    price: instrument.current_price,
                });
            }
        }

        triggers
    }
}

impl Default for AlertService {
    fn default() -> Self {
        Self::new()
    }
}
