//! Advisory alert feed.

use super::random::RandomSource;
use crate::types::{Alert, AlertSeverity};

/// Most recent alerts kept; older ones fall off.
pub const MAX_ALERTS: usize = 5;

/// Probability that a tick emits an alert.
pub const EMIT_PROBABILITY: f64 = 0.3;

/// Messages an alert tick can draw from.
pub const CATALOG: [(AlertSeverity, &str); 4] = [
    (
        AlertSeverity::Warning,
        "Leverage approaching 5x threshold on BTCUSDT position",
    ),
    (
        AlertSeverity::Danger,
        "Margin ratio exceeds 40% - liquidation risk increased",
    ),
    (
        AlertSeverity::Info,
        "VaR increased by 15% in last 5 minutes",
    ),
    (
        AlertSeverity::Warning,
        "High volatility detected in ETH markets",
    ),
];

/// Hands out ids of the form `{timestamp_ms}-{sequence}`.
///
/// The sequence never repeats, so two alerts in the same millisecond still
/// get distinct ids.
#[derive(Debug, Default)]
pub struct AlertIds {
    sequence: u64,
}

impl AlertIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, now: i64) -> String {
        self.sequence += 1;
        format!("{}-{}", now, self.sequence)
    }
}

/// Maybe prepend a new alert, then keep only the newest [`MAX_ALERTS`].
pub fn tick(existing: &[Alert], rng: &mut dyn RandomSource, ids: &mut AlertIds, now: i64) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(MAX_ALERTS);

    if rng.chance(EMIT_PROBABILITY) {
        let (severity, message) = CATALOG[rng.index(CATALOG.len())];
        alerts.push(Alert {
            id: ids.next(now),
            severity,
            message: message.to_string(),
            timestamp: now,
        });
    }

    alerts.extend(existing.iter().cloned());
    alerts.truncate(MAX_ALERTS);
    alerts
}

/// Remove the alert with `id`. Returns the new list and whether one was removed.
pub fn dismiss(existing: &[Alert], id: &str) -> (Vec<Alert>, bool) {
    match existing.iter().position(|alert| alert.id == id) {
        Some(index) => {
            let mut alerts = existing.to_vec();
            alerts.remove(index);
            (alerts, true)
        }
        None => (existing.to_vec(), false),
    }
}
