//! Risk aggregator.
//!
//! Every field is an independent [`MetricWalk`]. No ordering between the VaR
//! horizons or CVaR is enforced; they may drift past one another.

use super::random::RandomSource;
use super::walk::MetricWalk;
use crate::types::RiskSnapshot;

pub const UNREALIZED_PNL: MetricWalk = MetricWalk::proportional(500.0, 40.0);
pub const VAR_1MIN: MetricWalk = MetricWalk::proportional(-350.0, 20.0);
pub const VAR_5MIN: MetricWalk = MetricWalk::proportional(-860.0, 60.0);
pub const CVAR: MetricWalk = MetricWalk::proportional(-1_280.0, 100.0);
pub const LEVERAGE: MetricWalk = MetricWalk::fixed(3.2, 0.25).with_floor(1.0);
pub const MARGIN_RATIO: MetricWalk = MetricWalk::fixed(0.15, 0.025)
    .with_floor(0.05)
    .with_ceiling(0.9);

/// Baseline snapshot for a balance.
pub fn anchor(balance: f64) -> RiskSnapshot {
    RiskSnapshot {
        unrealized_pnl: UNREALIZED_PNL.anchor(balance),
        leverage: LEVERAGE.anchor(balance),
        margin_ratio: MARGIN_RATIO.anchor(balance),
        var_1min: VAR_1MIN.anchor(balance),
        var_5min: VAR_5MIN.anchor(balance),
        cvar: CVAR.anchor(balance),
    }
}

/// Re-anchor the balance-driven fields after a balance change.
///
/// Leverage and margin ratio carry over from `prev`.
pub fn reanchor(prev: &RiskSnapshot, balance: f64) -> RiskSnapshot {
    RiskSnapshot {
        leverage: prev.leverage,
        margin_ratio: prev.margin_ratio,
        ..anchor(balance)
    }
}

/// One perturbation tick.
pub fn step(prev: &RiskSnapshot, balance: f64, rng: &mut dyn RandomSource) -> RiskSnapshot {
    RiskSnapshot {
        unrealized_pnl: UNREALIZED_PNL.step(prev.unrealized_pnl, balance, rng),
        leverage: LEVERAGE.step(prev.leverage, balance, rng),
        margin_ratio: MARGIN_RATIO.step(prev.margin_ratio, balance, rng),
        var_1min: VAR_1MIN.step(prev.var_1min, balance, rng),
        var_5min: VAR_5MIN.step(prev.var_5min, balance, rng),
        cvar: CVAR.step(prev.cvar, balance, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::{SeededSource, SequenceSource};
    use crate::types::RiskLevel;

    #[test]
    fn test_anchor_at_default_balance() {
        let risk = anchor(25_000.0);
        assert_eq!(risk.unrealized_pnl, 1_250.0);
        assert_eq!(risk.var_1min, -875.0);
        assert_eq!(risk.var_5min, -2_150.0);
        assert_eq!(risk.cvar, -3_200.0);
        assert_eq!(risk.leverage, 3.2);
        assert_eq!(risk.margin_ratio, 0.15);
        assert_eq!(risk.level(), RiskLevel::Low);
    }

    #[test]
    fn test_reanchor_doubles_and_keeps_leverage() {
        let mut rng = SeededSource::from_seed(1);
        let mut risk = anchor(25_000.0);
        for _ in 0..10 {
            risk = step(&risk, 25_000.0, &mut rng);
        }
        let moved = reanchor(&risk, 50_000.0);
        let base = anchor(25_000.0);

        assert_eq!(moved.unrealized_pnl, base.unrealized_pnl * 2.0);
        assert_eq!(moved.var_1min, base.var_1min * 2.0);
        assert_eq!(moved.var_5min, base.var_5min * 2.0);
        assert_eq!(moved.cvar, base.cvar * 2.0);
        assert_eq!(moved.leverage, risk.leverage);
        assert_eq!(moved.margin_ratio, risk.margin_ratio);
    }

    #[test]
    fn test_step_amplitude_scales_with_balance() {
        let mut low = SequenceSource::constant(0.0);
        let risk = step(&anchor(25_000.0), 25_000.0, &mut low);
        assert_eq!(risk.unrealized_pnl, 1_150.0);
        assert_eq!(risk.var_1min, -925.0);
        assert_eq!(risk.var_5min, -2_300.0);
        assert_eq!(risk.cvar, -3_450.0);
        assert!((risk.leverage - 2.95).abs() < 1e-12);
        assert!((risk.margin_ratio - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_hold_under_pressure() {
        let mut low = SequenceSource::constant(0.0);
        let mut risk = anchor(25_000.0);
        for _ in 0..100 {
            risk = step(&risk, 25_000.0, &mut low);
        }
        assert_eq!(risk.leverage, 1.0);
        assert_eq!(risk.margin_ratio, 0.05);

        let mut high = SequenceSource::constant(0.999_999);
        for _ in 0..100 {
            risk = step(&risk, 25_000.0, &mut high);
        }
        assert_eq!(risk.margin_ratio, 0.9);
        assert_eq!(risk.level(), RiskLevel::High);
        assert!(risk.liquidation_risk());
    }
}
