//! Anchored random walk shared by every balance-driven metric.
//!
//! A metric is reset to a baseline whenever the account balance changes and
//! then drifts by a bounded perturbation on each tick. Balance fractions are
//! kept in basis points so that anchored figures come out exact for whole
//! balances.

use super::random::RandomSource;

const BPS_PER_UNIT: f64 = 10_000.0;

/// Share of the account balance, in basis points.
pub fn balance_share(balance: f64, bps: f64) -> f64 {
    balance * bps / BPS_PER_UNIT
}

/// How far a metric may move in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amplitude {
    /// Basis points of the account balance.
    BalanceBps(f64),
    /// Fixed absolute amount.
    Absolute(f64),
}

impl Amplitude {
    fn resolve(&self, balance: f64) -> f64 {
        match self {
            Amplitude::BalanceBps(bps) => balance_share(balance, *bps),
            Amplitude::Absolute(amount) => *amount,
        }
    }
}

/// Where a metric starts after a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// Basis points of the account balance.
    BalanceBps(f64),
    /// Fixed value regardless of balance.
    Fixed(f64),
}

/// Parameters of one anchored metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricWalk {
    pub baseline: Baseline,
    pub amplitude: Amplitude,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

impl MetricWalk {
    /// Unbounded walk scaled by balance.
    pub const fn proportional(baseline_bps: f64, amplitude_bps: f64) -> Self {
        Self {
            baseline: Baseline::BalanceBps(baseline_bps),
            amplitude: Amplitude::BalanceBps(amplitude_bps),
            floor: None,
            ceiling: None,
        }
    }

    /// Balance-independent walk.
    pub const fn fixed(baseline: f64, amplitude: f64) -> Self {
        Self {
            baseline: Baseline::Fixed(baseline),
            amplitude: Amplitude::Absolute(amplitude),
            floor: None,
            ceiling: None,
        }
    }

    pub const fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    pub const fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Value right after a reset.
    pub fn anchor(&self, balance: f64) -> f64 {
        let value = match self.baseline {
            Baseline::BalanceBps(bps) => balance_share(balance, bps),
            Baseline::Fixed(value) => value,
        };
        self.bound(value)
    }

    /// One perturbation step from `prev`.
    pub fn step(&self, prev: f64, balance: f64, rng: &mut dyn RandomSource) -> f64 {
        let delta = rng.symmetric(self.amplitude.resolve(balance));
        self.bound(prev + delta)
    }

    fn bound(&self, value: f64) -> f64 {
        let value = match self.floor {
            Some(floor) => value.max(floor),
            None => value,
        };
        match self.ceiling {
            Some(ceiling) => value.min(ceiling),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::SequenceSource;

    #[test]
    fn test_balance_share_is_exact_for_whole_balances() {
        assert_eq!(balance_share(25_000.0, -350.0), -875.0);
        assert_eq!(balance_share(25_000.0, 7_500.0), 18_750.0);
    }

    #[test]
    fn test_proportional_anchor() {
        let walk = MetricWalk::proportional(-350.0, 20.0);
        assert_eq!(walk.anchor(25_000.0), -875.0);
        assert_eq!(walk.anchor(50_000.0), -1_750.0);
    }

    #[test]
    fn test_fixed_anchor_ignores_balance() {
        let walk = MetricWalk::fixed(3.2, 0.25).with_floor(1.0);
        assert_eq!(walk.anchor(1_000.0), 3.2);
        assert_eq!(walk.anchor(1_000_000.0), 3.2);
    }

    #[test]
    fn test_step_extremes() {
        let walk = MetricWalk::proportional(500.0, 40.0);
        let mut low = SequenceSource::constant(0.0);
        assert_eq!(walk.step(1_250.0, 25_000.0, &mut low), 1_150.0);

        let mut mid = SequenceSource::constant(0.5);
        assert_eq!(walk.step(1_250.0, 25_000.0, &mut mid), 1_250.0);
    }

    #[test]
    fn test_bounds_are_enforced() {
        let walk = MetricWalk::fixed(0.15, 0.025)
            .with_floor(0.05)
            .with_ceiling(0.9);
        let mut low = SequenceSource::constant(0.0);
        assert_eq!(walk.step(0.06, 0.0, &mut low), 0.05);

        let mut high = SequenceSource::constant(0.999_999);
        assert_eq!(walk.step(0.89, 0.0, &mut high), 0.9);
    }
}
